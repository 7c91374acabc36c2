use crate::lyrics::domain::lyric_line::LyricLine;

const INSTRUCTIONS: &str = "\
I am turning an .lrc file into flashcards, one card per line of the song, \
so every timestamped line needs its own English translation.
The number of lines and their order MUST stay exactly the same: one \
translated line per input line, each on its own line.
Start every translated line with the same [mm:ss.cc] timestamp tag as the \
input line, so the translation can be matched back to the audio.
A rough translation is fine as long as each line is translated separately.
Reply with the translated lines only: no comments, no numbering, no code \
fences.";

/// Builds the single batched translation request for a whole song.
///
/// Raw lines, timestamp tags included, are sent so the model can echo them.
pub fn build_translation_prompt(lines: &[LyricLine]) -> String {
    let mut prompt = String::from(INSTRUCTIONS);
    prompt.push_str("\n\nHere is the .lrc file:\n");
    for line in lines {
        prompt.push_str(&line.raw);
        prompt.push('\n');
    }
    prompt
}
