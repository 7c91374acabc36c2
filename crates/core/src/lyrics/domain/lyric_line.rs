/// One timestamped line of a lyric file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LyricLine {
    /// Offset from the start of the song, in milliseconds.
    pub offset_ms: u64,
    /// The visible text, with the metadata prefix removed.
    pub text: String,
    /// The trimmed line as it appeared in the file, tag included.
    pub raw: String,
}

impl LyricLine {
    pub fn offsets(lines: &[LyricLine]) -> Vec<u64> {
        lines.iter().map(|l| l.offset_ms).collect()
    }

    pub fn texts(lines: &[LyricLine]) -> Vec<String> {
        lines.iter().map(|l| l.text.clone()).collect()
    }
}
