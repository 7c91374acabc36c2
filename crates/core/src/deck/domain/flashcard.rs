/// One card: an audio clip with the lyric line on the front and its
/// translation on the back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashcardRecord {
    /// File name of the clip as bundled in the deck media.
    pub audio_file: String,
    pub front: String,
    pub back: String,
}

impl FlashcardRecord {
    /// Anki sound tag for the audio field.
    pub fn audio_field(&self) -> String {
        format!("[sound:{}]", self.audio_file)
    }

    /// Note field values in model order: Audio, Text, Translation.
    pub fn fields(&self) -> [String; 3] {
        [self.audio_field(), self.front.clone(), self.back.clone()]
    }
}
