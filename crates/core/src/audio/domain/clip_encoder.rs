use super::audio_track::AudioTrack;

/// Domain interface for turning a slice of PCM into a standalone audio file.
pub trait ClipEncoder: Send {
    /// File extension of the encoded clips, without the dot.
    fn extension(&self) -> &str;

    fn encode(&self, clip: &AudioTrack) -> Result<Vec<u8>, Box<dyn std::error::Error>>;
}
