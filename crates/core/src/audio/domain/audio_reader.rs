use std::path::Path;

use super::audio_track::AudioTrack;

/// Domain interface for decoding a compressed song file.
pub trait AudioReader: Send {
    /// Decode the whole file to interleaved PCM at its native rate and
    /// channel layout. Returns None if the file has no audio stream.
    fn read_audio(&self, path: &Path) -> Result<Option<AudioTrack>, Box<dyn std::error::Error>>;
}
