use std::io::Cursor;

use crate::audio::domain::audio_track::AudioTrack;
use crate::audio::domain::clip_encoder::ClipEncoder;

/// Encodes clips as 16-bit PCM WAV using hound.
///
/// Keeps the source sample rate and channel count; Anki plays WAV natively.
pub struct WavClipEncoder;

impl ClipEncoder for WavClipEncoder {
    fn extension(&self) -> &str {
        "wav"
    }

    fn encode(&self, clip: &AudioTrack) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let spec = hound::WavSpec {
            channels: clip.channels(),
            sample_rate: clip.sample_rate(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
            for &sample in clip.samples() {
                writer.write_sample(to_pcm16(sample))?;
            }
            writer.finalize()?;
        }
        Ok(cursor.into_inner())
    }
}

fn to_pcm16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}
