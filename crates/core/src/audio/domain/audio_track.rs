/// Decoded audio: interleaved PCM samples normalized to [-1.0, 1.0].
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioTrack {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels: channels.max(1),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.frames() as u64 * 1000 / self.sample_rate as u64
    }

    pub fn duration(&self) -> f64 {
        self.duration_ms() as f64 / 1000.0
    }

    /// Interleaved sample index of the frame starting at `ms`, unclamped.
    pub fn sample_index_at_ms(&self, ms: u64) -> usize {
        let frame = ms * self.sample_rate as u64 / 1000;
        frame as usize * self.channels as usize
    }

    /// Copies the half-open range `[start_ms, end_ms)` into a new track.
    ///
    /// Bounds past the end of the track are clamped, so a range that starts
    /// after the end yields an empty track.
    pub fn slice_ms(&self, start_ms: u64, end_ms: u64) -> AudioTrack {
        let len = self.samples.len();
        let start = self.sample_index_at_ms(start_ms).min(len);
        let end = self.sample_index_at_ms(end_ms).min(len).max(start);
        AudioTrack::new(
            self.samples[start..end].to_vec(),
            self.sample_rate,
            self.channels,
        )
    }
}
