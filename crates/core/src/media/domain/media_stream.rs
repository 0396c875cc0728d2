use super::segment::Segment;

/// Decoded audio: interleaved PCM samples normalized to [-1.0, 1.0].
///
/// Immutable once loaded. A run shares one stream read-only and cuts
/// per-segment clips out of it on demand.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaStream {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl MediaStream {
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
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.frame_count() as u64 * 1000 / self.sample_rate as u64
    }

    /// Index into `samples` of the first frame at or after `ms`,
    /// clamped to the end of the buffer.
    pub fn sample_index_at_ms(&self, ms: u64) -> usize {
        let frame = ms * self.sample_rate as u64 / 1000;
        let index = frame as usize * self.channels as usize;
        index.min(self.samples.len())
    }

    /// Copy out the `[start_ms, end_ms)` range of `segment` as a standalone
    /// stream with the same format.
    pub fn clip(&self, segment: &Segment) -> MediaStream {
        let start = self.sample_index_at_ms(segment.start_ms);
        let end = self.sample_index_at_ms(segment.end_ms).max(start);
        MediaStream::new(
            self.samples[start..end].to_vec(),
            self.sample_rate,
            self.channels,
        )
    }
}
