use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::media::domain::clip_encoder::{ClipEncoder, EncodeError, EncodedClip};
use crate::media::domain::media_stream::MediaStream;

/// Encodes clips as 16-bit PCM WAV entirely in memory, so no temporary
/// files outlive an upload attempt.
pub struct WavClipEncoder;

impl ClipEncoder for WavClipEncoder {
    fn encode(&self, clip: &MediaStream) -> Result<EncodedClip, EncodeError> {
        let spec = WavSpec {
            channels: clip.channels(),
            sample_rate: clip.sample_rate(),
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut buffer = Cursor::new(Vec::with_capacity(44 + clip.samples().len() * 2));
        {
            let mut writer =
                WavWriter::new(&mut buffer, spec).map_err(|e| EncodeError(e.to_string()))?;
            let mut samples = writer.get_i16_writer(clip.samples().len() as u32);
            for &sample in clip.samples() {
                samples.write_sample(to_i16(sample));
            }
            samples.flush().map_err(|e| EncodeError(e.to_string()))?;
            writer.finalize().map_err(|e| EncodeError(e.to_string()))?;
        }

        Ok(EncodedClip {
            bytes: buffer.into_inner(),
            file_name: "segment.wav".to_string(),
            mime: "audio/wav",
        })
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample * 32767.0).clamp(-32768.0, 32767.0) as i16
}
