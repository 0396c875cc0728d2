use std::path::Path;

use ffmpeg_next::format::sample::Type as SampleLayout;
use ffmpeg_next::format::Sample;
use ffmpeg_next::software::resampling;
use ffmpeg_next::util::frame::audio::Audio;

use crate::media::domain::media_normalizer::{MediaNormalizer, TranscoderError};
use crate::media::domain::media_stream::MediaStream;
use crate::shared::constants::NORMALIZED_SAMPLE_RATE;

/// Decodes the best audio stream of any FFmpeg-readable container and
/// resamples it to mono `f32` at a fixed rate.
pub struct FfmpegNormalizer {
    sample_rate: u32,
}

impl FfmpegNormalizer {
    pub fn new() -> Self {
        Self {
            sample_rate: NORMALIZED_SAMPLE_RATE,
        }
    }

    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl Default for FfmpegNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaNormalizer for FfmpegNormalizer {
    fn normalize(&self, path: &Path) -> Result<MediaStream, TranscoderError> {
        let open_err = |e: ffmpeg_next::Error| TranscoderError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        let decode_err = |e: ffmpeg_next::Error| TranscoderError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        ffmpeg_next::init().map_err(open_err)?;
        let mut ictx = ffmpeg_next::format::input(path).map_err(open_err)?;

        let (stream_index, parameters) = {
            let stream = ictx
                .streams()
                .best(ffmpeg_next::media::Type::Audio)
                .ok_or_else(|| TranscoderError::NoAudioStream(path.to_path_buf()))?;
            (stream.index(), stream.parameters())
        };

        let mut decoder = ffmpeg_next::codec::context::Context::from_parameters(parameters)
            .and_then(|ctx| ctx.decoder().audio())
            .map_err(decode_err)?;

        let mut resampler = resampling::Context::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            Sample::F32(SampleLayout::Planar),
            ffmpeg_next::ChannelLayout::MONO,
            self.sample_rate,
        )
        .map_err(decode_err)?;

        let mut pcm = Vec::new();
        let mut decoded = Audio::empty();
        let mut resampled = Audio::empty();

        for (stream, packet) in ictx.packets() {
            if stream.index() != stream_index {
                continue;
            }
            decoder.send_packet(&packet).map_err(decode_err)?;
            while decoder.receive_frame(&mut decoded).is_ok() {
                resampler
                    .run(&decoded, &mut resampled)
                    .map_err(decode_err)?;
                append_mono_samples(&resampled, &mut pcm);
            }
        }

        decoder.send_eof().map_err(decode_err)?;
        while decoder.receive_frame(&mut decoded).is_ok() {
            resampler
                .run(&decoded, &mut resampled)
                .map_err(decode_err)?;
            append_mono_samples(&resampled, &mut pcm);
        }

        // The resampler may still hold a tail of buffered samples.
        if let Ok(Some(delay)) = resampler.flush(&mut resampled) {
            if delay.output > 0 {
                append_mono_samples(&resampled, &mut pcm);
            }
        }

        log::debug!(
            "Decoded {} samples at {} Hz from {}",
            pcm.len(),
            self.sample_rate,
            path.display()
        );
        Ok(MediaStream::new(pcm, self.sample_rate, 1))
    }
}

/// Copy the single plane of a planar mono f32 frame.
fn append_mono_samples(frame: &Audio, out: &mut Vec<f32>) {
    let n = frame.samples();
    if n == 0 {
        return;
    }
    out.extend_from_slice(&frame.plane::<f32>(0)[..n]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_path() -> &'static Path {
        if cfg!(windows) {
            Path::new("Z:\\nonexistent\\talk.mp4")
        } else {
            Path::new("/nonexistent/talk.mp4")
        }
    }

    #[test]
    fn test_nonexistent_file_is_open_error() {
        let result = FfmpegNormalizer::new().normalize(missing_path());
        assert!(matches!(result, Err(TranscoderError::Open { .. })));
    }

    #[test]
    fn test_default_rate_is_whisper_rate() {
        assert_eq!(FfmpegNormalizer::default().sample_rate, 16_000);
    }
}
