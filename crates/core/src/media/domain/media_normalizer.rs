use std::path::{Path, PathBuf};

use thiserror::Error;

use super::media_stream::MediaStream;

/// Media could not be turned into a decodable audio stream. Fatal to a run.
#[derive(Error, Debug)]
pub enum TranscoderError {
    #[error("failed to open {path}: {reason}")]
    Open { path: PathBuf, reason: String },
    #[error("no audio stream in {0}")]
    NoAudioStream(PathBuf),
    #[error("failed to decode audio from {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

/// Domain interface for turning arbitrary input media into a normalized
/// PCM stream the segmenter and backend can work with.
pub trait MediaNormalizer: Send {
    fn normalize(&self, path: &Path) -> Result<MediaStream, TranscoderError>;
}
