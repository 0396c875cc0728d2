use thiserror::Error;

use crate::media::domain::clip_encoder::EncodeError;
use crate::subtitle::domain::codec_error::CodecError;

/// One transcription attempt failed. Always retryable from the caller's
/// point of view.
#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("request failed: {0}")]
    Http(String),
    #[error("backend returned {status}: {body}")]
    Backend { status: u16, body: String },
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
}
