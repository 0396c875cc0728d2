use thiserror::Error;

use super::media_stream::MediaStream;

#[derive(Error, Debug)]
#[error("failed to encode clip: {0}")]
pub struct EncodeError(pub String);

/// One segment packaged as an uploadable audio file.
#[derive(Clone, Debug)]
pub struct EncodedClip {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: &'static str,
}

/// Domain interface for materializing a clip in a container the backend
/// accepts.
pub trait ClipEncoder: Send + Sync {
    fn encode(&self, clip: &MediaStream) -> Result<EncodedClip, EncodeError>;
}
