use thiserror::Error;

/// Subtitle text that doesn't follow SubRip structure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed SRT at line {line}: {message}")]
pub struct CodecError {
    pub line: usize,
    pub message: String,
}

impl CodecError {
    pub fn at(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}
