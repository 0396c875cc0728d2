pub mod backend_config;
pub mod response_kind;
pub mod transcriber;
pub mod transcription_error;
