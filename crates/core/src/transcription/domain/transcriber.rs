use super::response_kind::ResponseKind;
use super::transcription_error::TranscriptionError;
use crate::media::domain::media_stream::MediaStream;

/// Raw backend output for one clip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transcription {
    /// SubRip text on the clip's local clock.
    Subtitle(String),
    PlainText(String),
}

/// Domain interface for speech-to-text on a single short clip.
///
/// Implementations make exactly one attempt per call; retrying is the
/// pipeline's job.
pub trait Transcriber: Send + Sync {
    fn transcribe(
        &self,
        clip: &MediaStream,
        kind: ResponseKind,
    ) -> Result<Transcription, TranscriptionError>;
}
