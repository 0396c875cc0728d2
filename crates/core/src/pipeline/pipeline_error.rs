use thiserror::Error;

use crate::media::domain::media_normalizer::TranscoderError;
use crate::pipeline::output_target::OutputError;

/// Run-level failures. Per-segment transcription errors never surface
/// here; they degrade to skipped segments in the run report.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Transcoder(#[from] TranscoderError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("transcription worker panicked")]
    WorkerPanicked,
}
