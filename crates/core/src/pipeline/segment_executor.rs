use std::sync::Arc;
use std::time::Duration;

use crate::media::domain::segment::Segment;
use crate::pipeline::pipeline_error::PipelineError;
use crate::pipeline::run_report::SegmentFailure;
use crate::subtitle::domain::cue::ShiftedFragment;

/// What a successfully transcribed segment contributes to the track.
#[derive(Clone, Debug, PartialEq)]
pub enum SegmentContent {
    Cues(ShiftedFragment),
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SegmentOutcome {
    pub segment: Segment,
    pub result: Result<SegmentContent, SegmentFailure>,
    pub elapsed: Duration,
}

/// Transcribes one segment, retries included. Must never panic on
/// backend errors; those come back as `SegmentFailure`.
pub type SegmentTask = Arc<dyn Fn(Segment) -> SegmentOutcome + Send + Sync>;

/// Receives outcomes strictly in segment order.
pub type OutcomeSink<'a> = dyn FnMut(SegmentOutcome) -> Result<(), PipelineError> + 'a;

/// Abstracts how segments are dispatched to the transcription task.
///
/// Implementations may run tasks concurrently, but `sink` is always called
/// on the caller's thread, once per segment, in increasing segment order.
/// An error from `sink` stops dispatch and is returned.
pub trait SegmentExecutor: Send {
    fn execute(
        &self,
        segments: &[Segment],
        task: SegmentTask,
        sink: &mut OutcomeSink<'_>,
    ) -> Result<(), PipelineError>;
}

/// Runs one segment at a time on the calling thread.
pub struct SequentialSegmentExecutor;

impl SegmentExecutor for SequentialSegmentExecutor {
    fn execute(
        &self,
        segments: &[Segment],
        task: SegmentTask,
        sink: &mut OutcomeSink<'_>,
    ) -> Result<(), PipelineError> {
        for segment in segments {
            sink(task(*segment))?;
        }
        Ok(())
    }
}
