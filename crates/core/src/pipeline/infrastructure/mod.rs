pub mod file_output_target;
pub mod threaded_segment_executor;

use crate::pipeline::segment_executor::{SegmentExecutor, SequentialSegmentExecutor};
use threaded_segment_executor::ThreadedSegmentExecutor;

/// Sequential for a single worker, a thread pool otherwise.
pub fn executor_for(workers: usize) -> Box<dyn SegmentExecutor> {
    if workers > 1 {
        Box::new(ThreadedSegmentExecutor::new(workers))
    } else {
        Box::new(SequentialSegmentExecutor)
    }
}
