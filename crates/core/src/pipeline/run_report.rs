use std::time::Duration;

use crate::media::domain::segment::Segment;

/// Lifecycle of one transcription run.
///
/// `Pending -> Running -> {Completed, Partial}`, or `Pending -> AlreadyDone`
/// when the output target already holds a finished transcript.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Running,
    Completed,
    Partial,
    AlreadyDone,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Completed | RunState::Partial | RunState::AlreadyDone
        )
    }

    /// Terminal state for a run that processed every segment.
    pub fn finished(failed_segments: usize) -> Self {
        if failed_segments == 0 {
            RunState::Completed
        } else {
            RunState::Partial
        }
    }
}

/// A segment that was skipped after exhausting its retries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentFailure {
    pub segment: Segment,
    pub attempts: u32,
    pub cause: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub status: RunState,
    pub segments_total: usize,
    pub failed: Vec<SegmentFailure>,
    /// Cues in the final track (0 in plain-text mode).
    pub cue_count: usize,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn already_done() -> Self {
        Self {
            status: RunState::AlreadyDone,
            segments_total: 0,
            failed: Vec::new(),
            cue_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn segments_succeeded(&self) -> usize {
        self.segments_total.saturating_sub(self.failed.len())
    }

    pub fn describe(&self) -> String {
        match self.status {
            RunState::AlreadyDone => "Transcript already exists, skipped".to_string(),
            RunState::Completed => format!(
                "Transcript complete: {} segments, {} cues in {:.1}s",
                self.segments_total,
                self.cue_count,
                self.elapsed.as_secs_f64()
            ),
            RunState::Partial => {
                let skipped: Vec<String> = self
                    .failed
                    .iter()
                    .map(|f| format!("{} ({})", f.segment, f.cause))
                    .collect();
                format!(
                    "Transcript partial: {} of {} segments transcribed, skipped {}. Re-run to retry them.",
                    self.segments_succeeded(),
                    self.segments_total,
                    skipped.join("; ")
                )
            }
            RunState::Pending | RunState::Running => format!("Run {:?}", self.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: RunState, failed: Vec<SegmentFailure>) -> RunReport {
        RunReport {
            status,
            segments_total: 4,
            failed,
            cue_count: 12,
            elapsed: Duration::from_secs(3),
        }
    }

    #[test]
    fn test_finished_state_depends_on_failures() {
        assert_eq!(RunState::finished(0), RunState::Completed);
        assert_eq!(RunState::finished(2), RunState::Partial);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RunState::Pending.is_terminal());
        assert!(!RunState::Running.is_terminal());
        assert!(RunState::Completed.is_terminal());
        assert!(RunState::Partial.is_terminal());
        assert!(RunState::AlreadyDone.is_terminal());
    }

    #[test]
    fn test_describe_complete() {
        let text = report(RunState::Completed, vec![]).describe();
        assert!(text.starts_with("Transcript complete"));
        assert!(text.contains("12 cues"));
    }

    #[test]
    fn test_describe_partial_names_skipped_segments() {
        let failure = SegmentFailure {
            segment: Segment::new(1, 180_000, 360_000),
            attempts: 3,
            cause: "timeout".to_string(),
        };
        let r = report(RunState::Partial, vec![failure]);
        assert_eq!(r.segments_succeeded(), 3);
        let text = r.describe();
        assert!(text.contains("3 of 4 segments transcribed"));
        assert!(text.contains("segment 2"));
        assert!(text.contains("timeout"));
    }

    #[test]
    fn test_already_done_report() {
        let r = RunReport::already_done();
        assert_eq!(r.status, RunState::AlreadyDone);
        assert!(r.describe().contains("already exists"));
    }
}
