use std::collections::HashMap;
use std::time::Instant;

use crate::pipeline::run_report::{RunReport, RunState};

/// Cross-cutting logger for pipeline orchestration events.
///
/// Decouples the use case from how progress is shown, so the CLI and tests
/// can observe a run without changing the orchestration code.
pub trait PipelineLogger: Send {
    /// A segment finished (successfully or not). `current` is 1-based.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self, _report: &RunReport) {}
}

/// Silent logger for tests and embedding callers.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger: per-segment progress lines, stage timings, and a
/// closing summary that says whether the transcript is complete.
pub struct StdoutPipelineLogger {
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
}

impl StdoutPipelineLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            start_time: Instant::now(),
        }
    }

    pub fn summary_string(&self, report: &RunReport) -> String {
        let mut lines = vec![report.describe()];
        if report.status == RunState::AlreadyDone {
            return lines.join("\n");
        }

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = if durations.is_empty() {
                0.0
            } else {
                total_ms / durations.len() as f64
            };
            lines.push(format!(
                "  {stage:12}: avg {:6.1}s  total {:7.1}s",
                avg_ms / 1000.0,
                total_ms / 1000.0
            ));
        }
        lines.push(format!(
            "  Wall clock: {:.1}s",
            self.start_time.elapsed().as_secs_f64()
        ));
        lines.join("\n")
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        if total > 0 {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Segment {current}/{total} done ({pct:.0}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self, report: &RunReport) {
        let text = self.summary_string(report);
        match report.status {
            RunState::Partial => log::warn!("{text}"),
            _ => log::info!("{text}"),
        }
    }
}
