use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::media::domain::segment::Segment;
use crate::pipeline::pipeline_error::PipelineError;
use crate::pipeline::segment_executor::{OutcomeSink, SegmentExecutor, SegmentOutcome, SegmentTask};

/// Transcribes several segments at once on a fixed worker pool.
///
/// Layout: `caller [queue] → N workers [task] → caller [reorder → sink]`
///
/// Workers pull segments from a shared queue and each materializes only
/// its own clip. Completions arrive in any order and are held back until
/// every earlier segment has been delivered.
pub struct ThreadedSegmentExecutor {
    workers: usize,
}

impl ThreadedSegmentExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl SegmentExecutor for ThreadedSegmentExecutor {
    fn execute(
        &self,
        segments: &[Segment],
        task: SegmentTask,
        sink: &mut OutcomeSink<'_>,
    ) -> Result<(), PipelineError> {
        if segments.is_empty() {
            return Ok(());
        }

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<Segment>();
        let (done_tx, done_rx) = crossbeam_channel::unbounded::<SegmentOutcome>();
        let cancelled = Arc::new(AtomicBool::new(false));

        for segment in segments {
            // Receiver is alive until the workers exit.
            let _ = job_tx.send(*segment);
        }
        drop(job_tx);

        let handles: Vec<JoinHandle<()>> = (0..self.workers.min(segments.len()))
            .map(|_| {
                spawn_worker(
                    job_rx.clone(),
                    done_tx.clone(),
                    task.clone(),
                    cancelled.clone(),
                )
            })
            .collect();
        drop(done_tx);

        let delivery = deliver_in_order(done_rx, segments.len(), sink);
        if delivery.is_err() {
            cancelled.store(true, Ordering::Relaxed);
        }

        let mut panicked = false;
        for handle in handles {
            panicked |= handle.join().is_err();
        }

        match delivery {
            Err(e) => Err(e),
            Ok(delivered) if delivered < segments.len() || panicked => {
                Err(PipelineError::WorkerPanicked)
            }
            Ok(_) => Ok(()),
        }
    }
}

fn spawn_worker(
    job_rx: crossbeam_channel::Receiver<Segment>,
    done_tx: crossbeam_channel::Sender<SegmentOutcome>,
    task: SegmentTask,
    cancelled: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for segment in job_rx {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            if done_tx.send(task(segment)).is_err() {
                break;
            }
        }
    })
}

/// Buffer out-of-order completions and hand them to `sink` by segment
/// index. Returns how many outcomes were delivered.
fn deliver_in_order(
    done_rx: crossbeam_channel::Receiver<SegmentOutcome>,
    total: usize,
    sink: &mut OutcomeSink<'_>,
) -> Result<usize, PipelineError> {
    let mut pending: BTreeMap<usize, SegmentOutcome> = BTreeMap::new();
    let mut next = 0;

    for outcome in done_rx {
        pending.insert(outcome.segment.index, outcome);
        while let Some(ready) = pending.remove(&next) {
            sink(ready)?;
            next += 1;
        }
        if next == total {
            break;
        }
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::segment_executor::SegmentContent;
    use std::sync::Mutex;
    use std::time::Duration;

    fn segments(n: usize) -> Vec<Segment> {
        (0..n)
            .map(|k| Segment::new(k, k as u64 * 1_000, (k as u64 + 1) * 1_000))
            .collect()
    }

    /// Earlier segments sleep longer, so they finish last.
    fn reversed_latency_task(total: usize) -> SegmentTask {
        Arc::new(move |segment: Segment| {
            std::thread::sleep(Duration::from_millis(((total - segment.index) * 15) as u64));
            SegmentOutcome {
                segment,
                result: Ok(SegmentContent::Text(format!("seg{}", segment.index))),
                elapsed: Duration::ZERO,
            }
        })
    }

    #[test]
    fn test_delivers_in_segment_order_despite_completion_order() {
        let mut delivered = Vec::new();
        ThreadedSegmentExecutor::new(4)
            .execute(&segments(6), reversed_latency_task(6), &mut |o: SegmentOutcome| {
                delivered.push(o.segment.index);
                Ok(())
            })
            .unwrap();
        assert_eq!(delivered, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_every_segment_runs_exactly_once() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let task: SegmentTask = Arc::new(move |segment: Segment| {
            recorder.lock().unwrap().push(segment.index);
            SegmentOutcome {
                segment,
                result: Ok(SegmentContent::Text(String::new())),
                elapsed: Duration::ZERO,
            }
        });
        ThreadedSegmentExecutor::new(3)
            .execute(&segments(10), task, &mut |_: SegmentOutcome| Ok(()))
            .unwrap();
        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_sink_error_is_returned() {
        let result = ThreadedSegmentExecutor::new(2).execute(
            &segments(5),
            reversed_latency_task(5),
            &mut |o: SegmentOutcome| {
                if o.segment.index == 2 {
                    Err(PipelineError::Config("disk full".to_string()))
                } else {
                    Ok(())
                }
            },
        );
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_empty_plan_is_noop() {
        let mut calls = 0;
        ThreadedSegmentExecutor::new(2)
            .execute(&[], reversed_latency_task(0), &mut |_: SegmentOutcome| {
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_zero_workers_clamped() {
        assert_eq!(ThreadedSegmentExecutor::new(0).workers(), 1);
    }
}
