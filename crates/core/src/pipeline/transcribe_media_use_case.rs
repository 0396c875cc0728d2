use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::media::domain::media_normalizer::MediaNormalizer;
use crate::media::domain::media_stream::MediaStream;
use crate::media::domain::segment::Segment;
use crate::media::domain::segmenter::Segmenter;
use crate::pipeline::output_target::OutputTarget;
use crate::pipeline::output_track::OutputTrack;
use crate::pipeline::pipeline_error::PipelineError;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::retry_policy::RetryPolicy;
use crate::pipeline::run_report::{RunReport, RunState, SegmentFailure};
use crate::pipeline::segment_executor::{
    SegmentContent, SegmentExecutor, SegmentOutcome, SegmentTask,
};
use crate::pipeline::transcription_config::TranscriptionConfig;
use crate::subtitle::domain::cue::{Cue, SubtitleFragment};
use crate::subtitle::domain::timestamp_shifter::shift;
use crate::subtitle::infrastructure::srt_codec;
use crate::transcription::domain::response_kind::ResponseKind;
use crate::transcription::domain::transcriber::{Transcriber, Transcription};
use crate::transcription::domain::transcription_error::TranscriptionError;

/// Normalize → segment → transcribe each segment (with retry) → shift →
/// append in order → renumber once.
///
/// A segment that keeps failing is skipped and recorded; it never fails
/// the run. Only normalization and output I/O errors do.
pub struct TranscribeMediaUseCase {
    normalizer: Box<dyn MediaNormalizer>,
    transcriber: Arc<dyn Transcriber>,
    executor: Box<dyn SegmentExecutor>,
    logger: Box<dyn PipelineLogger>,
    config: TranscriptionConfig,
    state: RunState,
}

/// A parsed backend response, still on the clip's clock.
enum ClipResponse {
    Fragment(SubtitleFragment),
    Text(String),
}

impl TranscribeMediaUseCase {
    pub fn new(
        normalizer: Box<dyn MediaNormalizer>,
        transcriber: Arc<dyn Transcriber>,
        executor: Box<dyn SegmentExecutor>,
        logger: Box<dyn PipelineLogger>,
        config: TranscriptionConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            normalizer,
            transcriber,
            executor,
            logger,
            config,
            state: RunState::Pending,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn execute(
        &mut self,
        input: &Path,
        target: &mut dyn OutputTarget,
    ) -> Result<RunReport, PipelineError> {
        self.state = RunState::Pending;

        if target.is_complete() {
            self.logger
                .info(&format!("{} already exists, skipping", target.describe()));
            self.state = RunState::AlreadyDone;
            let report = RunReport::already_done();
            self.logger.summary(&report);
            return Ok(report);
        }

        let started = Instant::now();
        let stream = self.normalizer.normalize(input)?;
        self.logger.timing("normalize", as_ms(started.elapsed()));

        let segmenter = Segmenter::new(self.config.segment_duration_ms)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        let segments = segmenter.plan(stream.duration_ms());
        let total = segments.len();
        self.logger.info(&format!(
            "Transcribing {} ({:.1}s) in {total} segments",
            input.display(),
            stream.duration_ms() as f64 / 1000.0
        ));

        target.begin()?;
        self.state = RunState::Running;

        let task = self.segment_task(Arc::new(stream), total);
        let mut track = OutputTrack::new(self.config.response_kind);
        let mut failed: Vec<SegmentFailure> = Vec::new();
        let logger = &mut self.logger;

        self.executor
            .execute(&segments, task, &mut |outcome: SegmentOutcome| {
                logger.timing("transcribe", as_ms(outcome.elapsed));
                logger.progress(outcome.segment.index + 1, total);
                match outcome.result {
                    Ok(content) => {
                        let chunk = track.append(content);
                        if !chunk.is_empty() {
                            target.append(&chunk)?;
                        }
                    }
                    Err(failure) => {
                        log::warn!(
                            "Skipping {} after {} attempts: {}",
                            failure.segment,
                            failure.attempts,
                            failure.cause
                        );
                        failed.push(failure);
                    }
                }
                Ok(())
            })?;

        let status = RunState::finished(failed.len());
        // Exactly one renumbering pass, after the last append.
        target.commit(&track.finish(), status == RunState::Completed)?;

        self.state = status;
        let report = RunReport {
            status,
            segments_total: total,
            failed,
            cue_count: track.cue_count(),
            elapsed: started.elapsed(),
        };
        self.logger.summary(&report);
        Ok(report)
    }

    fn segment_task(&self, stream: Arc<MediaStream>, total: usize) -> SegmentTask {
        let transcriber = Arc::clone(&self.transcriber);
        let retry = self.config.retry.clone();
        let kind = self.config.response_kind;
        Arc::new(move |segment: Segment| {
            transcribe_segment(&stream, transcriber.as_ref(), &retry, kind, segment, total)
        })
    }
}

fn transcribe_segment(
    stream: &MediaStream,
    transcriber: &dyn Transcriber,
    retry: &RetryPolicy,
    kind: ResponseKind,
    segment: Segment,
    total: usize,
) -> SegmentOutcome {
    log::info!("Processing segment {}/{}", segment.index + 1, total);
    let started = Instant::now();

    // The clip lives only for this segment's attempts.
    let clip = stream.clip(&segment);
    let result = retry
        .run(&segment.to_string(), |_| attempt(transcriber, &clip, kind))
        .map(|response| match response {
            ClipResponse::Fragment(fragment) => SegmentContent::Cues(shift(
                clamp_to_clip(fragment, segment.duration_ms()),
                segment.start_ms,
            )),
            ClipResponse::Text(text) => SegmentContent::Text(text),
        })
        .map_err(|exhausted| SegmentFailure {
            segment,
            attempts: exhausted.attempts,
            cause: exhausted.last_error.to_string(),
        });

    SegmentOutcome {
        segment,
        result,
        elapsed: started.elapsed(),
    }
}

/// One backend call plus parsing. Malformed subtitle text fails the
/// attempt just like a transport error.
fn attempt(
    transcriber: &dyn Transcriber,
    clip: &MediaStream,
    kind: ResponseKind,
) -> Result<ClipResponse, TranscriptionError> {
    Ok(match transcriber.transcribe(clip, kind)? {
        Transcription::Subtitle(srt) => {
            ClipResponse::Fragment(SubtitleFragment::new(srt_codec::parse(&srt)?))
        }
        Transcription::PlainText(text) => ClipResponse::Text(text),
    })
}

/// Keep cue times inside the clip so a backend overshoot can't leak past
/// the next segment's start.
fn clamp_to_clip(fragment: SubtitleFragment, duration_ms: u64) -> SubtitleFragment {
    SubtitleFragment::new(
        fragment
            .into_cues()
            .into_iter()
            .map(|cue| Cue {
                start_ms: cue.start_ms.min(duration_ms),
                end_ms: cue.end_ms.min(duration_ms),
                ..cue
            })
            .collect(),
    )
}

fn as_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
