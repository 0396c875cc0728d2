use crate::pipeline::segment_executor::SegmentContent;
use crate::subtitle::domain::cue::Cue;
use crate::subtitle::domain::renumber::renumber;
use crate::subtitle::infrastructure::srt_codec;
use crate::transcription::domain::response_kind::ResponseKind;

/// Append-only accumulation of per-segment results in segment order.
pub struct OutputTrack {
    kind: ResponseKind,
    cues: Vec<Cue>,
    text: String,
}

impl OutputTrack {
    pub fn new(kind: ResponseKind) -> Self {
        Self {
            kind,
            cues: Vec::new(),
            text: String::new(),
        }
    }

    /// Add one segment's content and return the text to append to the
    /// output target. Subtitle chunks still carry segment-local indices.
    pub fn append(&mut self, content: SegmentContent) -> String {
        match content {
            SegmentContent::Cues(fragment) => {
                let chunk = srt_codec::serialize(fragment.cues());
                self.cues.extend(fragment.into_cues());
                chunk
            }
            SegmentContent::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return String::new();
                }
                let chunk = format!("{trimmed}\n");
                self.text.push_str(&chunk);
                chunk
            }
        }
    }

    pub fn cue_count(&self) -> usize {
        self.cues.len()
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// The renumbering pass: contiguous indices, then the final rendering.
    pub fn finish(&mut self) -> String {
        match self.kind {
            ResponseKind::Subtitle => {
                renumber(&mut self.cues);
                srt_codec::serialize(&self.cues)
            }
            ResponseKind::PlainText => self.text.clone(),
        }
    }
}
