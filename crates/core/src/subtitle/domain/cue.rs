/// One timed subtitle entry. Times are milliseconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cue {
    pub index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

impl Cue {
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Self {
            index,
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Cues for one segment, timed against that segment's own clock
/// (starting at 0).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubtitleFragment {
    cues: Vec<Cue>,
}

impl SubtitleFragment {
    pub fn new(cues: Vec<Cue>) -> Self {
        Self { cues }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn into_cues(self) -> Vec<Cue> {
        self.cues
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }
}

/// Cues moved onto the source media's global clock.
///
/// Only the timestamp shifter builds these, so a fragment can't be
/// appended to the output track without having been offset first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShiftedFragment {
    cues: Vec<Cue>,
}

impl ShiftedFragment {
    pub(crate) fn from_shifted(cues: Vec<Cue>) -> Self {
        Self { cues }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn into_cues(self) -> Vec<Cue> {
        self.cues
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }
}
