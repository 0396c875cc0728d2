/// A contiguous `[start_ms, end_ms)` slice of the source timeline.
///
/// `index` is zero-based position in the run's segment plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    pub index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Segment {
    pub fn new(index: usize, start_ms: u64, end_ms: u64) -> Self {
        Self {
            index,
            start_ms,
            end_ms,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "segment {} [{}ms, {}ms)",
            self.index + 1,
            self.start_ms,
            self.end_ms
        )
    }
}
