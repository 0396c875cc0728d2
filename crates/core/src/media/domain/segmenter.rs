use super::segment::Segment;
use crate::shared::constants::DEFAULT_SEGMENT_DURATION_MS;

/// Cuts a timeline into fixed-length, contiguous, non-overlapping segments.
///
/// The plan is pure arithmetic over the total duration; clips are only
/// materialized when a caller asks the stream for one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segmenter {
    segment_duration_ms: u64,
}

impl Segmenter {
    pub fn new(segment_duration_ms: u64) -> Result<Self, &'static str> {
        if segment_duration_ms == 0 {
            return Err("segment duration must be > 0");
        }
        Ok(Self {
            segment_duration_ms,
        })
    }

    pub fn segment_duration_ms(&self) -> u64 {
        self.segment_duration_ms
    }

    pub fn segment_count(&self, total_ms: u64) -> usize {
        total_ms.div_ceil(self.segment_duration_ms) as usize
    }

    /// Segment `k` covers `[k*D, min((k+1)*D, total))`. A zero-length
    /// timeline yields no segments.
    pub fn plan(&self, total_ms: u64) -> Vec<Segment> {
        let d = self.segment_duration_ms;
        (0..self.segment_count(total_ms))
            .map(|k| {
                let start = k as u64 * d;
                Segment::new(k, start, (start + d).min(total_ms))
            })
            .collect()
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            segment_duration_ms: DEFAULT_SEGMENT_DURATION_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_zero_duration_rejected() {
        assert!(Segmenter::new(0).is_err());
    }

    #[test]
    fn test_default_is_three_minutes() {
        assert_eq!(Segmenter::default().segment_duration_ms(), 180_000);
    }

    #[test]
    fn test_plan_650s_into_four_segments() {
        let plan = Segmenter::new(180_000).unwrap().plan(650_000);
        assert_eq!(
            plan,
            vec![
                Segment::new(0, 0, 180_000),
                Segment::new(1, 180_000, 360_000),
                Segment::new(2, 360_000, 540_000),
                Segment::new(3, 540_000, 650_000),
            ]
        );
    }

    #[test]
    fn test_empty_timeline_has_no_segments() {
        assert!(Segmenter::default().plan(0).is_empty());
    }

    #[rstest]
    #[case::shorter_than_one(1, 180_000)]
    #[case::exact_multiple(540_000, 180_000)]
    #[case::one_ms_over(540_001, 180_000)]
    #[case::tiny_segments(10_007, 3)]
    #[case::odd_total(999_999, 1_000)]
    fn test_plan_covers_timeline_exactly(#[case] total: u64, #[case] d: u64) {
        let segmenter = Segmenter::new(d).unwrap();
        let plan = segmenter.plan(total);

        assert_eq!(plan.len(), total.div_ceil(d) as usize);
        assert_eq!(plan.first().unwrap().start_ms, 0);
        assert_eq!(plan.last().unwrap().end_ms, total);
        for (k, seg) in plan.iter().enumerate() {
            assert_eq!(seg.index, k);
            assert!(seg.start_ms < seg.end_ms);
            assert!(seg.duration_ms() <= d);
        }
        for pair in plan.windows(2) {
            assert_eq!(pair[0].end_ms, pair[1].start_ms);
        }
    }

    #[test]
    fn test_only_final_segment_may_be_short() {
        let plan = Segmenter::new(1_000).unwrap().plan(3_500);
        let durations: Vec<u64> = plan.iter().map(Segment::duration_ms).collect();
        assert_eq!(durations, vec![1_000, 1_000, 1_000, 500]);
    }
}
