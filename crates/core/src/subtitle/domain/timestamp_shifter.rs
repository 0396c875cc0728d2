use super::cue::{Cue, ShiftedFragment, SubtitleFragment};

/// Move a segment-local fragment onto the global clock by adding the
/// segment's start offset to every cue. Text, order and indices pass
/// through untouched.
pub fn shift(fragment: SubtitleFragment, offset_ms: u64) -> ShiftedFragment {
    let offset = i64::try_from(offset_ms).unwrap_or(i64::MAX);
    ShiftedFragment::from_shifted(shift_cues(fragment.cues(), offset))
}

/// Signed shift over raw cues. Times saturate at 0 rather than wrap, so
/// shifting by `o` then `-o` is lossless for any `o >= 0`.
pub fn shift_cues(cues: &[Cue], offset_ms: i64) -> Vec<Cue> {
    cues.iter()
        .map(|cue| Cue {
            index: cue.index,
            start_ms: cue.start_ms.saturating_add_signed(offset_ms),
            end_ms: cue.end_ms.saturating_add_signed(offset_ms),
            text: cue.text.clone(),
        })
        .collect()
}
