use super::cue::Cue;

/// Assign contiguous indices `1..=N` in track order.
///
/// Track order already equals start-time order because every fragment was
/// offset by its segment's start, so no sorting happens here.
pub fn renumber(cues: &mut [Cue]) {
    for (i, cue) in cues.iter_mut().enumerate() {
        cue.index = i + 1;
    }
}
