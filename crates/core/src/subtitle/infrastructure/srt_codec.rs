use crate::subtitle::domain::codec_error::CodecError;
use crate::subtitle::domain::cue::Cue;

/// Parse SubRip text into cues.
///
/// Accepts a leading BOM, CRLF line endings, runs of blank lines between
/// blocks, `.` as the millisecond separator, and blocks without an index
/// line. Empty input is zero cues, not an error.
pub fn parse(input: &str) -> Result<Vec<Cue>, CodecError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut cues = Vec::new();
    let mut block: Vec<(usize, &str)> = Vec::new();

    for (i, raw) in input.lines().enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() {
            if !block.is_empty() {
                cues.push(parse_block(&block, cues.len() + 1)?);
                block.clear();
            }
        } else {
            block.push((i + 1, line));
        }
    }
    if !block.is_empty() {
        cues.push(parse_block(&block, cues.len() + 1)?);
    }

    Ok(cues)
}

fn parse_block(block: &[(usize, &str)], fallback_index: usize) -> Result<Cue, CodecError> {
    let (first_no, first) = block[0];

    let (index, timing_at) = if first.contains("-->") {
        (fallback_index, 0)
    } else {
        let index = first
            .trim()
            .parse::<usize>()
            .map_err(|_| CodecError::at(first_no, format!("expected cue index, got '{first}'")))?;
        (index, 1)
    };

    let (timing_no, timing) = *block
        .get(timing_at)
        .ok_or_else(|| CodecError::at(first_no, "cue index without timing line"))?;
    let (start_ms, end_ms) = parse_timing(timing).map_err(|m| CodecError::at(timing_no, m))?;

    let text = block[timing_at + 1..]
        .iter()
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(Cue {
        index,
        start_ms,
        end_ms,
        text,
    })
}

fn parse_timing(line: &str) -> Result<(u64, u64), String> {
    let (left, right) = line
        .split_once("-->")
        .ok_or_else(|| format!("expected timing line, got '{line}'"))?;
    // Anything after the end timestamp (position hints) is ignored.
    let right = right.split_whitespace().next().unwrap_or("");
    Ok((parse_timestamp(left.trim())?, parse_timestamp(right)?))
}

/// `HH:MM:SS,mmm` (or `.mmm`) to milliseconds.
pub fn parse_timestamp(ts: &str) -> Result<u64, String> {
    let invalid = || format!("invalid timestamp '{ts}'");

    let (clock, millis) = ts.split_once([',', '.']).ok_or_else(invalid)?;
    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }
    let field = |s: &str| s.trim().parse::<u64>().map_err(|_| invalid());
    let hours = field(parts[0])?;
    let minutes = field(parts[1])?;
    let seconds = field(parts[2])?;
    if minutes > 59 || seconds > 59 {
        return Err(invalid());
    }

    if millis.is_empty() || millis.len() > 3 || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    // "5" is half a second, not 5 ms.
    let ms = field(millis)? * 10u64.pow(3 - millis.len() as u32);

    hours
        .checked_mul(3_600_000)
        .and_then(|total| total.checked_add(minutes * 60_000 + seconds * 1_000 + ms))
        .ok_or_else(invalid)
}

pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

/// Render cues as SubRip, one blank line after each block.
pub fn serialize(cues: &[Cue]) -> String {
    let mut out = String::new();
    for cue in cues {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            cue.index,
            format_timestamp(cue.start_ms),
            format_timestamp(cue.end_ms),
            cue.text
        ));
    }
    out
}
