//! Reading segment-definition files.
//!
//! One segment per line, start and end timecodes separated by whitespace.
//! Lines starting with `#` and blank lines are ignored but still counted, so
//! reported line numbers match what an editor shows.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SoxcutError};
use crate::timecode;
use crate::types::Timing;

/// Load every timing from the segment file at `path`, in file order.
///
/// An empty result is not an error here; callers decide whether zero
/// segments is acceptable.
pub fn load(path: &Path) -> Result<Vec<Timing>> {
    let data = fs::read_to_string(path).map_err(|err| {
        SoxcutError::io(
            format!("failed to read segment file {}", path.display()),
            err,
        )
    })?;
    let timings = parse_segments(&data, path)?;
    debug!(path = %path.display(), count = timings.len(), "segment file loaded");
    Ok(timings)
}

/// Parse segment definitions from `text`; `path` is only used in errors.
pub fn parse_segments(text: &str, path: &Path) -> Result<Vec<Timing>> {
    let mut timings: Vec<Timing> = Vec::new();

    for (offset, raw) in text.lines().enumerate() {
        let line = offset + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let parse_error = |reason: String| SoxcutError::Parse {
            path: path.to_path_buf(),
            line,
            reason,
        };
        let &[start_raw, end_raw] = fields.as_slice() else {
            return Err(parse_error(format!(
                "expected 2 fields (start and end time), got {}",
                fields.len()
            )));
        };

        let start = timecode::parse(start_raw)
            .map_err(|err| parse_error(format!("invalid start time: {err}")))?;
        let end = timecode::parse(end_raw)
            .map_err(|err| parse_error(format!("invalid end time: {err}")))?;

        if let Some(previous) = timings.last() {
            if start < previous.end {
                debug!(line, "segment starts before the previous one ends");
            }
        }
        timings.push(Timing::new(start, end).at_line(line));
    }

    Ok(timings)
}
