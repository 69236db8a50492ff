//! Core types for the soxcut splice pipeline

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// Default length of the cross-fade overlap.
pub const DEFAULT_EXCESS_MS: u64 = 500;
/// Default search window for the best splice point.
pub const DEFAULT_LEEWAY_MS: u64 = 200;

/// One requested segment in source-file time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub start: Duration,
    pub end: Duration,
    /// 1-based line of the segment file this timing was read from
    pub line: Option<usize>,
}

impl Timing {
    pub fn new(start: Duration, end: Duration) -> Self {
        Self {
            start,
            end,
            line: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Length of the requested segment, `None` when `end` does not follow `start`.
    pub fn ideal_duration(&self) -> Option<Duration> {
        self.end.checked_sub(self.start).filter(|d| !d.is_zero())
    }
}

/// Role of a timing within the sequence; selects the trim-window formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentPosition {
    Only,
    First,
    Middle,
    Last,
}

impl SegmentPosition {
    /// Classify the timing at `index` out of `count`.
    pub fn classify(index: usize, count: usize) -> Self {
        match (index == 0, index + 1 == count) {
            (true, true) => SegmentPosition::Only,
            (true, false) => SegmentPosition::First,
            (false, true) => SegmentPosition::Last,
            (false, false) => SegmentPosition::Middle,
        }
    }
}

impl fmt::Display for SegmentPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SegmentPosition::Only => "only",
            SegmentPosition::First => "first",
            SegmentPosition::Middle => "middle",
            SegmentPosition::Last => "last",
        })
    }
}

/// The range actually cut from the source, cross-fade padding included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimWindow {
    pub position: SegmentPosition,
    pub start: Duration,
    pub duration: Duration,
    /// Lead-in margin lost because the window would have started before zero
    pub clamped: Duration,
}

/// Cross-fade margins for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpliceSettings {
    /// Length of the literal overlap used for the cross-fade
    pub excess: Duration,
    /// Room given to the splice effect to search for the best join point
    pub leeway: Duration,
    /// Fail instead of warning when a window has to be clamped at zero
    pub strict_margins: bool,
}

impl SpliceSettings {
    pub fn new(excess: Duration, leeway: Duration) -> Self {
        Self {
            excess,
            leeway,
            strict_margins: false,
        }
    }

    pub fn from_millis(excess_ms: u64, leeway_ms: u64) -> Self {
        Self::new(
            Duration::from_millis(excess_ms),
            Duration::from_millis(leeway_ms),
        )
    }

    pub fn with_strict_margins(mut self, strict: bool) -> Self {
        self.strict_margins = strict;
        self
    }

    /// Material needed ahead of a clip that is joined to a predecessor.
    pub fn lead_in(&self) -> Duration {
        self.excess + self.leeway
    }

    pub fn splice_params(&self, position: Duration) -> SpliceParams {
        SpliceParams {
            position,
            excess: self.excess,
            leeway: self.leeway,
        }
    }
}

impl Default for SpliceSettings {
    fn default() -> Self {
        Self::from_millis(DEFAULT_EXCESS_MS, DEFAULT_LEEWAY_MS)
    }
}

/// Arguments of a single splice: where the join sits in the first input and
/// how much overlap and search room surround it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpliceParams {
    pub position: Duration,
    pub excess: Duration,
    pub leeway: Duration,
}

/// User-supplied options for the final encode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Output format options, e.g. `-C 128`
    pub format_options: Vec<String>,
    /// Effects applied while encoding, e.g. `gain -n`
    pub effects: Vec<String>,
}

impl OutputOptions {
    /// Split a whitespace-separated format option string.
    pub fn new(format_options: Option<&str>, effects: Vec<String>) -> Self {
        Self {
            format_options: format_options
                .map(|raw| raw.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            effects,
        }
    }
}

/// A trimmed intermediate clip in the scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedClip {
    pub index: usize,
    pub path: PathBuf,
    pub window: TrimWindow,
    pub ideal_duration: Duration,
}
