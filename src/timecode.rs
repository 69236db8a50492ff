//! Parsing and rendering of `[[HH:]MM:]SS[.mmm]` timecodes.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;

/// A malformed timecode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timecode '{input}': {kind}")]
pub struct TimecodeError {
    pub input: String,
    pub kind: TimecodeErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimecodeErrorKind {
    #[error("expected [[HH:]MM:]SS[.mmm], got {0} colon-separated parts")]
    PartCount(usize),
    #[error("{0} must be a non-negative integer")]
    NotAnInteger(Unit),
    #[error("{0} must be below 60")]
    OutOfRange(Unit),
    #[error("fractional seconds must be one or more digits")]
    BadFraction,
    #[error("value is too large")]
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Hours,
    Minutes,
    Seconds,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Unit::Hours => "hours",
            Unit::Minutes => "minutes",
            Unit::Seconds => "seconds",
        })
    }
}

/// Parse `SS`, `MM:SS` or `HH:MM:SS`, each optionally followed by `.mmm`.
///
/// The leading component is unbounded (`90` is ninety seconds, `75:00` is
/// seventy-five minutes); components after it must be below 60. Fraction
/// digits past the third are truncated and shorter fractions are padded, so
/// `.5` means 500 ms.
pub fn parse(text: &str) -> Result<Duration, TimecodeError> {
    let input = text.trim();
    let fail = |kind| TimecodeError {
        input: text.to_string(),
        kind,
    };

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (input, None),
    };

    let parts: Vec<&str> = whole.split(':').collect();
    if !(1..=3).contains(&parts.len()) {
        return Err(fail(TimecodeErrorKind::PartCount(parts.len())));
    }

    let units: &[Unit] = match parts.len() {
        1 => &[Unit::Seconds],
        2 => &[Unit::Minutes, Unit::Seconds],
        _ => &[Unit::Hours, Unit::Minutes, Unit::Seconds],
    };

    let mut total_seconds: u64 = 0;
    for (position, (raw, unit)) in parts.iter().zip(units).enumerate() {
        let value = parse_component(raw)
            .ok_or_else(|| fail(TimecodeErrorKind::NotAnInteger(*unit)))?;
        if position > 0 && value >= SECONDS_PER_MINUTE {
            return Err(fail(TimecodeErrorKind::OutOfRange(*unit)));
        }
        let scale = match unit {
            Unit::Hours => SECONDS_PER_HOUR,
            Unit::Minutes => SECONDS_PER_MINUTE,
            Unit::Seconds => 1,
        };
        total_seconds = value
            .checked_mul(scale)
            .and_then(|seconds| total_seconds.checked_add(seconds))
            .ok_or_else(|| fail(TimecodeErrorKind::Overflow))?;
    }

    let millis = match fraction {
        Some(digits) => {
            parse_fraction(digits).ok_or_else(|| fail(TimecodeErrorKind::BadFraction))?
        }
        None => 0,
    };

    Ok(Duration::from_secs(total_seconds) + Duration::from_millis(millis))
}

fn parse_component(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn parse_fraction(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let millis = digits
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(3)
        .fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'));
    Some(millis)
}

/// Render a duration as `HH:MM:SS.mmm`, truncating below the millisecond.
pub fn format(duration: Duration) -> String {
    Timecode(duration).to_string()
}

/// Display adapter rendering a [`Duration`] as `HH:MM:SS.mmm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timecode(pub Duration);

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.as_secs();
        let millis = u64::from(self.0.subsec_millis());
        let hours = total / SECONDS_PER_HOUR;
        let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
        let seconds = total % SECONDS_PER_MINUTE;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
    }
}

impl From<Duration> for Timecode {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(input: &str) -> TimecodeErrorKind {
        parse(input).unwrap_err().kind
    }

    #[test]
    fn parses_all_component_counts() {
        assert_eq!(parse("5").unwrap(), Duration::from_secs(5));
        assert_eq!(parse("01:10").unwrap(), Duration::from_secs(70));
        assert_eq!(parse("00:01:10.5").unwrap(), Duration::from_millis(70_500));
        assert_eq!(
            parse("1:02:03.007").unwrap(),
            Duration::from_secs(3_723) + Duration::from_millis(7)
        );
    }

    #[test]
    fn fraction_is_padded_and_truncated() {
        assert_eq!(parse("1.5").unwrap(), Duration::from_millis(1_500));
        assert_eq!(parse("1.05").unwrap(), Duration::from_millis(1_050));
        assert_eq!(parse("1.0009").unwrap(), Duration::from_secs(1));
        assert_eq!(parse("0.123999").unwrap(), Duration::from_millis(123));
    }

    #[test]
    fn leading_component_is_unbounded() {
        assert_eq!(parse("90").unwrap(), Duration::from_secs(90));
        assert_eq!(parse("75:00").unwrap(), Duration::from_secs(4_500));
        assert_eq!(parse("100:00:00").unwrap(), Duration::from_secs(360_000));
    }

    #[test]
    fn rejects_bad_part_counts() {
        assert_eq!(kind("1:2:3:4"), TimecodeErrorKind::PartCount(4));
    }

    #[test]
    fn rejects_non_integer_components() {
        assert_eq!(kind("ab:cd"), TimecodeErrorKind::NotAnInteger(Unit::Minutes));
        assert_eq!(kind(""), TimecodeErrorKind::NotAnInteger(Unit::Seconds));
        assert_eq!(kind(":30"), TimecodeErrorKind::NotAnInteger(Unit::Minutes));
        assert_eq!(kind("-5"), TimecodeErrorKind::NotAnInteger(Unit::Seconds));
        assert_eq!(kind("+5"), TimecodeErrorKind::NotAnInteger(Unit::Seconds));
    }

    #[test]
    fn rejects_bad_fractions() {
        assert_eq!(kind("5.x"), TimecodeErrorKind::BadFraction);
        assert_eq!(kind("5."), TimecodeErrorKind::BadFraction);
        assert_eq!(kind("5.1.2"), TimecodeErrorKind::BadFraction);
    }

    #[test]
    fn rejects_trailing_components_past_sixty() {
        assert_eq!(kind("1:60"), TimecodeErrorKind::OutOfRange(Unit::Seconds));
        assert_eq!(kind("1:60:00"), TimecodeErrorKind::OutOfRange(Unit::Minutes));
    }

    #[test]
    fn error_message_names_the_input() {
        let err = parse("ab:cd").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid timecode 'ab:cd': minutes must be a non-negative integer"
        );
    }

    #[test]
    fn renders_and_round_trips() {
        for text in ["00:00:00.000", "00:01:10.500", "01:02:03.007", "123:59:59.999"] {
            assert_eq!(format(parse(text).unwrap()), text);
        }
        assert_eq!(format(Duration::from_micros(1_999)), "00:00:00.001");
    }
}
