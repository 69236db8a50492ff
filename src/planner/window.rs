use std::time::Duration;

use tracing::warn;

use crate::error::{Result, SoxcutError};
use crate::timecode::{self, Timecode};
use crate::types::{SegmentPosition, SpliceSettings, Timing, TrimWindow};

/// Compute the range to cut for the timing at `index` out of `count`.
///
/// Clips joined to a neighbour carry extra material on that side: `excess` of
/// real overlap for the cross-fade plus `leeway` for the splice effect to
/// search in. Interior clips pay on both sides, boundary clips on one.
///
/// | position | start          | duration                |
/// |----------|----------------|-------------------------|
/// | only     | start          | D                       |
/// | first    | start          | D + excess              |
/// | last     | start − lead   | D + excess + leeway     |
/// | middle   | start − lead   | D + 2·excess + leeway   |
///
/// where `lead = excess + leeway`. A window that would start before zero is
/// clamped and shortened by the same amount.
pub fn trim_window(
    index: usize,
    count: usize,
    timing: &Timing,
    settings: &SpliceSettings,
) -> Result<TrimWindow> {
    let ideal = timing
        .ideal_duration()
        .ok_or(SoxcutError::InvalidRange {
            index,
            start: Timecode(timing.start),
            end: Timecode(timing.end),
        })?;

    let position = SegmentPosition::classify(index, count);
    let SpliceSettings { excess, leeway, .. } = *settings;
    let lead = settings.lead_in();

    let (lead_in, padding) = match position {
        SegmentPosition::Only => (Duration::ZERO, Some(Duration::ZERO)),
        SegmentPosition::First => (Duration::ZERO, Some(excess)),
        SegmentPosition::Last => (lead, Some(lead)),
        SegmentPosition::Middle => (
            lead,
            excess.checked_mul(2).and_then(|d| d.checked_add(leeway)),
        ),
    };
    let duration = padding
        .and_then(|padding| ideal.checked_add(padding))
        .ok_or(SoxcutError::WindowOverflow { index })?;

    let Some(deficit) = lead_in.checked_sub(timing.start).filter(|d| !d.is_zero()) else {
        return Ok(TrimWindow {
            position,
            start: timing.start - lead_in,
            duration,
            clamped: Duration::ZERO,
        });
    };

    if settings.strict_margins {
        return Err(SoxcutError::MarginClamped {
            index,
            lost: deficit,
        });
    }
    let duration = duration
        .checked_sub(deficit)
        .filter(|d| !d.is_zero())
        .ok_or(SoxcutError::WindowCollapsed { index })?;

    warn!(
        segment = index + 1,
        start = %timecode::format(timing.start),
        lost_ms = deficit.as_millis() as u64,
        "segment starts too early for full leeway; trimming from 0"
    );
    Ok(TrimWindow {
        position,
        start: Duration::ZERO,
        duration,
        clamped: deficit,
    })
}

/// Windows for every timing, in order, without touching the Audio Tool.
pub fn plan(timings: &[Timing], settings: &SpliceSettings) -> Result<Vec<TrimWindow>> {
    timings
        .iter()
        .enumerate()
        .map(|(index, timing)| trim_window(index, timings.len(), timing, settings))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn timing(start: u64, end: u64) -> Timing {
        Timing::new(ms(start), ms(end))
    }

    #[test]
    fn only_segment_has_no_padding() {
        let settings = SpliceSettings::default();
        let window = trim_window(0, 1, &timing(10_000, 15_000), &settings).unwrap();
        assert_eq!(window.position, SegmentPosition::Only);
        assert_eq!(window.start, ms(10_000));
        assert_eq!(window.duration, ms(5_000));
        assert_eq!(window.clamped, Duration::ZERO);
    }

    #[test]
    fn three_segments_get_position_specific_padding() {
        let timings = [
            timing(10_000, 15_000),
            timing(20_000, 26_000),
            timing(30_000, 37_000),
        ];
        let windows = plan(&timings, &SpliceSettings::default()).unwrap();

        assert_eq!(windows[0].position, SegmentPosition::First);
        assert_eq!((windows[0].start, windows[0].duration), (ms(10_000), ms(5_500)));

        assert_eq!(windows[1].position, SegmentPosition::Middle);
        assert_eq!((windows[1].start, windows[1].duration), (ms(19_300), ms(7_200)));

        assert_eq!(windows[2].position, SegmentPosition::Last);
        assert_eq!((windows[2].start, windows[2].duration), (ms(29_300), ms(7_700)));
    }

    #[test]
    fn first_segment_is_never_clamped() {
        let timings = [timing(100, 1_000), timing(5_000, 6_000)];
        let windows = plan(&timings, &SpliceSettings::default()).unwrap();
        assert_eq!(windows[0].start, ms(100));
        assert_eq!(windows[0].duration, ms(1_400));
        assert_eq!(windows[0].clamped, Duration::ZERO);
    }

    #[test]
    fn early_middle_and_last_segments_are_clamped_at_zero() {
        let timings = [timing(0, 100), timing(300, 1_300), timing(500, 2_500)];
        let windows = plan(&timings, &SpliceSettings::default()).unwrap();

        // middle: 300 - 700 would be -400
        assert_eq!(windows[1].start, Duration::ZERO);
        assert_eq!(windows[1].clamped, ms(400));
        assert_eq!(windows[1].duration, ms(1_000 + 1_200 - 400));

        // last: 500 - 700 would be -200
        assert_eq!(windows[2].start, Duration::ZERO);
        assert_eq!(windows[2].clamped, ms(200));
        assert_eq!(windows[2].duration, ms(2_000 + 700 - 200));
    }

    #[test]
    fn window_touching_zero_is_not_clamped() {
        let timings = [timing(0, 100), timing(700, 1_700)];
        let windows = plan(&timings, &SpliceSettings::default()).unwrap();
        assert_eq!(windows[1].start, Duration::ZERO);
        assert_eq!(windows[1].clamped, Duration::ZERO);
        assert_eq!(windows[1].duration, ms(1_700));
    }

    #[test]
    fn strict_margins_turn_clamping_into_an_error() {
        let settings = SpliceSettings::default().with_strict_margins(true);
        let timings = [timing(0, 100), timing(300, 1_300)];
        let err = plan(&timings, &settings).unwrap_err();
        assert!(matches!(
            err,
            SoxcutError::MarginClamped { index: 1, lost } if lost == ms(400)
        ));
    }

    #[test]
    fn rejects_empty_and_reversed_ranges() {
        let settings = SpliceSettings::default();
        let timings = [timing(1_000, 2_000), timing(5_000, 5_000), timing(9_000, 8_000)];
        assert!(matches!(
            plan(&timings, &settings),
            Err(SoxcutError::InvalidRange { index: 1, .. })
        ));
        assert!(matches!(
            trim_window(2, 3, &timings[2], &settings),
            Err(SoxcutError::InvalidRange { index: 2, .. })
        ));
    }

    #[test]
    fn padding_past_the_largest_duration_is_an_error() {
        let settings = SpliceSettings::default();
        let huge = Timing::new(Duration::ZERO, Duration::from_secs(u64::MAX));
        assert!(matches!(
            trim_window(1, 3, &huge, &settings),
            Err(SoxcutError::WindowOverflow { index: 1 })
        ));
        assert!(matches!(
            trim_window(2, 3, &huge, &settings),
            Err(SoxcutError::WindowOverflow { index: 2 })
        ));
        let only = trim_window(0, 1, &huge, &settings).unwrap();
        assert_eq!(only.duration, Duration::from_secs(u64::MAX));
    }

    #[test]
    fn custom_margins_are_applied() {
        let settings = SpliceSettings::from_millis(100, 50);
        let timings = [timing(0, 1_000), timing(2_000, 3_000), timing(4_000, 5_000)];
        let windows = plan(&timings, &settings).unwrap();
        assert_eq!(windows[0].duration, ms(1_100));
        assert_eq!((windows[1].start, windows[1].duration), (ms(1_850), ms(1_250)));
        assert_eq!((windows[2].start, windows[2].duration), (ms(3_850), ms(1_150)));
    }
}
