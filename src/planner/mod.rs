//! Clip preparation: one padded trim per requested segment.

mod window;

use std::path::Path;

use tracing::info;

use crate::error::{Result, SoxcutError, ToolStage};
use crate::timecode;
use crate::tool::AudioTool;
use crate::types::{PreparedClip, SpliceSettings, Timing};

pub use window::{plan, trim_window};

/// Trim every timing out of `source` into `scratch`, strictly in order.
///
/// Each timing is validated right before its own trim, so a bad segment
/// aborts the run without touching the Audio Tool for it while the clips
/// already cut stay in `scratch` until the caller cleans it up.
pub fn prepare_clips<T: AudioTool + ?Sized>(
    tool: &mut T,
    source: &Path,
    timings: &[Timing],
    settings: &SpliceSettings,
    scratch: &Path,
) -> Result<Vec<PreparedClip>> {
    let mut clips = Vec::with_capacity(timings.len());

    for (index, timing) in timings.iter().enumerate() {
        let window = trim_window(index, timings.len(), timing, settings)?;
        let ideal_duration = timing.end - timing.start;
        let path = scratch.join(format!("clip_{:03}.wav", index + 1));

        info!(
            segment = index + 1,
            position = %window.position,
            from = %timecode::format(window.start),
            ideal_s = ideal_duration.as_secs_f64(),
            trim_s = window.duration.as_secs_f64(),
            "preparing clip"
        );
        tool.trim(source, &path, window.start, window.duration)
            .map_err(|err| SoxcutError::tool(ToolStage::Trim { index }, err))?;

        clips.push(PreparedClip {
            index,
            path,
            window,
            ideal_duration,
        });
    }

    Ok(clips)
}
