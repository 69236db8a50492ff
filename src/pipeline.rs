//! End-to-end runs: load segments, cut clips into a scratch directory,
//! splice, encode. The scratch directory is removed on every exit path.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::config::{ExtractJob, SpliceJob};
use crate::error::{Result, SoxcutError, ToolStage};
use crate::planner;
use crate::segments;
use crate::splice;
use crate::timecode;
use crate::tool::AudioTool;
use crate::types::{SegmentPosition, SpliceSettings, Timing};

/// Cut, splice and encode every segment of `job` into `job.output`.
pub fn splice_segments<T: AudioTool + ?Sized>(tool: &mut T, job: &SpliceJob) -> Result<PathBuf> {
    let timings = load_timings(&job.segments)?;
    let scratch = scratch_dir()?;
    info!(
        input = %job.input.display(),
        segments = timings.len(),
        excess_ms = job.settings.excess.as_millis() as u64,
        leeway_ms = job.settings.leeway.as_millis() as u64,
        "starting splice"
    );

    let clips = planner::prepare_clips(tool, &job.input, &timings, &job.settings, scratch.path())?;
    let combined = splice::combine(tool, &clips, &job.settings, scratch.path())?;

    info!(output = %job.output.display(), "encoding final output");
    tool.transcode(&combined, &job.output, &job.options)
        .map_err(|err| SoxcutError::tool(ToolStage::Transcode, err))?;

    Ok(job.output.clone())
}

/// Cut every segment into its own file under `job.dir`, exactly as
/// requested and without cross-fade padding.
///
/// Files are named `<stem>_<NN>.<ext>` after the input, with the index
/// zero-padded to at least two digits.
pub fn extract_segments<T: AudioTool + ?Sized>(
    tool: &mut T,
    job: &ExtractJob,
) -> Result<Vec<PathBuf>> {
    let timings = load_timings(&job.segments)?;
    let width = digits(timings.len()).max(2);
    let stem = job
        .input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "segment".to_string());
    let ext = job
        .input
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wav".to_string());

    let mut written = Vec::with_capacity(timings.len());
    for (index, timing) in timings.iter().enumerate() {
        let duration = timing
            .ideal_duration()
            .ok_or_else(|| invalid_range(index, timing))?;
        let dest = job
            .dir
            .join(format!("{stem}_{:0width$}.{ext}", index + 1));
        info!(
            segment = index + 1,
            from = %timecode::format(timing.start),
            to = %timecode::format(timing.end),
            dest = %dest.display(),
            "extracting segment"
        );
        tool.trim(&job.input, &dest, timing.start, duration)
            .map_err(|err| SoxcutError::tool(ToolStage::Trim { index }, err))?;
        written.push(dest);
    }
    Ok(written)
}

/// One row of a dry-run plan. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedSegment {
    /// 1-based segment number
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub position: SegmentPosition,
    pub start: f64,
    pub end: f64,
    pub trim_start: f64,
    pub trim_duration: f64,
    pub clamped: f64,
}

/// Compute the trim windows a splice run would use without calling the
/// Audio Tool.
pub fn plan_segments(segments: &Path, settings: &SpliceSettings) -> Result<Vec<PlannedSegment>> {
    let timings = load_timings(segments)?;
    let windows = planner::plan(&timings, settings)?;
    Ok(timings
        .iter()
        .zip(windows)
        .enumerate()
        .map(|(index, (timing, window))| PlannedSegment {
            index: index + 1,
            line: timing.line,
            position: window.position,
            start: timing.start.as_secs_f64(),
            end: timing.end.as_secs_f64(),
            trim_start: window.start.as_secs_f64(),
            trim_duration: window.duration.as_secs_f64(),
            clamped: window.clamped.as_secs_f64(),
        })
        .collect())
}

fn load_timings(path: &Path) -> Result<Vec<Timing>> {
    let timings = segments::load(path)?;
    if timings.is_empty() {
        return Err(SoxcutError::EmptySegments(path.to_path_buf()));
    }
    Ok(timings)
}

fn scratch_dir() -> Result<TempDir> {
    let dir = tempfile::Builder::new()
        .prefix("soxcut-")
        .tempdir()
        .map_err(|err| SoxcutError::io("failed to create scratch directory", err))?;
    debug!(path = %dir.path().display(), "scratch directory created");
    Ok(dir)
}

fn invalid_range(index: usize, timing: &Timing) -> SoxcutError {
    SoxcutError::InvalidRange {
        index,
        start: timing.start.into(),
        end: timing.end.into(),
    }
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
