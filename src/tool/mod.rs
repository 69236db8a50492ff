//! The external Audio Tool boundary.
//!
//! Everything that touches samples (trimming, measuring, cross-fading,
//! encoding) happens in an external program behind [`AudioTool`]. The
//! pipeline only decides *what* to ask for.

pub mod sox;

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::types::{OutputOptions, SpliceParams};

pub use sox::SoxTool;

/// Failure of a single Audio Tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("`{program}` was not found on PATH")]
    NotFound { program: String },

    #[error("failed to launch `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("`{program}` reported an unreadable duration '{output}'")]
    InvalidDuration { program: String, output: String },
}

/// The four capabilities the pipeline needs from an audio processor.
///
/// Every call blocks until the work is finished and the result is on disk.
pub trait AudioTool {
    /// Cut `duration` of audio starting at `start` from `source` into `dest`.
    fn trim(
        &mut self,
        source: &Path,
        dest: &Path,
        start: Duration,
        duration: Duration,
    ) -> Result<(), ToolError>;

    /// Exact playable duration of `file`.
    fn measure_duration(&mut self, file: &Path) -> Result<Duration, ToolError>;

    /// Join `first` and `second` into `dest` with a cross-fade around
    /// `params.position` in `first`.
    fn splice(
        &mut self,
        first: &Path,
        second: &Path,
        dest: &Path,
        params: SpliceParams,
    ) -> Result<(), ToolError>;

    /// Re-encode `input` into `output` using the caller's options.
    fn transcode(
        &mut self,
        input: &Path,
        output: &Path,
        options: &OutputOptions,
    ) -> Result<(), ToolError>;
}

/// Render seconds the way SoX expects them on the command line.
pub fn seconds_arg(duration: Duration) -> String {
    format!("{:.6}", duration.as_secs_f64())
}
