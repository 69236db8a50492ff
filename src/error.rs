//! Error types shared by the splice pipeline.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::timecode::{Timecode, TimecodeError};
use crate::tool::ToolError;

/// Convenient alias for results returned by the pipeline modules.
pub type Result<T> = std::result::Result<T, SoxcutError>;

/// Every failure the pipeline can report. All of them are fatal.
///
/// Segment indices and splice steps are stored zero-based and rendered
/// one-based in messages.
#[derive(Debug, Error)]
pub enum SoxcutError {
    #[error(transparent)]
    Timecode(#[from] TimecodeError),

    #[error("{}:{line}: {reason}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("no segments defined in {}", .0.display())]
    EmptySegments(PathBuf),

    #[error("segment #{}: start {start} is not before end {end}", .index + 1)]
    InvalidRange {
        index: usize,
        start: Timecode,
        end: Timecode,
    },

    #[error("segment #{}: trim window collapses to nothing after clamping", .index + 1)]
    WindowCollapsed { index: usize },

    #[error("segment #{}: padded trim window is too long to represent", .index + 1)]
    WindowOverflow { index: usize },

    #[error(
        "segment #{}: starts too early for full cross-fade margins ({:.3}s lost)",
        .index + 1,
        .lost.as_secs_f64()
    )]
    MarginClamped { index: usize, lost: Duration },

    #[error("no clips to splice")]
    NoClips,

    #[error("splice sequence already aborted at clip #{}", .step + 1)]
    SpliceAborted { step: usize },

    #[error("splice sequence already finished")]
    SpliceClosed,

    #[error("{context}")]
    Tool {
        context: ToolStage,
        #[source]
        source: ToolError,
    },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl SoxcutError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn tool(context: ToolStage, source: ToolError) -> Self {
        Self::Tool { context, source }
    }
}

/// Which Audio Tool invocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStage {
    Trim { index: usize },
    Measure { step: usize },
    Splice { step: usize },
    Transcode,
}

impl fmt::Display for ToolStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolStage::Trim { index } => write!(f, "failed to trim segment #{}", index + 1),
            ToolStage::Measure { step } => write!(
                f,
                "failed to measure combined stream before splicing clip #{}",
                step + 1
            ),
            ToolStage::Splice { step } => write!(f, "failed to splice clip #{}", step + 1),
            ToolStage::Transcode => write!(f, "failed to encode the final output"),
        }
    }
}
