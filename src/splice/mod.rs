//! Sequential splicing of prepared clips into one combined stream.

mod splicer;


use std::path::{Path, PathBuf};

use crate::error::{Result, SoxcutError};
use crate::tool::AudioTool;
use crate::types::{PreparedClip, SpliceSettings};

pub use splicer::{SpliceState, Splicer};

/// Join `clips` in order and return the path of the combined stream.
///
/// A single clip comes back untouched without any Audio Tool call.
pub fn combine<T: AudioTool + ?Sized>(
    tool: &mut T,
    clips: &[PreparedClip],
    settings: &SpliceSettings,
    scratch: &Path,
) -> Result<PathBuf> {
    match clips {
        [] => Err(SoxcutError::NoClips),
        [only] => Ok(only.path.clone()),
        _ => {
            let mut splicer = Splicer::new(tool, *settings, scratch);
            for clip in clips {
                splicer.push(&clip.path, clip.ideal_duration)?;
            }
            splicer.finish()
        }
    }
}
