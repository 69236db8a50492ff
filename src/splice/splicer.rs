use std::mem;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, SoxcutError, ToolStage};
use crate::tool::AudioTool;
use crate::types::SpliceSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpliceState {
    Empty,
    Accumulating { current: PathBuf, steps: usize },
    Done(PathBuf),
    Failed { step: usize },
}

/// Folds clips into one stream, one splice per pushed clip after the first.
///
/// Before each splice the current combined file is measured with the Audio
/// Tool and that measured length, not the sum of requested durations, becomes
/// the splice position. Trims and earlier splices shift boundaries by
/// fractions of a frame; measuring keeps that from accumulating.
pub struct Splicer<'a, T: AudioTool + ?Sized> {
    tool: &'a mut T,
    settings: SpliceSettings,
    scratch: &'a Path,
    state: SpliceState,
    nominal: Duration,
}

impl<'a, T: AudioTool + ?Sized> Splicer<'a, T> {
    pub fn new(tool: &'a mut T, settings: SpliceSettings, scratch: &'a Path) -> Self {
        Self {
            tool,
            settings,
            scratch,
            state: SpliceState::Empty,
            nominal: Duration::ZERO,
        }
    }

    pub fn state(&self) -> &SpliceState {
        &self.state
    }

    /// Add the next clip. `ideal` is the requested length of the segment it
    /// was cut for and only feeds drift diagnostics.
    pub fn push(&mut self, clip: &Path, ideal: Duration) -> Result<()> {
        match mem::replace(&mut self.state, SpliceState::Empty) {
            SpliceState::Empty => {
                self.nominal = ideal;
                self.state = SpliceState::Accumulating {
                    current: clip.to_path_buf(),
                    steps: 0,
                };
                Ok(())
            }
            SpliceState::Accumulating { current, steps } => {
                let step = steps + 1;
                match self.join(&current, clip, step) {
                    Ok(joined) => {
                        self.nominal += ideal;
                        self.state = SpliceState::Accumulating {
                            current: joined,
                            steps: step,
                        };
                        Ok(())
                    }
                    Err(err) => {
                        self.state = SpliceState::Failed { step };
                        Err(err)
                    }
                }
            }
            SpliceState::Failed { step } => {
                self.state = SpliceState::Failed { step };
                Err(SoxcutError::SpliceAborted { step })
            }
            SpliceState::Done(current) => {
                self.state = SpliceState::Done(current);
                Err(SoxcutError::SpliceClosed)
            }
        }
    }

    /// Close the sequence and hand back the combined stream. Calling it
    /// again returns the same stream.
    pub fn finish(&mut self) -> Result<PathBuf> {
        let current = match &self.state {
            SpliceState::Empty => return Err(SoxcutError::NoClips),
            SpliceState::Accumulating { current, steps } => {
                debug!(steps, "splice sequence complete");
                current.clone()
            }
            SpliceState::Done(current) => return Ok(current.clone()),
            SpliceState::Failed { step } => {
                return Err(SoxcutError::SpliceAborted { step: *step })
            }
        };
        self.state = SpliceState::Done(current.clone());
        Ok(current)
    }

    fn join(&mut self, current: &Path, next: &Path, step: usize) -> Result<PathBuf> {
        let measured = self
            .tool
            .measure_duration(current)
            .map_err(|err| SoxcutError::tool(ToolStage::Measure { step }, err))?;

        info!(
            clip = step + 1,
            joint_s = measured.as_secs_f64(),
            nominal_s = self.nominal.as_secs_f64(),
            "splicing clip"
        );

        let dest = self.scratch.join(format!("joined_{step:03}.wav"));
        let params = self.settings.splice_params(measured);
        self.tool
            .splice(current, next, &dest, params)
            .map_err(|err| SoxcutError::tool(ToolStage::Splice { step }, err))?;
        Ok(dest)
    }
}
