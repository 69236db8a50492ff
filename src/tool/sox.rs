use std::env;
use std::ffi::{OsStr, OsString};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::debug;

use super::{seconds_arg, AudioTool, ToolError};
use crate::types::{OutputOptions, SpliceParams};

const SOX: &str = "sox";
const SOXI: &str = "soxi";

/// [`AudioTool`] backed by the `sox` and `soxi` executables.
#[derive(Debug, Clone)]
pub struct SoxTool {
    sox: PathBuf,
    soxi: PathBuf,
}

impl SoxTool {
    /// Use whatever `sox`/`soxi` the OS resolves at spawn time.
    pub fn new() -> Self {
        Self::with_programs(SOX, SOXI)
    }

    pub fn with_programs(sox: impl Into<PathBuf>, soxi: impl Into<PathBuf>) -> Self {
        Self {
            sox: sox.into(),
            soxi: soxi.into(),
        }
    }

    /// Resolve both executables on `PATH`, failing early when either is missing.
    pub fn locate() -> Result<Self, ToolError> {
        let sox = find_on_path(SOX).ok_or_else(|| ToolError::NotFound {
            program: SOX.to_string(),
        })?;
        let soxi = find_on_path(SOXI).ok_or_else(|| ToolError::NotFound {
            program: SOXI.to_string(),
        })?;
        debug!(sox = %sox.display(), soxi = %soxi.display(), "located SoX executables");
        Ok(Self::with_programs(sox, soxi))
    }

    fn run<I, S>(program: &Path, args: I) -> Result<String, ToolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        let name = program.display().to_string();
        debug!(program = %name, args = ?args, "running audio tool");

        let output = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => ToolError::NotFound {
                    program: name.clone(),
                },
                _ => ToolError::Spawn {
                    program: name.clone(),
                    source: err,
                },
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        Err(ToolError::Failed {
            program: name,
            status: output.status.to_string(),
            stderr: detail,
        })
    }
}

impl Default for SoxTool {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioTool for SoxTool {
    fn trim(
        &mut self,
        source: &Path,
        dest: &Path,
        start: Duration,
        duration: Duration,
    ) -> Result<(), ToolError> {
        Self::run(
            &self.sox,
            [
                source.as_os_str(),
                dest.as_os_str(),
                OsStr::new("trim"),
                OsStr::new(&seconds_arg(start)),
                OsStr::new(&seconds_arg(duration)),
            ],
        )
        .map(drop)
    }

    fn measure_duration(&mut self, file: &Path) -> Result<Duration, ToolError> {
        let stdout = Self::run(&self.soxi, [OsStr::new("-D"), file.as_os_str()])?;
        parse_reported_duration(&self.soxi.display().to_string(), &stdout)
    }

    fn splice(
        &mut self,
        first: &Path,
        second: &Path,
        dest: &Path,
        params: SpliceParams,
    ) -> Result<(), ToolError> {
        Self::run(
            &self.sox,
            [
                first.as_os_str(),
                second.as_os_str(),
                dest.as_os_str(),
                OsStr::new("splice"),
                OsStr::new("-q"),
                OsStr::new(&splice_arg(params)),
            ],
        )
        .map(drop)
    }

    fn transcode(
        &mut self,
        input: &Path,
        output: &Path,
        options: &OutputOptions,
    ) -> Result<(), ToolError> {
        Self::run(&self.sox, transcode_args(input, output, options)).map(drop)
    }
}

/// `position,excess,leeway` in seconds, as taken by the `splice` effect.
fn splice_arg(params: SpliceParams) -> String {
    format!(
        "{},{},{}",
        seconds_arg(params.position),
        seconds_arg(params.excess),
        seconds_arg(params.leeway)
    )
}

/// Format options describe the output file, so they sit before its path;
/// effects follow it.
fn transcode_args(input: &Path, output: &Path, options: &OutputOptions) -> Vec<OsString> {
    let mut args = vec![input.as_os_str().to_owned()];
    args.extend(options.format_options.iter().map(OsString::from));
    args.push(output.as_os_str().to_owned());
    args.extend(options.effects.iter().map(OsString::from));
    args
}

fn parse_reported_duration(program: &str, stdout: &str) -> Result<Duration, ToolError> {
    let invalid = || ToolError::InvalidDuration {
        program: program.to_string(),
        output: stdout.trim().to_string(),
    };
    let seconds: f64 = stdout.trim().parse().map_err(|_| invalid())?;
    Duration::try_from_secs_f64(seconds).map_err(|_| invalid())
}

fn find_on_path(program: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
        let with_exe = candidate.with_extension(env::consts::EXE_EXTENSION);
        (!env::consts::EXE_EXTENSION.is_empty() && with_exe.is_file()).then_some(with_exe)
    })
}
