use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::cli::{ExtractArgs, SpliceArgs};
use crate::types::{OutputOptions, SpliceSettings};

/// Everything a splice run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct SpliceJob {
    pub input: PathBuf,
    pub segments: PathBuf,
    pub output: PathBuf,
    pub settings: SpliceSettings,
    pub options: OutputOptions,
}

impl SpliceJob {
    pub fn from_args(args: &SpliceArgs) -> Result<Self> {
        let settings = SpliceSettings::from_millis(args.excess_ms, args.leeway_ms)
            .with_strict_margins(args.strict_margins);
        Ok(Self {
            input: existing_file(&args.source.input, "input audio")?,
            segments: existing_file(&args.source.segments, "segments file")?,
            output: args.output.clone(),
            settings,
            options: OutputOptions::new(args.format_options.as_deref(), args.effects.clone()),
        })
    }
}

/// Everything an extract run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct ExtractJob {
    pub input: PathBuf,
    pub segments: PathBuf,
    pub dir: PathBuf,
}

impl ExtractJob {
    /// Also creates the output directory when it is missing.
    pub fn from_args(args: &ExtractArgs) -> Result<Self> {
        Ok(Self {
            input: existing_file(&args.source.input, "input audio")?,
            segments: existing_file(&args.source.segments, "segments file")?,
            dir: ensure_dir(&args.dir)?,
        })
    }
}

fn existing_file(path: &Path, what: &str) -> Result<PathBuf> {
    if !path.exists() {
        return Err(anyhow!("{what} {:?} does not exist", path));
    }
    let canonical = path
        .canonicalize()
        .with_context(|| format!("failed to resolve {what} at {:?}", path))?;
    if canonical.is_file() {
        Ok(canonical)
    } else {
        Err(anyhow!("{what} {:?} is not a file", canonical))
    }
}

fn ensure_dir(path: &Path) -> Result<PathBuf> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create output directory {:?}", path))?;
    let canonical = path
        .canonicalize()
        .with_context(|| format!("failed to resolve output directory at {:?}", path))?;
    if canonical.is_dir() {
        Ok(canonical)
    } else {
        Err(anyhow!("output path {:?} is not a directory", canonical))
    }
}

#[cfg(test)]
mod tests {
    use super::{ExtractJob, SpliceJob};
    use crate::cli::{ExtractArgs, SourceArgs, SpliceArgs};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn source(dir: &Path) -> SourceArgs {
        let input = dir.join("in.wav");
        let segments = dir.join("timings.txt");
        fs::write(&input, b"RIFF").unwrap();
        fs::write(&segments, "0 1\n").unwrap();
        SourceArgs { input, segments }
    }

    fn splice_args(source: SourceArgs) -> SpliceArgs {
        SpliceArgs {
            source,
            output: PathBuf::from("out.mp3"),
            excess_ms: 300,
            leeway_ms: 100,
            format_options: Some("-C 128".into()),
            strict_margins: true,
            dry_run: false,
            json: false,
            effects: vec!["gain".into(), "-n".into()],
        }
    }

    #[test]
    fn splice_job_carries_settings_and_options() {
        let dir = tempfile::tempdir().unwrap();
        let job = SpliceJob::from_args(&splice_args(source(dir.path()))).unwrap();
        assert!(job.input.is_absolute());
        assert_eq!(job.settings.excess, Duration::from_millis(300));
        assert_eq!(job.settings.leeway, Duration::from_millis(100));
        assert!(job.settings.strict_margins);
        assert_eq!(job.options.format_options, ["-C", "128"]);
        assert_eq!(job.options.effects, ["gain", "-n"]);
        assert_eq!(job.output, PathBuf::from("out.mp3"));
    }

    #[test]
    fn rejects_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = source(dir.path());
        source.input = dir.path().join("missing.wav");
        let err = SpliceJob::from_args(&splice_args(source)).unwrap_err();
        assert!(err.to_string().contains("does not exist"), "{err}");
    }

    #[test]
    fn rejects_directory_as_segments_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = source(dir.path());
        source.segments = dir.path().to_path_buf();
        let err = SpliceJob::from_args(&splice_args(source)).unwrap_err();
        assert!(err.to_string().contains("is not a file"), "{err}");
    }

    #[test]
    fn extract_job_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("cuts");
        let job = ExtractJob::from_args(&ExtractArgs {
            source: source(dir.path()),
            dir: out.clone(),
        })
        .unwrap();
        assert!(out.is_dir());
        assert!(job.dir.ends_with("cuts"));
    }
}
