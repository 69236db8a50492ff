use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use soxcut::cli::{Cli, Command, ExtractArgs, SpliceArgs};
use soxcut::config::{ExtractJob, SpliceJob};
use soxcut::pipeline::{self, PlannedSegment};
use soxcut::timecode;
use soxcut::SoxTool;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Extract(args) => handle_extract(&args),
        Command::Splice(args) => handle_splice(&args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "soxcut=info,warn",
        1 => "soxcut=debug,info",
        _ => "soxcut=trace,debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn handle_splice(args: &SpliceArgs) -> Result<()> {
    let job = SpliceJob::from_args(args)?;

    if args.dry_run {
        let plan = pipeline::plan_segments(&job.segments, &job.settings)
            .with_context(|| format!("failed to plan {:?}", job.segments))?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            for row in &plan {
                println!("{}", describe(row));
            }
        }
        return Ok(());
    }

    let mut tool = SoxTool::locate().context("SoX must be installed to splice audio")?;
    let output = pipeline::splice_segments(&mut tool, &job)
        .with_context(|| format!("failed to splice {:?}", job.input))?;
    println!("Final audio saved to: {}", output.display());
    Ok(())
}

fn handle_extract(args: &ExtractArgs) -> Result<()> {
    let job = ExtractJob::from_args(args)?;
    let mut tool = SoxTool::locate().context("SoX must be installed to extract audio")?;
    let written = pipeline::extract_segments(&mut tool, &job)
        .with_context(|| format!("failed to extract segments from {:?}", job.input))?;
    for path in &written {
        println!("{}", path.display());
    }
    println!("Extracted {} segment(s) into {}", written.len(), job.dir.display());
    Ok(())
}

fn describe(row: &PlannedSegment) -> String {
    let mut line = format!(
        "#{:<3} {:<6} trim {} +{:.3}s",
        row.index,
        row.position.to_string(),
        secs_timecode(row.trim_start),
        row.trim_duration,
    );
    if row.clamped > 0.0 {
        line.push_str(&format!(" (clamped {:.3}s)", row.clamped));
    }
    line
}

fn secs_timecode(secs: f64) -> String {
    timecode::format(Duration::from_millis((secs * 1000.0).round() as u64))
}
