use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::types::{DEFAULT_EXCESS_MS, DEFAULT_LEEWAY_MS};

#[derive(Parser, Debug)]
#[command(
    name = "soxcut",
    version,
    about = "Cut timed segments out of an audio file and splice them with smooth cross-fades"
)]
pub struct Cli {
    /// Verbose mode (-v for debug, -vv for trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Cut every segment into its own numbered file.
    Extract(ExtractArgs),
    /// Cut every segment and splice them into one file with cross-fades.
    #[command(after_help = "Examples:
  soxcut splice -i input.wav -s timings.txt -o output.mp3 -f=\"-C 128\"
  soxcut splice -i audio.flac -s timings.txt -o final.opus -- gain -n highpass 80")]
    Splice(SpliceArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// The source to cut from.
    #[arg(short = 'i', long = "input", env = "SOXCUT_FILEI")]
    pub input: PathBuf,
    /// The segments definition file.
    #[arg(short = 's', long = "segments", env = "SOXCUT_FILES")]
    pub segments: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Directory the numbered segment files are written to.
    #[arg(short = 'd', long = "dir", env = "SOXCUT_DIR", default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct SpliceArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// The final output file.
    #[arg(short = 'o', long = "output", env = "SOXCUT_FILEO", default_value = "output.mp3")]
    pub output: PathBuf,
    /// Excess duration of the cross-fade overlap in ms.
    #[arg(
        short = 'E',
        long = "excess",
        env = "SOXCUT_DUREXCESS",
        default_value_t = DEFAULT_EXCESS_MS
    )]
    pub excess_ms: u64,
    /// Leeway duration for finding the best splice point in ms.
    #[arg(
        short = 'L',
        long = "leeway",
        env = "SOXCUT_DURLEEWAY",
        default_value_t = DEFAULT_LEEWAY_MS
    )]
    pub leeway_ms: u64,
    /// Format options for the output file, e.g. "-C 128".
    #[arg(short = 'f', long = "fopts", env = "SOXCUT_FMTOPT", allow_hyphen_values = true)]
    pub format_options: Option<String>,
    /// Fail instead of warning when a segment is too close to the start of
    /// the source for its full cross-fade margins.
    #[arg(long = "strict-margins")]
    pub strict_margins: bool,
    /// Print the planned trim windows without running SoX.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
    /// Print the dry-run plan as JSON.
    #[arg(long, requires = "dry_run")]
    pub json: bool,
    /// Effects applied during the final encode, given after `--`.
    #[arg(last = true, value_name = "EFFECTS")]
    pub effects: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn splice_defaults_to_documented_margins() {
        let cli =
            Cli::try_parse_from(["soxcut", "splice", "-i", "in.wav", "-s", "seg.txt"]).unwrap();
        let Command::Splice(args) = cli.command else {
            panic!("expected splice");
        };
        assert_eq!(args.excess_ms, 500);
        assert_eq!(args.leeway_ms, 200);
        assert_eq!(args.output, PathBuf::from("output.mp3"));
        assert!(args.format_options.is_none());
        assert!(args.effects.is_empty());
        assert!(!args.dry_run);
    }

    #[test]
    fn splice_accepts_hyphenated_format_options_and_effects() {
        let cli = Cli::try_parse_from([
            "soxcut", "-vv", "splice", "-i", "in.flac", "-s", "seg.txt", "-o", "out.opus", "-E",
            "300", "-L", "100", "-f=-C 16", "--", "gain", "-n", "highpass", "80",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Splice(args) = cli.command else {
            panic!("expected splice");
        };
        assert_eq!(args.excess_ms, 300);
        assert_eq!(args.leeway_ms, 100);
        assert_eq!(args.format_options.as_deref(), Some("-C 16"));
        assert_eq!(args.effects, ["gain", "-n", "highpass", "80"]);
    }

    #[test]
    fn json_requires_dry_run() {
        let result = Cli::try_parse_from(["soxcut", "splice", "-i", "a", "-s", "b", "--json"]);
        assert!(result.is_err());
    }

    #[test]
    fn extract_requires_input_and_segments() {
        assert!(Cli::try_parse_from(["soxcut", "extract", "-i", "in.wav"]).is_err());
        let cli =
            Cli::try_parse_from(["soxcut", "extract", "-i", "in.wav", "-s", "seg.txt"]).unwrap();
        let Command::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.dir, PathBuf::from("."));
    }
}
