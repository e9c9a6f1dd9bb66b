// goldcheck-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use goldcheck_core::config::{
    DEFAULT_DEBUG_DIR, DEFAULT_GOLDEN_ROOT, DEFAULT_LUFS_TOLERANCE, DEFAULT_REGEN_COMMAND,
    DEFAULT_SAMPLE_TIMESTAMPS, DEFAULT_TRUE_PEAK_TOLERANCE,
};
use std::path::PathBuf;

pub const DEFAULT_MEDIA_REPORT: &str = "target/golden-report.xml";
pub const DEFAULT_SUBTITLE_REPORT: &str = "target/subtitle-report.xml";

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Goldcheck: golden-baseline regression checks",
    long_about = "Compares a rendered candidate against its approved golden baseline \
                  (container metadata, SSIM on sampled frames, EBU R128 loudness) and \
                  validates subtitle artifacts against a versioned contract.\n\n\
                  Exit codes: 0 success, 1 missing input or baseline, \
                  2 checks failed, 3 internal error."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging. RUST_LOG takes precedence when set.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare a candidate video against its golden baseline
    Compare(CompareArgs),
    /// Validate a subtitle artifact against its contract
    Subtitles(SubtitlesArgs),
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Candidate video to check
    #[arg(long, value_name = "FILE")]
    pub candidate: PathBuf,

    /// Game identifier, the baseline directory name under the golden root
    #[arg(long, value_name = "ID")]
    pub game: String,

    /// Comma-separated sample timestamps in seconds
    #[arg(long, value_name = "SECS", default_value = DEFAULT_SAMPLE_TIMESTAMPS)]
    pub timestamps: String,

    /// Minimum SSIM score (overrides GOLDCHECK_SSIM_THRESHOLD)
    #[arg(long, value_name = "F")]
    pub ssim_threshold: Option<f64>,

    /// Integrated loudness tolerance in LU
    #[arg(long, value_name = "LU", default_value_t = DEFAULT_LUFS_TOLERANCE)]
    pub lufs_tolerance: f64,

    /// True-peak tolerance in dB
    #[arg(long, value_name = "DB", default_value_t = DEFAULT_TRUE_PEAK_TOLERANCE)]
    pub peak_tolerance: f64,

    /// Use the platform-specific baseline subdirectory
    #[arg(long, conflicts_with = "no_per_os")]
    pub per_os: bool,

    /// Use the shared baseline directory
    #[arg(long)]
    pub no_per_os: bool,

    /// Platform override: macos, linux or windows (beats GOLDCHECK_PLATFORM)
    #[arg(long, value_name = "NAME")]
    pub platform: Option<String>,

    /// JUnit report output path
    #[arg(long, value_name = "XML", default_value = DEFAULT_MEDIA_REPORT)]
    pub report: PathBuf,

    /// Root directory of the golden baselines
    #[arg(long, value_name = "DIR", default_value = DEFAULT_GOLDEN_ROOT)]
    pub golden_root: PathBuf,

    /// Directory for diff images of failing frames (cleared each run)
    #[arg(long, value_name = "DIR", default_value = DEFAULT_DEBUG_DIR)]
    pub debug_dir: PathBuf,

    /// Command shown when a baseline is missing; {game} and {platform} are substituted
    #[arg(long, value_name = "CMD", default_value = DEFAULT_REGEN_COMMAND)]
    pub regen_command: String,
}

impl CompareArgs {
    /// Explicit per-OS choice from the flags, if any.
    pub fn per_os_flag(&self) -> Option<bool> {
        match (self.per_os, self.no_per_os) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct SubtitlesArgs {
    /// Subtitle artifact (JSON)
    #[arg(long, value_name = "JSON")]
    pub input: PathBuf,

    /// Contract definition (JSON); the built-in contract is used when omitted
    #[arg(long, value_name = "JSON")]
    pub contract: Option<PathBuf>,

    /// JUnit report output path
    #[arg(long, value_name = "XML", default_value = DEFAULT_SUBTITLE_REPORT)]
    pub report: PathBuf,

    /// Report every violation instead of stopping at the first
    #[arg(long, default_value_t = false)]
    pub all_violations: bool,
}
