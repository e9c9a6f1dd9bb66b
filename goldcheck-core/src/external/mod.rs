// ============================================================================
// goldcheck-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Typed adapters over ffmpeg and ffprobe
//
// The harness never decodes media or computes SSIM/loudness itself. It runs
// ffmpeg/ffprobe and parses what they print. Everything that depends on the
// textual output format of those tools sits behind the `MediaAnalyzer` trait,
// so a change in tool output only touches this module.
//
// KEY COMPONENTS:
// - MediaAnalyzer: the adapter seam used by the comparators
// - FfmpegAnalyzer: production implementation (ffmpeg-sidecar + ffprobe)
// - FfmpegSpawner / FfprobeExecutor: lower-level process abstractions
// - parse: pure parsers for ssim and ebur128 summaries

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub mod analyzer;
pub mod ffmpeg_executor;
pub mod ffprobe_executor;
pub mod parse;

pub use analyzer::FfmpegAnalyzer;
pub use ffmpeg_executor::{FfmpegProcess, FfmpegRun, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{CommandFfprobeExecutor, FfprobeExecutor};

// ============================================================================
// ADAPTER RESULT TYPES
// ============================================================================

/// Video stream metadata, shared by probe output and `container.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStreamMeta {
    #[serde(default, alias = "pixel_format")]
    pub pix_fmt: Option<String>,
    #[serde(default, alias = "frame_rate")]
    pub r_frame_rate: Option<String>,
    #[serde(default)]
    pub avg_frame_rate: Option<String>,
    #[serde(default, alias = "sar")]
    pub sample_aspect_ratio: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub codec_name: Option<String>,
}

impl VideoStreamMeta {
    /// Frame-rate spec, preferring `r_frame_rate` and skipping ffprobe's `0/0`.
    pub fn frame_rate(&self) -> Option<&str> {
        [&self.r_frame_rate, &self.avg_frame_rate]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.trim().is_empty() && *v != "0/0")
    }
}

/// Audio stream metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioStreamMeta {
    #[serde(default)]
    pub codec_name: Option<String>,
    #[serde(default)]
    pub sample_rate: Option<String>,
    #[serde(default)]
    pub channels: Option<u32>,
}

/// Container/stream metadata for a probed file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeResult {
    /// First video stream, if any.
    pub video: Option<VideoStreamMeta>,
    /// First audio stream, if any.
    pub audio: Option<AudioStreamMeta>,
    pub duration_secs: Option<f64>,
}

/// SSIM score reported by the tool. Non-finite when it could not compute one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityResult {
    pub score: f64,
}

impl SimilarityResult {
    pub fn unavailable() -> Self {
        Self { score: f64::NAN }
    }

    pub fn is_computed(&self) -> bool {
        self.score.is_finite()
    }
}

/// EBU R128 summary values. `None` when the value was not found in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoudnessResult {
    pub integrated_lufs: Option<f64>,
    pub true_peak_dbtp: Option<f64>,
}

// ============================================================================
// ADAPTER TRAIT
// ============================================================================

/// Operations the comparison pipeline needs from the external media tool.
///
/// Each call is a single blocking subprocess invocation. Implementations must
/// not retry.
pub trait MediaAnalyzer {
    /// Structured container/stream metadata for `input`.
    fn probe(&self, input: &Path) -> CoreResult<ProbeResult>;

    /// Writes exactly one frame at `timestamp_secs` to `output`.
    ///
    /// Fails with `ProbeFailure` when the tool exits non-zero.
    fn extract_frame(&self, input: &Path, timestamp_secs: f64, output: &Path) -> CoreResult<()>;

    /// SSIM of `candidate` against `reference`, scaling the candidate to the
    /// reference resolution first.
    fn similarity(&self, candidate: &Path, reference: &Path) -> CoreResult<SimilarityResult>;

    /// Integrated loudness and true peak of the first audio stream.
    fn loudness(&self, input: &Path) -> CoreResult<LoudnessResult>;

    /// Writes a pixel-difference image of the two frames to `output`.
    fn diff_image(&self, candidate: &Path, reference: &Path, output: &Path) -> CoreResult<()>;
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that `cmd_name` can be started (`<cmd> -version`).
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}
