//! Production [`MediaAnalyzer`] built on ffmpeg and ffprobe.

use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::Path;

use super::ffmpeg_executor::run_to_completion;
use super::parse::{parse_loudness_summary, parse_ssim_output};
use super::{
    CommandFfprobeExecutor, FfmpegSpawner, FfprobeExecutor, LoudnessResult, MediaAnalyzer,
    ProbeResult, SidecarSpawner, SimilarityResult,
};
use crate::error::CoreResult;

/// Scales the candidate (input 0) to the reference (input 1) before scoring.
const SSIM_GRAPH: &str = "[0:v][1:v]scale2ref=flags=bicubic[cand][ref];[cand][ref]ssim";

const DIFF_GRAPH: &str = "[0:v][1:v]scale2ref=flags=bicubic[cand][ref];\
[cand]format=rgb24[c];[ref]format=rgb24[r];[c][r]blend=all_mode=difference";

const LOUDNESS_FILTER: &str = "ebur128=peak=true";

/// Runs analysis through an [`FfmpegSpawner`] and an [`FfprobeExecutor`].
#[derive(Debug, Clone, Default)]
pub struct FfmpegAnalyzer<S = SidecarSpawner, P = CommandFfprobeExecutor> {
    spawner: S,
    ffprobe: P,
}

impl FfmpegAnalyzer {
    /// Analyzer using the ffmpeg and ffprobe found on PATH.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: FfmpegSpawner, P: FfprobeExecutor> FfmpegAnalyzer<S, P> {
    pub fn with_executors(spawner: S, ffprobe: P) -> Self {
        Self { spawner, ffprobe }
    }
}

/// Seek position as ffmpeg expects it, with millisecond precision.
fn seek_arg(timestamp_secs: f64) -> String {
    format!("{timestamp_secs:.3}")
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl<S: FfmpegSpawner, P: FfprobeExecutor> MediaAnalyzer for FfmpegAnalyzer<S, P> {
    fn probe(&self, input: &Path) -> CoreResult<ProbeResult> {
        self.ffprobe.probe(input)
    }

    fn extract_frame(&self, input: &Path, timestamp_secs: f64, output: &Path) -> CoreResult<()> {
        let mut cmd = FfmpegCommand::new();
        cmd.hide_banner();
        cmd.overwrite();
        cmd.input(path_arg(input));
        // -ss after -i: decode up to the timestamp for a frame-accurate result.
        cmd.arg("-ss");
        cmd.arg(seek_arg(timestamp_secs));
        cmd.args(["-frames:v", "1", "-an", "-sn"]);
        cmd.output(path_arg(output));

        let context = format!("frame extraction at {timestamp_secs}s");
        run_to_completion(&self.spawner, cmd, &context)?.into_checked(&context)?;
        Ok(())
    }

    fn similarity(&self, candidate: &Path, reference: &Path) -> CoreResult<SimilarityResult> {
        let mut cmd = FfmpegCommand::new();
        cmd.hide_banner();
        cmd.input(path_arg(candidate));
        cmd.input(path_arg(reference));
        cmd.args(["-lavfi", SSIM_GRAPH, "-f", "null"]);
        cmd.output("-");

        let run = run_to_completion(&self.spawner, cmd, "ssim")?;
        if !run.success() {
            log::warn!(
                "ssim could not be computed for {}: {}",
                candidate.display(),
                run.output()
            );
            return Ok(SimilarityResult::unavailable());
        }
        Ok(match parse_ssim_output(&run.output()) {
            Some(score) => SimilarityResult { score },
            None => {
                log::warn!("No SSIM score found in ffmpeg output for {}", candidate.display());
                SimilarityResult::unavailable()
            }
        })
    }

    fn loudness(&self, input: &Path) -> CoreResult<LoudnessResult> {
        let mut cmd = FfmpegCommand::new();
        cmd.hide_banner();
        cmd.arg("-nostats");
        cmd.input(path_arg(input));
        cmd.args(["-map", "0:a:0", "-vn", "-af", LOUDNESS_FILTER, "-f", "null"]);
        cmd.output("-");

        let run = run_to_completion(&self.spawner, cmd, "loudness analysis")?;
        if !run.success() {
            log::warn!("Loudness analysis failed for {}: {}", input.display(), run.output());
        }
        Ok(parse_loudness_summary(&run.output()))
    }

    fn diff_image(&self, candidate: &Path, reference: &Path, output: &Path) -> CoreResult<()> {
        let mut cmd = FfmpegCommand::new();
        cmd.hide_banner();
        cmd.overwrite();
        cmd.input(path_arg(candidate));
        cmd.input(path_arg(reference));
        cmd.args(["-filter_complex", DIFF_GRAPH, "-frames:v", "1"]);
        cmd.output(path_arg(output));

        run_to_completion(&self.spawner, cmd, "diff image")?.into_checked("diff image")?;
        Ok(())
    }
}
