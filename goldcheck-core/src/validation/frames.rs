//! Perceptual frame comparison.

use std::path::{Path, PathBuf};

use super::result::ComparisonResult;
use crate::baseline::{Baseline, frame_case_name};
use crate::config::{FailurePolicy, TolerancePolicy};
use crate::error::CoreResult;
use crate::external::MediaAnalyzer;
use crate::media::MediaProbe;
use crate::temp_files::DIFF_SUFFIX;

/// Deterministic diff image name for a failing sample.
pub fn diff_file_name(baseline: &Baseline, timestamp: f64) -> String {
    format!("{}_{}_{timestamp}s{DIFF_SUFFIX}", baseline.game, baseline.platform)
}

/// Compares the candidate against every golden frame, one result per
/// timestamp, in the order the timestamps were given.
///
/// Failing samples leave a difference image in `debug_dir`. Extraction
/// failures are errors, not failing results.
pub fn check_frames<A: MediaAnalyzer + ?Sized>(
    probe: &MediaProbe<'_, A>,
    baseline: &Baseline,
    policy: &TolerancePolicy,
    debug_dir: &Path,
) -> CoreResult<Vec<ComparisonResult>> {
    let mut results = Vec::with_capacity(policy.sample_timestamps.len());
    for &timestamp in &policy.sample_timestamps {
        let result = check_frame(probe, baseline, policy, debug_dir, timestamp)?;
        result.log();
        let stop = result.is_failure() && policy.failure_policy == FailurePolicy::FailFast;
        results.push(result);
        if stop {
            break;
        }
    }
    Ok(results)
}

fn check_frame<A: MediaAnalyzer + ?Sized>(
    probe: &MediaProbe<'_, A>,
    baseline: &Baseline,
    policy: &TolerancePolicy,
    debug_dir: &Path,
    timestamp: f64,
) -> CoreResult<ComparisonResult> {
    let name = frame_case_name(timestamp);
    let golden = baseline.frame_path(timestamp);
    if !golden.is_file() {
        return Ok(ComparisonResult::failed(
            name,
            format!("golden frame missing: {}", golden.display()),
        ));
    }

    let candidate = probe.extract_frame(timestamp)?;
    let similarity = probe.analyzer().similarity(&candidate, &golden)?;
    log::debug!("{name}: ssim={}", similarity.score);

    if similarity.is_computed() && similarity.score >= policy.min_ssim {
        return Ok(ComparisonResult::passed(name).with_measurement(similarity.score));
    }

    let mut message = if similarity.is_computed() {
        format!(
            "ssim {:.6} below threshold {}",
            similarity.score, policy.min_ssim
        )
    } else {
        "ssim could not be computed (incompatible frame formats?)".to_string()
    };
    if let Some(diff) = write_diff(probe, baseline, debug_dir, timestamp, &candidate, &golden) {
        message.push_str(&format!("; diff: {}", diff.display()));
    }
    Ok(ComparisonResult::failed(name, message).with_measurement(similarity.score))
}

/// Best effort; a diff that cannot be produced never changes the verdict.
fn write_diff<A: MediaAnalyzer + ?Sized>(
    probe: &MediaProbe<'_, A>,
    baseline: &Baseline,
    debug_dir: &Path,
    timestamp: f64,
    candidate: &Path,
    golden: &Path,
) -> Option<PathBuf> {
    let output = debug_dir.join(diff_file_name(baseline, timestamp));
    match probe.analyzer().diff_image(candidate, golden, &output) {
        Ok(()) => Some(output),
        Err(e) => {
            log::warn!("Could not write diff image {}: {e}", output.display());
            None
        }
    }
}
