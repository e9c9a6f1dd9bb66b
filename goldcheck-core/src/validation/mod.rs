//! Golden media comparison pipeline
//!
//! Responsibilities:
//! - Resolve the baseline for a (game, platform) pair
//! - Probe the candidate once and sample its frames into scratch space
//! - Run the container, frame and audio comparators in that order
//! - Collect every result into one suite report
//!
//! Configuration and input problems abort the run before any check executes.
//! Per-check regressions are results, not errors: under the default policy all
//! of them are collected so a single run reports every discrepancy.

use log::info;
use std::path::Path;

use crate::baseline::{CONTAINER_FILE, locate_baseline};
use crate::config::{FailurePolicy, HarnessPaths, TolerancePolicy};
use crate::error::{CoreError, CoreResult};
use crate::external::MediaAnalyzer;
use crate::logging;
use crate::media::MediaProbe;
use crate::platform::Platform;
use crate::reporting::SuiteReport;
use crate::temp_files;

pub mod audio;
pub mod container;
pub mod frames;
pub mod result;

pub use result::{CheckStatus, ComparisonResult};

/// Inputs for one media comparison run.
#[derive(Debug, Clone, Copy)]
pub struct MediaCheckRequest<'a> {
    pub candidate: &'a Path,
    pub game: &'a str,
    pub platform: Platform,
    /// `None` auto-detects from the baseline layout.
    pub per_os: Option<bool>,
    pub paths: &'a HarnessPaths,
    pub policy: &'a TolerancePolicy,
}

/// Suite name used in reports for a media run.
pub fn media_suite_name(game: &str, platform: Platform) -> String {
    format!("golden.{game}.{platform}")
}

/// Appends results and reports whether the run should continue.
struct ResultCollector {
    policy: FailurePolicy,
    results: Vec<ComparisonResult>,
    halted: bool,
}

impl ResultCollector {
    fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            results: Vec::new(),
            halted: false,
        }
    }

    fn extend(&mut self, results: Vec<ComparisonResult>) -> bool {
        for result in results {
            let failed = result.is_failure();
            self.results.push(result);
            if failed && self.policy == FailurePolicy::FailFast {
                self.halted = true;
                break;
            }
        }
        !self.halted
    }
}

/// Runs the full media comparison for one candidate.
///
/// Returns the suite report on completion, whatever the verdicts. Errors are
/// reserved for missing inputs or baselines and for tool failures.
pub fn run_media_check<A: MediaAnalyzer + ?Sized>(
    analyzer: &A,
    request: &MediaCheckRequest<'_>,
) -> CoreResult<SuiteReport> {
    let MediaCheckRequest {
        candidate,
        game,
        platform,
        per_os,
        paths,
        policy,
    } = *request;

    logging::log_section("GOLDEN MEDIA CHECK");
    info!("Candidate: {}", candidate.display());
    info!("Game: {game}, platform: {platform}");
    info!(
        "Tolerance policy v{}: ssim>={}, lufs±{}, peak±{}, timestamps={:?}",
        policy.version,
        policy.min_ssim,
        policy.lufs_tolerance,
        policy.true_peak_tolerance,
        policy.sample_timestamps
    );

    policy.validate()?;
    if !candidate.is_file() {
        return Err(CoreError::InputNotFound(candidate.to_path_buf()));
    }
    let baseline = locate_baseline(paths, game, platform, per_os)?;
    let expected_container = baseline.load_container()?;
    let expected_audio = baseline.load_audio_stats()?;

    temp_files::prepare_debug_dir(&paths.debug_dir)?;
    let probe = MediaProbe::new(analyzer, candidate)?;
    let candidate_meta = probe.probe_candidate()?;

    let mut collector = ResultCollector::new(policy.failure_policy);

    logging::log_subsection("CONTAINER");
    let container_results = match &expected_container {
        Some(record) => container::check_container(&candidate_meta, record, policy),
        None => vec![container::missing_container_record(
            &baseline.dir.join(CONTAINER_FILE),
        )],
    };
    for result in &container_results {
        result.log();
    }
    let mut proceed = collector.extend(container_results);

    if proceed {
        logging::log_subsection("FRAMES");
        let frame_results = frames::check_frames(&probe, &baseline, policy, &paths.debug_dir)?;
        proceed = collector.extend(frame_results);
    }

    if proceed {
        logging::log_subsection("AUDIO");
        let audio_results = audio::check_audio(&probe, &candidate_meta, &expected_audio, policy)?;
        collector.extend(audio_results);
    }

    if collector.halted {
        info!("Stopped at first failure (fail-fast policy)");
    }

    Ok(SuiteReport::new(
        media_suite_name(game, platform),
        collector.results,
    ))
}
