//! Configuration structures and constants for the goldcheck-core library.
//!
//! The [`TolerancePolicy`] is built once per run (usually through
//! [`TolerancePolicyBuilder`]) and passed by reference to every comparator.
//! Nothing in the library reads thresholds from ambient globals.

mod builder;
mod env;

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

pub use builder::TolerancePolicyBuilder;
pub use env::{
    ENV_CI, ENV_PER_OS, ENV_PLATFORM, ENV_RUNNER_OS, ENV_SSIM_THRESHOLD, EnvOverrides,
    parse_threshold_override,
};

// Default constants

/// Version of the tolerance policy layout. Bumped whenever a default changes.
pub const POLICY_VERSION: u32 = 1;

/// Default minimum SSIM score for a frame to pass.
///
/// Two defaults (0.995 and 0.95) were in circulation; 0.995 is the default and
/// 0.95 is only the CI floor below which an override is refused.
pub const DEFAULT_MIN_SSIM: f64 = 0.995;

/// Hard floor for a threshold override supplied through the environment in CI.
pub const CI_SSIM_FLOOR: f64 = 0.95;

/// Allowed integrated loudness deviation, in LU.
pub const DEFAULT_LUFS_TOLERANCE: f64 = 1.0;

/// Allowed true-peak deviation, in dB.
pub const DEFAULT_TRUE_PEAK_TOLERANCE: f64 = 1.0;

/// Sample timestamps (seconds) used when none are given.
pub const DEFAULT_SAMPLE_TIMESTAMPS: &str = "5,10,20";

/// Absolute epsilon used when comparing normalized frame rates.
pub const DEFAULT_FPS_EPSILON: f64 = 0.01;

/// Relative distance to a whole number under which a frame rate snaps to it
/// (30000/1001 is treated as 30).
pub const FPS_SNAP_RATIO: f64 = 0.01;

/// Root directory holding golden baselines.
pub const DEFAULT_GOLDEN_ROOT: &str = "tests/golden";

/// Directory receiving diff images for failed frames.
pub const DEFAULT_DEBUG_DIR: &str = "target/golden-debug";

/// Command template shown when a baseline needs to be (re)generated.
pub const DEFAULT_REGEN_COMMAND: &str = "make golden-update GAME={game} PLATFORM={platform}";

/// Whether a validator stops at the first violation or reports all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort on the first violation. Used for subtitle contracts.
    FailFast,
    /// Run every check and report every discrepancy. Used for media runs.
    AccumulateAll,
}

/// Numeric thresholds applied to a single comparison run.
#[derive(Debug, Clone, PartialEq)]
pub struct TolerancePolicy {
    pub version: u32,
    /// Minimum SSIM score, inclusive.
    pub min_ssim: f64,
    /// Integrated loudness tolerance, LU.
    pub lufs_tolerance: f64,
    /// True-peak tolerance, dB.
    pub true_peak_tolerance: f64,
    /// Seconds into the candidate at which frames are sampled.
    pub sample_timestamps: Vec<f64>,
    /// Epsilon for frame-rate equality after normalization.
    pub fps_epsilon: f64,
    pub failure_policy: FailurePolicy,
}

impl Default for TolerancePolicy {
    fn default() -> Self {
        Self {
            version: POLICY_VERSION,
            min_ssim: DEFAULT_MIN_SSIM,
            lufs_tolerance: DEFAULT_LUFS_TOLERANCE,
            true_peak_tolerance: DEFAULT_TRUE_PEAK_TOLERANCE,
            sample_timestamps: vec![5.0, 10.0, 20.0],
            fps_epsilon: DEFAULT_FPS_EPSILON,
            failure_policy: FailurePolicy::AccumulateAll,
        }
    }
}

impl TolerancePolicy {
    /// Checks that every threshold is usable.
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.min_ssim) {
            return Err(CoreError::InvalidConfig(format!(
                "SSIM threshold must be within [0, 1], got {}",
                self.min_ssim
            )));
        }
        for (name, value) in [
            ("loudness tolerance", self.lufs_tolerance),
            ("true-peak tolerance", self.true_peak_tolerance),
            ("frame-rate epsilon", self.fps_epsilon),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.sample_timestamps.is_empty() {
            return Err(CoreError::InvalidConfig(
                "at least one sample timestamp is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parses a comma-separated list of sample timestamps in seconds.
///
/// Blank entries are ignored and duplicates keep their first position.
pub fn parse_timestamps(spec: &str) -> CoreResult<Vec<f64>> {
    let mut timestamps: Vec<f64> = Vec::new();
    for raw in spec.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let value: f64 = raw.parse().map_err(|_| {
            CoreError::InvalidConfig(format!("invalid sample timestamp '{raw}'"))
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "sample timestamp must be a non-negative number, got '{raw}'"
            )));
        }
        if !timestamps.contains(&value) {
            timestamps.push(value);
        }
    }
    if timestamps.is_empty() {
        return Err(CoreError::InvalidConfig(format!(
            "no sample timestamps in '{spec}'"
        )));
    }
    Ok(timestamps)
}

/// Paths and hints that locate baselines and debug output for a run.
#[derive(Debug, Clone)]
pub struct HarnessPaths {
    pub golden_root: PathBuf,
    pub debug_dir: PathBuf,
    /// Template with `{game}` and `{platform}` placeholders.
    pub regen_command: String,
}

impl Default for HarnessPaths {
    fn default() -> Self {
        Self {
            golden_root: PathBuf::from(DEFAULT_GOLDEN_ROOT),
            debug_dir: PathBuf::from(DEFAULT_DEBUG_DIR),
            regen_command: DEFAULT_REGEN_COMMAND.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = TolerancePolicy::default();
        assert_eq!(policy.version, POLICY_VERSION);
        assert_eq!(policy.min_ssim, 0.995);
        assert_eq!(policy.sample_timestamps, vec![5.0, 10.0, 20.0]);
        assert_eq!(policy.failure_policy, FailurePolicy::AccumulateAll);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_default_timestamp_string_matches_policy() {
        let parsed = parse_timestamps(DEFAULT_SAMPLE_TIMESTAMPS).unwrap();
        assert_eq!(parsed, TolerancePolicy::default().sample_timestamps);
    }

    #[test]
    fn test_parse_timestamps() {
        assert_eq!(parse_timestamps(" 1, 2.5 ,,2.5,0").unwrap(), vec![1.0, 2.5, 0.0]);
        assert!(parse_timestamps("1,abc").is_err());
        assert!(parse_timestamps("-1").is_err());
        assert!(parse_timestamps(" , ").is_err());
        assert!(parse_timestamps("inf").is_err());
    }

    #[test]
    fn test_policy_validation_rejects_bad_values() {
        let mut policy = TolerancePolicy {
            min_ssim: 1.5,
            ..TolerancePolicy::default()
        };
        assert!(policy.validate().is_err());

        policy.min_ssim = 0.99;
        policy.lufs_tolerance = -1.0;
        assert!(policy.validate().is_err());

        policy.lufs_tolerance = 1.0;
        policy.sample_timestamps.clear();
        assert!(policy.validate().is_err());
    }
}
