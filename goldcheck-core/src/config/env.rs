//! Environment overrides.
//!
//! All environment access goes through a lookup function captured once per
//! run, so the rest of the library never touches `std::env` directly and tests
//! can supply a plain map.

use once_cell::sync::Lazy;
use regex::Regex;

use super::CI_SSIM_FLOOR;
use crate::error::{CoreError, CoreResult};

/// Explicit platform override (`macos`, `linux`, `windows`).
pub const ENV_PLATFORM: &str = "GOLDCHECK_PLATFORM";
/// CI runner OS hint, as exported by hosted runners.
pub const ENV_RUNNER_OS: &str = "RUNNER_OS";
/// Per-OS baseline flag.
pub const ENV_PER_OS: &str = "GOLDCHECK_PER_OS";
/// SSIM threshold override.
pub const ENV_SSIM_THRESHOLD: &str = "GOLDCHECK_SSIM_THRESHOLD";
/// Set by CI systems.
pub const ENV_CI: &str = "CI";

static PLAIN_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("valid decimal regex"));

/// Snapshot of the environment variables the harness understands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub platform: Option<String>,
    pub runner_os: Option<String>,
    pub per_os: Option<String>,
    pub ssim_threshold: Option<String>,
    pub ci: Option<String>,
}

impl EnvOverrides {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the snapshot from an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            platform: get(ENV_PLATFORM),
            runner_os: get(ENV_RUNNER_OS),
            per_os: get(ENV_PER_OS),
            ssim_threshold: get(ENV_SSIM_THRESHOLD),
            ci: get(ENV_CI),
        }
    }

    /// True when running under CI (`CI` set to anything but `0`/`false`).
    pub fn is_ci(&self) -> bool {
        self.ci
            .as_deref()
            .is_some_and(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
    }

    /// Parses the per-OS flag. Unrecognized values are ignored with a warning.
    pub fn per_os(&self) -> Option<bool> {
        let raw = self.per_os.as_deref()?;
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            other => {
                log::warn!("Ignoring unrecognized {ENV_PER_OS} value '{other}'");
                None
            }
        }
    }

    /// Validated SSIM threshold override, if one is set.
    pub fn ssim_threshold(&self) -> CoreResult<Option<f64>> {
        self.ssim_threshold
            .as_deref()
            .map(|raw| parse_threshold_override(raw, self.is_ci()))
            .transpose()
    }
}

/// Validates a threshold override string.
///
/// The value must be a plain decimal within [0, 1]. In CI it must also be at
/// least [`CI_SSIM_FLOOR`] so a pipeline cannot quietly weaken the gate.
pub fn parse_threshold_override(raw: &str, in_ci: bool) -> CoreResult<f64> {
    if !PLAIN_DECIMAL.is_match(raw) {
        return Err(CoreError::InvalidConfig(format!(
            "{ENV_SSIM_THRESHOLD} must be a plain decimal number, got '{raw}'"
        )));
    }
    let value: f64 = raw.parse().map_err(|_| {
        CoreError::InvalidConfig(format!("{ENV_SSIM_THRESHOLD} is not a number: '{raw}'"))
    })?;
    if value > 1.0 {
        return Err(CoreError::InvalidConfig(format!(
            "{ENV_SSIM_THRESHOLD} must not exceed 1.0, got {value}"
        )));
    }
    if in_ci && value < CI_SSIM_FLOOR {
        return Err(CoreError::InvalidConfig(format!(
            "{ENV_SSIM_THRESHOLD}={value} is below the CI floor of {CI_SSIM_FLOOR}"
        )));
    }
    Ok(value)
}
