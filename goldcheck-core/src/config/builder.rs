// ============================================================================
// goldcheck-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for TolerancePolicy
//
// Resolves the effective tolerance policy from three layers: explicit values
// (CLI flags), environment overrides, and the built-in defaults. The
// threshold precedence is explicit > environment > default.

use super::{EnvOverrides, FailurePolicy, TolerancePolicy};
use crate::error::CoreResult;

/// Builder for creating TolerancePolicy instances.
///
/// # Examples
///
/// ```rust
/// use goldcheck_core::config::TolerancePolicyBuilder;
///
/// let policy = TolerancePolicyBuilder::new()
///     .min_ssim(0.98)
///     .lufs_tolerance(0.5)
///     .sample_timestamps(vec![1.0, 2.0])
///     .build()
///     .unwrap();
/// assert_eq!(policy.min_ssim, 0.98);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TolerancePolicyBuilder {
    min_ssim: Option<f64>,
    lufs_tolerance: Option<f64>,
    true_peak_tolerance: Option<f64>,
    sample_timestamps: Option<Vec<f64>>,
    fps_epsilon: Option<f64>,
    failure_policy: Option<FailurePolicy>,
    env: Option<EnvOverrides>,
}

impl TolerancePolicyBuilder {
    /// Creates a new builder with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit SSIM threshold. Wins over any environment override.
    pub fn min_ssim(mut self, value: f64) -> Self {
        self.min_ssim = Some(value);
        self
    }

    pub fn maybe_min_ssim(mut self, value: Option<f64>) -> Self {
        if value.is_some() {
            self.min_ssim = value;
        }
        self
    }

    pub fn lufs_tolerance(mut self, value: f64) -> Self {
        self.lufs_tolerance = Some(value);
        self
    }

    pub fn true_peak_tolerance(mut self, value: f64) -> Self {
        self.true_peak_tolerance = Some(value);
        self
    }

    pub fn sample_timestamps(mut self, value: Vec<f64>) -> Self {
        self.sample_timestamps = Some(value);
        self
    }

    pub fn fps_epsilon(mut self, value: f64) -> Self {
        self.fps_epsilon = Some(value);
        self
    }

    pub fn failure_policy(mut self, value: FailurePolicy) -> Self {
        self.failure_policy = Some(value);
        self
    }

    /// Environment layer consulted when no explicit threshold was given.
    pub fn env(mut self, env: EnvOverrides) -> Self {
        self.env = Some(env);
        self
    }

    /// Resolves and validates the policy.
    pub fn build(self) -> CoreResult<TolerancePolicy> {
        let defaults = TolerancePolicy::default();

        let env_threshold = match (&self.env, self.min_ssim) {
            (Some(env), None) => env.ssim_threshold()?,
            _ => None,
        };
        if let Some(value) = env_threshold {
            log::info!("SSIM threshold overridden from environment: {value}");
        }

        let policy = TolerancePolicy {
            version: defaults.version,
            min_ssim: self.min_ssim.or(env_threshold).unwrap_or(defaults.min_ssim),
            lufs_tolerance: self.lufs_tolerance.unwrap_or(defaults.lufs_tolerance),
            true_peak_tolerance: self
                .true_peak_tolerance
                .unwrap_or(defaults.true_peak_tolerance),
            sample_timestamps: self
                .sample_timestamps
                .unwrap_or(defaults.sample_timestamps),
            fps_epsilon: self.fps_epsilon.unwrap_or(defaults.fps_epsilon),
            failure_policy: self.failure_policy.unwrap_or(defaults.failure_policy),
        };
        policy.validate()?;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ENV_CI, ENV_SSIM_THRESHOLD};
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> EnvOverrides {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvOverrides::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_builder_defaults() {
        let policy = TolerancePolicyBuilder::new().build().unwrap();
        assert_eq!(policy, TolerancePolicy::default());
    }

    #[test]
    fn test_env_threshold_applies_without_explicit_value() {
        let policy = TolerancePolicyBuilder::new()
            .env(env_from(&[(ENV_SSIM_THRESHOLD, "0.97")]))
            .build()
            .unwrap();
        assert_eq!(policy.min_ssim, 0.97);
    }

    #[test]
    fn test_explicit_threshold_wins_over_env() {
        let policy = TolerancePolicyBuilder::new()
            .maybe_min_ssim(Some(0.999))
            .env(env_from(&[(ENV_SSIM_THRESHOLD, "0.97")]))
            .build()
            .unwrap();
        assert_eq!(policy.min_ssim, 0.999);
    }

    #[test]
    fn test_env_threshold_below_floor_rejected_in_ci() {
        let result = TolerancePolicyBuilder::new()
            .env(env_from(&[(ENV_SSIM_THRESHOLD, "0.90"), (ENV_CI, "true")]))
            .build();
        assert!(result.is_err());
    }
}
