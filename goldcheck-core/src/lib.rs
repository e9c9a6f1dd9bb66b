//! Core library for golden-baseline regression checks of rendered media.
//!
//! This crate resolves the baseline for a game and platform, compares a
//! candidate render against it (container metadata, SSIM on sampled frames,
//! EBU R128 loudness), validates subtitle artifacts against a versioned
//! contract, and writes the verdicts as a JUnit report.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use goldcheck_core::config::{EnvOverrides, HarnessPaths, TolerancePolicyBuilder};
//! use goldcheck_core::external::FfmpegAnalyzer;
//! use goldcheck_core::platform::{Platform, resolve_platform};
//! use goldcheck_core::validation::{MediaCheckRequest, run_media_check};
//! use std::path::Path;
//!
//! let env = EnvOverrides::from_env();
//! let platform = resolve_platform(
//!     env.platform.as_deref(),
//!     env.runner_os.as_deref(),
//!     std::env::consts::OS,
//! );
//! let policy = TolerancePolicyBuilder::new().env(env.clone()).build().unwrap();
//! let paths = HarnessPaths::default();
//!
//! let report = run_media_check(
//!     &FfmpegAnalyzer::new(),
//!     &MediaCheckRequest {
//!         candidate: Path::new("target/render/snake.mp4"),
//!         game: "snake",
//!         platform,
//!         per_os: env.per_os(),
//!         paths: &paths,
//!         policy: &policy,
//!     },
//! )
//! .unwrap();
//! goldcheck_core::reporting::write_junit(&report, Path::new("target/golden-report.xml")).unwrap();
//! std::process::exit(report.exit().code());
//! ```

pub mod baseline;
pub mod config;
pub mod error;
pub mod external;
pub mod logging;
pub mod media;
pub mod platform;
pub mod reporting;
pub mod subtitles;
pub mod temp_files;
pub mod validation;

// Re-exports for public API
pub use baseline::{Baseline, locate_baseline};
pub use config::{FailurePolicy, HarnessPaths, TolerancePolicy, TolerancePolicyBuilder};
pub use error::{CoreError, CoreResult};
pub use external::{FfmpegAnalyzer, MediaAnalyzer, check_dependency};
pub use platform::{Platform, resolve_platform};
pub use reporting::{HarnessExit, SuiteReport, write_junit};
pub use subtitles::run_subtitle_check;
pub use validation::{CheckStatus, ComparisonResult, MediaCheckRequest, run_media_check};
