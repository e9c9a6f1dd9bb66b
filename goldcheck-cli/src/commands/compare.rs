// goldcheck-cli/src/commands/compare.rs
//
// Implements `goldcheck compare`: resolves platform, policy and baseline from
// flags and environment, runs the media pipeline with the ffmpeg-backed
// analyzer, and writes the JUnit report.

use goldcheck_core::config::{EnvOverrides, HarnessPaths, TolerancePolicyBuilder, parse_timestamps};
use goldcheck_core::external::{FfmpegAnalyzer, check_dependency};
use goldcheck_core::validation::{MediaCheckRequest, run_media_check};
use goldcheck_core::{
    CoreError, CoreResult, HarnessExit, Platform, locate_baseline, resolve_platform, write_junit,
};
use log::info;

use crate::cli::CompareArgs;

/// Runs the media comparison described by `args`.
pub fn run_compare(args: CompareArgs) -> CoreResult<HarnessExit> {
    run_compare_with_env(args, EnvOverrides::from_env())
}

/// Platform for this run: `--platform`, then `GOLDCHECK_PLATFORM`, then the
/// CI runner hint, then the native OS.
pub fn run_platform(flag: Option<&str>, env: &EnvOverrides) -> Platform {
    resolve_platform(
        flag.or(env.platform.as_deref()),
        env.runner_os.as_deref(),
        Platform::native_os(),
    )
}

pub fn run_compare_with_env(args: CompareArgs, env: EnvOverrides) -> CoreResult<HarnessExit> {
    let platform = run_platform(args.platform.as_deref(), &env);
    info!("Resolved platform: {platform}");

    let policy = TolerancePolicyBuilder::new()
        .maybe_min_ssim(args.ssim_threshold)
        .lufs_tolerance(args.lufs_tolerance)
        .true_peak_tolerance(args.peak_tolerance)
        .sample_timestamps(parse_timestamps(&args.timestamps)?)
        .env(env.clone())
        .build()?;

    let per_os = args.per_os_flag().or(env.per_os());
    let paths = HarnessPaths {
        golden_root: args.golden_root,
        debug_dir: args.debug_dir,
        regen_command: args.regen_command,
    };

    // Input and baseline problems are reported before tool availability.
    if !args.candidate.is_file() {
        return Err(CoreError::InputNotFound(args.candidate));
    }
    locate_baseline(&paths, &args.game, platform, per_os)?;
    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;

    let report = run_media_check(
        &FfmpegAnalyzer::new(),
        &MediaCheckRequest {
            candidate: &args.candidate,
            game: &args.game,
            platform,
            per_os,
            paths: &paths,
            policy: &policy,
        },
    )?;

    write_junit(&report, &args.report)?;
    report.log_summary();
    Ok(report.exit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> EnvOverrides {
        EnvOverrides::from_lookup(|key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    #[test]
    fn test_platform_flag_beats_environment() {
        let env = overrides(&[("GOLDCHECK_PLATFORM", "windows"), ("RUNNER_OS", "macOS")]);
        assert_eq!(run_platform(Some("linux"), &env), Platform::Linux);
    }

    #[test]
    fn test_platform_env_beats_runner_hint() {
        let env = overrides(&[("GOLDCHECK_PLATFORM", "windows"), ("RUNNER_OS", "macOS")]);
        assert_eq!(run_platform(None, &env), Platform::Windows);

        let hint_only = overrides(&[("RUNNER_OS", "macOS")]);
        assert_eq!(run_platform(None, &hint_only), Platform::MacOs);
    }
}
