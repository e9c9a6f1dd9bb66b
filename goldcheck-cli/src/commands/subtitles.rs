// goldcheck-cli/src/commands/subtitles.rs
//
// Implements `goldcheck subtitles`: validates one artifact against a contract
// and writes the JUnit report.

use goldcheck_core::config::FailurePolicy;
use goldcheck_core::{CoreResult, HarnessExit, run_subtitle_check, write_junit};

use crate::cli::SubtitlesArgs;

pub fn run_subtitles(args: SubtitlesArgs) -> CoreResult<HarnessExit> {
    let policy = if args.all_violations {
        FailurePolicy::AccumulateAll
    } else {
        FailurePolicy::FailFast
    };

    let report = run_subtitle_check(&args.input, args.contract.as_deref(), policy)?;
    write_junit(&report, &args.report)?;
    report.log_summary();
    Ok(report.exit())
}
