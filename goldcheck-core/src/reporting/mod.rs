//! Result aggregation, exit codes and report output.

use chrono::{DateTime, Local};
use log::{error, info};
use std::fmt;

use crate::validation::{CheckStatus, ComparisonResult};

pub mod junit;

pub use junit::{render_junit, write_junit};

/// Process exit codes of the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessExit {
    Success,
    /// Missing candidate, baseline, frame set, tool or invalid configuration.
    MissingInput,
    ChecksFailed,
    InternalError,
}

impl HarnessExit {
    pub fn code(self) -> i32 {
        match self {
            HarnessExit::Success => 0,
            HarnessExit::MissingInput => 1,
            HarnessExit::ChecksFailed => 2,
            HarnessExit::InternalError => 3,
        }
    }
}

impl fmt::Display for HarnessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HarnessExit::Success => "success",
            HarnessExit::MissingInput => "missing input",
            HarnessExit::ChecksFailed => "checks failed",
            HarnessExit::InternalError => "internal error",
        };
        write!(f, "{label} ({})", self.code())
    }
}

/// All results of one run, in execution order.
#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub name: String,
    pub timestamp: DateTime<Local>,
    pub cases: Vec<ComparisonResult>,
}

impl SuiteReport {
    pub fn new(name: impl Into<String>, cases: Vec<ComparisonResult>) -> Self {
        Self {
            name: name.into(),
            timestamp: Local::now(),
            cases,
        }
    }

    pub fn tests(&self) -> usize {
        self.cases.len()
    }

    pub fn failures(&self) -> usize {
        self.count(CheckStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(CheckStatus::Skipped)
    }

    pub fn passed(&self) -> usize {
        self.count(CheckStatus::Passed)
    }

    fn count(&self, status: CheckStatus) -> usize {
        self.cases.iter().filter(|c| c.status == status).count()
    }

    /// `Success` with zero failures, `ChecksFailed` otherwise.
    pub fn exit(&self) -> HarnessExit {
        if self.failures() == 0 {
            HarnessExit::Success
        } else {
            HarnessExit::ChecksFailed
        }
    }

    /// Logs the passed/failed/skipped tally and every failure.
    pub fn log_summary(&self) {
        crate::logging::log_section("SUMMARY");
        info!(
            "{}: {} passed, {} failed, {} skipped ({} total)",
            self.name,
            self.passed(),
            self.failures(),
            self.skipped(),
            self.tests()
        );
        for case in self.cases.iter().filter(|c| c.is_failure()) {
            error!("  {case}");
        }
        if self.failures() == 0 {
            info!("Overall: PASS");
        } else {
            error!("Overall: FAIL");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(HarnessExit::Success.code(), 0);
        assert_eq!(HarnessExit::MissingInput.code(), 1);
        assert_eq!(HarnessExit::ChecksFailed.code(), 2);
        assert_eq!(HarnessExit::InternalError.code(), 3);
    }

    #[test]
    fn test_counts_and_exit() {
        let report = SuiteReport::new(
            "golden.snake.linux",
            vec![
                ComparisonResult::passed("container_pix_fmt"),
                ComparisonResult::skipped("audio_lufs", "no audio"),
            ],
        );
        assert_eq!(report.tests(), 2);
        assert_eq!(report.failures(), 0);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.exit(), HarnessExit::Success);

        let mut failing = report.clone();
        failing
            .cases
            .push(ComparisonResult::failed("frame_5s", "ssim 0.9 below threshold 0.995"));
        assert_eq!(failing.exit(), HarnessExit::ChecksFailed);
    }
}
