// ============================================================================
// goldcheck-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error types for the goldcheck core library
//
// Every fallible operation in the library returns `CoreResult<T>`. Per-check
// regressions are NOT errors: they are recorded as failing comparison results
// and accumulated. `CoreError` is reserved for conditions that stop a run
// (missing inputs, missing baselines, tool failures, contract breaches).

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

use crate::reporting::HarnessExit;

/// Errors raised by the goldcheck core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Baseline directory missing: {path}. {hint}")]
    BaselineMissing { path: PathBuf, hint: String },

    #[error("Golden frame set is empty: {path} contains no images. {hint}")]
    GoldenFramesMissing { path: PathBuf, hint: String },

    #[error("Required tool '{0}' was not found in PATH")]
    DependencyNotFound(String),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("{context} failed: {output}")]
    ProbeFailure { context: String, output: String },

    #[error("Subtitle contract violation{}: {message}", cue_label(.cue))]
    ContractViolation { cue: Option<String>, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Report write failed: {0}")]
    Report(String),
}

fn cue_label(cue: &Option<String>) -> String {
    match cue {
        Some(id) => format!(" (cue {id})"),
        None => String::new(),
    }
}

/// Result alias used throughout the library.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Maps the error to the process exit code the CLI reports.
    ///
    /// Configuration and baseline problems exit with 1 so automation can tell
    /// them apart from genuine regressions (2) and harness crashes (3).
    #[must_use]
    pub fn exit_code(&self) -> HarnessExit {
        match self {
            CoreError::InputNotFound(_)
            | CoreError::BaselineMissing { .. }
            | CoreError::GoldenFramesMissing { .. }
            | CoreError::DependencyNotFound(_)
            | CoreError::InvalidConfig(_) => HarnessExit::MissingInput,
            CoreError::ContractViolation { .. } => HarnessExit::ChecksFailed,
            _ => HarnessExit::InternalError,
        }
    }
}

// ---- Helper constructors ----

pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    if err.kind() == io::ErrorKind::NotFound {
        return CoreError::DependencyNotFound(cmd.into());
    }
    CoreError::CommandStart(cmd.into(), err)
}

pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    output: impl Into<String>,
) -> CoreError {
    let output = output.into();
    CoreError::ProbeFailure {
        context: format!("{} (exit status {})", cmd.into(), status),
        output: if output.trim().is_empty() {
            "<no output captured>".to_string()
        } else {
            output
        },
    }
}

pub fn probe_failure(context: impl Into<String>, output: impl Into<String>) -> CoreError {
    CoreError::ProbeFailure {
        context: context.into(),
        output: output.into(),
    }
}

pub fn json_error(context: impl Into<String>, source: serde_json::Error) -> CoreError {
    CoreError::JsonParse {
        context: context.into(),
        source,
    }
}

pub fn contract_violation(cue: Option<&str>, message: impl Into<String>) -> CoreError {
    CoreError::ContractViolation {
        cue: cue.map(str::to_string),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_classification() {
        let missing = CoreError::BaselineMissing {
            path: PathBuf::from("tests/golden/demo/linux"),
            hint: "regenerate".to_string(),
        };
        assert_eq!(missing.exit_code(), HarnessExit::MissingInput);

        let empty = CoreError::GoldenFramesMissing {
            path: PathBuf::from("tests/golden/demo/frames"),
            hint: "regenerate".to_string(),
        };
        assert_eq!(empty.exit_code(), HarnessExit::MissingInput);

        let violation = contract_violation(Some("3"), "overlap");
        assert_eq!(violation.exit_code(), HarnessExit::ChecksFailed);

        let probe = probe_failure("ffmpeg frame extraction", "boom");
        assert_eq!(probe.exit_code(), HarnessExit::InternalError);
    }

    #[test]
    fn test_contract_violation_message_names_cue() {
        let err = contract_violation(Some("intro-1"), "end must be greater than start");
        let msg = err.to_string();
        assert!(msg.contains("cue intro-1"));
        assert!(msg.contains("end must be greater than start"));

        let global = contract_violation(None, "items must not be empty");
        assert_eq!(
            global.to_string(),
            "Subtitle contract violation: items must not be empty"
        );
    }

    #[test]
    fn test_missing_tool_maps_to_dependency_error() {
        let err = command_start_error("ffprobe", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, CoreError::DependencyNotFound(ref name) if name == "ffprobe"));
    }
}
