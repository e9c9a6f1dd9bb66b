//! Subtitle contract validation
//!
//! A separate entry point from the media pipeline: it reads only the subtitle
//! artifact and a contract, runs no external process, and fails fast by
//! default because a formatting breach is a binary correctness failure.

pub mod artifact;
pub mod contract;
pub mod normalize;
pub mod validate;

pub use artifact::{SubtitleArtifact, SubtitleItem};
pub use contract::SubtitleContract;
pub use validate::{Violation, validate_artifact};

use std::path::Path;

use crate::config::FailurePolicy;
use crate::error::{CoreError, CoreResult};
use crate::logging;
use crate::reporting::SuiteReport;
use crate::validation::ComparisonResult;

pub const SUITE_NAME: &str = "subtitle_contract";
pub const CASE_NAME: &str = "subtitle_contract";

/// Loads and validates a subtitle artifact, producing a suite report.
///
/// Uses the built-in contract when `contract_path` is `None`. Violations
/// become failing cases; a clean artifact yields one passing case. Load
/// problems are errors.
pub fn run_subtitle_check(
    input: &Path,
    contract_path: Option<&Path>,
    policy: FailurePolicy,
) -> CoreResult<SuiteReport> {
    logging::log_section("SUBTITLE CONTRACT CHECK");
    log::info!("Artifact: {}", input.display());

    let contract = match contract_path {
        Some(path) => SubtitleContract::load(path)?,
        None => {
            log::debug!("Using built-in subtitle contract");
            SubtitleContract::default()
        }
    };
    let artifact = SubtitleArtifact::load(input)?;
    log::info!(
        "Validating {} cue(s) against contract v{}",
        artifact.items.len(),
        contract.subtitle_contract_version
    );

    let cases = match validate_artifact(&artifact, &contract, policy) {
        Ok(violations) if violations.is_empty() => vec![ComparisonResult::passed(CASE_NAME)],
        Ok(violations) => violations
            .iter()
            .map(|v| ComparisonResult::failed(CASE_NAME, v.to_string()))
            .collect(),
        Err(CoreError::ContractViolation { cue, message }) => {
            let violation = Violation { cue, message };
            vec![ComparisonResult::failed(CASE_NAME, violation.to_string())]
        }
        Err(e) => return Err(e),
    };
    for case in &cases {
        case.log();
    }

    Ok(SuiteReport::new(SUITE_NAME, cases))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_missing_artifact_is_input_error() {
        let err = run_subtitle_check(Path::new("/no/subs.json"), None, FailurePolicy::FailFast)
            .unwrap_err();
        assert!(matches!(err, CoreError::InputNotFound(_)));
    }

    #[test]
    fn test_custom_contract_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            dir.path(),
            "subs.json",
            r#"{"subtitleContractVersion": "1", "format": "srt", "language": "fr",
                "items": [{"id": "a", "startSec": 1.0, "endSec": 2.0, "text": "Bonjour."}]}"#,
        );
        let strict = write(dir.path(), "contract.json", r#"{"maxLineLength": 5}"#);

        let report = run_subtitle_check(&input, None, FailurePolicy::FailFast).unwrap();
        assert_eq!(report.failures(), 0);

        let report = run_subtitle_check(&input, Some(&strict), FailurePolicy::FailFast).unwrap();
        assert_eq!(report.failures(), 1);
        let message = report.cases[0].message.as_deref().unwrap();
        assert!(message.contains("cue 'a'"));
        assert!(message.contains("max line length 5"));
    }
}
