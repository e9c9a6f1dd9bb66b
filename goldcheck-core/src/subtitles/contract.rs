//! Versioned subtitle contract.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{CoreError, CoreResult, json_error};

/// Contract version this build understands by default.
pub const DEFAULT_CONTRACT_VERSION: &str = "1";

/// Rules a subtitle artifact must satisfy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubtitleContract {
    pub subtitle_contract_version: String,
    pub formats: Vec<String>,
    /// Cue boundaries must be multiples of this, in seconds.
    pub grid_interval_sec: f64,
    pub epsilon: f64,
    pub max_lines: usize,
    /// Characters, not bytes.
    pub max_line_length: usize,
    pub max_cps: f64,
    pub language_code_min_length: usize,
    pub language_code_max_length: usize,
    /// Text at least this long must read as a sentence.
    pub sentence_rule_min_chars: usize,
}

impl Default for SubtitleContract {
    fn default() -> Self {
        Self {
            subtitle_contract_version: DEFAULT_CONTRACT_VERSION.to_string(),
            formats: vec!["srt".to_string(), "vtt".to_string(), "ttml".to_string()],
            grid_interval_sec: 1.0 / 12.0,
            epsilon: 0.001,
            max_lines: 2,
            max_line_length: 42,
            max_cps: 17.0,
            language_code_min_length: 2,
            language_code_max_length: 5,
            sentence_rule_min_chars: 20,
        }
    }
}

impl SubtitleContract {
    /// Loads a contract file; fields left out keep their defaults.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.is_file() {
            return Err(CoreError::InputNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let contract: Self = serde_json::from_str(&text)
            .map_err(|e| json_error(format!("subtitle contract {}", path.display()), e))?;
        contract.validate()?;
        log::debug!("Loaded subtitle contract v{} from {}", contract.subtitle_contract_version, path.display());
        Ok(contract)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !(self.grid_interval_sec.is_finite() && self.grid_interval_sec > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "gridIntervalSec must be positive, got {}",
                self.grid_interval_sec
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "epsilon must be non-negative, got {}",
                self.epsilon
            )));
        }
        if !(self.max_cps.is_finite() && self.max_cps > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "maxCps must be positive, got {}",
                self.max_cps
            )));
        }
        if self.language_code_min_length > self.language_code_max_length {
            return Err(CoreError::InvalidConfig(
                "languageCodeMinLength exceeds languageCodeMaxLength".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_contract_keeps_defaults() {
        let contract: SubtitleContract =
            serde_json::from_str(r#"{"subtitleContractVersion": "1", "maxLineLength": 37}"#).unwrap();
        assert_eq!(contract.max_line_length, 37);
        assert_eq!(contract.max_lines, 2);
        assert_eq!(contract.formats, vec!["srt", "vtt", "ttml"]);
        assert!((contract.grid_interval_sec - 1.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_load_rejects_bad_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.json");
        fs::write(&path, r#"{"gridIntervalSec": 0}"#).unwrap();
        assert!(matches!(
            SubtitleContract::load(&path),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            SubtitleContract::load(Path::new("/no/contract.json")),
            Err(CoreError::InputNotFound(_))
        ));
    }
}
