//! Subtitle artifact as delivered by the renderer.
//!
//! Fields are kept as raw JSON values so that wrong types surface as contract
//! violations naming the cue instead of as parse errors.

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{CoreError, CoreResult, json_error};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubtitleArtifact {
    pub subtitle_contract_version: Value,
    pub format: Value,
    pub language: Value,
    pub items: Vec<SubtitleItem>,
}

/// One cue as written in the artifact.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubtitleItem {
    pub id: Value,
    pub start_sec: Value,
    pub end_sec: Value,
    pub text: Value,
}

impl SubtitleArtifact {
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.is_file() {
            return Err(CoreError::InputNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| json_error(format!("subtitle artifact {}", path.display()), e))
    }
}

/// String form of a scalar JSON value; `None` for null, arrays and objects.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_camel_case_items() {
        let artifact: SubtitleArtifact = serde_json::from_str(
            r#"{"subtitleContractVersion": "1", "format": "vtt", "language": "en",
                "items": [{"id": "c1", "startSec": 1.0, "endSec": 2.5, "text": "Hi"}]}"#,
        )
        .unwrap();
        assert_eq!(artifact.items.len(), 1);
        assert_eq!(artifact.items[0].start_sec.as_f64(), Some(1.0));
        assert_eq!(scalar_string(&artifact.format).as_deref(), Some("vtt"));
    }

    #[test]
    fn test_wrong_types_still_parse() {
        let artifact: SubtitleArtifact = serde_json::from_str(
            r#"{"subtitleContractVersion": 1, "items": [{"id": 7, "startSec": "soon"}]}"#,
        )
        .unwrap();
        assert_eq!(scalar_string(&artifact.subtitle_contract_version).as_deref(), Some("1"));
        assert_eq!(scalar_string(&artifact.items[0].id).as_deref(), Some("7"));
        assert!(artifact.items[0].start_sec.as_f64().is_none());
        assert!(artifact.items[0].text.is_null());
    }
}
