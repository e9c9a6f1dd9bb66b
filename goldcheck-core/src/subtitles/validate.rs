//! Contract checks over a subtitle artifact.
//!
//! Global checks run first (version, format, language, cue list, unique ids),
//! then each cue in order: numeric timing, grid alignment, overlap with the
//! previous cue, text normalization, bracketed-cue casing, line limits, and
//! finally reading speed and sentence shape.
//!
//! Under [`FailurePolicy::FailFast`] the first violation is returned as a
//! [`CoreError::ContractViolation`]. Under [`FailurePolicy::AccumulateAll`]
//! every violation is collected and returned.

use std::collections::HashSet;
use std::fmt;

use super::artifact::{SubtitleArtifact, SubtitleItem, scalar_string};
use super::contract::SubtitleContract;
use super::normalize::{
    bracketed_inner, ends_with_terminal, normalize_text, starts_capitalized, visible_chars,
};
use crate::config::FailurePolicy;
use crate::error::{CoreError, CoreResult, contract_violation};

/// A single contract breach.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Cue id, or `None` for artifact-level problems.
    pub cue: Option<String>,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cue {
            Some(cue) => write!(f, "cue '{cue}': {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl From<Violation> for CoreError {
    fn from(v: Violation) -> Self {
        contract_violation(v.cue.as_deref(), v.message)
    }
}

struct ViolationSink {
    policy: FailurePolicy,
    violations: Vec<Violation>,
}

impl ViolationSink {
    fn report(&mut self, cue: Option<&str>, message: impl Into<String>) -> CoreResult<()> {
        let violation = Violation {
            cue: cue.map(str::to_string),
            message: message.into(),
        };
        log::debug!("Contract violation: {violation}");
        match self.policy {
            FailurePolicy::FailFast => Err(violation.into()),
            FailurePolicy::AccumulateAll => {
                self.violations.push(violation);
                Ok(())
            }
        }
    }
}

/// Validates `artifact` against `contract`.
///
/// Returns the collected violations; always empty under fail-fast, where the
/// first violation is the error instead.
pub fn validate_artifact(
    artifact: &SubtitleArtifact,
    contract: &SubtitleContract,
    policy: FailurePolicy,
) -> CoreResult<Vec<Violation>> {
    let mut sink = ViolationSink {
        policy,
        violations: Vec::new(),
    };

    let labels = check_artifact(artifact, contract, &mut sink)?;

    let mut prev_end: Option<f64> = None;
    for (item, label) in artifact.items.iter().zip(&labels) {
        if let Some(end) = check_cue(item, label, prev_end, contract, &mut sink)? {
            prev_end = Some(end);
        }
    }

    Ok(sink.violations)
}

/// Artifact-level checks. Returns a label per cue for messages.
fn check_artifact(
    artifact: &SubtitleArtifact,
    contract: &SubtitleContract,
    sink: &mut ViolationSink,
) -> CoreResult<Vec<String>> {
    let version = scalar_string(&artifact.subtitle_contract_version);
    if version.as_deref() != Some(contract.subtitle_contract_version.as_str()) {
        sink.report(
            None,
            format!(
                "subtitleContractVersion mismatch: expected={} got={}",
                contract.subtitle_contract_version,
                version.as_deref().unwrap_or("<none>")
            ),
        )?;
    }

    let format = artifact.format.as_str().unwrap_or("");
    if !contract.formats.iter().any(|f| f == format) {
        sink.report(
            None,
            format!(
                "unsupported format '{format}' (expected one of: {})",
                contract.formats.join(", ")
            ),
        )?;
    }

    let language = artifact.language.as_str().unwrap_or("");
    let language_len = language.chars().count();
    if language_len < contract.language_code_min_length
        || language_len > contract.language_code_max_length
    {
        sink.report(
            None,
            format!(
                "language code '{language}' must be {}-{} characters",
                contract.language_code_min_length, contract.language_code_max_length
            ),
        )?;
    }

    if artifact.items.is_empty() {
        sink.report(None, "items must not be empty")?;
    }

    let mut seen = HashSet::new();
    let mut labels = Vec::with_capacity(artifact.items.len());
    for (index, item) in artifact.items.iter().enumerate() {
        match scalar_string(&item.id).filter(|id| !id.trim().is_empty()) {
            Some(id) => {
                if !seen.insert(id.clone()) {
                    sink.report(Some(&id), format!("duplicate cue id '{id}'"))?;
                }
                labels.push(id);
            }
            None => {
                let label = format!("#{index}");
                sink.report(Some(&label), "cue has no id")?;
                labels.push(label);
            }
        }
    }
    Ok(labels)
}

/// Checks one cue. Returns its end time when the timing was usable, so the
/// next cue can be checked for overlap.
fn check_cue(
    item: &SubtitleItem,
    label: &str,
    prev_end: Option<f64>,
    contract: &SubtitleContract,
    sink: &mut ViolationSink,
) -> CoreResult<Option<f64>> {
    let cue = Some(label);
    let grid = contract.grid_interval_sec;
    let eps = contract.epsilon;

    // 1. timing values
    let (Some(start), Some(end)) = (finite(&item.start_sec), finite(&item.end_sec)) else {
        sink.report(
            cue,
            format!(
                "startSec/endSec must be numbers (got startSec={}, endSec={})",
                item.start_sec, item.end_sec
            ),
        )?;
        return Ok(None);
    };
    if start < 0.0 {
        sink.report(cue, format!("startSec {start} is negative"))?;
    }
    if end <= start {
        sink.report(cue, format!("endSec {end} must be greater than startSec {start}"))?;
    }

    // 2. grid
    for (field, value) in [("startSec", start), ("endSec", end)] {
        if !on_grid(value, grid, eps) {
            sink.report(
                cue,
                format!("{field} {value} is not aligned to the {grid:.6}s grid interval"),
            )?;
        }
    }

    // 3. overlap
    if let Some(prev_end) = prev_end {
        let earliest = prev_end + grid;
        if start < earliest - eps {
            sink.report(
                cue,
                format!(
                    "startSec {start} overlaps previous cue: must be at least {earliest:.6} (previous end {prev_end} + grid interval {grid:.6})"
                ),
            )?;
        }
    }

    // 4. text
    let Some(raw) = item.text.as_str() else {
        sink.report(cue, "text must be a string")?;
        return Ok(Some(end));
    };
    let text = normalize_text(raw);
    if text.is_empty() {
        sink.report(cue, "text is empty after normalization")?;
        return Ok(Some(end));
    }

    // 5. bracketed cues
    if let Some(inner) = bracketed_inner(&text) {
        if inner.contains(['[', ']']) {
            sink.report(cue, format!("nested brackets in '{text}'"))?;
        }
        if inner != inner.to_uppercase() {
            sink.report(cue, format!("bracketed cue must be upper case: '{text}'"))?;
        }
        return Ok(Some(end));
    }

    // 6. layout
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() > contract.max_lines {
        sink.report(
            cue,
            format!("{} lines exceeds max {} lines", lines.len(), contract.max_lines),
        )?;
    }
    for (n, line) in lines.iter().enumerate() {
        let length = line.chars().count();
        if length > contract.max_line_length {
            sink.report(
                cue,
                format!(
                    "line {} has {length} characters, exceeds max line length {}",
                    n + 1,
                    contract.max_line_length
                ),
            )?;
        }
    }

    // 7. reading speed and sentence shape
    let duration = end - start;
    if duration > 0.0 {
        let cps = visible_chars(&text) as f64 / duration;
        if cps > contract.max_cps {
            sink.report(
                cue,
                format!("{cps:.2} characters per second exceeds max {}", contract.max_cps),
            )?;
        }
    }
    if text.chars().count() >= contract.sentence_rule_min_chars {
        if !starts_capitalized(&text) {
            sink.report(cue, "text must start with an upper-case letter")?;
        }
        if !ends_with_terminal(&text) {
            sink.report(cue, "text must end with terminal punctuation (. ! ? …)")?;
        }
    }

    Ok(Some(end))
}

fn finite(value: &serde_json::Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

/// `value` is a multiple of `grid` within `eps`.
pub fn on_grid(value: f64, grid: f64, eps: f64) -> bool {
    let nearest = (value / grid).round() * grid;
    (value - nearest).abs() <= eps
}
