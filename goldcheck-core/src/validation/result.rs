use serde::Serialize;
use std::fmt::{self, Display};

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
    /// Not applicable to this run (e.g. no audio on either side).
    Skipped,
}

impl Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Passed => write!(f, "PASSED"),
            CheckStatus::Failed => write!(f, "FAILED"),
            CheckStatus::Skipped => write!(f, "SKIPPED"),
        }
    }
}

/// One named check with its verdict. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: Option<String>,
    /// Always finite when present.
    pub measurement: Option<f64>,
}

impl ComparisonResult {
    fn new(name: impl Into<String>, status: CheckStatus, message: Option<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message,
            measurement: None,
        }
    }

    /// Create a passing result
    pub fn passed(name: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Passed, None)
    }

    /// Create a failing result
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Failed, Some(message.into()))
    }

    /// Create a skipped result
    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Skipped, Some(reason.into()))
    }

    /// Attach a measurement. Non-finite values are dropped.
    pub fn with_measurement(mut self, value: f64) -> Self {
        self.measurement = value.is_finite().then_some(value);
        self
    }

    pub fn is_failure(&self) -> bool {
        self.status == CheckStatus::Failed
    }

    /// Logs the result at a level matching its status.
    pub(crate) fn log(&self) {
        match (self.status, &self.message) {
            (CheckStatus::Failed, Some(msg)) => log::error!("[{}] {}: {}", self.status, self.name, msg),
            (CheckStatus::Skipped, Some(msg)) => log::info!("[{}] {}: {}", self.status, self.name, msg),
            _ => log::info!("[{}] {}", self.status, self.name),
        }
    }
}

impl Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.name)?;
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}
