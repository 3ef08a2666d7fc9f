//! Error types and handling for `e2e_report`.
//!
//! Only the outer surface of the tool fails hard: configuration, run
//! selection for comparisons and writing the report. A missing results
//! root, broken run directories and unreadable artifacts never surface
//! here; the scanner logs them and reports fewer runs.

mod structured;

pub use structured::{ErrorCode, StructuredError, find_similar_ids};

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `e2e_report` operations.
#[derive(Error, Debug)]
pub enum ReportError {
    // === Input Errors ===
    /// A run id passed on the command line matches no scanned run.
    #[error("Run not found: {run_id}")]
    RunNotFound {
        run_id: String,
        available: Vec<String>,
    },

    /// Both sides of a comparison name the same run.
    #[error("Cannot compare run '{run_id}' with itself")]
    SameRun { run_id: String },

    /// A comparison needs at least two runs.
    #[error("Comparison needs at least 2 runs, found {found}")]
    NotEnoughRuns { found: usize },

    // === Configuration Errors ===
    /// Configuration value or file error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === Output Errors ===
    /// The report file could not be written.
    #[error("Failed to write report to '{path}': {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReportError {
    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::RunNotFound { .. }
                | Self::SameRun { .. }
                | Self::NotEnoughRuns { .. }
                | Self::Config(_)
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::SameRun { .. } => Some("Pick two different runs with --base and --head"),
            Self::NotEnoughRuns { .. } => Some("Collect at least one more test run"),
            Self::Config(_) => Some("Check .e2e-report.yaml and E2E_REPORT_* variables"),
            _ => None,
        }
    }

    /// Create a configuration error for a specific key.
    #[must_use]
    pub fn config(key: &str, reason: impl std::fmt::Display) -> Self {
        Self::Config(format!("{key}: {reason}"))
    }
}

/// Result type using `ReportError`.
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::RunNotFound {
            run_id: "20240101".to_string(),
            available: vec![],
        };
        assert_eq!(err.to_string(), "Run not found: 20240101");

        let err = ReportError::SameRun {
            run_id: "7".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot compare run '7' with itself");
    }

    #[test]
    fn test_config_error() {
        let err = ReportError::config("resource-max-bytes", "expected a number, got 'lots'");
        assert_eq!(
            err.to_string(),
            "Configuration error: resource-max-bytes: expected a number, got 'lots'"
        );
        assert!(err.is_user_recoverable());
    }

    #[test]
    fn test_suggestion() {
        let err = ReportError::NotEnoughRuns { found: 1 };
        assert_eq!(err.suggestion(), Some("Collect at least one more test run"));

        let err = ReportError::Io(std::io::Error::other("boom"));
        assert_eq!(err.suggestion(), None);
        assert!(!err.is_user_recoverable());
    }
}
