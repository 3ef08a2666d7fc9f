//! Structured error output.
//!
//! Every [`ReportError`] maps to a stable [`ErrorCode`], an exit code and an
//! optional hint. `main` prints the JSON form when stdout is not a terminal
//! so CI wrappers can parse failures.

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Input Errors (exit code 2) ===
    /// Unknown run id
    RunNotFound,
    /// Comparison of a run with itself
    SameRun,
    /// Fewer than two runs for a comparison
    NotEnoughRuns,

    // === Config Errors (exit code 7) ===
    /// Configuration error
    ConfigError,

    // === I/O Errors (exit code 8) ===
    /// Report could not be written
    WriteFailed,
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,
    /// YAML parsing error
    YamlError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RunNotFound => "RUN_NOT_FOUND",
            Self::SameRun => "SAME_RUN",
            Self::NotEnoughRuns => "NOT_ENOUGH_RUNS",
            Self::ConfigError => "CONFIG_ERROR",
            Self::WriteFailed => "WRITE_FAILED",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Get the exit code for this error category.
    ///
    /// - 1: internal
    /// - 2: input selection
    /// - 7: configuration
    /// - 8: I/O
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::RunNotFound | Self::SameRun | Self::NotEnoughRuns => 2,
            Self::ConfigError => 7,
            Self::WriteFailed | Self::IoError | Self::JsonError | Self::YamlError => 8,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `ReportError`.
    #[must_use]
    pub fn from_error(err: &ReportError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);
        let hint = Self::generate_hint(err);

        Self {
            code,
            message: err.to_string(),
            hint,
            context,
        }
    }

    /// Serialize to JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_code_and_context(err: &ReportError) -> (ErrorCode, Option<Value>) {
        match err {
            ReportError::RunNotFound { run_id, available } => (
                ErrorCode::RunNotFound,
                Some(json!({
                    "run_id": run_id,
                    "similar_ids": find_similar_ids(run_id, available, 3),
                    "available": available,
                })),
            ),
            ReportError::SameRun { run_id } => {
                (ErrorCode::SameRun, Some(json!({"run_id": run_id})))
            }
            ReportError::NotEnoughRuns { found } => {
                (ErrorCode::NotEnoughRuns, Some(json!({"found": found})))
            }
            ReportError::Config(_) => (ErrorCode::ConfigError, None),
            ReportError::WriteReport { path, .. } => (
                ErrorCode::WriteFailed,
                Some(json!({"path": path.display().to_string()})),
            ),
            ReportError::Io(_) => (ErrorCode::IoError, None),
            ReportError::Json(_) => (ErrorCode::JsonError, None),
            ReportError::Yaml(_) => (ErrorCode::YamlError, None),
            ReportError::Other(_) => (ErrorCode::InternalError, None),
        }
    }

    fn generate_hint(err: &ReportError) -> Option<String> {
        if let ReportError::RunNotFound { run_id, available } = err {
            let similar = find_similar_ids(run_id, available, 3);
            return match similar.len() {
                0 if available.is_empty() => None,
                0 => Some(format!("Available runs: {}", available.join(", "))),
                1 => Some(format!("Did you mean '{}'?", similar[0])),
                _ => Some(format!("Did you mean one of: {}?", similar.join(", "))),
            };
        }
        err.suggestion().map(str::to_string)
    }
}

/// Calculate the Levenshtein distance between two strings.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Find run ids similar to the searched id using Levenshtein distance.
///
/// Returns up to `max_suggestions` ids with distance <= 3.
#[must_use]
pub fn find_similar_ids(searched: &str, existing: &[String], max_suggestions: usize) -> Vec<String> {
    let mut candidates: Vec<(usize, &str)> = existing
        .iter()
        .map(|id| (levenshtein_distance(searched, id), id.as_str()))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    candidates
        .into_iter()
        .take(max_suggestions)
        .map(|(_, id)| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_code_exit_codes() {
        assert_eq!(ErrorCode::RunNotFound.exit_code(), 2);
        assert_eq!(ErrorCode::ConfigError.exit_code(), 7);
        assert_eq!(ErrorCode::WriteFailed.exit_code(), 8);
        assert_eq!(ErrorCode::InternalError.exit_code(), 1);
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("20240101", "20240101"), 0);
    }

    #[test]
    fn test_find_similar_ids() {
        let existing = vec![
            "20240101-1200".to_string(),
            "20240101-1300".to_string(),
            "20231201-0900".to_string(),
        ];
        let similar = find_similar_ids("20240101-1201", &existing, 3);
        assert_eq!(similar[0], "20240101-1200");
        assert!(!similar.contains(&"20231201-0900".to_string()));
    }

    #[test]
    fn test_run_not_found_hint() {
        let err = ReportError::RunNotFound {
            run_id: "run-7".to_string(),
            available: vec!["run-1".to_string(), "run-8".to_string()],
        };
        let structured = StructuredError::from_error(&err);
        assert_eq!(structured.code, ErrorCode::RunNotFound);
        assert_eq!(
            structured.hint.as_deref(),
            Some("Did you mean one of: run-1, run-8?")
        );
        let json = structured.to_json();
        assert_eq!(json["error"]["code"], "RUN_NOT_FOUND");
        assert_eq!(json["error"]["context"]["available"][1], "run-8");
    }

    #[test]
    fn test_write_failure_context() {
        let err = ReportError::WriteReport {
            path: PathBuf::from("/ro/report.html"),
            source: std::io::Error::other("read-only file system"),
        };
        let structured = StructuredError::from_error(&err);
        assert_eq!(structured.code, ErrorCode::WriteFailed);
        assert_eq!(structured.code.exit_code(), 8);
        assert_eq!(structured.context.unwrap()["path"], "/ro/report.html");
    }

    #[test]
    fn test_to_human_output() {
        let err = StructuredError {
            code: ErrorCode::SameRun,
            message: "Cannot compare run '3' with itself".to_string(),
            hint: Some("Pick two different runs with --base and --head".to_string()),
            context: None,
        };

        let plain = err.to_human(false);
        assert!(plain.contains("Error: Cannot compare run '3' with itself"));
        assert!(plain.contains("Hint: Pick two different runs"));

        let colored = err.to_human(true);
        assert!(colored.contains("\x1b[31m"));
        assert!(colored.contains("\x1b[33m"));
    }
}
