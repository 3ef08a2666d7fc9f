//! Core data types for `e2e_report`.
//!
//! - `TestState` - outcome of one test execution
//! - `TestResult` - one test case within one run
//! - `TestRun` - one execution of the whole suite
//! - `ArtifactMetadata` - per-test artifacts collected by the e2e framework
//!
//! Everything here is built once by the scanner and read-only afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Outcome of a single test execution.
///
/// Anything other than `passed` or `failed` (skipped, pending, panicked,
/// interrupted, ...) is kept verbatim and counted as "other".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TestState {
    Passed,
    Failed,
    Other(String),
    #[default]
    Unknown,
}

impl TestState {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Other(value) => value,
            Self::Unknown => "unknown",
        }
    }

    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl From<&str> for TestState {
    fn from(value: &str) -> Self {
        match value {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "" | "unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TestState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TestState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// One test case execution within one run.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Canonical name: hierarchy and leaf joined by spaces.
    pub full_name: String,
    pub leaf_text: String,
    pub state: TestState,
    /// Seconds.
    pub runtime: f64,
    pub failure_message: String,
    pub labels: Vec<String>,
    pub container_hierarchy: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub artifact_metadata: Option<ArtifactMetadata>,
}

/// One execution of the full suite.
#[derive(Debug, Clone, Serialize)]
pub struct TestRun {
    pub run_id: String,
    pub start_time: String,
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    pub environment: BTreeMap<String, Value>,
    /// Sum of test runtimes in seconds.
    pub total_runtime: f64,
    pub git_commit: String,
    pub git_branch: String,
    pub git_dirty: String,
    pub description: String,
    pub test_output_log: String,
    pub tests: Vec<TestResult>,
}

impl TestRun {
    /// Parsed start time, if it is a valid RFC 3339 timestamp.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        crate::util::time::parse_timestamp(&self.start_time)
    }

    /// Key used to order runs chronologically.
    ///
    /// Runs with an unparseable start time sort before all others and fall
    /// back to comparing the raw string.
    #[must_use]
    pub fn sort_key(&self) -> (Option<DateTime<Utc>>, &str) {
        (self.started_at(), self.start_time.as_str())
    }

    /// Short `YYYY-MM-DD HH:MM` form of the start time.
    #[must_use]
    pub fn date_str(&self) -> String {
        crate::util::time::short_date(&self.start_time)
    }

    /// Pass rate in percent using the run's reported totals.
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.total_tests == 0 {
            0.0
        } else {
            self.passed_tests as f64 / self.total_tests as f64 * 100.0
        }
    }
}

/// Files collected for one test by the e2e framework.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactInventory {
    #[serde(default)]
    pub pod_count: u64,
    #[serde(default)]
    pub log_files: Vec<String>,
    #[serde(default)]
    pub resource_files: Vec<String>,
    #[serde(default)]
    pub event_files: Vec<String>,
    #[serde(default)]
    pub total_size_bytes: u64,
    #[serde(default)]
    pub collection_time: String,
}

/// Kind of an embedded artifact file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Log,
    Resource,
    Events,
    Error,
}

/// Content of one artifact file as embedded in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_lines: Option<usize>,
}

impl FileContent {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            kind: FileKind::Error,
            truncated: None,
            total_lines: None,
        }
    }
}

/// Per-test artifact metadata (`<artifact dir>/metadata.json`).
///
/// Known fields are typed; anything else the collector wrote is preserved
/// in `extra` so the report can show it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtifactMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub failure_message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    #[serde(default)]
    pub artifacts: ArtifactInventory,
    /// Artifact directory relative to the results root.
    #[serde(default)]
    pub relative_path: String,
    #[serde(default)]
    pub file_contents: BTreeMap<String, FileContent>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
