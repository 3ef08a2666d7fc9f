//! On-disk input formats.
//!
//! `RunMetadata` mirrors the run-level `artifacts/metadata.json` written by
//! the e2e framework; `SuiteReport`/`SpecReport` mirror the Ginkgo JSON
//! report (`reports/report.json`). Only the fields the report uses are
//! modelled, with defaults for everything optional.

use crate::model::{TestState, null_as_default};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Run-level metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunMetadata {
    /// Written as a string by the collector, but older runs used numbers.
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub run_id: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub total_tests: Option<usize>,
    #[serde(default)]
    pub passed_tests: Option<usize>,
    #[serde(default)]
    pub failed_tests: Option<usize>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub environment: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub git_commit: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub git_branch: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub git_dirty: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// One suite entry of the report array. Only the first one is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuiteReport {
    #[serde(rename = "SpecReports", default, deserialize_with = "null_as_default")]
    pub spec_reports: Vec<SpecReport>,
}

/// Failure details nested in a spec record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecFailure {
    #[serde(rename = "Message", default)]
    pub message: String,
}

/// One spec (test case) record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecReport {
    #[serde(rename = "LeafNodeText", default)]
    pub leaf_node_text: String,
    #[serde(
        rename = "ContainerHierarchyTexts",
        default,
        deserialize_with = "null_as_default"
    )]
    pub container_hierarchy_texts: Vec<String>,
    #[serde(
        rename = "ContainerHierarchyLabels",
        default,
        deserialize_with = "null_as_default"
    )]
    pub container_hierarchy_labels: Vec<Option<Vec<String>>>,
    #[serde(rename = "LeafNodeLabels", default, deserialize_with = "null_as_default")]
    pub leaf_node_labels: Vec<String>,
    #[serde(rename = "State", default)]
    pub state: TestState,
    /// Nanoseconds.
    #[serde(rename = "RunTime", default)]
    pub run_time: f64,
    #[serde(rename = "FailureMessage", default)]
    pub failure_message: Option<String>,
    #[serde(rename = "Failure", default)]
    pub failure: Option<SpecFailure>,
    #[serde(rename = "StartTime", default)]
    pub start_time: Option<String>,
    #[serde(rename = "EndTime", default)]
    pub end_time: Option<String>,
}

impl SpecReport {
    /// Canonical test name: hierarchy and leaf joined by single spaces.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.container_hierarchy_texts.is_empty() {
            return self.leaf_node_text.clone();
        }
        let mut parts: Vec<&str> = self
            .container_hierarchy_texts
            .iter()
            .map(String::as_str)
            .collect();
        parts.push(&self.leaf_node_text);
        parts.join(" ")
    }

    /// Container labels (outermost first) followed by leaf labels.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.container_hierarchy_labels
            .iter()
            .flatten()
            .flatten()
            .chain(&self.leaf_node_labels)
            .cloned()
            .collect()
    }

    /// Runtime in seconds.
    #[must_use]
    pub fn runtime_seconds(&self) -> f64 {
        self.run_time / 1e9
    }

    /// Top-level `FailureMessage`, else the nested Ginkgo `Failure.Message`.
    #[must_use]
    pub fn failure_text(&self) -> String {
        self.failure_message
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(|| self.failure.as_ref().map(|f| f.message.clone()))
            .unwrap_or_default()
    }
}

/// Accept any JSON scalar and keep its textual form.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_accepts_numbers() {
        let meta: RunMetadata = serde_json::from_str(r#"{"run_id": 42}"#).unwrap();
        assert_eq!(meta.run_id.as_deref(), Some("42"));

        let meta: RunMetadata = serde_json::from_str(r#"{"run_id": "20240101-1"}"#).unwrap();
        assert_eq!(meta.run_id.as_deref(), Some("20240101-1"));

        let meta: RunMetadata = serde_json::from_str("{}").unwrap();
        assert!(meta.run_id.is_none());
        assert!(meta.total_tests.is_none());
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let meta: RunMetadata =
            serde_json::from_str(r#"{"environment": null, "git_branch": null}"#).unwrap();
        assert!(meta.environment.is_empty());
        assert_eq!(meta.git_branch, "");
    }

    #[test]
    fn spec_full_name_and_labels() {
        let spec: SpecReport = serde_json::from_str(
            r#"{
                "LeafNodeText": "routes logs",
                "ContainerHierarchyTexts": ["Vector", "Pipelines"],
                "ContainerHierarchyLabels": [["e2e"], null],
                "LeafNodeLabels": ["smoke"],
                "State": "passed",
                "RunTime": 2500000000
            }"#,
        )
        .unwrap();
        assert_eq!(spec.full_name(), "Vector Pipelines routes logs");
        assert_eq!(spec.labels(), vec!["e2e", "smoke"]);
        assert!((spec.runtime_seconds() - 2.5).abs() < 1e-9);
        assert!(spec.state.is_passed());
    }

    #[test]
    fn spec_without_hierarchy_is_leaf_only() {
        let spec: SpecReport =
            serde_json::from_str(r#"{"LeafNodeText": "standalone", "State": "skipped"}"#).unwrap();
        assert_eq!(spec.full_name(), "standalone");
        assert_eq!(spec.state, TestState::Other("skipped".to_string()));
    }

    #[test]
    fn failure_message_falls_back_to_nested_failure() {
        let spec: SpecReport = serde_json::from_str(
            r#"{"LeafNodeText": "x", "State": "failed", "Failure": {"Message": "Expected true"}}"#,
        )
        .unwrap();
        assert_eq!(spec.failure_text(), "Expected true");

        let spec: SpecReport = serde_json::from_str(
            r#"{"LeafNodeText": "x", "FailureMessage": "top", "Failure": {"Message": "nested"}}"#,
        )
        .unwrap();
        assert_eq!(spec.failure_text(), "top");
    }

    #[test]
    fn suite_with_null_specs() {
        let suites: Vec<SuiteReport> =
            serde_json::from_str(r#"[{"SpecReports": null}]"#).unwrap();
        assert!(suites[0].spec_reports.is_empty());
    }
}
