//! Turn a parsed Ginkgo report into [`TestResult`]s.

use super::artifacts::ArtifactIndex;
use super::schema::{SpecReport, SuiteReport};
use crate::config::ScanOptions;
use crate::model::TestResult;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Build one `TestResult` per distinct full name.
///
/// Only the first suite entry is read. Records without leaf text are suite
/// setup nodes and are skipped. When two records share a full name the
/// later one replaces the earlier one in place.
#[must_use]
pub fn extract_tests(
    suites: &[SuiteReport],
    index: &ArtifactIndex,
    results_root: &Path,
    options: &ScanOptions,
) -> Vec<TestResult> {
    let Some(suite) = suites.first() else {
        return Vec::new();
    };

    let mut tests: Vec<TestResult> = Vec::with_capacity(suite.spec_reports.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for spec in &suite.spec_reports {
        if spec.leaf_node_text.is_empty() {
            continue;
        }
        let result = to_result(spec, index, results_root, options);
        if let Some(&pos) = positions.get(&result.full_name) {
            debug!(name = %result.full_name, "Duplicate test name in run, keeping the later record");
            tests[pos] = result;
        } else {
            positions.insert(result.full_name.clone(), tests.len());
            tests.push(result);
        }
    }

    tests
}

fn to_result(
    spec: &SpecReport,
    index: &ArtifactIndex,
    results_root: &Path,
    options: &ScanOptions,
) -> TestResult {
    let full_name = spec.full_name();
    let artifact_metadata = index.load(&full_name, results_root, options);

    TestResult {
        leaf_text: spec.leaf_node_text.clone(),
        state: spec.state.clone(),
        runtime: spec.runtime_seconds(),
        failure_message: spec.failure_text(),
        labels: spec.labels(),
        container_hierarchy: spec.container_hierarchy_texts.clone(),
        start_time: spec.start_time.clone().unwrap_or_default(),
        end_time: spec.end_time.clone().unwrap_or_default(),
        artifact_metadata,
        full_name,
    }
}
