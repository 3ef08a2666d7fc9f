//! JSON output shapes for `--json` mode.

use crate::analysis::pivot::{FlakinessPattern, Outcome, PivotRow};
use crate::analysis::summary::ReportSummary;
use serde::Serialize;
use std::path::PathBuf;

/// Result of a `generate` invocation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutput {
    /// Path of the written report, `None` when no runs were found.
    pub output: Option<PathBuf>,
    pub summary: ReportSummary,
}

/// One flaky test for `flaky --json`.
#[derive(Debug, Clone, Serialize)]
pub struct FlakyTest<'a> {
    pub test_name: &'a str,
    pub flakiness_score: f64,
    pub flakiness_pattern: FlakinessPattern,
    pub pattern_description: &'static str,
    pub pass_count: usize,
    pub fail_count: usize,
    pub total_runs: usize,
    pub pass_rate: f64,
    /// Outcomes newest-first, absent runs skipped.
    pub history: Vec<Outcome>,
}

impl<'a> From<&PivotRow<'a>> for FlakyTest<'a> {
    fn from(row: &PivotRow<'a>) -> Self {
        Self {
            test_name: row.test_name,
            flakiness_score: row.flakiness_score,
            flakiness_pattern: row.flakiness_pattern,
            pattern_description: row.flakiness_pattern.description(),
            pass_count: row.pass_count,
            fail_count: row.fail_count,
            total_runs: row.total_runs,
            pass_rate: row.pass_rate,
            history: row.runs.sequence(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::pivot::build_pivot;
    use crate::analysis::pivot::tests::{result, run};

    #[test]
    fn flaky_test_json_shape() {
        let runs = vec![
            run("3", "2025-06-03T00:00:00Z", vec![result("t", "passed", 1.0)]),
            run("2", "2025-06-02T00:00:00Z", vec![result("t", "failed", 1.0)]),
            run("1", "2025-06-01T00:00:00Z", vec![result("t", "passed", 1.0)]),
        ];
        let rows = build_pivot(&runs);
        let json = serde_json::to_value(FlakyTest::from(&rows[0])).unwrap();

        assert_eq!(json["test_name"], "t");
        assert_eq!(json["flakiness_pattern"], "alternating");
        assert_eq!(json["history"], serde_json::json!(["P", "F", "P"]));
        assert_eq!(json["pattern_description"], "Alternates between pass and fail");
    }
}
