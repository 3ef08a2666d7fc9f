//! Run-to-run comparison.
//!
//! Only tests recorded in both runs take part. A test that is missing from
//! either side never shows up as a new failure, fix or regression.

use super::pivot::PivotRow;
use crate::error::{ReportError, Result};
use crate::model::{TestRun, TestState};
use serde::Serialize;

/// One test that changed between the two runs.
#[derive(Debug, Clone, Serialize)]
pub struct ComparedTest<'a> {
    pub test_name: &'a str,
    pub state_a: &'a TestState,
    pub state_b: &'a TestState,
    pub runtime_a: f64,
    pub runtime_b: f64,
    pub failure_message: &'a str,
    pub fail_count: usize,
    pub total_runs: usize,
    pub flakiness_score: f64,
}

/// Result of comparing run A (base) with run B (head).
#[derive(Debug, Clone, Serialize)]
pub struct RunComparison<'a> {
    pub run_a: &'a str,
    pub run_b: &'a str,
    /// Passed in A, failed in B.
    pub new_failures: Vec<ComparedTest<'a>>,
    /// Failed in A, passed in B.
    pub fixed: Vec<ComparedTest<'a>>,
    /// Flaky overall, failed in B and failed more than once.
    pub regressions: Vec<ComparedTest<'a>>,
    pub tests_compared: usize,
    pub runtime_a: f64,
    pub runtime_b: f64,
    pub runtime_diff: f64,
    pub runtime_diff_percent: f64,
}

/// Compare two runs over already-built pivot rows.
#[must_use]
pub fn compare_runs<'a>(rows: &[PivotRow<'a>], run_a: &'a str, run_b: &'a str) -> RunComparison<'a> {
    let mut comparison = RunComparison {
        run_a,
        run_b,
        new_failures: Vec::new(),
        fixed: Vec::new(),
        regressions: Vec::new(),
        tests_compared: 0,
        runtime_a: 0.0,
        runtime_b: 0.0,
        runtime_diff: 0.0,
        runtime_diff_percent: 0.0,
    };

    for row in rows {
        let (Some(a), Some(b)) = (row.runs.get(run_a), row.runs.get(run_b)) else {
            continue;
        };

        comparison.tests_compared += 1;
        comparison.runtime_a += a.runtime;
        comparison.runtime_b += b.runtime;

        let entry = ComparedTest {
            test_name: row.test_name,
            state_a: a.state,
            state_b: b.state,
            runtime_a: a.runtime,
            runtime_b: b.runtime,
            failure_message: b.failure_message,
            fail_count: row.fail_count,
            total_runs: row.total_runs,
            flakiness_score: row.flakiness_score,
        };

        if a.state.is_passed() && b.state.is_failed() {
            comparison.new_failures.push(entry.clone());
        }
        if a.state.is_failed() && b.state.is_passed() {
            comparison.fixed.push(entry.clone());
        }
        if row.is_flaky && b.state.is_failed() && row.fail_count > 1 {
            comparison.regressions.push(entry);
        }
    }

    comparison.runtime_diff = comparison.runtime_b - comparison.runtime_a;
    comparison.runtime_diff_percent = if comparison.runtime_a > 0.0 {
        comparison.runtime_diff / comparison.runtime_a * 100.0
    } else {
        0.0
    };

    comparison
}

/// Pick the base and head runs for a comparison.
///
/// `runs` is newest-first. Defaults are the previous run as base and the
/// latest run as head.
///
/// # Errors
///
/// Fails with fewer than two runs, an unknown run id, or when both sides
/// name the same run.
pub fn resolve_pair<'a>(
    runs: &'a [TestRun],
    base: Option<&str>,
    head: Option<&str>,
) -> Result<(&'a TestRun, &'a TestRun)> {
    if runs.len() < 2 {
        return Err(ReportError::NotEnoughRuns { found: runs.len() });
    }

    let base = match base {
        Some(id) => find_run(runs, id)?,
        None => &runs[1],
    };
    let head = match head {
        Some(id) => find_run(runs, id)?,
        None => &runs[0],
    };

    if base.run_id == head.run_id {
        return Err(ReportError::SameRun {
            run_id: base.run_id.clone(),
        });
    }

    Ok((base, head))
}

fn find_run<'a>(runs: &'a [TestRun], run_id: &str) -> Result<&'a TestRun> {
    runs.iter()
        .find(|run| run.run_id == run_id)
        .ok_or_else(|| ReportError::RunNotFound {
            run_id: run_id.to_string(),
            available: runs.iter().map(|run| run.run_id.clone()).collect(),
        })
}
