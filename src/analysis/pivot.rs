//! Cross-run pivot and flakiness analysis.
//!
//! One [`PivotRow`] per distinct full test name. Each row carries exactly
//! one cell per run (in run order, newest-first), either the recorded result
//! or an explicit absence. Rows borrow from the runs they were built from.

use crate::model::{ArtifactMetadata, TestResult, TestRun, TestState};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Outcome class used for counting and pattern detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    #[serde(rename = "P")]
    Pass,
    #[serde(rename = "F")]
    Fail,
    #[serde(rename = "S")]
    Skip,
}

impl Outcome {
    #[must_use]
    pub const fn of(state: &TestState) -> Self {
        match state {
            TestState::Passed => Self::Pass,
            TestState::Failed => Self::Fail,
            TestState::Other(_) | TestState::Unknown => Self::Skip,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Pass => 'P',
            Self::Fail => 'F',
            Self::Skip => 'S',
        }
    }
}

/// Shape of a flaky test's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlakinessPattern {
    #[default]
    Stable,
    Alternating,
}

impl FlakinessPattern {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Alternating => "alternating",
        }
    }

    /// Human description shown next to the pattern badge.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Alternating => "Alternates between pass and fail",
            Self::Stable => "Unknown pattern",
        }
    }
}

/// One recorded result inside a pivot row.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RunCell<'a> {
    pub state: &'a TestState,
    pub runtime: f64,
    pub failure_message: &'a str,
    pub labels: &'a [String],
    pub artifact_metadata: Option<&'a ArtifactMetadata>,
}

impl<'a> From<&'a TestResult> for RunCell<'a> {
    fn from(test: &'a TestResult) -> Self {
        Self {
            state: &test.state,
            runtime: test.runtime,
            failure_message: &test.failure_message,
            labels: &test.labels,
            artifact_metadata: test.artifact_metadata.as_ref(),
        }
    }
}

impl RunCell<'_> {
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        Outcome::of(self.state)
    }
}

/// Ordered run id -> cell map. Serializes as a JSON object with `null`
/// for runs where the test did not appear.
#[derive(Debug, Clone, Default)]
pub struct RunCells<'a>(Vec<(&'a str, Option<RunCell<'a>>)>);

impl<'a> RunCells<'a> {
    #[must_use]
    pub fn get(&self, run_id: &str) -> Option<&RunCell<'a>> {
        self.0
            .iter()
            .find(|(id, _)| *id == run_id)
            .and_then(|(_, cell)| cell.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Option<&'_ RunCell<'a>>)> + '_ {
        self.0.iter().map(|(id, cell)| (*id, cell.as_ref()))
    }

    /// Number of runs (present or absent).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Outcomes of present cells, newest-first.
    #[must_use]
    pub fn sequence(&self) -> Vec<Outcome> {
        self.0
            .iter()
            .filter_map(|(_, cell)| cell.as_ref().map(RunCell::outcome))
            .collect()
    }
}

impl Serialize for RunCells<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (run_id, cell) in &self.0 {
            map.serialize_entry(run_id, cell)?;
        }
        map.end()
    }
}

/// Aggregated history of one test across all runs.
#[derive(Debug, Clone, Serialize)]
pub struct PivotRow<'a> {
    pub test_name: &'a str,
    pub leaf_text: &'a str,
    pub container_hierarchy: &'a [String],
    pub runs: RunCells<'a>,
    pub total_runs: usize,
    pub pass_count: usize,
    pub fail_count: usize,
    pub skip_count: usize,
    pub pass_rate: f64,
    pub total_runtime: f64,
    pub avg_runtime: f64,
    pub min_runtime: f64,
    pub max_runtime: f64,
    pub is_flaky: bool,
    pub flakiness_score: f64,
    pub flakiness_pattern: FlakinessPattern,
}

impl PivotRow<'_> {
    /// Failed in every run it appeared in.
    #[must_use]
    pub const fn is_always_failing(&self) -> bool {
        self.total_runs > 0 && self.fail_count == self.total_runs
    }

    /// Breadcrumb form used for copying: `A › B › leaf`.
    #[must_use]
    pub fn breadcrumb(&self) -> String {
        self.container_hierarchy
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.leaf_text))
            .collect::<Vec<_>>()
            .join(" › ")
    }
}

/// Build one row per distinct test name.
///
/// `runs` must be newest-first. Rows come back sorted by fail count
/// descending, then pass rate ascending, ties in name order.
#[must_use]
pub fn build_pivot(runs: &[TestRun]) -> Vec<PivotRow<'_>> {
    let by_name: Vec<HashMap<&str, &TestResult>> = runs
        .iter()
        .map(|run| {
            run.tests
                .iter()
                .map(|test| (test.full_name.as_str(), test))
                .collect()
        })
        .collect();

    let names: BTreeSet<&str> = by_name
        .iter()
        .flat_map(|index| index.keys().copied())
        .collect();

    let mut rows: Vec<PivotRow<'_>> = names
        .into_iter()
        .map(|name| build_row(name, runs, &by_name))
        .collect();

    sort_rows(&mut rows);
    rows
}

/// Fail count descending, then pass rate ascending. Stable.
pub fn sort_rows(rows: &mut [PivotRow<'_>]) {
    rows.sort_by(|a, b| {
        b.fail_count
            .cmp(&a.fail_count)
            .then_with(|| a.pass_rate.total_cmp(&b.pass_rate))
    });
}

fn build_row<'a>(
    name: &'a str,
    runs: &'a [TestRun],
    by_name: &[HashMap<&'a str, &'a TestResult>],
) -> PivotRow<'a> {
    let cells: Vec<(&'a str, Option<RunCell<'a>>)> = runs
        .iter()
        .zip(by_name)
        .map(|(run, index)| {
            (
                run.run_id.as_str(),
                index.get(name).map(|test| RunCell::from(*test)),
            )
        })
        .collect();

    let first = by_name.iter().find_map(|index| index.get(name).copied());
    let (leaf_text, container_hierarchy) = first.map_or((name, &[][..]), |test| {
        (test.leaf_text.as_str(), test.container_hierarchy.as_slice())
    });

    let runs = RunCells(cells);
    let stats = RowStats::tally(&runs);

    let pass_rate = stats.rate_of(stats.pass_count);
    let is_flaky = stats.total_runs >= 2 && stats.pass_count > 0 && stats.fail_count > 0;
    let (flakiness_score, flakiness_pattern) = if is_flaky {
        (flakiness_score(pass_rate), classify_pattern(&runs.sequence()))
    } else {
        (0.0, FlakinessPattern::Stable)
    };

    PivotRow {
        test_name: name,
        leaf_text,
        container_hierarchy,
        runs,
        total_runs: stats.total_runs,
        pass_count: stats.pass_count,
        fail_count: stats.fail_count,
        skip_count: stats.skip_count,
        pass_rate,
        total_runtime: stats.total_runtime,
        avg_runtime: if stats.total_runs > 0 {
            stats.total_runtime / stats.total_runs as f64
        } else {
            0.0
        },
        min_runtime: if stats.total_runs > 0 {
            stats.min_runtime
        } else {
            0.0
        },
        max_runtime: stats.max_runtime,
        is_flaky,
        flakiness_score,
        flakiness_pattern,
    }
}

/// Running totals over the present cells of a row.
struct RowStats {
    total_runs: usize,
    pass_count: usize,
    fail_count: usize,
    skip_count: usize,
    total_runtime: f64,
    min_runtime: f64,
    max_runtime: f64,
}

impl RowStats {
    fn tally(cells: &RunCells<'_>) -> Self {
        let mut stats = Self {
            total_runs: 0,
            pass_count: 0,
            fail_count: 0,
            skip_count: 0,
            total_runtime: 0.0,
            min_runtime: f64::INFINITY,
            max_runtime: 0.0,
        };
        for cell in cells.iter().filter_map(|(_, cell)| cell) {
            stats.total_runs += 1;
            stats.total_runtime += cell.runtime;
            stats.min_runtime = stats.min_runtime.min(cell.runtime);
            stats.max_runtime = stats.max_runtime.max(cell.runtime);
            match cell.outcome() {
                Outcome::Pass => stats.pass_count += 1,
                Outcome::Fail => stats.fail_count += 1,
                Outcome::Skip => stats.skip_count += 1,
            }
        }
        stats
    }

    fn rate_of(&self, count: usize) -> f64 {
        if self.total_runs == 0 {
            0.0
        } else {
            count as f64 / self.total_runs as f64 * 100.0
        }
    }
}

/// 100 at a 50% pass rate, 0 at 0% or 100%.
#[must_use]
pub fn flakiness_score(pass_rate: f64) -> f64 {
    100.0 - 2.0 * (pass_rate - 50.0).abs()
}

/// `Alternating` when at least three outcomes and no two neighbours match.
#[must_use]
pub fn classify_pattern(sequence: &[Outcome]) -> FlakinessPattern {
    if sequence.len() >= 3 && sequence.windows(2).all(|pair| pair[0] != pair[1]) {
        FlakinessPattern::Alternating
    } else {
        FlakinessPattern::Stable
    }
}
