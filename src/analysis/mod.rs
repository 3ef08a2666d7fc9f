//! Aggregation over scanned runs.
//!
//! - [`pivot`] - one row per test with flakiness analysis
//! - [`trend`] - chronological chart series
//! - [`compare`] - run-to-run diffs
//! - [`summary`] - dashboard figures
//!
//! [`Report`] bundles all of them for the renderers.

pub mod compare;
pub mod pivot;
pub mod summary;
pub mod trend;

use crate::model::TestRun;
use crate::scan::collect_labels;
use pivot::PivotRow;
use summary::ReportSummary;
use trend::ChartData;
use tracing::debug;

/// Everything derived from a newest-first list of runs.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub runs: &'a [TestRun],
    pub rows: Vec<PivotRow<'a>>,
    pub labels: Vec<String>,
    pub chart: ChartData,
    pub summary: ReportSummary,
}

impl<'a> Report<'a> {
    #[must_use]
    pub fn build(runs: &'a [TestRun]) -> Self {
        let rows = pivot::build_pivot(runs);
        let labels = collect_labels(runs);
        let chart = trend::build_chart_data(runs);
        let summary = ReportSummary::build(runs, &rows);
        debug!(
            runs = runs.len(),
            tests = rows.len(),
            flaky = summary.flaky_tests,
            labels = labels.len(),
            "Aggregated report data"
        );
        Self {
            runs,
            rows,
            labels,
            chart,
            summary,
        }
    }

    /// Rows flagged flaky, in pivot order.
    pub fn flaky_rows(&self) -> impl Iterator<Item = &PivotRow<'a>> {
        self.rows.iter().filter(|row| row.is_flaky)
    }
}
