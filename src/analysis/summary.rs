//! Dashboard figures.

use super::pivot::PivotRow;
use crate::model::TestRun;
use serde::Serialize;

/// Below this absolute change (in percentage points) a trend is "stable".
const STABLE_THRESHOLD: f64 = 0.1;

/// Pass-rate movement of the latest run against the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "direction", content = "diff", rename_all = "snake_case")]
pub enum PassRateTrend {
    NotEnoughData,
    Stable,
    Up(f64),
    Down(f64),
}

impl PassRateTrend {
    /// Compare the two newest runs of a newest-first list.
    #[must_use]
    pub fn from_runs(runs: &[TestRun]) -> Self {
        let [latest, previous, ..] = runs else {
            return Self::NotEnoughData;
        };
        if latest.total_tests == 0 || previous.total_tests == 0 {
            return Self::NotEnoughData;
        }
        let diff = latest.pass_rate() - previous.pass_rate();
        if diff.abs() < STABLE_THRESHOLD {
            Self::Stable
        } else if diff > 0.0 {
            Self::Up(diff)
        } else {
            Self::Down(diff)
        }
    }

    /// Short label: `→ Stable`, `↑ +2.5%`, `↓ -10.0%` or `—`.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::NotEnoughData => "—".to_string(),
            Self::Stable => "→ Stable".to_string(),
            Self::Up(diff) => format!("↑ +{diff:.1}%"),
            Self::Down(diff) => format!("↓ {diff:.1}%"),
        }
    }
}

/// Headline numbers for the dashboard and `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub total_runs: usize,
    pub total_tests: usize,
    pub flaky_tests: usize,
    pub always_failing: usize,
    pub avg_runtime: f64,
    pub latest_run_id: Option<String>,
    pub latest_pass_rate: f64,
    pub latest_failures: usize,
    pub latest_runtime: f64,
    pub latest_git_branch: Option<String>,
    pub latest_git_commit: Option<String>,
    pub latest_git_dirty: bool,
    pub pass_rate_trend: PassRateTrend,
}

impl ReportSummary {
    #[must_use]
    pub fn build(runs: &[TestRun], rows: &[PivotRow<'_>]) -> Self {
        let latest = runs.first();
        let avg_runtime = if runs.is_empty() {
            0.0
        } else {
            runs.iter().map(|run| run.total_runtime).sum::<f64>() / runs.len() as f64
        };

        Self {
            total_runs: runs.len(),
            total_tests: rows.len(),
            flaky_tests: rows.iter().filter(|row| row.is_flaky).count(),
            always_failing: rows.iter().filter(|row| row.is_always_failing()).count(),
            avg_runtime,
            latest_run_id: latest.map(|run| run.run_id.clone()),
            latest_pass_rate: latest.map_or(0.0, TestRun::pass_rate),
            latest_failures: latest.map_or(0, |run| run.failed_tests),
            latest_runtime: latest.map_or(0.0, |run| run.total_runtime),
            latest_git_branch: latest
                .map(|run| run.git_branch.clone())
                .filter(|s| !s.is_empty()),
            latest_git_commit: latest
                .map(|run| run.git_commit.clone())
                .filter(|s| !s.is_empty()),
            latest_git_dirty: latest.is_some_and(|run| is_dirty(&run.git_dirty)),
            pass_rate_trend: PassRateTrend::from_runs(runs),
        }
    }

    /// First seven characters of the latest commit.
    #[must_use]
    pub fn short_commit(&self) -> Option<&str> {
        self.latest_git_commit
            .as_deref()
            .map(|commit| commit.get(..7).unwrap_or(commit))
    }
}

/// The collector writes `git_dirty` as free text; treat "false"/"0" as clean.
pub(crate) fn is_dirty(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value.eq_ignore_ascii_case("false") || value == "0")
}
