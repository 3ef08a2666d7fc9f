//! Chronological series for the dashboard charts.
//!
//! The structure mirrors what Chart.js expects for a line chart so the
//! report can hand it over without reshaping.

use crate::model::TestRun;
use crate::util::round1;
use serde::Serialize;

const PASS_RATE_COLOR: &str = "#10b981";
const PASS_RATE_FILL: &str = "rgba(16, 185, 129, 0.1)";
const DURATION_COLOR: &str = "#3b82f6";
const DURATION_FILL: &str = "rgba(59, 130, 246, 0.1)";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub background_color: String,
    pub fill: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Per-run figures used by the comparison pickers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunPoint {
    pub run_id: String,
    pub timestamp: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub runtime: f64,
}

/// Everything the dashboard charts need, oldest run first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub pass_rate: Series,
    pub duration: Series,
    pub runs: Vec<RunPoint>,
}

/// Build chart series from runs in any order.
#[must_use]
pub fn build_chart_data(runs: &[TestRun]) -> ChartData {
    let mut chronological: Vec<&TestRun> = runs.iter().collect();
    chronological.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let labels: Vec<String> = chronological
        .iter()
        .map(|run| format!("Run {}", run.run_id))
        .collect();
    let pass_rates = chronological.iter().map(|run| round1(run.pass_rate())).collect();
    let durations = chronological
        .iter()
        .map(|run| round1(run.total_runtime))
        .collect();

    let points = chronological
        .iter()
        .map(|run| RunPoint {
            run_id: run.run_id.clone(),
            timestamp: run.start_time.clone(),
            total: run.total_tests,
            passed: run.passed_tests,
            failed: run.failed_tests,
            runtime: round1(run.total_runtime),
        })
        .collect();

    ChartData {
        pass_rate: Series {
            labels: labels.clone(),
            datasets: vec![Dataset {
                label: "Pass Rate (%)".to_string(),
                data: pass_rates,
                border_color: PASS_RATE_COLOR.to_string(),
                background_color: PASS_RATE_FILL.to_string(),
                fill: true,
            }],
        },
        duration: Series {
            labels,
            datasets: vec![Dataset {
                label: "Total Duration (s)".to_string(),
                data: durations,
                border_color: DURATION_COLOR.to_string(),
                background_color: DURATION_FILL.to_string(),
                fill: true,
            }],
        },
        runs: points,
    }
}
