//! HTML report rendering.
//!
//! Produces one self-contained document: inline CSS and script, Chart.js
//! from a CDN, and the report data embedded as JSON. Apart from the
//! "generated on" stamp the output depends only on the input runs.

use super::assets::{CSS, JS, icon};
use crate::analysis::Report;
use crate::analysis::pivot::PivotRow;
use crate::analysis::summary::{PassRateTrend, is_dirty};
use crate::error::Result;
use crate::model::TestRun;
use crate::util::format_duration;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Page-level settings.
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    pub title: &'a str,
    pub chart_js_url: &'a str,
    /// Shown in the header as "Generated on ...".
    pub generated_at: &'a str,
}

/// Run details embedded for the run modal and comparison pickers.
#[derive(Debug, Serialize)]
struct RunDetails<'a> {
    run_id: &'a str,
    start_time: &'a str,
    date: String,
    total_tests: usize,
    passed_tests: usize,
    failed_tests: usize,
    total_runtime: f64,
    git_commit: &'a str,
    git_branch: &'a str,
    git_dirty: bool,
    description: &'a str,
    environment: &'a BTreeMap<String, Value>,
    test_output_log: &'a str,
}

impl<'a> From<&'a TestRun> for RunDetails<'a> {
    fn from(run: &'a TestRun) -> Self {
        Self {
            run_id: &run.run_id,
            start_time: &run.start_time,
            date: run.date_str(),
            total_tests: run.total_tests,
            passed_tests: run.passed_tests,
            failed_tests: run.failed_tests,
            total_runtime: run.total_runtime,
            git_commit: &run.git_commit,
            git_branch: &run.git_branch,
            git_dirty: is_dirty(&run.git_dirty),
            description: &run.description,
            environment: &run.environment,
            test_output_log: &run.test_output_log,
        }
    }
}

/// Render the full report document.
///
/// # Errors
///
/// Returns an error if the embedded data cannot be serialized.
pub fn render_report(report: &Report<'_>, options: &RenderOptions<'_>) -> Result<String> {
    let runs: Vec<RunDetails<'_>> = report.runs.iter().map(RunDetails::from).collect();
    let chart_json = script_json(&report.chart)?;
    let pivot_json = script_json(&report.rows)?;
    let runs_json = script_json(&runs)?;
    let has_comparison = report.runs.len() >= 2;

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{chart_js_url}"></script>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <div class="header">
            <div>
                <h1>{title}</h1>
                <p class="subtle">Generated on {generated_at}</p>
            </div>
            <button id="themeToggle" class="btn" onclick="toggleTheme()" title="Toggle theme">Dark mode</button>
        </div>
        {tabs}
        {dashboard}
        {matrix}
        {comparison}
    </div>
    {modals}
    <script>
        window.chartData = {chart_json};
        window.pivotData = {pivot_json};
        window.runsData = {runs_json};
    </script>
    <script>{js}</script>
</body>
</html>
"#,
        title = html_escape(options.title),
        chart_js_url = html_escape(options.chart_js_url),
        generated_at = html_escape(options.generated_at),
        css = CSS,
        js = JS,
        tabs = render_tabs(has_comparison),
        dashboard = render_dashboard(report),
        matrix = render_matrix(report),
        comparison = if has_comparison {
            render_comparison(report.runs)
        } else {
            String::new()
        },
        modals = render_modals(),
    ))
}

fn render_tabs(has_comparison: bool) -> String {
    let mut html = String::from(
        r#"<div class="tabs">
            <button class="tab-btn active" data-tab="dashboard" onclick="switchTab('dashboard')">Dashboard</button>
            <button class="tab-btn" data-tab="matrix" onclick="switchTab('matrix')">Test Matrix</button>"#,
    );
    if has_comparison {
        html.push_str(
            r#"
            <button class="tab-btn" data-tab="comparison" onclick="switchTab('comparison')">Comparison</button>"#,
        );
    }
    html.push_str("\n        </div>");
    html
}

fn card(label: &str, value: &str, color: &str, tooltip: &str) -> String {
    format!(
        r#"
                <div class="card" style="border-left: 4px solid {color};" title="{tooltip}">
                    <div class="label">{label}</div>
                    <div class="value" style="color: {color};">{value}</div>
                </div>"#,
        tooltip = html_escape(tooltip),
    )
}

fn trend_html(trend: PassRateTrend) -> String {
    let class = match trend {
        PassRateTrend::Up(_) => "trend-up",
        PassRateTrend::Down(_) => "trend-down",
        PassRateTrend::NotEnoughData | PassRateTrend::Stable => "trend-flat",
    };
    format!(r#"<span class="{class}">{}</span>"#, trend.label())
}

fn render_dashboard(report: &Report<'_>) -> String {
    let summary = &report.summary;
    let avg_runtime = if report.runs.is_empty() {
        "N/A".to_string()
    } else {
        format_duration(summary.avg_runtime)
    };

    let mut html = String::from(
        r#"
        <div id="dashboard" class="tab-content active">
            <div class="summary-grid">"#,
    );
    html.push_str(&card(
        "Total Runs",
        &summary.total_runs.to_string(),
        "#3b82f6",
        "Number of run directories included in this report.",
    ));
    html.push_str(&card(
        "Total Tests",
        &summary.total_tests.to_string(),
        "#06b6d4",
        "Distinct test names seen across all runs.",
    ));
    html.push_str(&card(
        "Flaky Tests",
        &summary.flaky_tests.to_string(),
        "#f59e0b",
        "Tests that both passed and failed across runs. Often timing issues, races or environment dependencies.",
    ));
    html.push_str(&card(
        "Always Failing",
        &summary.always_failing.to_string(),
        "#ef4444",
        "Tests that failed in every run they appeared in.",
    ));
    html.push_str(&card(
        "Avg Runtime",
        &avg_runtime,
        "#8b5cf6",
        "Average total runtime across all runs.",
    ));
    html.push_str(&card(
        "Pass Rate Trend",
        &trend_html(summary.pass_rate_trend),
        "#10b981",
        "Pass rate change of the latest run against the previous one.",
    ));

    let branch = summary.latest_git_branch.as_deref().unwrap_or("unknown");
    let commit = summary.latest_git_commit.as_deref().unwrap_or("unknown");
    let short_commit = summary.short_commit().unwrap_or("unknown");
    let dirty = if summary.latest_git_dirty {
        r#"<span class="dirty-dot" title="Working directory has uncommitted changes">●</span>"#
    } else {
        ""
    };
    let _ = write!(
        html,
        r#"
                <div class="card latest-card">
                    <div class="label">Latest Run Summary</div>
                    <div class="latest-grid">
                        <div><div class="subtle">Pass Rate</div><div class="figure rate-high">{pass_rate:.1}%</div></div>
                        <div><div class="subtle">Failures</div><div class="figure rate-low">{failures}</div></div>
                        <div><div class="subtle">Runtime</div><div class="figure">{runtime}</div></div>
                    </div>
                    <div class="git-line">
                        <code>{branch}</code>
                        {dirty}
                        <code class="commit" data-commit="{commit}" onclick="copyWithElementFeedback(this.dataset.commit, this)" title="Click to copy full commit hash: {commit}">{copy_icon} {short_commit}</code>
                    </div>
                </div>
            </div>"#,
        pass_rate = summary.latest_pass_rate,
        failures = summary.latest_failures,
        runtime = format_duration(summary.latest_runtime),
        branch = html_escape(branch),
        commit = html_escape(commit),
        short_commit = html_escape(short_commit),
        copy_icon = icon("copy", 12, "currentColor"),
    );

    html.push_str(
        r#"
            <div class="charts-container">
                <div class="chart-wrapper"><canvas id="passRateChart"></canvas></div>
                <div class="chart-wrapper"><canvas id="durationChart"></canvas></div>
            </div>"#,
    );

    let _ = write!(
        html,
        r#"
            <div class="flaky-section">
                <h3>{} Flaky Tests Detected</h3>
                <div class="flaky-grid">"#,
        icon("warning", 18, "#f59e0b")
    );
    let mut any_flaky = false;
    for (idx, row) in report.rows.iter().enumerate().filter(|(_, row)| row.is_flaky) {
        any_flaky = true;
        html.push_str(&render_flaky_card(idx, row));
    }
    if !any_flaky {
        html.push_str("\n                    <p>No flaky tests detected.</p>");
    }
    html.push_str(
        r#"
                </div>
            </div>
        </div>"#,
    );
    html
}

fn render_flaky_card(idx: usize, row: &PivotRow<'_>) -> String {
    format!(
        r#"
                    <div class="card flaky-card" onclick="showRowDetails({idx})">
                        <div class="flaky-header">
                            <span class="badge" title="Stability score based on the pass/fail ratio. Lower means more consistent.">{score:.0}% flaky</span>
                            <span class="badge failed" title="Pattern: {description}">{pattern}</span>
                        </div>
                        <div class="flaky-name">{name}</div>
                        <div class="flaky-stats">Pass: {pass} | Fail: {fail}</div>
                    </div>"#,
        score = row.flakiness_score,
        description = row.flakiness_pattern.description(),
        pattern = row.flakiness_pattern.as_str(),
        name = html_escape(row.test_name),
        pass = row.pass_count,
        fail = row.fail_count,
    )
}

fn render_matrix(report: &Report<'_>) -> String {
    let mut html = String::from(
        r#"
        <div id="matrix" class="tab-content">
            <div class="filters">
                <input type="text" id="searchInput" class="filter-input" placeholder="Search tests..." oninput="filterTable()">
                <select id="statusFilter" class="filter-input" onchange="filterTable()">
                    <option value="all">All Statuses</option>
                    <option value="passed">Passed</option>
                    <option value="failed">Failed</option>
                </select>
                <select id="stabilityFilter" class="filter-input" onchange="filterTable()">
                    <option value="all">All Stability</option>
                    <option value="flaky">Flaky Only</option>
                    <option value="stable">Stable Only</option>
                    <option value="always-failing">Always Failing</option>
                </select>
                <select id="labelFilter" class="filter-input" onchange="filterTable()">
                    <option value="all">All Labels</option>"#,
    );
    for label in &report.labels {
        let label = html_escape(label);
        let _ = write!(html, "\n                    <option value=\"{label}\">{label}</option>");
    }
    let _ = write!(
        html,
        r#"
                </select>
                <button class="btn" onclick="copyAllTestNames()">{} Copy All Names</button>
            </div>
            <div class="table-wrapper">
                <table id="resultsTable">
                    <thead>
                        <tr>
                            <th>Test Name</th>
                            <th class="stats-col">Stats</th>"#,
        icon("copy", 14, "currentColor")
    );
    for (idx, run) in report.runs.iter().enumerate() {
        let _ = write!(
            html,
            r#"
                            <th class="run-header" onclick="showRunDetails({idx})">Run {id}<br><span class="meta">{date}<br>{runtime}</span></th>"#,
            id = html_escape(&run.run_id),
            date = html_escape(&run.date_str()),
            runtime = format_duration(run.total_runtime),
        );
    }
    html.push_str(
        r#"
                        </tr>
                    </thead>
                    <tbody>"#,
    );
    for (idx, row) in report.rows.iter().enumerate() {
        html.push_str(&render_row(idx, row));
    }
    html.push_str(
        r#"
                    </tbody>
                </table>
            </div>
        </div>"#,
    );
    html
}

fn render_row(idx: usize, row: &PivotRow<'_>) -> String {
    let mut html = format!(
        r#"
                        <tr data-row="{idx}">
                            <td class="test-name-cell">
                                <div class="test-name-wrapper">
                                    {breadcrumb}
                                    <button class="copy-test-name-btn" onclick="copyTestName(this)" data-test-name="{copy_name}" title="Copy test name">{copy_icon} Copy</button>
                                </div>
                            </td>
                            <td class="stats-cell">
                                <div class="pass-rate {rate_class}" title="Pass rate: {pass} passed out of {total} total runs">{rate:.1}%</div>
                                <div class="counts">{pass}✓ {fail}✗ / {total}</div>
                                <div class="avg-time">avg: {avg:.1}s</div>
                            </td>"#,
        breadcrumb = breadcrumb_html(row.container_hierarchy, row.leaf_text),
        copy_name = html_escape(&row.breadcrumb()),
        copy_icon = icon("copy", 14, "currentColor"),
        rate_class = rate_class(row.pass_rate),
        rate = row.pass_rate,
        pass = row.pass_count,
        fail = row.fail_count,
        total = row.total_runs,
        avg = row.avg_runtime,
    );

    for (run_idx, (_, cell)) in row.runs.iter().enumerate() {
        match cell {
            Some(cell) => {
                let _ = write!(
                    html,
                    r#"
                            <td class="result-cell" onclick="showTestDetails({idx}, {run_idx})"><span class="badge {state_class}">{state}</span><span class="runtime {runtime_class}">{runtime:.1}s</span></td>"#,
                    state_class = css_token(cell.state.as_str()),
                    state = html_escape(cell.state.as_str()),
                    runtime_class = runtime_class(cell.runtime),
                    runtime = cell.runtime,
                );
            }
            None => html.push_str("\n                            <td class=\"absent-cell\">-</td>"),
        }
    }
    html.push_str("\n                        </tr>");
    html
}

fn render_comparison(runs: &[TestRun]) -> String {
    let options = |selected: usize| -> String {
        runs.iter()
            .enumerate()
            .map(|(idx, run)| {
                format!(
                    "\n                    <option value=\"{idx}\"{selected}>Run {id} - {date} ({runtime})</option>",
                    selected = if idx == selected { " selected" } else { "" },
                    id = html_escape(&run.run_id),
                    date = html_escape(&run.date_str()),
                    runtime = format_duration(run.total_runtime),
                )
            })
            .collect()
    };

    format!(
        r#"
        <div id="comparison" class="tab-content">
            <div class="filters">
                <label class="subtle">Run A (base)</label>
                <select id="runASelect" class="filter-input" onchange="updateRunInfo()">{options_a}
                </select>
                <label class="subtle">Run B (head)</label>
                <select id="runBSelect" class="filter-input" onchange="updateRunInfo()">{options_b}
                </select>
                <button class="btn" onclick="compareRuns()">Compare</button>
            </div>
            <div class="comparison-run-info">
                <div class="run-info-card"><h4>Run A</h4><div id="runAInfo"></div></div>
                <div class="run-info-card"><h4>Run B</h4><div id="runBInfo"></div></div>
            </div>
            <div id="comparisonSummary" class="summary-grid" style="display: none; margin-top: 20px;">
                <div class="card"><div class="label">Tests Compared</div><div id="testsComparedCount" class="value">0</div></div>
                <div class="card" title="Passed in Run A but failed in Run B."><div class="label">New Failures</div><div id="newFailuresCount" class="value rate-low">0</div></div>
                <div class="card" title="Failed in Run A but passed in Run B."><div class="label">Fixed Tests</div><div id="fixedTestsCount" class="value rate-high">0</div></div>
                <div class="card" title="Flaky tests that failed again in Run B."><div class="label">Regressions</div><div id="regressionsCount" class="value rate-medium">0</div></div>
                <div class="card" title="Total runtime of Run B minus Run A over tests present in both."><div class="label">Runtime Diff</div><div id="runtimeDiff" class="value">-</div></div>
            </div>
            <div class="comparison-grid">
                <div class="comparison-col"><h4>{error_icon} New Failures</h4><div id="newFailuresList"></div></div>
                <div class="comparison-col"><h4>{info_icon} Fixed Tests</h4><div id="fixedTestsList"></div></div>
                <div class="comparison-col"><h4>{warning_icon} Regressions</h4><div id="regressionsList"></div></div>
            </div>
        </div>"#,
        options_a = options(1),
        options_b = options(0),
        error_icon = icon("error", 16, "#ef4444"),
        info_icon = icon("info", 16, "#10b981"),
        warning_icon = icon("warning", 16, "#f59e0b"),
    )
}

fn render_modals() -> String {
    let modal = |id: &str, title: &str| {
        format!(
            r#"
    <div id="{id}" class="modal" onclick="if (event.target === this) closeModal('{id}')">
        <div class="modal-content">
            <div class="modal-header">
                <h2 id="{id}Title">{title}</h2>
                <span class="close-btn" onclick="closeModal('{id}')">&times;</span>
            </div>
            <div class="modal-body" id="{id}Body"></div>
        </div>
    </div>"#
        )
    };
    format!("{}{}", modal("testModal", "Test Details"), modal("runModal", "Run Details"))
}

/// Breadcrumb markup for a test name: containers, separators, then the leaf.
#[must_use]
pub fn breadcrumb_html(hierarchy: &[String], leaf: &str) -> String {
    let mut html = String::from(r#"<div class="test-breadcrumb">"#);
    for (i, container) in hierarchy.iter().enumerate() {
        let level = if i == 0 { " level-0" } else { "" };
        let _ = write!(
            html,
            r#"<span class="breadcrumb-item"><span class="breadcrumb-container{level}">{}</span></span><span class="breadcrumb-separator">›</span>"#,
            html_escape(container)
        );
    }
    let _ = write!(
        html,
        r#"<span class="breadcrumb-item"><span class="breadcrumb-leaf">{}</span></span></div>"#,
        html_escape(leaf)
    );
    html
}

/// `rate-high` at 90% and above, `rate-medium` at 50% and above.
#[must_use]
pub fn rate_class(pass_rate: f64) -> &'static str {
    if pass_rate >= 90.0 {
        "rate-high"
    } else if pass_rate >= 50.0 {
        "rate-medium"
    } else {
        "rate-low"
    }
}

/// `runtime-fast` under 10s, `runtime-medium` under 30s.
#[must_use]
pub fn runtime_class(seconds: f64) -> &'static str {
    if seconds < 10.0 {
        "runtime-fast"
    } else if seconds < 30.0 {
        "runtime-medium"
    } else {
        "runtime-slow"
    }
}

/// Escape text for HTML content and attribute values.
#[must_use]
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize for embedding inside `<script>`.
///
/// Markup-significant characters and the JS line separators are replaced
/// by their `\u` escapes, which leaves the JSON value unchanged.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Lowercase `[a-z0-9-]` subset of a value, for use as a CSS class.
fn css_token(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::pivot::tests::{result, run};

    fn options() -> RenderOptions<'static> {
        RenderOptions {
            title: "E2E Test Results",
            chart_js_url: "https://cdn.jsdelivr.net/npm/chart.js",
            generated_at: "2025-01-01 00:00",
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape(r#"<b a="1">&'x'"#),
            "&lt;b a=&quot;1&quot;&gt;&amp;&#39;x&#39;"
        );
    }

    #[test]
    fn script_json_cannot_close_the_tag() {
        let json = script_json(&vec!["</script><!-- \u{2028}"]).unwrap();
        assert!(!json.contains("</"));
        assert!(!json.contains('\u{2028}'));
        let back: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec!["</script><!-- \u{2028}"]);
    }

    #[test]
    fn classes() {
        assert_eq!(rate_class(90.0), "rate-high");
        assert_eq!(rate_class(50.0), "rate-medium");
        assert_eq!(rate_class(49.9), "rate-low");
        assert_eq!(runtime_class(9.9), "runtime-fast");
        assert_eq!(runtime_class(10.0), "runtime-medium");
        assert_eq!(runtime_class(30.0), "runtime-slow");
        assert_eq!(css_token("Passed\" onclick"), "passedonclick");
    }

    #[test]
    fn breadcrumb_escapes_parts() {
        let html = breadcrumb_html(&["<Suite>".to_string(), "Inner".to_string()], "leaf & more");
        assert!(html.contains("breadcrumb-container level-0\">&lt;Suite&gt;"));
        assert!(html.contains("breadcrumb-container\">Inner"));
        assert!(html.contains("leaf &amp; more"));
        assert_eq!(html.matches("breadcrumb-separator").count(), 2);
    }

    #[test]
    fn renders_matrix_with_absent_cells() {
        crate::logging::init_test_logging();
        let runs = vec![
            run("2", "2025-01-02T10:00:00Z", vec![result("a", "failed", 12.0)]),
            run(
                "1",
                "2025-01-01T10:00:00Z",
                vec![result("a", "passed", 1.0), result("<b>", "passed", 45.0)],
            ),
        ];
        let report = Report::build(&runs);
        let html = render_report(&report, &options()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Generated on 2025-01-01 00:00"));
        assert!(html.contains("<td class=\"absent-cell\">-</td>"));
        assert!(html.contains("runtime-medium\">12.0s"));
        assert!(html.contains("runtime-slow\">45.0s"));
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("switchTab('comparison')"));
        assert!(html.contains("<option value=\"1\" selected>Run 1"));
        assert!(html.contains("window.pivotData = ["));
    }

    #[test]
    fn single_run_has_no_comparison_tab() {
        let runs = vec![run("1", "2025-01-01T10:00:00Z", vec![result("a", "passed", 1.0)])];
        let report = Report::build(&runs);
        let html = render_report(&report, &options()).unwrap();
        assert!(!html.contains("switchTab('comparison')"));
        assert!(!html.contains("id=\"comparison\""));
        assert!(html.contains("No flaky tests detected."));
    }

    #[test]
    fn output_is_deterministic() {
        let runs = vec![
            run("2", "2025-01-02T10:00:00Z", vec![result("a", "failed", 2.0)]),
            run("1", "2025-01-01T10:00:00Z", vec![result("a", "passed", 1.0)]),
        ];
        let report = Report::build(&runs);
        let first = render_report(&report, &options()).unwrap();
        let second = render_report(&Report::build(&runs), &options()).unwrap();
        assert_eq!(first, second);
    }
}
