//! Results directory scanning.
//!
//! A results root holds one directory per suite execution:
//!
//! ```text
//! <root>/run-<id>/artifacts/metadata.json      run metadata
//! <root>/run-<id>/artifacts/<test>/metadata.json  per-test artifacts
//! <root>/run-<id>/reports/report.json          Ginkgo JSON report
//! <root>/run-<id>/reports/test-output.log      console output (optional)
//! ```
//!
//! A missing root holds no runs. Broken runs are logged and skipped.

pub mod artifacts;
pub mod extract;
pub mod schema;

use crate::config::ScanOptions;
use crate::error::Result;
use crate::model::TestRun;
use crate::util::tail_lines;
use crate::util::time::system_time_rfc3339;
use anyhow::Context;
use artifacts::ArtifactIndex;
use schema::{RunMetadata, SuiteReport};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const ARTIFACTS_DIR: &str = "artifacts";
const REPORTS_DIR: &str = "reports";
const RUN_METADATA_FILE: &str = "metadata.json";
const REPORT_FILE: &str = "report.json";
const CONSOLE_LOG_FILE: &str = "test-output.log";

/// Scan every run directory under `root`.
///
/// Returns runs newest-first. A root that does not exist yields no runs.
///
/// # Errors
///
/// Returns an error if `root` exists but cannot be listed.
pub fn scan_results(root: &Path, options: &ScanOptions) -> Result<Vec<TestRun>> {
    if !root.is_dir() {
        warn!(root = %root.display(), "Results directory not found");
        return Ok(Vec::new());
    }

    let mut run_dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(std::result::Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(&options.run_prefix))
        })
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    run_dirs.sort();

    debug!(count = run_dirs.len(), root = %root.display(), "Found run directories");

    let mut runs = Vec::with_capacity(run_dirs.len());
    let mut seen_ids = HashSet::new();
    for dir in &run_dirs {
        match parse_run(dir, root, options) {
            Ok(mut run) => {
                if !seen_ids.insert(run.run_id.clone()) {
                    let unique = disambiguated_id(&run.run_id, dir);
                    warn!(
                        run_id = %run.run_id,
                        dir = %dir.display(),
                        renamed = %unique,
                        "Duplicate run id"
                    );
                    run.run_id = unique;
                    seen_ids.insert(run.run_id.clone());
                }
                debug!(run_id = %run.run_id, tests = run.tests.len(), "Parsed run");
                runs.push(run);
            }
            Err(e) => warn!(dir = %dir.display(), error = %format!("{e:#}"), "Skipping run"),
        }
    }

    sort_newest_first(&mut runs);
    info!(runs = runs.len(), skipped = run_dirs.len() - runs.len(), "Scan complete");
    Ok(runs)
}

/// A run id that already belongs to another run gets its directory name
/// appended, so every column of the report keys a distinct run.
fn disambiguated_id(run_id: &str, dir: &Path) -> String {
    let dir_name = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{run_id} ({dir_name})")
}

/// Order runs newest-first by start time.
pub fn sort_newest_first(runs: &mut [TestRun]) {
    runs.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
}

/// Parse one run directory.
///
/// # Errors
///
/// Fails when the run metadata or the report is missing or malformed.
pub fn parse_run(dir: &Path, results_root: &Path, options: &ScanOptions) -> anyhow::Result<TestRun> {
    let artifacts_dir = dir.join(ARTIFACTS_DIR);
    let metadata_path = artifacts_dir.join(RUN_METADATA_FILE);
    let report_path = dir.join(REPORTS_DIR).join(REPORT_FILE);

    let metadata_text = fs::read_to_string(&metadata_path)
        .with_context(|| format!("reading {}", metadata_path.display()))?;
    let metadata: RunMetadata = serde_json::from_str(&metadata_text)
        .with_context(|| format!("parsing {}", metadata_path.display()))?;

    let report_text = fs::read_to_string(&report_path)
        .with_context(|| format!("reading {}", report_path.display()))?;
    let report: Value = serde_json::from_str(&report_text)
        .with_context(|| format!("parsing {}", report_path.display()))?;
    let suites: Vec<SuiteReport> = if report.is_array() {
        serde_json::from_value(report)
            .with_context(|| format!("parsing {}", report_path.display()))?
    } else {
        warn!(path = %report_path.display(), "Report is not a list of suites; run has no tests");
        Vec::new()
    };

    let index = ArtifactIndex::build(&artifacts_dir);
    debug!(artifacts = index.len(), dir = %dir.display(), "Indexed test artifacts");

    let tests = extract::extract_tests(&suites, &index, results_root, options);

    let run_id = metadata.run_id.unwrap_or_else(|| {
        dir.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let start_time = metadata
        .start_time
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            fs::metadata(&metadata_path)
                .and_then(|m| m.modified())
                .ok()
                .map(system_time_rfc3339)
        })
        .unwrap_or_default();

    let total_tests = metadata.total_tests.unwrap_or(tests.len());
    let passed_tests = metadata
        .passed_tests
        .unwrap_or_else(|| tests.iter().filter(|t| t.state.is_passed()).count());
    let failed_tests = metadata
        .failed_tests
        .unwrap_or_else(|| tests.iter().filter(|t| t.state.is_failed()).count());
    let total_runtime = tests.iter().map(|t| t.runtime).sum();

    let test_output_log = read_console_log(
        &dir.join(REPORTS_DIR).join(CONSOLE_LOG_FILE),
        options.console_log_max_lines,
    );

    Ok(TestRun {
        run_id,
        start_time,
        total_tests,
        passed_tests,
        failed_tests,
        environment: metadata.environment,
        total_runtime,
        git_commit: metadata.git_commit,
        git_branch: metadata.git_branch,
        git_dirty: metadata.git_dirty,
        description: metadata.description,
        test_output_log,
        tests,
    })
}

/// Read the console log, keeping at most `max_lines` trailing lines.
///
/// A missing log is empty. Read failures are reported inline.
#[must_use]
pub fn read_console_log(path: &Path, max_lines: usize) -> String {
    if !path.exists() {
        return String::new();
    }
    match fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            let tail = tail_lines(&text, max_lines);
            if tail.truncated {
                format!(
                    "Log truncated. Showing last {} of {} lines.\n\n{}",
                    group_thousands(max_lines),
                    group_thousands(tail.total_lines),
                    tail.text
                )
            } else {
                tail.text
            }
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read console log");
            format!("Error reading log file: {e}")
        }
    }
}

/// Sorted set of every label seen in any run.
#[must_use]
pub fn collect_labels(runs: &[TestRun]) -> Vec<String> {
    runs.iter()
        .flat_map(|run| &run.tests)
        .flat_map(|test| &test.labels)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_run(root: &Path, name: &str, metadata: &str, report: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(dir.join(ARTIFACTS_DIR)).unwrap();
        fs::create_dir_all(dir.join(REPORTS_DIR)).unwrap();
        fs::write(dir.join(ARTIFACTS_DIR).join(RUN_METADATA_FILE), metadata).unwrap();
        fs::write(dir.join(REPORTS_DIR).join(REPORT_FILE), report).unwrap();
        dir
    }

    const REPORT: &str = r#"[{"SpecReports": [
        {"LeafNodeText": "starts", "ContainerHierarchyTexts": ["Agent"],
         "LeafNodeLabels": ["smoke"], "State": "passed", "RunTime": 1000000000},
        {"LeafNodeText": "stops", "ContainerHierarchyTexts": ["Agent"],
         "ContainerHierarchyLabels": [["core"]], "State": "failed", "RunTime": 3000000000,
         "FailureMessage": "timed out"}
    ]}]"#;

    #[test]
    fn missing_root_has_no_runs() {
        crate::logging::init_test_logging();
        let temp = TempDir::new().unwrap();
        let runs = scan_results(&temp.path().join("missing"), &ScanOptions::default()).unwrap();
        assert!(runs.is_empty());
    }

    #[test]
    fn runs_sorted_newest_first_and_broken_runs_skipped() {
        crate::logging::init_test_logging();
        let temp = TempDir::new().unwrap();
        write_run(
            temp.path(),
            "run-a",
            r#"{"run_id": "a", "start_time": "2025-01-01T10:00:00Z"}"#,
            REPORT,
        );
        write_run(
            temp.path(),
            "run-b",
            r#"{"run_id": "b", "start_time": "2025-01-02T10:00:00Z"}"#,
            REPORT,
        );
        write_run(temp.path(), "run-broken", "{not json", REPORT);
        fs::create_dir_all(temp.path().join("run-empty")).unwrap();
        write_run(temp.path(), "other-c", r#"{"run_id": "c"}"#, REPORT);

        let runs = scan_results(temp.path(), &ScanOptions::default()).unwrap();
        let ids: Vec<_> = runs.iter().map(|r| r.run_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn duplicate_run_ids_get_directory_suffix() {
        crate::logging::init_test_logging();
        let temp = TempDir::new().unwrap();
        write_run(
            temp.path(),
            "run-a",
            r#"{"run_id": "7", "start_time": "2025-01-01T10:00:00Z"}"#,
            REPORT,
        );
        write_run(
            temp.path(),
            "run-b",
            r#"{"run_id": "7", "start_time": "2025-01-02T10:00:00Z"}"#,
            REPORT,
        );

        let runs = scan_results(temp.path(), &ScanOptions::default()).unwrap();
        let ids: Vec<_> = runs.iter().map(|r| r.run_id.as_str()).collect();
        assert_eq!(ids, vec!["7 (run-b)", "7"]);
    }

    #[test]
    fn metadata_defaults_come_from_directory_and_tests() {
        let temp = TempDir::new().unwrap();
        let dir = write_run(temp.path(), "run-42", "{}", REPORT);

        let run = parse_run(&dir, temp.path(), &ScanOptions::default()).unwrap();
        assert_eq!(run.run_id, "run-42");
        assert!(run.started_at().is_some());
        assert_eq!(run.total_tests, 2);
        assert_eq!(run.passed_tests, 1);
        assert_eq!(run.failed_tests, 1);
        assert!((run.total_runtime - 4.0).abs() < 1e-9);
        assert_eq!(run.test_output_log, "");

        let stops = &run.tests[1];
        assert_eq!(stops.full_name, "Agent stops");
        assert_eq!(stops.failure_message, "timed out");
        assert_eq!(stops.labels, vec!["core"]);
    }

    #[test]
    fn reported_totals_are_kept() {
        let temp = TempDir::new().unwrap();
        let dir = write_run(
            temp.path(),
            "run-1",
            r#"{"run_id": "1", "total_tests": 10, "passed_tests": 9, "failed_tests": 1,
                "git_branch": "main", "environment": {"k8s": "1.30"}}"#,
            REPORT,
        );
        let run = parse_run(&dir, temp.path(), &ScanOptions::default()).unwrap();
        assert_eq!(run.total_tests, 10);
        assert_eq!(run.passed_tests, 9);
        assert_eq!(run.git_branch, "main");
        assert_eq!(run.environment["k8s"], "1.30");
    }

    #[test]
    fn report_object_keeps_run_without_tests() {
        let temp = TempDir::new().unwrap();
        let dir = write_run(
            temp.path(),
            "run-1",
            r#"{"run_id": "1", "start_time": "2025-01-01T10:00:00Z"}"#,
            r#"{"SuiteDescription": "not wrapped in a list"}"#,
        );
        let run = parse_run(&dir, temp.path(), &ScanOptions::default()).unwrap();
        assert_eq!(run.run_id, "1");
        assert!(run.tests.is_empty());
        assert_eq!(run.total_tests, 0);
        assert!(run.total_runtime.abs() < f64::EPSILON);
    }

    #[test]
    fn missing_report_fails_parse() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("run-1");
        fs::create_dir_all(dir.join(ARTIFACTS_DIR)).unwrap();
        fs::write(dir.join(ARTIFACTS_DIR).join(RUN_METADATA_FILE), "{}").unwrap();
        let err = parse_run(&dir, temp.path(), &ScanOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("report.json"));
    }

    #[test]
    fn console_log_is_tailed_with_notice() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.log");
        let text: String = (1..=5).map(|i| format!("line {i}\n")).collect();
        fs::write(&path, text).unwrap();

        let log = read_console_log(&path, 2);
        assert_eq!(log, "Log truncated. Showing last 2 of 5 lines.\n\nline 4\nline 5\n");
        assert_eq!(read_console_log(&path, 10).lines().count(), 5);
        assert_eq!(read_console_log(&temp.path().join("none.log"), 10), "");
    }

    #[test]
    fn labels_are_sorted_and_unique() {
        let temp = TempDir::new().unwrap();
        write_run(temp.path(), "run-1", r#"{"run_id": "1"}"#, REPORT);
        write_run(temp.path(), "run-2", r#"{"run_id": "2"}"#, REPORT);
        let runs = scan_results(temp.path(), &ScanOptions::default()).unwrap();
        assert_eq!(collect_labels(&runs), vec!["core", "smoke"]);
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(7), "7");
        assert_eq!(group_thousands(10_000), "10,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
