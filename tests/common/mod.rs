#![allow(dead_code)]

use e2e_report::model::{TestResult, TestRun, TestState};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

pub mod cli;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        e2e_report::logging::init_test_logging();
    });
}

/// A temporary results root holding `run-*` directories.
pub struct ResultsDir {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl ResultsDir {
    pub fn new() -> Self {
        init_test_logging();
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }

    pub fn add(&self, run: &RunFixture) -> PathBuf {
        run.write(&self.root)
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join("test_results_report.html")
    }
}

/// One spec record in a fixture report.
#[derive(Debug, Clone)]
pub struct SpecFixture {
    pub hierarchy: Vec<String>,
    pub leaf: String,
    pub state: String,
    pub runtime_secs: f64,
    pub failure: Option<String>,
    pub labels: Vec<String>,
}

impl SpecFixture {
    fn to_json(&self) -> Value {
        let mut spec = json!({
            "ContainerHierarchyTexts": self.hierarchy,
            "ContainerHierarchyLabels": [self.labels.clone()],
            "LeafNodeText": self.leaf,
            "LeafNodeLabels": [],
            "State": self.state,
            "RunTime": self.runtime_secs * 1e9,
        });
        if let Some(message) = &self.failure {
            spec["Failure"] = json!({ "Message": message });
        }
        spec
    }
}

/// Builder for a run directory on disk.
#[derive(Debug, Clone)]
pub struct RunFixture {
    pub dir_name: String,
    pub run_id: String,
    pub start_time: String,
    pub git_branch: String,
    pub git_commit: String,
    pub git_dirty: String,
    pub console_log: Option<String>,
    pub specs: Vec<SpecFixture>,
    pub artifacts: Vec<(String, Value, Vec<(String, String)>)>,
}

impl RunFixture {
    pub fn new(run_id: &str, start_time: &str) -> Self {
        Self {
            dir_name: format!("run-{run_id}"),
            run_id: run_id.to_string(),
            start_time: start_time.to_string(),
            git_branch: "main".to_string(),
            git_commit: "0123456789abcdef".to_string(),
            git_dirty: "false".to_string(),
            console_log: None,
            specs: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    /// Add a spec named `"<container> <leaf>"`.
    #[must_use]
    pub fn spec(mut self, container: &str, leaf: &str, state: &str, runtime_secs: f64) -> Self {
        let failure = (state == "failed").then(|| format!("{leaf}: expected true, got false"));
        self.specs.push(SpecFixture {
            hierarchy: vec![container.to_string()],
            leaf: leaf.to_string(),
            state: state.to_string(),
            runtime_secs,
            failure,
            labels: Vec::new(),
        });
        self
    }

    #[must_use]
    pub fn labeled(mut self, labels: &[&str]) -> Self {
        if let Some(last) = self.specs.last_mut() {
            last.labels = labels.iter().map(ToString::to_string).collect();
        }
        self
    }

    #[must_use]
    pub fn console_log(mut self, text: &str) -> Self {
        self.console_log = Some(text.to_string());
        self
    }

    /// Attach an artifact directory `dir` with its metadata and listed files.
    #[must_use]
    pub fn artifact(mut self, dir: &str, metadata: Value, files: &[(&str, &str)]) -> Self {
        self.artifacts.push((
            dir.to_string(),
            metadata,
            files
                .iter()
                .map(|(name, body)| ((*name).to_string(), (*body).to_string()))
                .collect(),
        ));
        self
    }

    pub fn write(&self, root: &Path) -> PathBuf {
        let dir = root.join(&self.dir_name);
        let artifacts = dir.join("artifacts");
        let reports = dir.join("reports");
        fs::create_dir_all(&artifacts).expect("artifacts dir");
        fs::create_dir_all(&reports).expect("reports dir");

        let metadata = json!({
            "run_id": self.run_id,
            "start_time": self.start_time,
            "git_branch": self.git_branch,
            "git_commit": self.git_commit,
            "git_dirty": self.git_dirty,
            "description": format!("fixture run {}", self.run_id),
            "environment": { "cluster": "kind" },
        });
        fs::write(
            artifacts.join("metadata.json"),
            serde_json::to_string_pretty(&metadata).expect("metadata json"),
        )
        .expect("write metadata");

        let specs: Vec<Value> = self.specs.iter().map(SpecFixture::to_json).collect();
        let report = json!([{ "SpecReports": specs }]);
        fs::write(
            reports.join("report.json"),
            serde_json::to_string_pretty(&report).expect("report json"),
        )
        .expect("write report");

        if let Some(log) = &self.console_log {
            fs::write(reports.join("test-output.log"), log).expect("write console log");
        }

        for (name, metadata, files) in &self.artifacts {
            let artifact_dir = artifacts.join(name);
            fs::create_dir_all(&artifact_dir).expect("artifact dir");
            fs::write(
                artifact_dir.join("metadata.json"),
                serde_json::to_string_pretty(metadata).expect("artifact json"),
            )
            .expect("write artifact metadata");
            for (file, body) in files {
                let path = artifact_dir.join(file);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).expect("artifact subdir");
                }
                fs::write(path, body).expect("write artifact file");
            }
        }

        dir
    }
}

/// In-memory test result named `name`.
pub fn test_result(name: &str, state: &str, runtime: f64) -> TestResult {
    TestResult {
        full_name: name.to_string(),
        leaf_text: name.rsplit(' ').next().unwrap_or(name).to_string(),
        state: TestState::from(state),
        runtime,
        failure_message: if state == "failed" {
            format!("{name} failed")
        } else {
            String::new()
        },
        labels: Vec::new(),
        container_hierarchy: Vec::new(),
        start_time: String::new(),
        end_time: String::new(),
        artifact_metadata: None,
    }
}

/// In-memory run with counts derived from `tests`.
pub fn test_run(run_id: &str, start_time: &str, tests: Vec<TestResult>) -> TestRun {
    TestRun {
        run_id: run_id.to_string(),
        start_time: start_time.to_string(),
        total_tests: tests.len(),
        passed_tests: tests.iter().filter(|t| t.state.is_passed()).count(),
        failed_tests: tests.iter().filter(|t| t.state.is_failed()).count(),
        environment: BTreeMap::new(),
        total_runtime: tests.iter().map(|t| t.runtime).sum(),
        git_commit: String::new(),
        git_branch: String::new(),
        git_dirty: String::new(),
        description: String::new(),
        test_output_log: String::new(),
        tests,
    }
}
