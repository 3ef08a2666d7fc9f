use assert_cmd::Command;
use std::ffi::OsStr;
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct ReportRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
    pub duration: Duration,
}

/// Run the binary with `cwd` as working and home directory.
pub fn run_report<I, S>(cwd: &Path, args: I) -> ReportRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_report_with_env(cwd, args, std::iter::empty::<(String, String)>())
}

pub fn run_report_with_env<I, S, E, K, V>(cwd: &Path, args: I, env_vars: E) -> ReportRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("e2e-report"));
    cmd.current_dir(cwd);
    cmd.args(args);
    cmd.env("NO_COLOR", "1");
    cmd.env("RUST_LOG", "e2e_report=debug");
    cmd.env("RUST_BACKTRACE", "1");
    cmd.env("HOME", cwd);
    cmd.envs(env_vars);

    let start = Instant::now();
    let output = cmd.output().expect("run e2e-report");
    let duration = start.elapsed();

    ReportRun {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        status: output.status,
        duration,
    }
}

/// The structured error JSON printed last on stderr, after any log lines.
pub fn error_json(stderr: &str) -> serde_json::Value {
    let start = if stderr.starts_with('{') {
        0
    } else {
        stderr.find("\n{").map(|pos| pos + 1).expect("structured error on stderr")
    };
    serde_json::from_str(&stderr[start..]).expect("structured error json")
}
