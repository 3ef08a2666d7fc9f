//! Command implementations.

pub mod compare;
pub mod flaky;
pub mod generate;

use crate::config::{self, CliOverrides, ReportConfig};
use crate::error::Result;
use crate::model::TestRun;
use crate::scan;
use std::path::Path;

/// Resolve configuration for `results_dir` and scan its runs, newest first.
pub(crate) fn load_runs(
    results_dir: &Path,
    cli: &CliOverrides,
) -> Result<(ReportConfig, Vec<TestRun>)> {
    let config = config::load_config(results_dir, cli)?;
    let runs = scan::scan_results(results_dir, &config.scan)?;
    Ok((config, runs))
}
