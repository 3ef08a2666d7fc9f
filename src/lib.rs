//! `e2e_report` - aggregate end-to-end test runs into one HTML report.
//!
//! The pipeline is linear: [`scan`] reads run directories into
//! [`model::TestRun`]s, [`analysis`] folds them into pivot rows, trend
//! series and comparisons, and [`format`] renders the result.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod scan;
pub mod util;

pub use error::{ErrorCode, ReportError, Result, StructuredError};
