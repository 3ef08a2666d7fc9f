//! Output formatting for `e2e_report`.
//!
//! - [`html`] - the self-contained HTML report
//! - [`text`] - terminal output for `compare` and `flaky`
//! - [`output`] - JSON shapes printed in `--json` mode
//!
//! Machine output goes to stdout; diagnostics go to stderr through `tracing`.

pub mod assets;
pub mod html;
mod output;
mod text;

pub use html::{RenderOptions, html_escape, render_report, script_json};
pub use output::{FlakyTest, GenerateOutput};
pub use text::{
    TextFormatOptions, format_comparison, format_flaky, format_run_label, format_state,
    terminal_width, truncate_name,
};
