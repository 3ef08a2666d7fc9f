//! Plain terminal output for the `compare` and `flaky` commands.
//!
//! Color is optional and applied with `crossterm` styling; the plain form
//! is what tests snapshot.

use crate::analysis::compare::{ComparedTest, RunComparison};
use crate::analysis::pivot::{Outcome, PivotRow};
use crate::model::TestState;
use crate::util::format_duration;
use crossterm::style::Stylize;
use std::fmt::Write as _;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Formatting options for text output.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatOptions {
    pub use_color: bool,
    pub max_width: Option<usize>,
}

impl TextFormatOptions {
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            use_color: false,
            max_width: None,
        }
    }
}

/// Terminal width from `COLUMNS`, 80 otherwise.
#[must_use]
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|columns| columns.trim().parse::<usize>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(80)
}

/// Truncate to `max_len` visible columns, ending in `...` when cut.
#[must_use]
pub fn truncate_name(name: &str, max_len: usize) -> String {
    if UnicodeWidthStr::width(name) <= max_len {
        return name.to_string();
    }
    let (budget, suffix) = if max_len > 3 {
        (max_len - 3, "...")
    } else {
        (max_len, "")
    };

    let mut width = 0;
    let mut out = String::new();
    for c in name.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + cw > budget {
            break;
        }
        width += cw;
        out.push(c);
    }
    out.push_str(suffix);
    out
}

/// Test state, colored green/red/yellow.
#[must_use]
pub fn format_state(state: &TestState, use_color: bool) -> String {
    let label = state.as_str();
    if !use_color {
        return label.to_string();
    }
    match state {
        TestState::Passed => label.to_string().green().to_string(),
        TestState::Failed => label.to_string().red().to_string(),
        TestState::Other(_) | TestState::Unknown => label.to_string().yellow().to_string(),
    }
}

fn heading(text: &str, use_color: bool) -> String {
    if use_color {
        text.to_string().bold().to_string()
    } else {
        text.to_string()
    }
}

fn signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.1}")
    } else {
        format!("{value:.1}")
    }
}

/// Render a comparison as text.
#[must_use]
pub fn format_comparison(cmp: &RunComparison<'_>, options: TextFormatOptions) -> String {
    let mut out = String::new();
    let width = options.max_width.unwrap_or_else(terminal_width);
    let name_width = width.saturating_sub(24).max(20);

    let _ = writeln!(
        out,
        "{}",
        heading(
            &format!("Comparing run {} -> run {}", cmp.run_a, cmp.run_b),
            options.use_color
        )
    );
    let _ = writeln!(out, "Tests compared: {}", cmp.tests_compared);
    let _ = writeln!(
        out,
        "Runtime: {:.1}s -> {:.1}s ({}s, {}%)",
        cmp.runtime_a,
        cmp.runtime_b,
        signed(cmp.runtime_diff),
        signed(cmp.runtime_diff_percent)
    );

    let sections: [(&str, &[ComparedTest<'_>], &str); 3] = [
        ("New failures", &cmp.new_failures, "No new failures"),
        ("Fixed", &cmp.fixed, "No fixed tests"),
        ("Regressions", &cmp.regressions, "No regressions detected"),
    ];
    for (title, tests, empty) in sections {
        out.push('\n');
        let _ = writeln!(
            out,
            "{}",
            heading(&format!("{title} ({})", tests.len()), options.use_color)
        );
        if tests.is_empty() {
            let _ = writeln!(out, "  {empty}");
            continue;
        }
        for test in tests {
            let _ = writeln!(
                out,
                "  {}  {:.2}s -> {:.2}s  [{} -> {}]",
                truncate_name(test.test_name, name_width),
                test.runtime_a,
                test.runtime_b,
                format_state(test.state_a, options.use_color),
                format_state(test.state_b, options.use_color),
            );
        }
    }

    out
}

/// Render the flaky rows among `rows` as text, one line per test.
#[must_use]
pub fn format_flaky(rows: &[PivotRow<'_>], options: TextFormatOptions) -> String {
    let width = options.max_width.unwrap_or_else(terminal_width);
    let name_width = width.saturating_sub(40).max(20);
    let mut out = String::new();
    let mut count = 0usize;

    for row in rows.iter().filter(|row| row.is_flaky) {
        count += 1;
        let history: String = row.runs.sequence().into_iter().map(Outcome::symbol).collect();
        let score = format!("{:>3.0}%", row.flakiness_score);
        let score = if options.use_color {
            score.yellow().to_string()
        } else {
            score
        };
        let _ = writeln!(
            out,
            "{score}  {:<11}  {:>2}/{:<2}  {:<10}  {}",
            row.flakiness_pattern.as_str(),
            row.fail_count,
            row.total_runs,
            truncate_name(&history, 10),
            truncate_name(row.test_name, name_width),
        );
    }

    if count == 0 {
        out.push_str("No flaky tests detected.\n");
    } else {
        let _ = writeln!(out, "\n{count} flaky test(s); newest run first in history.");
    }
    out
}

/// Short run header used by command output: `Run 42 - 2025-01-01 10:00 (1m 5s)`.
#[must_use]
pub fn format_run_label(run_id: &str, date: &str, runtime: f64) -> String {
    format!("Run {run_id} - {date} ({})", format_duration(runtime))
}
