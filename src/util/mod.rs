//! Shared utilities for `e2e_report`.
//!
//! - Duration formatting for run headers and cards
//! - Line/byte truncation for embedded logs and resources
//! - Timestamp parsing (see [`time`])

pub mod time;

/// Format seconds as `1h 2m 3s`, `2m 3s` or `3s`.
///
/// Zero, negative and non-finite values render as `N/A`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "N/A".to_string();
    }

    let whole = seconds as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Round to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Result of keeping only the tail of a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tail {
    pub text: String,
    pub total_lines: usize,
    pub truncated: bool,
}

/// Keep the last `max_lines` lines of `text`, preserving line endings.
#[must_use]
pub fn tail_lines(text: &str, max_lines: usize) -> Tail {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let total_lines = lines.len();
    if total_lines <= max_lines {
        return Tail {
            text: text.to_string(),
            total_lines,
            truncated: false,
        };
    }
    Tail {
        text: lines[total_lines - max_lines..].concat(),
        total_lines,
        truncated: true,
    }
}

/// Cut `text` to at most `max_bytes`, backing off to a char boundary.
///
/// Returns `None` when no cut was needed.
#[must_use]
pub fn truncate_bytes(text: &str, max_bytes: usize) -> Option<&str> {
    if text.len() <= max_bytes {
        return None;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    Some(&text[..end])
}
