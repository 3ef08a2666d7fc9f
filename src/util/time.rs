//! Timestamp parsing and formatting.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use std::time::SystemTime;

/// Parse a run start time.
///
/// Accepts RFC 3339 (what the Go collector writes, including nanosecond
/// fractions) and naive ISO-8601 without an offset, which is read as UTC.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a start time as `YYYY-MM-DD HH:MM`, in the timestamp's own offset.
///
/// Unparseable input is returned unchanged.
#[must_use]
pub fn short_date(s: &str) -> String {
    let trimmed = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format("%Y-%m-%d %H:%M").to_string();
    }
    s.to_string()
}

/// RFC 3339 form of a file modification time.
#[must_use]
pub fn system_time_rfc3339(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339()
}

/// Local "generated on" stamp for the report header.
#[must_use]
pub fn generated_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn parses_go_rfc3339_nanos() {
        let dt = parse_timestamp("2025-11-20T14:03:07.123456789+01:00").unwrap();
        assert_eq!(dt.hour(), 13);
        assert_eq!(dt.minute(), 3);
    }

    #[test]
    fn parses_naive_iso_as_utc() {
        let dt = parse_timestamp("2025-11-20T14:03:07.5").unwrap();
        assert_eq!(dt.day(), 20);
        assert_eq!(dt.hour(), 14);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn short_date_keeps_offset() {
        assert_eq!(short_date("2025-11-20T14:03:07+01:00"), "2025-11-20 14:03");
        assert_eq!(short_date("2025-11-20T14:03:07"), "2025-11-20 14:03");
        assert_eq!(short_date("whenever"), "whenever");
    }

    #[test]
    fn system_time_is_utc_rfc3339() {
        let time: SystemTime = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap().into();
        assert_eq!(system_time_rfc3339(time), "2024-05-06T07:08:09+00:00");
    }
}
