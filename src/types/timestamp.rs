//! Timestamp parsing for observation feeds.
//!
//! Feeds mix ISO-8601 strings (with or without an offset) and plain
//! `YYYY-MM-DD HH:MM:SS` values. Everything resolves to a timezone-naive
//! `NaiveDateTime` holding the wall-clock time as written in the feed: an offset,
//! when present, is dropped rather than applied.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a feed timestamp into its local wall-clock time.
///
/// Returns `None` when no supported format matches.
///
/// # Examples
///
/// ```
/// use chrono::Timelike;
/// use weather_profiles::parse_timestamp;
///
/// let plain = parse_timestamp("2024-01-01 05:30:00").unwrap();
/// assert_eq!(plain.hour(), 5);
///
/// // The offset is not applied: 05:30 stays 05:30.
/// let offset = parse_timestamp("2024-01-01T05:30:00+02:00").unwrap();
/// assert_eq!(offset.hour(), 5);
///
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // Full RFC 3339, including the `Z` suffix
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.naive_local());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ndt);
        }
    }
    // Bare date, counted as midnight
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
