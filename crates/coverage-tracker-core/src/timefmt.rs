//! Date/time formatting helpers for visit records.
//!
//! Visits are stored with human-readable string representations:
//! `MM/DD/YYYY` for the queryable date field and `MM/DD/YYYY HH:MM` for the
//! time-in/time-out endpoints. Callers must not rely on lexical ordering of
//! these strings; `created_at` (RFC 3339) carries the sortable timestamp.
//!
//! All functions operate on `chrono::NaiveDateTime` in local wall-clock terms
//! and are pure.

use chrono::{NaiveDate, NaiveDateTime};

/// Format an instant as a zero-padded `YYYY-MM-DD` calendar date.
pub fn to_calendar_date(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Format an instant as the zero-padded `MM/DD/YYYY` display date.
///
/// This is the canonical stored/queried date representation.
pub fn to_display_date(dt: NaiveDateTime) -> String {
    dt.format("%m/%d/%Y").to_string()
}

/// Format an instant as `MM/DD/YYYY HH:MM` (24-hour clock).
///
/// Returns an empty string for `None`, matching the stored representation of
/// an unset endpoint.
pub fn to_display_date_time(dt: Option<NaiveDateTime>) -> String {
    match dt {
        Some(dt) => dt.format("%m/%d/%Y %H:%M").to_string(),
        None => String::new(),
    }
}

/// Format an instant's time of day as `HH:MM`.
pub fn to_clock_time(dt: NaiveDateTime) -> String {
    dt.format("%H:%M").to_string()
}

/// Extract the `HH:MM` portion of a stored `MM/DD/YYYY HH:MM` string.
///
/// Splits on the first space; empty or malformed input yields an empty string.
pub fn extract_time(date_time: &str) -> String {
    match date_time.split_once(' ') {
        Some((_, time)) => time.to_string(),
        None => String::new(),
    }
}

/// Combine a `YYYY-MM-DD` date and an `HH:MM` time into an instant.
///
/// Seconds are always zeroed. Returns `None` when either part is missing or
/// unparsable; never panics.
pub fn combine(calendar_date: &str, clock_time: &str) -> Option<NaiveDateTime> {
    if calendar_date.is_empty() || clock_time.is_empty() {
        return None;
    }
    let stamp = format!("{calendar_date}T{clock_time}:00");
    NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%dT%H:%M:%S").ok()
}

/// Convert a `YYYY-MM-DD` calendar date into the stored `MM/DD/YYYY` form.
///
/// Returns `None` for unparsable input.
pub fn calendar_to_display_date(calendar_date: &str) -> Option<String> {
    NaiveDate::parse_from_str(calendar_date, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%m/%d/%Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_calendar_date_zero_padded() {
        assert_eq!(to_calendar_date(instant(2025, 7, 9, 8, 5)), "2025-07-09");
    }

    #[test]
    fn test_display_date_zero_padded() {
        assert_eq!(to_display_date(instant(2025, 7, 9, 8, 5)), "07/09/2025");
    }

    #[test]
    fn test_display_date_time() {
        assert_eq!(
            to_display_date_time(Some(instant(2025, 7, 19, 14, 30))),
            "07/19/2025 14:30"
        );
        assert_eq!(to_display_date_time(None), "");
    }

    #[test]
    fn test_extract_time() {
        assert_eq!(extract_time("07/19/2025 14:30"), "14:30");
        assert_eq!(extract_time(""), "");
        assert_eq!(extract_time("07/19/2025"), "");
    }

    #[test]
    fn test_combine_valid() {
        let dt = combine("2025-07-19", "14:30").unwrap();
        assert_eq!(dt, instant(2025, 7, 19, 14, 30));
    }

    #[test]
    fn test_combine_missing_or_malformed() {
        assert!(combine("", "14:30").is_none());
        assert!(combine("2025-07-19", "").is_none());
        assert!(combine("not-a-date", "14:30").is_none());
        assert!(combine("2025-07-19", "25:99").is_none());
    }

    #[test]
    fn test_round_trip_clock_time() {
        let dt = instant(2025, 1, 2, 0, 7);
        assert_eq!(extract_time(&to_display_date_time(Some(dt))), "00:07");
        assert_eq!(extract_time(&to_display_date_time(Some(dt))), to_clock_time(dt));
    }

    #[test]
    fn test_calendar_to_display_date() {
        assert_eq!(
            calendar_to_display_date("2025-07-09").as_deref(),
            Some("07/09/2025")
        );
        assert!(calendar_to_display_date("07/09/2025").is_none());
        assert!(calendar_to_display_date("").is_none());
    }
}
