//! Lenient parsing of amount and date cells
//!
//! Source cells are free text. Nothing in here fails: an unparseable value is
//! `None` and callers decide whether to drop it or pass the raw text through.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Japan Standard Time offset applied to zoned timestamps
const JST_OFFSET_HOURS: i64 = 9;

/// Parse a numeric cell, ignoring thousands separators
pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned = value.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Round down to a whole number and render without a fractional part
pub fn format_floor(value: f64) -> String {
    let floored = value.floor();
    if floored.abs() < i64::MAX as f64 {
        (floored as i64).to_string()
    } else {
        format!("{:.0}", floored)
    }
}

/// Render an integer-valued number plainly, anything else with two decimals
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format_floor(value)
    } else {
        format!("{:.2}", value)
    }
}

/// Floor a numeric cell; unparseable text passes through unchanged
pub fn normalize_integer_amount(value: &str) -> String {
    match parse_number(value) {
        Some(n) => format_floor(n),
        None => value.to_string(),
    }
}

/// Parse a date cell into JST wall-clock time
///
/// Timestamps that carry a zone (`2025-01-10T23:30:00Z`) are shifted by a
/// flat +9h. Date-only ISO values are read as UTC midnight. Everything else
/// is already a local (JST) reading and kept as is.
pub fn safe_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc() + Duration::hours(JST_OFFSET_HOURS));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.naive_utc() + Duration::hours(JST_OFFSET_HOURS));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN) + Duration::hours(JST_OFFSET_HOURS));
    }

    let local_datetime_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];
    for fmt in local_datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    let local_date_formats = [
        "%Y/%m/%d", // 2025/01/10
        "%m/%d/%Y", // 01/10/2025
    ];
    for fmt in local_date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    None
}

/// Format a date cell as `YYYY/MM/DD` in JST, or "" when unparseable
pub fn format_jst_date(value: &str) -> String {
    safe_date(value)
        .map(|dt| dt.format("%Y/%m/%d").to_string())
        .unwrap_or_default()
}
