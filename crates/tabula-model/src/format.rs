//! Canonical string formats and lenient parsers.
//!
//! Every typed view of a field value is derived from its canonical string
//! through these helpers, and every typed setter formats through them, so a
//! value written with a typed setter reads back unchanged.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::field_type::FieldType;

/// Canonical format of Date values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Canonical format of Time values.
pub const TIME_FORMAT: &str = "%H:%M:%S";
/// Canonical format of DateTime values.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Default literal that resolves to the current date/time when assigned.
pub const DEFAULT_TODAY: &str = "today";

const DATE_TIME_INPUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

const TIME_INPUTS: [&str; 3] = ["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];

pub fn parse_i32(text: &str) -> Option<i32> {
    text.trim().parse().ok()
}

pub fn parse_i64(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

pub fn parse_f32(text: &str) -> Option<f32> {
    text.trim().parse().ok()
}

pub fn parse_f64(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

/// Parses a boolean, accepting `true/false`, `yes/no`, `y/n`, `on/off` and
/// `1/0` in any case.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Parses a date, time or date-time string into an instant.
///
/// Accepted inputs, tried in order:
/// - canonical and space-separated date-times, with optional fraction
/// - RFC 3339 (converted to UTC)
/// - a bare date (midnight)
/// - a bare time (on 1970-01-01)
/// - epoch milliseconds
pub fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for fmt in DATE_TIME_INPUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return date.and_hms_opt(0, 0, 0);
    }

    for fmt in TIME_INPUTS {
        if let Ok(time) = NaiveTime::parse_from_str(text, fmt) {
            return NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(time));
        }
    }

    let digits = text.strip_prefix('-').unwrap_or(text);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        let millis: i64 = text.parse().ok()?;
        return DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.naive_utc());
    }

    None
}

/// Formats an instant in the canonical form of the given temporal type.
///
/// Non-temporal types use the DateTime form.
pub fn format_temporal(value: &NaiveDateTime, field_type: FieldType) -> String {
    match field_type {
        FieldType::Date => value.format(DATE_FORMAT).to_string(),
        FieldType::Time => value.format(TIME_FORMAT).to_string(),
        _ => value.format(DATE_TIME_FORMAT).to_string(),
    }
}

/// Resolves the `today` default for the given type at call time.
pub fn resolve_today(field_type: FieldType) -> String {
    let now = Local::now().naive_local();
    match field_type {
        FieldType::Time | FieldType::DateTime => format_temporal(&now, field_type),
        _ => format_temporal(&now, FieldType::Date),
    }
}

/// Returns `true` if `text` is the `today` default literal.
pub fn is_today_literal(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(DEFAULT_TODAY)
}
