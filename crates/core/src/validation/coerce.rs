//! Text-to-value conversions shared by the rule evaluator and the sanitizer.
//!
//! Rules use these to decide whether a value is acceptable; the sanitizer uses
//! the very same functions to produce the typed value, so a value that passed
//! validation always coerces.

use chrono::{DateTime, NaiveDate};

/// Values a checkbox-style flag may carry and still count as unset.
const FALSY: &[&str] = &["false", "0", "off", "no"];

/// Parse a finite decimal number. `NaN` and infinities are rejected.
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse a base-10 integer.
pub fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Parse an ISO-8601 calendar date.
///
/// Accepts a plain `YYYY-MM-DD` date or an RFC 3339 date-time, in which case
/// the date part in the value's own offset is kept.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Whether a submitted flag value means "checked".
///
/// An absent or blank value is unchecked; so are the usual spellings of false.
pub fn is_truthy(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        None | Some("") => false,
        Some(value) => !FALSY.iter().any(|f| value.eq_ignore_ascii_case(f)),
    }
}
