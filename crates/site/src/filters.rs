//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a timestamp string as a short date.
///
/// Input that is not an RFC 3339 timestamp is returned unchanged.
///
/// Usage in templates: `{{ quote.created_at|short_date }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn short_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(chrono::DateTime::parse_from_rfc3339(&raw)
        .map_or(raw, |date| date.format("%d %b %Y").to_string()))
}
