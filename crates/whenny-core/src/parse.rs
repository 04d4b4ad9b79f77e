//! Date coercion: heterogeneous input -> canonical UTC instant.
//!
//! This module turns the accepted input kinds (an existing instant, an
//! epoch-milliseconds number, or text) into a [`DateTime<Utc>`]. Coercion is
//! strict by policy: malformed, adversarial, or oversized input is an
//! explicit [`WhennyError::InvalidDateInput`], never a best-effort guess.
//!
//! Accepted text grammars:
//! - RFC3339 / ISO-8601 with `Z` or a numeric offset (`2024-01-15T15:30:00Z`)
//! - ISO-8601 without an offset, interpreted as UTC (`2024-01-15T15:30:00`)
//! - Date-only ISO (`2024-01-15`)
//! - ISO-like with a single interior space before the time component
//!   (`2024-01-15 15:30:00`, reparsed with `T` substituted)
//! - A small set of slash/dot regional date formats (`01/15/2024`,
//!   `15.01.2024`, `2024/01/15`)

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{Result, WhennyError};

/// Longest text input the coercion boundary will look at.
///
/// Anything beyond this cannot be a date in any accepted grammar and is
/// rejected before parsing starts.
pub const MAX_TEXT_LEN: usize = 64;

/// The closed set of input kinds accepted by [`coerce`].
///
/// Callers normally rely on the `From` impls rather than constructing
/// variants by hand:
///
/// ```
/// use whenny_core::parse::{DateInput, coerce};
///
/// let from_text = coerce("2024-01-15T15:30:00Z").unwrap();
/// let from_epoch = coerce(1705332600000_i64).unwrap();
/// assert_eq!(from_text, from_epoch);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    /// An already-coerced instant; passes through unchanged.
    Instant(DateTime<Utc>),
    /// Milliseconds since the Unix epoch. Carried as `f64` so that
    /// non-finite values can be rejected rather than wrapped.
    EpochMillis(f64),
    /// Textual input, matched against the accepted grammars.
    Text(String),
}

impl From<DateTime<Utc>> for DateInput {
    fn from(value: DateTime<Utc>) -> Self {
        DateInput::Instant(value)
    }
}

impl From<i64> for DateInput {
    fn from(value: i64) -> Self {
        DateInput::EpochMillis(value as f64)
    }
}

impl From<f64> for DateInput {
    fn from(value: f64) -> Self {
        DateInput::EpochMillis(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value)
    }
}

/// Coerce any accepted input into a UTC instant.
///
/// This is the single entry point of the coercion boundary: every input
/// kind is resolved by one exhaustive match.
///
/// # Errors
///
/// Returns [`WhennyError::InvalidDateInput`] when the input is a non-finite
/// number, an out-of-range epoch, empty or whitespace-only text, text over
/// [`MAX_TEXT_LEN`], text containing markup or non-ASCII characters, or text
/// matching none of the accepted grammars.
pub fn coerce(input: impl Into<DateInput>) -> Result<DateTime<Utc>> {
    match input.into() {
        DateInput::Instant(instant) => Ok(instant),
        DateInput::EpochMillis(ms) => coerce_epoch_millis(ms),
        DateInput::Text(text) => coerce_text(&text),
    }
}

/// Coerce an epoch-milliseconds number, rejecting NaN/infinite values.
fn coerce_epoch_millis(ms: f64) -> Result<DateTime<Utc>> {
    if !ms.is_finite() {
        return Err(WhennyError::InvalidDateInput(format!(
            "epoch milliseconds must be finite, got {ms}"
        )));
    }

    let millis = ms.trunc() as i64;
    Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
        WhennyError::InvalidDateInput(format!("epoch milliseconds out of range: {millis}"))
    })
}

/// Coerce a text input against the accepted grammars.
pub fn coerce_text(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(WhennyError::InvalidDateInput(
            "empty or whitespace-only string".to_string(),
        ));
    }

    if trimmed.len() > MAX_TEXT_LEN {
        return Err(WhennyError::InvalidDateInput(format!(
            "string exceeds {MAX_TEXT_LEN} characters"
        )));
    }

    // Markup and non-ASCII calendar text are rejected outright. Recovering
    // a date from such input would be a guess, and a wrong date is worse
    // than a loud failure.
    if !trimmed.is_ascii() || trimmed.contains('<') || trimmed.contains('>') {
        return Err(WhennyError::InvalidDateInput(format!(
            "unsupported characters in '{trimmed}'"
        )));
    }

    if let Some(instant) = try_iso(trimmed) {
        return Ok(instant);
    }

    // A single interior space before a time component is ISO with the 'T'
    // elided; substitute and reparse.
    if let Some(substituted) = substitute_single_space(trimmed) {
        if let Some(instant) = try_iso(&substituted) {
            return Ok(instant);
        }
    }

    if let Some(instant) = try_regional(trimmed) {
        return Ok(instant);
    }

    Err(WhennyError::InvalidDateInput(format!(
        "unrecognized date string: '{trimmed}'"
    )))
}

/// Coerce text, auto-detecting epoch numbers.
///
/// String inputs arriving over line-oriented surfaces (files, stdin) may be
/// epoch values rather than calendar text. Magnitude decides the epoch
/// granularity: values above 10^10 are milliseconds, smaller integers are
/// seconds. Everything else falls through to [`coerce_text`].
pub fn coerce_text_auto(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(num) = trimmed.parse::<i64>() {
        if num.abs() > 10_000_000_000 {
            return coerce_epoch_millis(num as f64);
        }
        return Utc.timestamp_opt(num, 0).single().ok_or_else(|| {
            WhennyError::InvalidDateInput(format!("epoch seconds out of range: {num}"))
        });
    }

    coerce_text(trimmed)
}

/// Try the ISO-8601 family: offset/Z forms, offset-less forms (read as
/// UTC), and date-only.
fn try_iso(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }

    None
}

/// Substitute 'T' for a single interior space preceding a time component.
fn substitute_single_space(input: &str) -> Option<String> {
    let mut parts = input.splitn(2, ' ');
    let date_part = parts.next()?;
    let time_part = parts.next()?;

    if time_part.contains(' ') || !time_part.contains(':') || !date_part.contains('-') {
        return None;
    }

    Some(format!("{date_part}T{time_part}"))
}

/// Try the small set of slash/dot regional date formats.
fn try_regional(input: &str) -> Option<DateTime<Utc>> {
    const DATETIME_FORMATS: [&str; 2] = ["%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    const DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
        }
    }

    None
}
