//! Core data types for whenny.
//!
//! This module defines the shared types used throughout the library:
//! - [`TimeUnit`] - Calendar unit tags for arithmetic
//! - [`WeekStart`] - Week boundary configuration
//! - [`BucketWindow`] - Predicate tags for smart bucket selection
//! - [`SmartBucket`] - One entry in an ordered smart-format bucket list
//! - [`ServerFallback`] - Degradation policy for missing timezone context

use serde::{Deserialize, Serialize};

use crate::error::WhennyError;

/// Sentinel template value that delegates a matched bucket to the
/// relative-time engine instead of token rendering.
pub const RELATIVE_SENTINEL: &str = "relative";

/// Calendar unit tag for time arithmetic.
///
/// Used only as an argument; never stored. Singular and plural spellings
/// parse to the same unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimeUnit::Millisecond => "millisecond",
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for TimeUnit {
    type Err = WhennyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "millisecond" | "milliseconds" | "ms" => Ok(TimeUnit::Millisecond),
            "second" | "seconds" | "sec" | "secs" | "s" => Ok(TimeUnit::Second),
            "minute" | "minutes" | "min" | "mins" => Ok(TimeUnit::Minute),
            "hour" | "hours" | "hr" | "hrs" | "h" => Ok(TimeUnit::Hour),
            "day" | "days" | "d" => Ok(TimeUnit::Day),
            "week" | "weeks" | "w" => Ok(TimeUnit::Week),
            "month" | "months" | "mo" => Ok(TimeUnit::Month),
            "year" | "years" | "yr" | "yrs" | "y" => Ok(TimeUnit::Year),
            _ => Err(WhennyError::InvalidConfig(format!(
                "Unknown time unit: '{s}'. Expected one of millisecond, second, minute, hour, day, week, month, year"
            ))),
        }
    }
}

/// Week start day configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// Week starts on Monday (ISO 8601)
    #[default]
    Monday,
    /// Week starts on Sunday
    Sunday,
}

impl std::fmt::Display for WeekStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeekStart::Monday => write!(f, "monday"),
            WeekStart::Sunday => write!(f, "sunday"),
        }
    }
}

/// Predicate tag for a non-terminal smart bucket.
///
/// `Yesterday` is a deliberate two-direction predicate: for a past instant
/// it means "exactly one calendar day before the reference"; for a future
/// instant the same tag means "exactly one calendar day after". Extending
/// this vocabulary should keep that overload in mind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketWindow {
    /// Within 60 seconds of the reference.
    Minute,
    /// Within one hour of the reference.
    Hour,
    /// Same calendar day as the reference.
    Today,
    /// Exactly one calendar day from the reference (either direction).
    Yesterday,
    /// Within one week of the reference.
    Week,
    /// Same calendar year as the reference.
    Year,
}

/// One entry in an ordered smart-format bucket list.
///
/// Buckets are evaluated in list order with first-match-wins. A bucket with
/// `older: true` matches unconditionally; every configured list must end
/// with one, or selection falls through to a raw ISO timestamp.
///
/// The template is either a token template string or the literal
/// [`RELATIVE_SENTINEL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartBucket {
    /// Predicate tag; absent for catch-all buckets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub within: Option<BucketWindow>,
    /// Unconditional match when `Some(true)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub older: Option<bool>,
    /// Token template, or [`RELATIVE_SENTINEL`].
    pub template: String,
}

impl SmartBucket {
    /// Bucket matching a fixed window.
    pub fn within(window: BucketWindow, template: impl Into<String>) -> Self {
        Self {
            within: Some(window),
            older: None,
            template: template.into(),
        }
    }

    /// Unconditional catch-all bucket.
    pub fn older(template: impl Into<String>) -> Self {
        Self {
            within: None,
            older: Some(true),
            template: template.into(),
        }
    }

    /// Whether this bucket is an unconditional catch-all.
    pub fn is_catch_all(&self) -> bool {
        self.older == Some(true)
    }

    /// Whether this bucket delegates to the relative-time engine.
    pub fn is_relative(&self) -> bool {
        self.template == RELATIVE_SENTINEL
    }
}

/// Fallback behavior for smart formatting when timezone context is missing.
///
/// This is an explicit, configured degradation for server-side callers; it
/// exists so a caller never silently renders in the host machine's own zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerFallback {
    /// Emit the raw ISO timestamp.
    #[default]
    RawIso,
    /// Render the `long` preset in UTC with a "UTC" label.
    UtcLong,
    /// Render the `long` preset from local (UTC) fields, unlabeled.
    LocalLong,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn unit_parses_singular_and_plural() {
        assert_eq!(TimeUnit::from_str("minute").unwrap(), TimeUnit::Minute);
        assert_eq!(TimeUnit::from_str("minutes").unwrap(), TimeUnit::Minute);
        assert_eq!(TimeUnit::from_str("Month").unwrap(), TimeUnit::Month);
        assert_eq!(TimeUnit::from_str("years").unwrap(), TimeUnit::Year);
        assert!(TimeUnit::from_str("fortnight").is_err());
    }

    #[test]
    fn unit_display_round_trips() {
        for unit in [
            TimeUnit::Millisecond,
            TimeUnit::Second,
            TimeUnit::Minute,
            TimeUnit::Hour,
            TimeUnit::Day,
            TimeUnit::Week,
            TimeUnit::Month,
            TimeUnit::Year,
        ] {
            assert_eq!(TimeUnit::from_str(&unit.to_string()).unwrap(), unit);
        }
    }

    #[test]
    fn week_start_default_is_monday() {
        assert_eq!(WeekStart::default(), WeekStart::Monday);
    }

    #[test]
    fn bucket_constructors() {
        let b = SmartBucket::within(BucketWindow::Hour, RELATIVE_SENTINEL);
        assert!(b.is_relative());
        assert!(!b.is_catch_all());

        let older = SmartBucket::older("{monthShort} {day}, {year}");
        assert!(older.is_catch_all());
        assert!(!older.is_relative());
    }

    #[test]
    fn bucket_wire_shape() {
        let json = r#"{"within":"minute","template":"relative"}"#;
        let bucket: SmartBucket = serde_json::from_str(json).unwrap();
        assert_eq!(bucket.within, Some(BucketWindow::Minute));
        assert!(bucket.is_relative());

        let json = r#"{"older":true,"template":"{monthShort} {day}, {year}"}"#;
        let bucket: SmartBucket = serde_json::from_str(json).unwrap();
        assert!(bucket.is_catch_all());
    }

    #[test]
    fn server_fallback_default_is_raw_iso() {
        assert_eq!(ServerFallback::default(), ServerFallback::RawIso);
    }
}
