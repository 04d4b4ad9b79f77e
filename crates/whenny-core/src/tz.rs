//! Timezone offsets and wall-clock projection.
//!
//! This module is the one platform-specific boundary of the library: it
//! resolves IANA zone names, UTC offsets, and abbreviations through the
//! host's timezone database (chrono-tz). No timezone data is bundled;
//! accuracy, including DST transitions, comes entirely from the host data.
//!
//! The [`TimezoneProvider`] trait keeps that boundary narrow so alternative
//! hosts can be swapped in without touching the formatting layers.

use chrono::{DateTime, Duration, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::{OffsetName, Tz};

use crate::error::{Result, WhennyError};

/// Narrow interface over the host timezone facility.
///
/// Implementations must fail with [`WhennyError::InvalidTimezone`] for
/// unrecognized zone names rather than substituting a silently wrong offset.
pub trait TimezoneProvider {
    /// UTC offset of `zone` at `instant`, in minutes (negative west of UTC).
    fn offset_minutes(&self, zone: &str, instant: DateTime<Utc>) -> Result<i32>;

    /// Short timezone name at `instant` (e.g., "EST"), as the host reports
    /// it. Falls back to the formatted offset when the host has no
    /// abbreviation for the zone.
    fn abbreviation(&self, zone: &str, instant: DateTime<Utc>) -> Result<String>;
}

/// [`TimezoneProvider`] backed by the chrono-tz copy of the IANA database.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostTimezones;

impl TimezoneProvider for HostTimezones {
    fn offset_minutes(&self, zone: &str, instant: DateTime<Utc>) -> Result<i32> {
        let tz = parse_tz(zone)?;
        let offset = tz.offset_from_utc_datetime(&instant.naive_utc());
        Ok(offset.fix().local_minus_utc() / 60)
    }

    fn abbreviation(&self, zone: &str, instant: DateTime<Utc>) -> Result<String> {
        let tz = parse_tz(zone)?;
        let offset = tz.offset_from_utc_datetime(&instant.naive_utc());
        match offset.abbreviation() {
            Some(abbr) => Ok(abbr.to_string()),
            None => Ok(format_offset_string(offset.fix().local_minus_utc() / 60)),
        }
    }
}

/// Parse an IANA timezone name (or the literal "UTC") into a [`chrono_tz::Tz`].
///
/// # Errors
///
/// Returns [`WhennyError::InvalidTimezone`] if the name is not in the host
/// timezone database.
///
/// # Examples
///
/// ```
/// use whenny_core::tz::parse_tz;
///
/// let tz = parse_tz("America/New_York").unwrap();
/// assert_eq!(tz.to_string(), "America/New_York");
/// assert!(parse_tz("Mars/Olympus").is_err());
/// ```
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| WhennyError::InvalidTimezone(name.to_string()))
}

/// UTC offset of `zone` at `instant`, in minutes.
pub fn offset_minutes(zone: &str, instant: DateTime<Utc>) -> Result<i32> {
    HostTimezones.offset_minutes(zone, instant)
}

/// Short timezone name of `zone` at `instant`.
pub fn abbreviation(zone: &str, instant: DateTime<Utc>) -> Result<String> {
    HostTimezones.abbreviation(zone, instant)
}

/// Format an offset in minutes as `+HH:MM` / `-HH:MM`.
///
/// The sign is mandatory and both fields are two-digit padded.
///
/// # Examples
///
/// ```
/// use whenny_core::tz::format_offset_string;
///
/// assert_eq!(format_offset_string(-300), "-05:00");
/// assert_eq!(format_offset_string(330), "+05:30");
/// assert_eq!(format_offset_string(0), "+00:00");
/// ```
pub fn format_offset_string(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

/// Project an instant into the wall-clock fields of `zone`.
///
/// The result carries no offset of its own; it is the local calendar date
/// and time an observer in `zone` would read at that instant. Date
/// rollovers across midnight are reflected in the projected fields.
pub fn project(zone: &str, instant: DateTime<Utc>) -> Result<NaiveDateTime> {
    let tz = parse_tz(zone)?;
    Ok(instant.with_timezone(&tz).naive_local())
}

/// Shift a naive wall clock by an offset in minutes.
///
/// Used by the transfer protocol, which works with a frozen numeric offset
/// rather than a live zone lookup.
pub fn shift_by_offset(naive: NaiveDateTime, offset_min: i32) -> NaiveDateTime {
    naive + Duration::minutes(i64::from(offset_min))
}
