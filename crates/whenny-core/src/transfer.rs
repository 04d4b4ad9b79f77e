//! Transfer protocol: timezone-context-preserving serialization.
//!
//! A [`TransferPayload`] carries an instant across a serialization boundary
//! together with its origin zone and the origin's numeric UTC offset at
//! that instant. The offset is resolved once, at creation, and frozen into
//! the payload; a consumer far from the origin never recomputes it, so the
//! payload stays internally consistent wherever it lands.
//!
//! Origin-zone day boundaries are derived with that same frozen offset.
//! On a DST transition day the offset at the boundary instant can differ
//! from the offset at creation time, so the derived boundary can be off by
//! the DST delta. Re-deriving would change observable output; the
//! approximation is kept.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WhennyError};
use crate::parse::{coerce, DateInput};
use crate::tz;

/// The flat, JSON-serializable wire triple.
///
/// Round-trips byte-for-byte through JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPayload {
    /// ISO-8601 UTC timestamp, millisecond precision, `Z` suffix.
    pub iso: String,
    /// IANA zone name (or `"UTC"`) the instant originated in.
    #[serde(rename = "originZone")]
    pub origin_zone: String,
    /// UTC offset of the origin zone at this instant, in minutes.
    #[serde(rename = "originOffset")]
    pub origin_offset: i32,
}

/// A deserialized payload with origin-relative derived values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedTransfer {
    instant: DateTime<Utc>,
    origin_zone: String,
    origin_offset: i32,
}

/// Create a payload for an instant originating in `zone`.
///
/// The offset is computed here, once, and frozen into the payload.
///
/// # Errors
///
/// [`WhennyError::InvalidTimezone`] for an unrecognized zone;
/// [`WhennyError::InvalidDateInput`] when the input cannot be coerced.
///
/// # Examples
///
/// ```
/// use whenny_core::transfer::create_transfer;
///
/// let payload = create_transfer("2024-01-15T15:30:00Z", "America/New_York").unwrap();
/// assert_eq!(payload.iso, "2024-01-15T15:30:00.000Z");
/// assert_eq!(payload.origin_offset, -300);
/// ```
pub fn create_transfer(input: impl Into<DateInput>, zone: &str) -> Result<TransferPayload> {
    let instant = coerce(input)?;
    let origin_offset = tz::offset_minutes(zone, instant)?;

    Ok(TransferPayload {
        iso: instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        origin_zone: zone.to_string(),
        origin_offset,
    })
}

/// Reconstruct a received payload into its instant plus origin context.
///
/// # Errors
///
/// [`WhennyError::InvalidTransferPayload`] when the embedded ISO string
/// does not parse to a valid instant or the zone field is empty. The
/// frozen offset is trusted as-is; it is not recomputed here.
pub fn from_transfer(payload: &TransferPayload) -> Result<ReceivedTransfer> {
    if payload.origin_zone.trim().is_empty() {
        return Err(WhennyError::InvalidTransferPayload(
            "originZone must be a timezone name".to_string(),
        ));
    }

    let instant = DateTime::parse_from_rfc3339(&payload.iso)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            WhennyError::InvalidTransferPayload(format!("iso '{}': {e}", payload.iso))
        })?;

    Ok(ReceivedTransfer {
        instant,
        origin_zone: payload.origin_zone.clone(),
        origin_offset: payload.origin_offset,
    })
}

/// Deserialize and reconstruct from untyped JSON.
///
/// # Errors
///
/// [`WhennyError::InvalidTransferPayload`] when the value's shape is wrong
/// (missing or mistyped fields) or the embedded ISO string is invalid.
pub fn from_transfer_value(value: &serde_json::Value) -> Result<ReceivedTransfer> {
    let payload: TransferPayload = serde_json::from_value(value.clone())
        .map_err(|e| WhennyError::InvalidTransferPayload(e.to_string()))?;
    from_transfer(&payload)
}

/// Structural check: does this JSON value look like a transfer payload?
///
/// Never fails; defensive call sites use this to distinguish a payload
/// from a bare date value before deciding how to parse.
pub fn is_transfer_payload(value: &serde_json::Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };

    object.get("iso").is_some_and(serde_json::Value::is_string)
        && object
            .get("originZone")
            .is_some_and(serde_json::Value::is_string)
        && object
            .get("originOffset")
            .and_then(serde_json::Value::as_i64)
            .is_some_and(|n| i32::try_from(n).is_ok())
}

impl ReceivedTransfer {
    /// The instant, unchanged.
    pub fn utc(&self) -> DateTime<Utc> {
        self.instant
    }

    /// The origin zone name carried by the payload.
    pub fn origin_zone(&self) -> &str {
        &self.origin_zone
    }

    /// The frozen origin offset, in minutes.
    pub fn origin_offset(&self) -> i32 {
        self.origin_offset
    }

    /// Origin wall-clock fields: the instant shifted by the frozen offset.
    pub fn in_origin(&self) -> NaiveDateTime {
        tz::shift_by_offset(self.instant.naive_utc(), self.origin_offset)
    }

    /// Wall-clock fields in a different zone, from a freshly derived
    /// offset.
    ///
    /// # Errors
    ///
    /// Unlike the frozen-offset paths, this lookup can fail with
    /// [`WhennyError::InvalidTimezone`].
    pub fn in_zone(&self, zone: &str) -> Result<NaiveDateTime> {
        tz::project(zone, self.instant)
    }

    /// UTC instant of midnight on the origin-zone calendar day.
    ///
    /// Uses the frozen offset for both directions of the projection.
    pub fn start_of_day_in_origin(&self) -> DateTime<Utc> {
        let wall_date = self.in_origin().date();
        let midnight = wall_date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid");
        self.wall_to_utc(midnight)
    }

    /// UTC instant of the last millisecond of the origin-zone calendar day.
    pub fn end_of_day_in_origin(&self) -> DateTime<Utc> {
        let wall_date = self.in_origin().date();
        let end = wall_date
            .and_hms_milli_opt(23, 59, 59, 999)
            .expect("end of day is always valid");
        self.wall_to_utc(end)
    }

    /// Both origin-day boundaries, start first.
    pub fn day_bounds_in_origin(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start_of_day_in_origin(), self.end_of_day_in_origin())
    }

    /// Rebuild the wire payload, byte-identical to the one received.
    pub fn to_payload(&self) -> TransferPayload {
        TransferPayload {
            iso: self.instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            origin_zone: self.origin_zone.clone(),
            origin_offset: self.origin_offset,
        }
    }

    fn wall_to_utc(&self, wall: NaiveDateTime) -> DateTime<Utc> {
        Utc.from_utc_datetime(&tz::shift_by_offset(wall, -self.origin_offset))
    }
}
