//! # whenny-core
//!
//! A timezone-aware date formatting and manipulation library for Rust.
//!
//! This library parses heterogeneous date inputs, renders instants through
//! token templates and named presets, produces relative and smart
//! human-readable phrases, formats durations, performs calendar arithmetic,
//! and carries timezone context across serialization boundaries via the
//! transfer protocol.
//!
//! ## Features
//!
//! - **Strict Coercion**: Heterogeneous input (instant, epoch number,
//!   text) resolves through one exhaustive boundary; malformed input fails
//!   loudly.
//! - **Token Templates**: `{tokenName}` placeholders over a closed
//!   vocabulary, with unknown tokens passing through verbatim.
//! - **Relative & Smart Phrasing**: Threshold-ladder relative time plus
//!   ordered first-match-wins bucket selection, both pure functions of
//!   their inputs.
//! - **Transfer Protocol**: Instant + origin zone + frozen offset as a
//!   flat JSON payload that round-trips byte-for-byte.
//! - **Explicit Configuration**: One immutable default config; variants
//!   come from pure deep merges and are passed explicitly. No global
//!   mutable state.
//! - **IANA Timezones**: Offsets and abbreviations from the host timezone
//!   database via chrono-tz; unknown zones are loud errors.
//!
//! ## Example
//!
//! ```rust
//! use whenny_core::prelude::*;
//!
//! let config = WhennyConfig::default();
//!
//! // Parse and format
//! let instant = coerce("2024-01-15T15:30:45.123Z").unwrap();
//! let text = format_tokens(instant, "{weekday}, {monthFull} {dayOrdinal}", &config);
//! assert_eq!(text, "Monday, January 15th");
//!
//! // Relative phrasing against an explicit reference
//! let reference = coerce("2024-01-15T15:32:15Z").unwrap();
//! assert_eq!(relative_at(instant, reference, &config), "1 minute ago");
//!
//! // Timezone-context-preserving transfer
//! let payload = create_transfer(instant, "America/New_York").unwrap();
//! assert_eq!(payload.origin_offset, -300);
//! ```

pub mod arith;
pub mod config;
pub mod duration;
pub mod error;
pub mod format;
pub mod models;
pub mod parse;
pub mod relative;
pub mod smart;
pub mod transfer;
pub mod tz;

// Re-export commonly used types at the crate root
pub use arith::{add_business_days, add_time, diff, end_of, start_of, subtract_business_days, subtract_time};
pub use config::{merge_config, merge_named_section, WhennyConfig, WhennyConfigPatch};
pub use duration::{parse_duration, WhennyDuration};
pub use error::{Result, WhennyError};
pub use format::{format_in_timezone, format_preset, format_tokens};
pub use models::{BucketWindow, ServerFallback, SmartBucket, TimeUnit, WeekStart};
pub use parse::{coerce, coerce_text_auto, DateInput};
pub use relative::{relative_at, relative_to_now};
pub use smart::{smart, smart_at, smart_in_timezone, smart_server};
pub use transfer::{
    create_transfer, from_transfer, from_transfer_value, is_transfer_payload, ReceivedTransfer,
    TransferPayload,
};
pub use tz::{format_offset_string, HostTimezones, TimezoneProvider};

/// Prelude module for convenient imports.
///
/// ```
/// use whenny_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::arith::{
        add_business_days, add_time, diff, end_of, start_of, subtract_business_days,
        subtract_time,
    };
    pub use crate::config::{merge_config, merge_named_section, WhennyConfig, WhennyConfigPatch};
    pub use crate::duration::{parse_duration, WhennyDuration};
    pub use crate::error::{Result, WhennyError};
    pub use crate::format::{format_in_timezone, format_preset, format_tokens};
    pub use crate::models::*;
    pub use crate::parse::{coerce, coerce_text_auto, DateInput};
    pub use crate::relative::{relative_at, relative_to_now};
    pub use crate::smart::{smart, smart_at, smart_in_timezone, smart_server};
    pub use crate::transfer::{
        create_transfer, from_transfer, from_transfer_value, is_transfer_payload,
        ReceivedTransfer, TransferPayload,
    };
    pub use crate::tz::{format_offset_string, HostTimezones, TimezoneProvider};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn full_workflow_parse_format_round_trip() {
        let config = WhennyConfig::default();
        for input in [
            "2024-01-15T15:30:45.123Z",
            "2024-01-15T15:30:45",
            "2024-01-15 15:30:45",
            "2024-01-15",
        ] {
            let instant = coerce(input).unwrap();
            let out = format_tokens(instant, "{year}-{month}-{day}", &config);
            assert_eq!(out, "2024-01-15", "input {input}");
        }
    }

    #[test]
    fn full_workflow_relative_scenarios() {
        let config = WhennyConfig::default();
        let now = coerce("2024-06-15T12:00:00Z").unwrap();

        let t = subtract_time(now, 25, TimeUnit::Second).unwrap();
        assert_eq!(relative_at(t, now, &config), "just now");

        let t = subtract_time(now, 90, TimeUnit::Second).unwrap();
        assert_eq!(relative_at(t, now, &config), "1 minute ago");
    }

    #[test]
    fn full_workflow_token_scenario() {
        let config = WhennyConfig::default();
        let instant = coerce("2024-01-15T15:30:45.123Z").unwrap();
        assert_eq!(
            format_tokens(instant, "{weekday}, {monthFull} {dayOrdinal}", &config),
            "Monday, January 15th"
        );
    }

    #[test]
    fn full_workflow_duration_clock_scenarios() {
        assert_eq!(WhennyDuration::from_seconds(3661).clock(), "1:01:01");
        assert_eq!(WhennyDuration::from_seconds(125).clock(), "2:05");
    }

    #[test]
    fn full_workflow_transfer_scenario() {
        let payload = create_transfer("2024-01-15T15:30:00Z", "America/New_York").unwrap();
        assert_eq!(payload.origin_offset, -300);

        let received = from_transfer(&payload).unwrap();
        assert_eq!(
            received.start_of_day_in_origin(),
            coerce("2024-01-15T05:00:00Z").unwrap()
        );
    }

    #[test]
    fn full_workflow_month_clamp_scenarios() {
        let leap = add_time(coerce("2024-01-31").unwrap(), 1, TimeUnit::Month).unwrap();
        assert_eq!(leap, coerce("2024-02-29").unwrap());

        let plain = add_time(coerce("2023-01-31").unwrap(), 1, TimeUnit::Month).unwrap();
        assert_eq!(plain, coerce("2023-02-28").unwrap());
    }

    #[test]
    fn full_workflow_scoped_config() {
        // A merged config never disturbs the base it came from.
        let base = WhennyConfig::default();
        let patch: WhennyConfigPatch =
            serde_json::from_str(r#"{"hour12": false}"#).unwrap();
        let scoped = merge_config(&base, &patch);

        let instant = coerce("2024-01-15T15:30:00Z").unwrap();
        assert_eq!(format_tokens(instant, "{time}", &scoped), "15:30");
        assert_eq!(format_tokens(instant, "{time}", &base), "3:30 PM");
    }

    #[test]
    fn prelude_exports() {
        let _config = WhennyConfig::default();
        let _unit = TimeUnit::Day;
        let _week_start = WeekStart::Monday;
        let _fallback = ServerFallback::RawIso;
        let _provider = HostTimezones;
    }
}
