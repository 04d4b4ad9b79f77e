//! Smart formatting: ordered bucket selection over an instant/reference pair.
//!
//! The selector walks the configured past (or future) bucket list in order
//! and takes the first match. A matched bucket either renders its token
//! template or, for the `relative` sentinel, delegates to the relative
//! engine. Every correctly configured list ends with an unconditional
//! `older` catch-all; if a list falls through anyway, the raw ISO timestamp
//! is returned.
//!
//! Server-side callers without timezone context use [`smart_server`], which
//! applies the configured fallback instead of silently rendering in the
//! host machine's own zone.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::arith;
use crate::config::WhennyConfig;
use crate::error::Result;
use crate::format;
use crate::models::{BucketWindow, ServerFallback, SmartBucket};
use crate::relative::relative_at;

/// Smart-format `instant` against an explicit reference, local (UTC) fields.
///
/// A pure function of `(instant, reference, config)`.
pub fn smart_at(instant: DateTime<Utc>, reference: DateTime<Utc>, config: &WhennyConfig) -> String {
    select(instant, reference, config, None).unwrap_or_else(|_| iso_utc(instant))
}

/// Smart-format with template rendering projected into `zone`.
///
/// # Errors
///
/// Returns [`crate::error::WhennyError::InvalidTimezone`] for an
/// unrecognized zone name.
pub fn smart_in_timezone(
    instant: DateTime<Utc>,
    reference: DateTime<Utc>,
    config: &WhennyConfig,
    zone: &str,
) -> Result<String> {
    select(instant, reference, config, Some(zone))
}

/// Smart-format for server-side callers whose timezone context is optional.
///
/// With a zone this is [`smart_in_timezone`]. Without one, the configured
/// fallback decides the rendering; this is an explicit degradation, not an
/// error.
pub fn smart_server(
    instant: DateTime<Utc>,
    reference: DateTime<Utc>,
    config: &WhennyConfig,
    zone: Option<&str>,
) -> Result<String> {
    match zone {
        Some(zone) => smart_in_timezone(instant, reference, config, zone),
        None => match config.server.missing_timezone {
            ServerFallback::RawIso => Ok(iso_utc(instant)),
            ServerFallback::UtcLong => {
                Ok(format!("{} UTC", format::format_preset(instant, "long", config, None)?))
            }
            ServerFallback::LocalLong => format::format_preset(instant, "long", config, None),
        },
    }
}

/// Smart-format against the wall clock at call time.
pub fn smart(instant: DateTime<Utc>, config: &WhennyConfig) -> String {
    smart_at(instant, Utc::now(), config)
}

fn select(
    instant: DateTime<Utc>,
    reference: DateTime<Utc>,
    config: &WhennyConfig,
    zone: Option<&str>,
) -> Result<String> {
    let future = instant > reference;
    let buckets: &[SmartBucket] = if future {
        config.smart.future.as_deref().unwrap_or(&config.smart.past)
    } else {
        &config.smart.past
    };

    for bucket in buckets {
        if !bucket_matches(bucket, instant, reference, future) {
            continue;
        }
        if bucket.is_relative() {
            return Ok(relative_at(instant, reference, config));
        }
        return match zone {
            Some(zone) => format::format_in_timezone(instant, &bucket.template, config, zone),
            None => Ok(format::format_tokens(instant, &bucket.template, config)),
        };
    }

    // No bucket matched: the configured list is missing its older
    // catch-all. Fall through to the raw timestamp.
    Ok(iso_utc(instant))
}

fn bucket_matches(
    bucket: &SmartBucket,
    instant: DateTime<Utc>,
    reference: DateTime<Utc>,
    future: bool,
) -> bool {
    if bucket.is_catch_all() {
        return true;
    }

    let abs_seconds = instant
        .signed_duration_since(reference)
        .num_seconds()
        .abs();

    match bucket.within {
        Some(BucketWindow::Minute) => abs_seconds < 60,
        Some(BucketWindow::Hour) => abs_seconds < 3_600,
        Some(BucketWindow::Today) => arith::is_today_at(instant, reference),
        // One tag, both directions: a day before for past instants, a day
        // after for future ones.
        Some(BucketWindow::Yesterday) => {
            if future {
                arith::is_tomorrow_at(instant, reference)
            } else {
                arith::is_yesterday_at(instant, reference)
            }
        }
        Some(BucketWindow::Week) => abs_seconds < 604_800,
        Some(BucketWindow::Year) => arith::is_this_year_at(instant, reference),
        None => false,
    }
}

fn iso_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::{add_time, subtract_time};
    use crate::models::TimeUnit;
    use crate::parse::coerce;

    fn config() -> WhennyConfig {
        WhennyConfig::default()
    }

    fn now() -> DateTime<Utc> {
        coerce("2024-06-15T12:00:00Z").unwrap()
    }

    #[test]
    fn within_minute_delegates_to_relative() {
        let t = subtract_time(now(), 20, TimeUnit::Second).unwrap();
        assert_eq!(smart_at(t, now(), &config()), "just now");
    }

    #[test]
    fn within_hour_delegates_to_relative() {
        let t = subtract_time(now(), 30, TimeUnit::Minute).unwrap();
        assert_eq!(smart_at(t, now(), &config()), "30 minutes ago");
    }

    #[test]
    fn today_bucket_renders_time() {
        let t = coerce("2024-06-15T08:05:00Z").unwrap();
        assert_eq!(smart_at(t, now(), &config()), "today at 8:05 AM");
    }

    #[test]
    fn yesterday_bucket_past_direction() {
        let t = coerce("2024-06-14T19:45:00Z").unwrap();
        assert_eq!(smart_at(t, now(), &config()), "yesterday at 7:45 PM");
    }

    #[test]
    fn yesterday_tag_doubles_as_tomorrow() {
        let t = coerce("2024-06-16T09:15:00Z").unwrap();
        assert_eq!(smart_at(t, now(), &config()), "tomorrow at 9:15 AM");
    }

    #[test]
    fn week_bucket_renders_weekday() {
        let t = coerce("2024-06-11T14:00:00Z").unwrap();
        assert_eq!(smart_at(t, now(), &config()), "Tuesday at 2:00 PM");
    }

    #[test]
    fn year_bucket_drops_the_year() {
        let t = coerce("2024-02-03T10:00:00Z").unwrap();
        assert_eq!(smart_at(t, now(), &config()), "Feb 03");
    }

    #[test]
    fn older_catch_all_includes_year() {
        let t = coerce("2022-11-20T10:00:00Z").unwrap();
        assert_eq!(smart_at(t, now(), &config()), "Nov 20, 2022");
    }

    #[test]
    fn first_match_wins_in_list_order() {
        // 30 seconds ago matches minute, hour, today, week, and year; the
        // minute bucket is first, so relative output wins.
        let t = subtract_time(now(), 30, TimeUnit::Second).unwrap();
        assert_eq!(smart_at(t, now(), &config()), "just now");
    }

    #[test]
    fn timezone_projection_applies_to_templates() {
        // Bucket predicates compare UTC fields; the matched template then
        // renders in the requested zone (18:05 UTC -> 14:05 EDT).
        let t = coerce("2024-06-15T18:05:00Z").unwrap();
        let out = smart_in_timezone(t, now(), &config(), "America/New_York").unwrap();
        assert_eq!(out, "today at 2:05 PM");
    }

    #[test]
    fn bad_zone_surfaces_error() {
        assert!(smart_in_timezone(now(), now(), &config(), "Bad/Zone").is_err());
    }

    #[test]
    fn server_fallback_raw_iso() {
        let t = coerce("2024-06-15T08:05:00Z").unwrap();
        let out = smart_server(t, now(), &config(), None).unwrap();
        assert_eq!(out, "2024-06-15T08:05:00.000Z");
    }

    #[test]
    fn server_fallback_utc_long() {
        let mut cfg = config();
        cfg.server.missing_timezone = ServerFallback::UtcLong;
        let t = coerce("2024-06-15T08:05:00Z").unwrap();
        let out = smart_server(t, now(), &cfg, None).unwrap();
        assert_eq!(out, "Saturday, June 15th, 2024 UTC");
    }

    #[test]
    fn server_with_zone_renders_normally() {
        let t = coerce("2024-06-15T18:05:00Z").unwrap();
        let out = smart_server(t, now(), &config(), Some("UTC")).unwrap();
        assert_eq!(out, "today at 6:05 PM");
    }

    #[test]
    fn list_without_catch_all_falls_through_to_iso() {
        let mut cfg = config();
        cfg.smart.past = vec![SmartBucket::within(
            BucketWindow::Minute,
            crate::models::RELATIVE_SENTINEL,
        )];
        let t = coerce("2020-01-01T00:00:00Z").unwrap();
        assert_eq!(smart_at(t, now(), &cfg), "2020-01-01T00:00:00.000Z");
    }

    #[test]
    fn exhaustive_sweep_never_reaches_iso_fallback() {
        // From one second ago out to ten years ago, the default past list
        // must always produce a templated or relative phrase.
        let cfg = config();
        let offsets: [(i64, TimeUnit); 12] = [
            (1, TimeUnit::Second),
            (25, TimeUnit::Second),
            (90, TimeUnit::Second),
            (30, TimeUnit::Minute),
            (5, TimeUnit::Hour),
            (1, TimeUnit::Day),
            (3, TimeUnit::Day),
            (2, TimeUnit::Week),
            (2, TimeUnit::Month),
            (11, TimeUnit::Month),
            (3, TimeUnit::Year),
            (10, TimeUnit::Year),
        ];
        for (amount, unit) in offsets {
            let t = subtract_time(now(), amount, unit).unwrap();
            let out = smart_at(t, now(), &cfg);
            assert!(
                !out.ends_with('Z'),
                "fell through to raw ISO for {amount} {unit}: {out}"
            );
        }
    }

    #[test]
    fn pure_in_inputs() {
        let t = coerce("2024-06-14T19:45:00Z").unwrap();
        assert_eq!(
            smart_at(t, now(), &config()),
            smart_at(t, now(), &config())
        );
    }
}
