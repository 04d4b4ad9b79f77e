//! Relative-time phrasing ("5 minutes ago", "in 2 days").
//!
//! The difference between instant and reference is bucketed by walking the
//! configured threshold ladder and picking the first tier the absolute
//! difference is still below. Each tier scales the magnitude with its own
//! integer divisor before handing it to the tier's phrase generator.
//!
//! This engine never fails for well-typed input: every instant pair maps
//! to some tier, with the years tier as the open-ended top.

use chrono::{DateTime, Utc};

use crate::config::WhennyConfig;

/// Seconds per scaling unit, top tier included.
const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const WEEK: i64 = 604_800;
const MONTH: i64 = 2_592_000;
const YEAR: i64 = 31_536_000;

/// Phrase for `instant` relative to an explicit reference.
///
/// A pure function of `(instant, reference, config)`: identical inputs
/// always produce identical output.
///
/// # Examples
///
/// ```
/// use whenny_core::config::WhennyConfig;
/// use whenny_core::parse::coerce;
/// use whenny_core::relative::relative_at;
///
/// let config = WhennyConfig::default();
/// let now = coerce("2024-06-15T12:00:00Z").unwrap();
/// let earlier = coerce("2024-06-15T11:58:30Z").unwrap();
/// assert_eq!(relative_at(earlier, now, &config), "1 minute ago");
/// ```
pub fn relative_at(
    instant: DateTime<Utc>,
    reference: DateTime<Utc>,
    config: &WhennyConfig,
) -> String {
    let diff_seconds = instant.signed_duration_since(reference).num_seconds();
    let future = diff_seconds > 0;
    let abs = diff_seconds.abs();

    let thresholds = &config.relative.thresholds;
    let phrases = &config.relative.phrases;

    if abs < thresholds.just_now {
        return (phrases.just_now)();
    }

    if abs < thresholds.seconds {
        let n = abs;
        return if future {
            (phrases.in_seconds)(n)
        } else {
            (phrases.seconds_ago)(n)
        };
    }

    if abs < thresholds.minutes {
        let n = abs / MINUTE;
        return if future {
            (phrases.in_minutes)(n)
        } else {
            (phrases.minutes_ago)(n)
        };
    }

    if abs < thresholds.hours {
        let n = abs / HOUR;
        return if future {
            (phrases.in_hours)(n)
        } else {
            (phrases.hours_ago)(n)
        };
    }

    if abs < thresholds.days {
        let n = abs / DAY;
        // A one-day difference reads as yesterday/tomorrow, but only when
        // the calendar day actually changed; 24 hours within the same day
        // pair stays numeric.
        if n == 1 && instant.date_naive() != reference.date_naive() {
            return if future {
                (phrases.tomorrow)()
            } else {
                (phrases.yesterday)()
            };
        }
        return if future {
            (phrases.in_days)(n)
        } else {
            (phrases.days_ago)(n)
        };
    }

    if abs < thresholds.weeks {
        let n = (abs / WEEK).max(1);
        return if future {
            (phrases.in_weeks)(n)
        } else {
            (phrases.weeks_ago)(n)
        };
    }

    if abs < thresholds.months {
        let n = (abs / MONTH).max(1);
        return if future {
            (phrases.in_months)(n)
        } else {
            (phrases.months_ago)(n)
        };
    }

    let n = (abs / YEAR).max(1);
    if future {
        (phrases.in_years)(n)
    } else {
        (phrases.years_ago)(n)
    }
}

/// Phrase for `instant` relative to the wall clock at call time.
pub fn relative_to_now(instant: DateTime<Utc>, config: &WhennyConfig) -> String {
    relative_at(instant, Utc::now(), config)
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
    fn below_just_now_threshold() {
        let t = subtract_time(now(), 25, TimeUnit::Second).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "just now");
    }

    #[test]
    fn seconds_tier() {
        let t = subtract_time(now(), 45, TimeUnit::Second).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "45 seconds ago");
    }

    #[test]
    fn ninety_seconds_is_one_minute() {
        let t = subtract_time(now(), 90, TimeUnit::Second).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "1 minute ago");
    }

    #[test]
    fn minutes_and_hours_tiers() {
        let t = subtract_time(now(), 5, TimeUnit::Minute).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "5 minutes ago");

        let t = subtract_time(now(), 3, TimeUnit::Hour).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "3 hours ago");
    }

    #[test]
    fn future_direction() {
        let t = add_time(now(), 10, TimeUnit::Minute).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "in 10 minutes");

        let t = add_time(now(), 2, TimeUnit::Day).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "in 2 days");
    }

    #[test]
    fn one_day_prefers_yesterday_when_day_differs() {
        // 26 hours back lands on the previous calendar day.
        let t = subtract_time(now(), 26, TimeUnit::Hour).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "yesterday");

        let t = add_time(now(), 26, TimeUnit::Hour).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "tomorrow");
    }

    #[test]
    fn days_tier_stays_numeric_on_same_calendar_day() {
        // Shrink the hours threshold so a same-day difference lands in the
        // days tier; without a calendar-day change the phrase stays numeric.
        let mut cfg = config();
        cfg.relative.thresholds.hours = 3_600;
        let reference = coerce("2024-06-15T23:30:00Z").unwrap();
        let t = coerce("2024-06-15T01:00:00Z").unwrap();
        assert_eq!(relative_at(t, reference, &cfg), "0 days ago");
    }

    #[test]
    fn weeks_months_years_tiers() {
        let t = subtract_time(now(), 2, TimeUnit::Week).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "2 weeks ago");

        let t = subtract_time(now(), 45, TimeUnit::Day).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "1 month ago");

        let t = subtract_time(now(), 400, TimeUnit::Day).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "1 year ago");

        let t = subtract_time(now(), 1_000, TimeUnit::Day).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "2 years ago");
    }

    #[test]
    fn zero_magnitude_weeks_forced_to_one() {
        // Exactly at the days threshold the weeks tier takes over with a
        // sub-week magnitude; it must never read "0 weeks ago".
        let t = subtract_time(now(), 7, TimeUnit::Day).unwrap();
        assert_eq!(relative_at(t, now(), &config()), "1 week ago");
    }

    #[test]
    fn custom_threshold_shifts_tiers() {
        let mut cfg = config();
        cfg.relative.thresholds.just_now = 10;
        let t = subtract_time(now(), 25, TimeUnit::Second).unwrap();
        assert_eq!(relative_at(t, now(), &cfg), "25 seconds ago");
    }

    #[test]
    fn pure_in_inputs() {
        let t = subtract_time(now(), 90, TimeUnit::Second).unwrap();
        let first = relative_at(t, now(), &config());
        let second = relative_at(t, now(), &config());
        assert_eq!(first, second);
    }
}
