//! Calendar arithmetic: unit addition, boundaries, and predicates.
//!
//! Sub-day units are pure millisecond arithmetic. Day and week steps are
//! day-granular. Month and year steps mutate the calendar field directly
//! and clamp the day-of-month to the last valid day of the target month,
//! so `Jan 31 + 1 month` lands on `Feb 28` (or `Feb 29` in a leap year)
//! rather than overflowing into March.
//!
//! Calendar predicates compare UTC fields. The `*_at` forms take an
//! explicit reference instant and are the primitives; the short forms read
//! the wall clock at call time.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};

use crate::config::WhennyConfig;
use crate::error::{Result, WhennyError};
use crate::models::{TimeUnit, WeekStart};

/// Whether `year` is a Gregorian leap year.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// Add `amount` of `unit` to an instant, returning a new instant.
///
/// # Errors
///
/// Returns [`WhennyError::InvalidDateInput`] if the result falls outside
/// the representable date range. Arithmetic never saturates silently.
///
/// # Examples
///
/// ```
/// use whenny_core::arith::add_time;
/// use whenny_core::models::TimeUnit;
/// use whenny_core::parse::coerce;
///
/// let jan31 = coerce("2024-01-31T12:00:00Z").unwrap();
/// let feb = add_time(jan31, 1, TimeUnit::Month).unwrap();
/// assert_eq!(feb, coerce("2024-02-29T12:00:00Z").unwrap());
/// ```
pub fn add_time(instant: DateTime<Utc>, amount: i64, unit: TimeUnit) -> Result<DateTime<Utc>> {
    let out_of_range =
        || WhennyError::InvalidDateInput(format!("date arithmetic out of range: {amount} {unit}"));

    match unit {
        TimeUnit::Millisecond | TimeUnit::Second | TimeUnit::Minute | TimeUnit::Hour => {
            let per_unit = match unit {
                TimeUnit::Millisecond => 1,
                TimeUnit::Second => 1_000,
                TimeUnit::Minute => 60_000,
                TimeUnit::Hour => 3_600_000,
                _ => unreachable!(),
            };
            let millis = amount.checked_mul(per_unit).ok_or_else(out_of_range)?;
            let delta = Duration::try_milliseconds(millis).ok_or_else(out_of_range)?;
            instant.checked_add_signed(delta).ok_or_else(out_of_range)
        }
        TimeUnit::Day | TimeUnit::Week => {
            let days = if unit == TimeUnit::Week {
                amount.checked_mul(7).ok_or_else(out_of_range)?
            } else {
                amount
            };
            let delta = Duration::try_days(days).ok_or_else(out_of_range)?;
            instant.checked_add_signed(delta).ok_or_else(out_of_range)
        }
        TimeUnit::Month => add_months(instant, amount).ok_or_else(out_of_range),
        TimeUnit::Year => {
            let months = amount.checked_mul(12).ok_or_else(out_of_range)?;
            add_months(instant, months).ok_or_else(out_of_range)
        }
    }
}

/// Subtract `amount` of `unit`; equivalent to adding the negated amount.
pub fn subtract_time(instant: DateTime<Utc>, amount: i64, unit: TimeUnit) -> Result<DateTime<Utc>> {
    let negated = amount
        .checked_neg()
        .ok_or_else(|| WhennyError::InvalidDateInput("amount out of range".to_string()))?;
    add_time(instant, negated, unit)
}

/// Month-field addition with end-of-month clamping. Time of day is kept.
fn add_months(instant: DateTime<Utc>, months: i64) -> Option<DateTime<Utc>> {
    let date = instant.date_naive();
    let total = i64::from(date.month0()) + months + i64::from(date.year()) * 12;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = (total.rem_euclid(12) + 1) as u32;
    let day = date.day().min(days_in_month(year, month));

    let new_date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(Utc.from_utc_datetime(&new_date.and_time(instant.time())))
}

/// First representable moment of the unit containing `instant`.
///
/// Supported units: day, week, month, year. Week boundaries respect the
/// configured week start.
pub fn start_of(instant: DateTime<Utc>, unit: TimeUnit, config: &WhennyConfig) -> Result<DateTime<Utc>> {
    let date = instant.date_naive();
    let start_date = match unit {
        TimeUnit::Day => date,
        TimeUnit::Week => start_of_week_date(date, config.calendar.week_start),
        TimeUnit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .expect("first of month is always valid"),
        TimeUnit::Year => {
            NaiveDate::from_ymd_opt(date.year(), 1, 1).expect("january 1 is always valid")
        }
        _ => {
            return Err(WhennyError::InvalidConfig(format!(
                "start_of does not support unit '{unit}'"
            )));
        }
    };

    let midnight = start_date
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid");
    Ok(Utc.from_utc_datetime(&midnight))
}

/// Last representable millisecond of the unit containing `instant`.
pub fn end_of(instant: DateTime<Utc>, unit: TimeUnit, config: &WhennyConfig) -> Result<DateTime<Utc>> {
    let start = start_of(instant, unit, config)?;
    let next = match unit {
        TimeUnit::Day => add_time(start, 1, TimeUnit::Day)?,
        TimeUnit::Week => add_time(start, 1, TimeUnit::Week)?,
        TimeUnit::Month => add_time(start, 1, TimeUnit::Month)?,
        TimeUnit::Year => add_time(start, 1, TimeUnit::Year)?,
        _ => unreachable!("start_of rejects sub-day units"),
    };
    Ok(next - Duration::milliseconds(1))
}

/// Date of the configured week start on or before `date`.
fn start_of_week_date(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let days_from_start = match week_start {
        WeekStart::Monday => date.weekday().num_days_from_monday() as i64,
        WeekStart::Sunday => date.weekday().num_days_from_sunday() as i64,
    };
    date - Duration::days(days_from_start)
}

/// Whether two instants fall on the same UTC calendar day.
pub fn is_same_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Same calendar day as the reference.
pub fn is_today_at(instant: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
    is_same_day(instant, reference)
}

/// Exactly one calendar day before the reference.
pub fn is_yesterday_at(instant: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
    instant.date_naive() + Duration::days(1) == reference.date_naive()
}

/// Exactly one calendar day after the reference.
pub fn is_tomorrow_at(instant: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
    instant.date_naive() == reference.date_naive() + Duration::days(1)
}

/// Within the calendar week containing the reference.
pub fn is_this_week_at(
    instant: DateTime<Utc>,
    reference: DateTime<Utc>,
    config: &WhennyConfig,
) -> bool {
    let week_start = start_of_week_date(reference.date_naive(), config.calendar.week_start);
    let date = instant.date_naive();
    date >= week_start && date < week_start + Duration::days(7)
}

/// Same calendar month (and year) as the reference.
pub fn is_this_month_at(instant: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
    instant.year() == reference.year() && instant.month() == reference.month()
}

/// Same calendar year as the reference.
pub fn is_this_year_at(instant: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
    instant.year() == reference.year()
}

/// Strictly before the reference.
pub fn is_past_at(instant: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
    instant < reference
}

/// Strictly after the reference.
pub fn is_future_at(instant: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
    instant > reference
}

/// Saturday or Sunday.
pub fn is_weekend(instant: DateTime<Utc>) -> bool {
    matches!(instant.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Monday through Friday.
pub fn is_weekday(instant: DateTime<Utc>) -> bool {
    !is_weekend(instant)
}

/// Whether the instant falls on a configured business day.
pub fn is_business_day(instant: DateTime<Utc>, config: &WhennyConfig) -> bool {
    config
        .calendar
        .business_days
        .contains(&instant.weekday())
}

/// Same calendar day as now.
pub fn is_today(instant: DateTime<Utc>) -> bool {
    is_today_at(instant, Utc::now())
}

/// Exactly one calendar day before now.
pub fn is_yesterday(instant: DateTime<Utc>) -> bool {
    is_yesterday_at(instant, Utc::now())
}

/// Exactly one calendar day after now.
pub fn is_tomorrow(instant: DateTime<Utc>) -> bool {
    is_tomorrow_at(instant, Utc::now())
}

/// Within the calendar week containing now.
pub fn is_this_week(instant: DateTime<Utc>, config: &WhennyConfig) -> bool {
    is_this_week_at(instant, Utc::now(), config)
}

/// Same calendar month as now.
pub fn is_this_month(instant: DateTime<Utc>) -> bool {
    is_this_month_at(instant, Utc::now())
}

/// Same calendar year as now.
pub fn is_this_year(instant: DateTime<Utc>) -> bool {
    is_this_year_at(instant, Utc::now())
}

/// Strictly before now.
pub fn is_past(instant: DateTime<Utc>) -> bool {
    is_past_at(instant, Utc::now())
}

/// Strictly after now.
pub fn is_future(instant: DateTime<Utc>) -> bool {
    is_future_at(instant, Utc::now())
}

/// Advance by `count` business days, skipping non-business days.
///
/// Walks day-by-day until the requested count of business days has been
/// traversed. O(n) in the days spanned; realistic horizons are small.
pub fn add_business_days(
    instant: DateTime<Utc>,
    count: i64,
    config: &WhennyConfig,
) -> Result<DateTime<Utc>> {
    let step = if count < 0 { -1 } else { 1 };
    let mut remaining = count.unsigned_abs();
    let mut current = instant;

    while remaining > 0 {
        current = add_time(current, step, TimeUnit::Day)?;
        if is_business_day(current, config) {
            remaining -= 1;
        }
    }

    Ok(current)
}

/// Step back by `count` business days.
pub fn subtract_business_days(
    instant: DateTime<Utc>,
    count: i64,
    config: &WhennyConfig,
) -> Result<DateTime<Utc>> {
    let negated = count
        .checked_neg()
        .ok_or_else(|| WhennyError::InvalidDateInput("count out of range".to_string()))?;
    add_business_days(instant, negated, config)
}

/// Signed whole-unit difference `a - b` for fixed-width units.
///
/// Month/year differences are field differences, ignoring day-of-month.
pub fn diff(a: DateTime<Utc>, b: DateTime<Utc>, unit: TimeUnit) -> i64 {
    let span = a.signed_duration_since(b);
    match unit {
        TimeUnit::Millisecond => span.num_milliseconds(),
        TimeUnit::Second => span.num_seconds(),
        TimeUnit::Minute => span.num_minutes(),
        TimeUnit::Hour => span.num_hours(),
        TimeUnit::Day => span.num_days(),
        TimeUnit::Week => span.num_weeks(),
        TimeUnit::Month => {
            i64::from(a.year() - b.year()) * 12 + i64::from(a.month0()) - i64::from(b.month0())
        }
        TimeUnit::Year => i64::from(a.year() - b.year()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::coerce;
    use proptest::prelude::*;

    fn config() -> WhennyConfig {
        WhennyConfig::default()
    }

    fn at(s: &str) -> DateTime<Utc> {
        coerce(s).unwrap()
    }

    #[test]
    fn month_addition_clamps_to_leap_february() {
        let result = add_time(at("2024-01-31T12:00:00Z"), 1, TimeUnit::Month).unwrap();
        assert_eq!(result, at("2024-02-29T12:00:00Z"));
    }

    #[test]
    fn month_addition_clamps_to_plain_february() {
        let result = add_time(at("2023-01-31T12:00:00Z"), 1, TimeUnit::Month).unwrap();
        assert_eq!(result, at("2023-02-28T12:00:00Z"));
    }

    #[test]
    fn month_addition_crosses_year_boundary() {
        let result = add_time(at("2023-11-15T00:00:00Z"), 3, TimeUnit::Month).unwrap();
        assert_eq!(result, at("2024-02-15T00:00:00Z"));
    }

    #[test]
    fn month_subtraction_is_lossy_near_month_end() {
        // Jan 31 + 1 month clamps to Feb 29; stepping back lands on Jan 29,
        // not Jan 31. The clamp is one-way by design.
        let forward = add_time(at("2024-01-31T00:00:00Z"), 1, TimeUnit::Month).unwrap();
        let back = subtract_time(forward, 1, TimeUnit::Month).unwrap();
        assert_eq!(back, at("2024-01-29T00:00:00Z"));
    }

    #[test]
    fn year_addition_handles_leap_day() {
        let result = add_time(at("2024-02-29T08:00:00Z"), 1, TimeUnit::Year).unwrap();
        assert_eq!(result, at("2025-02-28T08:00:00Z"));
    }

    #[test]
    fn subtract_inverts_add_for_fixed_units() {
        let t = at("2024-06-15T10:20:30.400Z");
        for unit in [
            TimeUnit::Millisecond,
            TimeUnit::Second,
            TimeUnit::Minute,
            TimeUnit::Hour,
            TimeUnit::Day,
            TimeUnit::Week,
        ] {
            let there = add_time(t, 37, unit).unwrap();
            assert_eq!(subtract_time(there, 37, unit).unwrap(), t, "unit {unit}");
        }
    }

    #[test]
    fn start_of_day_zeroes_time_fields() {
        let start = start_of(at("2024-06-15T18:45:12.345Z"), TimeUnit::Day, &config()).unwrap();
        assert_eq!(start, at("2024-06-15T00:00:00Z"));
    }

    #[test]
    fn end_of_day_is_last_millisecond() {
        let end = end_of(at("2024-06-15T18:45:12Z"), TimeUnit::Day, &config()).unwrap();
        assert_eq!(end, at("2024-06-15T23:59:59.999Z"));
    }

    #[test]
    fn start_of_week_respects_monday_start() {
        // 2024-06-15 is a Saturday
        let start = start_of(at("2024-06-15T12:00:00Z"), TimeUnit::Week, &config()).unwrap();
        assert_eq!(start, at("2024-06-10T00:00:00Z"));
    }

    #[test]
    fn start_of_week_respects_sunday_start() {
        let mut cfg = config();
        cfg.calendar.week_start = WeekStart::Sunday;
        let start = start_of(at("2024-06-15T12:00:00Z"), TimeUnit::Week, &cfg).unwrap();
        assert_eq!(start, at("2024-06-09T00:00:00Z"));
    }

    #[test]
    fn start_of_month_and_year() {
        let t = at("2024-06-15T12:00:00Z");
        assert_eq!(
            start_of(t, TimeUnit::Month, &config()).unwrap(),
            at("2024-06-01T00:00:00Z")
        );
        assert_eq!(
            start_of(t, TimeUnit::Year, &config()).unwrap(),
            at("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn end_of_month_handles_leap_february() {
        let end = end_of(at("2024-02-10T00:00:00Z"), TimeUnit::Month, &config()).unwrap();
        assert_eq!(end, at("2024-02-29T23:59:59.999Z"));
    }

    #[test]
    fn start_of_rejects_sub_day_units() {
        assert!(start_of(at("2024-06-15T12:00:00Z"), TimeUnit::Hour, &config()).is_err());
    }

    #[test]
    fn calendar_predicates_against_reference() {
        let now = at("2024-06-15T12:00:00Z");
        assert!(is_today_at(at("2024-06-15T01:00:00Z"), now));
        assert!(is_yesterday_at(at("2024-06-14T23:00:00Z"), now));
        assert!(is_tomorrow_at(at("2024-06-16T00:30:00Z"), now));
        assert!(is_this_month_at(at("2024-06-01T00:00:00Z"), now));
        assert!(is_this_year_at(at("2024-01-01T00:00:00Z"), now));
        assert!(!is_this_year_at(at("2023-12-31T23:59:59Z"), now));
        assert!(is_past_at(at("2024-06-15T11:59:59Z"), now));
        assert!(is_future_at(at("2024-06-15T12:00:01Z"), now));
    }

    #[test]
    fn this_week_follows_configured_start() {
        // Reference Saturday 2024-06-15; Monday-start week is Jun 10..17
        let now = at("2024-06-15T12:00:00Z");
        assert!(is_this_week_at(at("2024-06-10T00:00:00Z"), now, &config()));
        assert!(!is_this_week_at(at("2024-06-09T23:59:59Z"), now, &config()));

        let mut cfg = config();
        cfg.calendar.week_start = WeekStart::Sunday;
        assert!(is_this_week_at(at("2024-06-09T00:00:00Z"), now, &cfg));
    }

    #[test]
    fn weekend_and_weekday() {
        assert!(is_weekend(at("2024-06-15T12:00:00Z"))); // Saturday
        assert!(is_weekend(at("2024-06-16T12:00:00Z"))); // Sunday
        assert!(is_weekday(at("2024-06-17T12:00:00Z"))); // Monday
    }

    #[test]
    fn business_days_skip_weekends() {
        // Friday + 1 business day = Monday
        let friday = at("2024-06-14T09:00:00Z");
        let next = add_business_days(friday, 1, &config()).unwrap();
        assert_eq!(next, at("2024-06-17T09:00:00Z"));

        // Monday - 1 business day = Friday
        let back = subtract_business_days(next, 1, &config()).unwrap();
        assert_eq!(back, friday);
    }

    #[test]
    fn business_days_honor_configured_set() {
        // Saturday counts as a business day when configured in.
        let mut cfg = config();
        cfg.calendar.business_days.push(Weekday::Sat);
        let friday = at("2024-06-14T09:00:00Z");
        let next = add_business_days(friday, 1, &cfg).unwrap();
        assert_eq!(next, at("2024-06-15T09:00:00Z"));
    }

    #[test]
    fn diff_fixed_and_field_units() {
        let a = at("2024-03-15T12:00:00Z");
        let b = at("2024-01-15T06:00:00Z");
        assert_eq!(diff(a, b, TimeUnit::Month), 2);
        assert_eq!(diff(a, b, TimeUnit::Day), 60);
        assert_eq!(diff(b, a, TimeUnit::Month), -2);
        assert_eq!(diff(at("2025-01-01T00:00:00Z"), a, TimeUnit::Year), 1);
    }

    proptest! {
        #[test]
        fn add_then_subtract_round_trips(
            epoch_s in -1_000_000_000i64..4_000_000_000i64,
            amount in -10_000i64..10_000i64,
        ) {
            let t = chrono::Utc.timestamp_opt(epoch_s, 0).single().unwrap();
            for unit in [
                TimeUnit::Millisecond,
                TimeUnit::Second,
                TimeUnit::Minute,
                TimeUnit::Hour,
                TimeUnit::Day,
            ] {
                let there = add_time(t, amount, unit).unwrap();
                prop_assert_eq!(subtract_time(there, amount, unit).unwrap(), t);
            }
        }
    }
}
