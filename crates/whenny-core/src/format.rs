//! Token-template formatting.
//!
//! Templates are literal text with `{tokenName}` placeholders drawn from a
//! closed vocabulary. Unknown tokens (and unterminated braces) pass through
//! verbatim; leniency here is deliberate, so templates can carry literal
//! braces without escaping.
//!
//! Rendering happens either over local (UTC) wall-clock fields or over
//! fields projected into an explicit timezone, in which case date-changing
//! effects of the projection (crossing midnight) are reflected in every
//! token, not just the time-of-day ones.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};

use crate::config::WhennyConfig;
use crate::error::{Result, WhennyError};
use crate::tz;

/// Wall-clock fields plus the zone context they were read in.
#[derive(Debug, Clone)]
struct WallClock {
    naive: NaiveDateTime,
    offset_minutes: i32,
    zone_label: String,
}

impl WallClock {
    fn utc(instant: DateTime<Utc>) -> Self {
        Self {
            naive: instant.naive_utc(),
            offset_minutes: 0,
            zone_label: "UTC".to_string(),
        }
    }

    fn in_zone(instant: DateTime<Utc>, zone: &str) -> Result<Self> {
        Ok(Self {
            naive: tz::project(zone, instant)?,
            offset_minutes: tz::offset_minutes(zone, instant)?,
            zone_label: tz::abbreviation(zone, instant)?,
        })
    }
}

/// Render a template over the instant's UTC wall-clock fields.
///
/// # Examples
///
/// ```
/// use whenny_core::config::WhennyConfig;
/// use whenny_core::format::format_tokens;
/// use whenny_core::parse::coerce;
///
/// let config = WhennyConfig::default();
/// let instant = coerce("2024-01-15T15:30:45.123Z").unwrap();
/// let out = format_tokens(instant, "{weekday}, {monthFull} {dayOrdinal}", &config);
/// assert_eq!(out, "Monday, January 15th");
/// ```
pub fn format_tokens(instant: DateTime<Utc>, template: &str, config: &WhennyConfig) -> String {
    render(template, &WallClock::utc(instant), config)
}

/// Render a template over fields projected into `zone`.
///
/// # Errors
///
/// Returns [`WhennyError::InvalidTimezone`] if the zone name is not known
/// to the host timezone facility.
pub fn format_in_timezone(
    instant: DateTime<Utc>,
    template: &str,
    config: &WhennyConfig,
    zone: &str,
) -> Result<String> {
    Ok(render(template, &WallClock::in_zone(instant, zone)?, config))
}

/// Render a named preset from the config's preset map.
///
/// # Errors
///
/// Returns [`WhennyError::UnknownPreset`] if `preset` is not configured,
/// or [`WhennyError::InvalidTimezone`] for a bad zone name.
pub fn format_preset(
    instant: DateTime<Utc>,
    preset: &str,
    config: &WhennyConfig,
    zone: Option<&str>,
) -> Result<String> {
    let template = config
        .formats
        .get(preset)
        .ok_or_else(|| WhennyError::UnknownPreset(preset.to_string()))?;

    match zone {
        Some(zone) => format_in_timezone(instant, template, config, zone),
        None => Ok(format_tokens(instant, template, config)),
    }
}

/// Scan the template, substituting known tokens in place.
fn render(template: &str, wall: &WallClock, config: &WhennyConfig) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        match after_open.find('}') {
            Some(close) => {
                let name = &after_open[..close];
                match render_token(name, wall, config) {
                    Some(value) => out.push_str(&value),
                    // Unknown token: emit verbatim, braces included.
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after_open[close + 1..];
            }
            None => {
                // Unterminated brace: the remainder is literal.
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

/// English ordinal suffix, with the 11-13 exception.
fn ordinal(day: u32) -> String {
    let suffix = match day % 100 {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{day}{suffix}")
}

/// Hour on the 12-hour clock (1-12).
fn hour12_of(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

fn render_token(name: &str, wall: &WallClock, config: &WhennyConfig) -> Option<String> {
    let naive = wall.naive;
    let value = match name {
        "year" => format!("{:04}", naive.year()),
        "yearShort" => format!("{:02}", naive.year().rem_euclid(100)),
        "month" => format!("{:02}", naive.month()),
        "monthShort" => naive.format("%b").to_string(),
        "monthFull" => naive.format("%B").to_string(),
        "day" => format!("{:02}", naive.day()),
        "dayOrdinal" => ordinal(naive.day()),
        "weekday" => naive.format("%A").to_string(),
        "weekdayShort" => naive.format("%a").to_string(),
        "hour" => {
            if config.hour12 {
                hour12_of(naive.hour()).to_string()
            } else {
                format!("{:02}", naive.hour())
            }
        }
        "hour24" => format!("{:02}", naive.hour()),
        "hour12" => hour12_of(naive.hour()).to_string(),
        "minute" => format!("{:02}", naive.minute()),
        "second" => format!("{:02}", naive.second()),
        "millisecond" => format!("{:03}", naive.and_utc().timestamp_subsec_millis()),
        "ampm" => if naive.hour() < 12 { "am" } else { "pm" }.to_string(),
        "AMPM" => if naive.hour() < 12 { "AM" } else { "PM" }.to_string(),
        "timezone" => wall.zone_label.clone(),
        "offset" => tz::format_offset_string(wall.offset_minutes),
        "offsetShort" => offset_short(wall.offset_minutes),
        "time" => {
            if config.hour12 {
                let meridiem = if naive.hour() < 12 { "AM" } else { "PM" };
                format!("{}:{:02} {}", hour12_of(naive.hour()), naive.minute(), meridiem)
            } else {
                format!("{:02}:{:02}", naive.hour(), naive.minute())
            }
        }
        _ => return None,
    };
    Some(value)
}

/// Compressed offset: sign and hours, minutes only when nonzero.
fn offset_short(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.unsigned_abs();
    if abs % 60 == 0 {
        format!("{}{}", sign, abs / 60)
    } else {
        format!("{}{}:{:02}", sign, abs / 60, abs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::coerce;

    fn config() -> WhennyConfig {
        WhennyConfig::default()
    }

    fn sample() -> DateTime<Utc> {
        coerce("2024-01-15T15:30:45.123Z").unwrap()
    }

    #[test]
    fn weekday_month_ordinal() {
        let out = format_tokens(sample(), "{weekday}, {monthFull} {dayOrdinal}", &config());
        assert_eq!(out, "Monday, January 15th");
    }

    #[test]
    fn numeric_tokens_are_zero_padded() {
        let out = format_tokens(sample(), "{year}-{month}-{day}", &config());
        assert_eq!(out, "2024-01-15");
    }

    #[test]
    fn hour_respects_clock_flag() {
        let mut cfg = config();
        assert_eq!(format_tokens(sample(), "{hour}", &cfg), "3");
        cfg.hour12 = false;
        assert_eq!(format_tokens(sample(), "{hour}", &cfg), "15");
    }

    #[test]
    fn explicit_hour_tokens_ignore_flag() {
        let out = format_tokens(sample(), "{hour24} {hour12} {ampm} {AMPM}", &config());
        assert_eq!(out, "15 3 pm PM");
    }

    #[test]
    fn time_token_both_clocks() {
        let mut cfg = config();
        assert_eq!(format_tokens(sample(), "{time}", &cfg), "3:30 PM");
        cfg.hour12 = false;
        assert_eq!(format_tokens(sample(), "{time}", &cfg), "15:30");
    }

    #[test]
    fn midnight_and_noon_on_twelve_hour_clock() {
        let midnight = coerce("2024-01-15T00:05:00Z").unwrap();
        let noon = coerce("2024-01-15T12:05:00Z").unwrap();
        let cfg = config();
        assert_eq!(format_tokens(midnight, "{time}", &cfg), "12:05 AM");
        assert_eq!(format_tokens(noon, "{time}", &cfg), "12:05 PM");
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(22), "22nd");
        assert_eq!(ordinal(31), "31st");
    }

    #[test]
    fn unknown_tokens_pass_through() {
        let out = format_tokens(sample(), "{year} {nonsense} {day}", &config());
        assert_eq!(out, "2024 {nonsense} 15");
    }

    #[test]
    fn unterminated_brace_is_literal() {
        let out = format_tokens(sample(), "{year} {unclosed", &config());
        assert_eq!(out, "2024 {unclosed");
    }

    #[test]
    fn millisecond_and_second_tokens() {
        let out = format_tokens(sample(), "{second}.{millisecond}", &config());
        assert_eq!(out, "45.123");
    }

    #[test]
    fn timezone_and_offset_tokens_default_to_utc() {
        let out = format_tokens(sample(), "{timezone} {offset} {offsetShort}", &config());
        assert_eq!(out, "UTC +00:00 +0");
    }

    #[test]
    fn timezone_projection_shifts_every_token() {
        // 02:30 UTC on Jan 16 is 21:30 on Jan 15 in New York; the date
        // tokens must move with the time tokens.
        let instant = coerce("2024-01-16T02:30:00Z").unwrap();
        let out = format_in_timezone(
            instant,
            "{year}-{month}-{day} {time} {timezone}",
            &config(),
            "America/New_York",
        )
        .unwrap();
        assert_eq!(out, "2024-01-15 9:30 PM EST");
    }

    #[test]
    fn timezone_projection_offset_token() {
        let instant = coerce("2024-07-15T12:00:00Z").unwrap();
        let out =
            format_in_timezone(instant, "{offset}", &config(), "America/New_York").unwrap();
        assert_eq!(out, "-04:00");
    }

    #[test]
    fn preset_lookup() {
        let out = format_preset(sample(), "iso", &config(), None).unwrap();
        assert_eq!(out, "2024-01-15T15:30:45");

        let out = format_preset(sample(), "short", &config(), None).unwrap();
        assert_eq!(out, "01/15/2024");
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let err = format_preset(sample(), "fancy", &config(), None).unwrap_err();
        assert_eq!(err.code(), "unknown_preset");
    }

    #[test]
    fn bad_zone_is_an_error() {
        assert!(format_in_timezone(sample(), "{time}", &config(), "Not/AZone").is_err());
    }
}
