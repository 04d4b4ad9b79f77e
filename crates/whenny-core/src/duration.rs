//! Duration decomposition, rendering styles, and the lenient text parser.
//!
//! A [`WhennyDuration`] is a value object over a nonnegative total-seconds
//! count; negative input is taken by magnitude. Rendering styles are fixed
//! (long, compact, brief, clock, timer, minimal, human) with the long and
//! compact unit phrases coming from configuration.
//!
//! [`parse_duration`] is deliberately lenient and never fails: unparseable
//! input yields zero. That contrast with the strict date-coercion boundary
//! is by contract; duration text arrives from sloppy human sources.

use crate::config::DurationConfig;

/// A decomposed, nonnegative duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhennyDuration {
    total_seconds: u64,
    hours: u64,
    minutes: u64,
    seconds: u64,
}

impl WhennyDuration {
    /// Build from a total-seconds count, taking `abs(floor(total))`.
    ///
    /// Non-finite input decomposes to zero; this type never represents an
    /// invalid state.
    pub fn new(total_seconds: f64) -> Self {
        let total = if total_seconds.is_finite() {
            total_seconds.abs().floor() as u64
        } else {
            0
        };
        Self::from_total(total)
    }

    /// Build from an integral seconds count; the sign is dropped.
    pub fn from_seconds(total_seconds: i64) -> Self {
        Self::from_total(total_seconds.unsigned_abs())
    }

    fn from_total(total: u64) -> Self {
        Self {
            total_seconds: total,
            hours: total / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }

    /// Hours component of the decomposition.
    pub fn hours(&self) -> u64 {
        self.hours
    }

    /// Minutes component (0-59).
    pub fn minutes(&self) -> u64 {
        self.minutes
    }

    /// Seconds component (0-59).
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// The full count in seconds.
    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    /// The full count in whole minutes.
    pub fn total_minutes(&self) -> u64 {
        self.total_seconds / 60
    }

    /// The full count in whole hours.
    pub fn total_hours(&self) -> u64 {
        self.total_seconds / 3_600
    }

    /// Nonzero unit phrases joined with the configured separator; seconds
    /// appear whenever nothing else does.
    pub fn long(&self, config: &DurationConfig) -> String {
        let mut parts = Vec::new();
        if self.hours > 0 {
            parts.push((config.long.hours)(self.hours));
        }
        if self.minutes > 0 {
            parts.push((config.long.minutes)(self.minutes));
        }
        if self.seconds > 0 || parts.is_empty() {
            parts.push((config.long.seconds)(self.seconds));
        }
        parts.join(&config.separator)
    }

    /// Symbol-suffixed style (`1h 1m 1s`). Minutes always show once hours
    /// are present, even when zero.
    pub fn compact(&self, config: &DurationConfig) -> String {
        let mut parts = Vec::new();
        if self.hours > 0 {
            parts.push((config.compact.hours)(self.hours));
            parts.push((config.compact.minutes)(self.minutes));
        } else if self.minutes > 0 {
            parts.push((config.compact.minutes)(self.minutes));
        }
        if self.seconds > 0 || parts.is_empty() {
            parts.push((config.compact.seconds)(self.seconds));
        }
        parts.join(" ")
    }

    /// Long style without seconds, unless the whole duration is under one
    /// minute.
    pub fn brief(&self, config: &DurationConfig) -> String {
        if self.total_seconds < 60 {
            return (config.long.seconds)(self.seconds);
        }
        let mut parts = Vec::new();
        if self.hours > 0 {
            parts.push((config.long.hours)(self.hours));
        }
        if self.minutes > 0 {
            parts.push((config.long.minutes)(self.minutes));
        }
        parts.join(&config.separator)
    }

    /// `M:SS` under an hour, `H:MM:SS` otherwise.
    pub fn clock(&self) -> String {
        if self.hours > 0 {
            format!("{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
        } else {
            format!("{}:{:02}", self.minutes, self.seconds)
        }
    }

    /// `HH:MM:SS`, all fields zero-padded.
    pub fn timer(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }

    /// Only the single largest nonzero unit, in compact symbols.
    pub fn minimal(&self, config: &DurationConfig) -> String {
        if self.hours > 0 {
            (config.compact.hours)(self.hours)
        } else if self.minutes > 0 {
            (config.compact.minutes)(self.minutes)
        } else {
            (config.compact.seconds)(self.seconds)
        }
    }

    /// Approximate phrase, rounding to the nearest hour at >= 30 minutes
    /// past it.
    pub fn human(&self) -> String {
        if self.hours > 0 {
            let rounded = if self.minutes >= 30 {
                self.hours + 1
            } else {
                self.hours
            };
            let unit = if rounded == 1 { "hour" } else { "hours" };
            format!("about {rounded} {unit}")
        } else if self.minutes > 0 {
            let unit = if self.minutes == 1 { "minute" } else { "minutes" };
            format!("about {} {unit}", self.minutes)
        } else {
            "less than a minute".to_string()
        }
    }
}

/// Parse duration text into seconds.
///
/// Recognizes `<number>h`, `<number>m`/`min`, and `<number>s`/`sec`
/// fragments anywhere in the string (case-insensitive, optional space,
/// decimals allowed) and sums them. A string with no unit fragments is
/// read as a plain number of seconds. Unparseable input yields `0.0`;
/// this function never fails.
///
/// # Examples
///
/// ```
/// use whenny_core::duration::parse_duration;
///
/// assert_eq!(parse_duration("2h 30m"), 9000.0);
/// assert_eq!(parse_duration("1.5h"), 5400.0);
/// assert_eq!(parse_duration("90"), 90.0);
/// assert_eq!(parse_duration("gibberish"), 0.0);
/// ```
pub fn parse_duration(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let chars: Vec<char> = trimmed.chars().collect();
    let mut total = 0.0;
    let mut matched = false;
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
            i += 1;
        }
        let number: f64 = match chars[start..i].iter().collect::<String>().parse() {
            Ok(n) => n,
            Err(_) => continue,
        };

        let mut j = i;
        while j < chars.len() && chars[j] == ' ' {
            j += 1;
        }
        let unit_start = j;
        while j < chars.len() && chars[j].is_ascii_alphabetic() {
            j += 1;
        }

        let unit: String = chars[unit_start..j]
            .iter()
            .collect::<String>()
            .to_lowercase();
        let factor = match unit.as_str() {
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(3_600.0),
            "m" | "min" | "mins" | "minute" | "minutes" => Some(60.0),
            "s" | "sec" | "secs" | "second" | "seconds" => Some(1.0),
            _ => None,
        };

        if let Some(factor) = factor {
            total += number * factor;
            matched = true;
            i = j;
        }
    }

    if matched {
        return total;
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}
