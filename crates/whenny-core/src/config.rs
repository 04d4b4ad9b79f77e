//! Configuration: defaults, partial overrides, and pure merging.
//!
//! A [`WhennyConfig`] is a fully-populated, immutable tree. One default
//! instance always exists via [`WhennyConfig::default`]; callers produce
//! variants by deep-merging a [`WhennyConfigPatch`] over a base with
//! [`merge_config`]. There is no process-wide mutable singleton: callers
//! needing isolation pass their merged config explicitly to every call,
//! which is also the only concurrency-safety mechanism the library needs,
//! since config values are immutable after construction.
//!
//! The patch type mirrors the wire shape consumed from external
//! configuration loaders (camelCase keys). Sections that belong to
//! excluded collaborators (`compare`, `natural`, `personality`) are
//! retained as opaque JSON.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Deserializer};

use crate::error::{Result, WhennyError};
use crate::models::{BucketWindow, ServerFallback, SmartBucket, WeekStart, RELATIVE_SENTINEL};

/// Phrase generator taking a scaled magnitude.
pub type MagnitudePhrase = fn(i64) -> String;

/// Phrase generator with no magnitude.
pub type FixedPhrase = fn() -> String;

/// Unit phrase generator for durations.
pub type UnitPhrase = fn(u64) -> String;

/// The fully-populated configuration tree.
#[derive(Debug, Clone)]
pub struct WhennyConfig {
    /// BCP-47 locale tag; phrase generators are English regardless, the
    /// tag is carried for collaborators.
    pub locale: String,
    /// Default zone for callers that want one; `None` means UTC fields.
    pub default_timezone: Option<String>,
    /// 12-hour clock when true, 24-hour otherwise.
    pub hour12: bool,
    pub relative: RelativeConfig,
    pub smart: SmartConfig,
    pub duration: DurationConfig,
    /// Named token-template presets (`short`, `long`, `iso`, `time`,
    /// `datetime` by default).
    pub formats: BTreeMap<String, String>,
    pub calendar: CalendarConfig,
    pub server: ServerConfig,
    /// Opaque sections retained for excluded collaborators.
    pub extensions: BTreeMap<String, serde_json::Value>,
}

/// Relative-engine thresholds and phrase generators.
#[derive(Debug, Clone)]
pub struct RelativeConfig {
    pub thresholds: RelativeThresholds,
    pub phrases: RelativePhrases,
}

/// Second-denominated tier boundaries, strictly increasing.
///
/// Each field is the exclusive upper bound of its tier: a difference below
/// `just_now` renders as the just-now phrase, below `seconds` as seconds,
/// and so on. Differences at or above `months` render as years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeThresholds {
    pub just_now: i64,
    pub seconds: i64,
    pub minutes: i64,
    pub hours: i64,
    pub days: i64,
    pub weeks: i64,
    pub months: i64,
}

impl Default for RelativeThresholds {
    fn default() -> Self {
        Self {
            just_now: 30,
            seconds: 60,
            minutes: 3_600,
            hours: 86_400,
            days: 604_800,
            weeks: 2_592_000,
            months: 31_536_000,
        }
    }
}

impl RelativeThresholds {
    /// Whether the ladder is strictly increasing, as required for
    /// deterministic tier selection.
    pub fn is_strictly_increasing(&self) -> bool {
        let ladder = [
            self.just_now,
            self.seconds,
            self.minutes,
            self.hours,
            self.days,
            self.weeks,
            self.months,
        ];
        ladder.windows(2).all(|pair| pair[0] < pair[1])
    }
}

/// Past/future phrase generators, one pair per tier.
#[derive(Clone, Copy)]
pub struct RelativePhrases {
    pub just_now: FixedPhrase,
    pub seconds_ago: MagnitudePhrase,
    pub in_seconds: MagnitudePhrase,
    pub minutes_ago: MagnitudePhrase,
    pub in_minutes: MagnitudePhrase,
    pub hours_ago: MagnitudePhrase,
    pub in_hours: MagnitudePhrase,
    pub days_ago: MagnitudePhrase,
    pub in_days: MagnitudePhrase,
    pub yesterday: FixedPhrase,
    pub tomorrow: FixedPhrase,
    pub weeks_ago: MagnitudePhrase,
    pub in_weeks: MagnitudePhrase,
    pub months_ago: MagnitudePhrase,
    pub in_months: MagnitudePhrase,
    pub years_ago: MagnitudePhrase,
    pub in_years: MagnitudePhrase,
}

impl std::fmt::Debug for RelativePhrases {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RelativePhrases { .. }")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

impl Default for RelativePhrases {
    fn default() -> Self {
        Self {
            just_now: || "just now".to_string(),
            seconds_ago: |n| format!("{} ago", plural(n, "second")),
            in_seconds: |n| format!("in {}", plural(n, "second")),
            minutes_ago: |n| format!("{} ago", plural(n, "minute")),
            in_minutes: |n| format!("in {}", plural(n, "minute")),
            hours_ago: |n| format!("{} ago", plural(n, "hour")),
            in_hours: |n| format!("in {}", plural(n, "hour")),
            days_ago: |n| format!("{} ago", plural(n, "day")),
            in_days: |n| format!("in {}", plural(n, "day")),
            yesterday: || "yesterday".to_string(),
            tomorrow: || "tomorrow".to_string(),
            weeks_ago: |n| format!("{} ago", plural(n, "week")),
            in_weeks: |n| format!("in {}", plural(n, "week")),
            months_ago: |n| format!("{} ago", plural(n, "month")),
            in_months: |n| format!("in {}", plural(n, "month")),
            years_ago: |n| format!("{} ago", plural(n, "year")),
            in_years: |n| format!("in {}", plural(n, "year")),
        }
    }
}

/// Smart-formatting bucket lists.
#[derive(Debug, Clone, PartialEq)]
pub struct SmartConfig {
    /// Evaluated for instants at or before the reference.
    pub past: Vec<SmartBucket>,
    /// Evaluated for future instants when present; past list otherwise.
    pub future: Option<Vec<SmartBucket>>,
}

impl Default for SmartConfig {
    fn default() -> Self {
        Self {
            past: vec![
                SmartBucket::within(BucketWindow::Minute, RELATIVE_SENTINEL),
                SmartBucket::within(BucketWindow::Hour, RELATIVE_SENTINEL),
                SmartBucket::within(BucketWindow::Today, "today at {time}"),
                SmartBucket::within(BucketWindow::Yesterday, "yesterday at {time}"),
                SmartBucket::within(BucketWindow::Week, "{weekday} at {time}"),
                SmartBucket::within(BucketWindow::Year, "{monthShort} {day}"),
                SmartBucket::older("{monthShort} {day}, {year}"),
            ],
            future: Some(vec![
                SmartBucket::within(BucketWindow::Minute, RELATIVE_SENTINEL),
                SmartBucket::within(BucketWindow::Hour, RELATIVE_SENTINEL),
                SmartBucket::within(BucketWindow::Today, "today at {time}"),
                SmartBucket::within(BucketWindow::Yesterday, "tomorrow at {time}"),
                SmartBucket::within(BucketWindow::Week, "{weekday} at {time}"),
                SmartBucket::within(BucketWindow::Year, "{monthShort} {day}"),
                SmartBucket::older("{monthShort} {day}, {year}"),
            ]),
        }
    }
}

/// Duration phrase generators and separator.
#[derive(Debug, Clone)]
pub struct DurationConfig {
    /// Joins phrases in the long style.
    pub separator: String,
    pub long: DurationPhrases,
    pub compact: DurationPhrases,
}

/// Per-unit phrase generators for one duration style.
#[derive(Clone, Copy)]
pub struct DurationPhrases {
    pub hours: UnitPhrase,
    pub minutes: UnitPhrase,
    pub seconds: UnitPhrase,
}

impl std::fmt::Debug for DurationPhrases {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DurationPhrases { .. }")
    }
}

fn plural_u(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            separator: ", ".to_string(),
            long: DurationPhrases {
                hours: |n| plural_u(n, "hour"),
                minutes: |n| plural_u(n, "minute"),
                seconds: |n| plural_u(n, "second"),
            },
            compact: DurationPhrases {
                hours: |n| format!("{n}h"),
                minutes: |n| format!("{n}m"),
                seconds: |n| format!("{n}s"),
            },
        }
    }
}

/// Calendar settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarConfig {
    pub week_start: WeekStart,
    /// Days that count as business days. Default Monday through Friday.
    pub business_days: Vec<Weekday>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Monday,
            business_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }
}

/// Server-side rendering settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerConfig {
    /// What smart formatting does when no timezone context was supplied.
    pub missing_timezone: ServerFallback,
}

impl Default for WhennyConfig {
    fn default() -> Self {
        let mut formats = BTreeMap::new();
        formats.insert("short".to_string(), "{month}/{day}/{year}".to_string());
        formats.insert(
            "long".to_string(),
            "{weekday}, {monthFull} {dayOrdinal}, {year}".to_string(),
        );
        formats.insert(
            "iso".to_string(),
            "{year}-{month}-{day}T{hour24}:{minute}:{second}".to_string(),
        );
        formats.insert("time".to_string(), "{time}".to_string());
        formats.insert(
            "datetime".to_string(),
            "{month}/{day}/{year} {time}".to_string(),
        );

        Self {
            locale: "en-US".to_string(),
            default_timezone: None,
            hour12: true,
            relative: RelativeConfig {
                thresholds: RelativeThresholds::default(),
                phrases: RelativePhrases::default(),
            },
            smart: SmartConfig::default(),
            duration: DurationConfig::default(),
            formats,
            calendar: CalendarConfig::default(),
            server: ServerConfig::default(),
            extensions: BTreeMap::new(),
        }
    }
}

/// Top-level section names recognized by [`merge_named_section`].
pub const RECOGNIZED_SECTIONS: [&str; 11] = [
    "locale",
    "defaultTimezone",
    "relative",
    "smart",
    "compare",
    "duration",
    "formats",
    "calendar",
    "natural",
    "server",
    "personality",
];

/// Partial override tree, deep-merged over a base config.
///
/// Deserializes from the camelCase wire shape. Phrase generators are
/// programmatic-only overrides and never arrive over the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WhennyConfigPatch {
    pub locale: Option<String>,
    pub default_timezone: Option<String>,
    pub hour12: Option<bool>,
    pub relative: Option<RelativePatch>,
    pub smart: Option<SmartPatch>,
    pub duration: Option<DurationPatch>,
    /// Merged key-by-key over the base preset map.
    pub formats: Option<BTreeMap<String, String>>,
    pub calendar: Option<CalendarPatch>,
    pub server: Option<ServerPatch>,
    pub compare: Option<serde_json::Value>,
    pub natural: Option<serde_json::Value>,
    pub personality: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RelativePatch {
    pub thresholds: Option<ThresholdsPatch>,
    #[serde(skip)]
    pub phrases: Option<RelativePhrases>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ThresholdsPatch {
    pub just_now: Option<i64>,
    pub seconds: Option<i64>,
    pub minutes: Option<i64>,
    pub hours: Option<i64>,
    pub days: Option<i64>,
    pub weeks: Option<i64>,
    pub months: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SmartPatch {
    pub past: Option<Vec<SmartBucket>>,
    pub future: Option<Vec<SmartBucket>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DurationPatch {
    pub separator: Option<String>,
    #[serde(skip)]
    pub long: Option<DurationPhrases>,
    #[serde(skip)]
    pub compact: Option<DurationPhrases>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CalendarPatch {
    pub week_start: Option<WeekStart>,
    #[serde(default, deserialize_with = "weekday_names")]
    pub business_days: Option<Vec<Weekday>>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerPatch {
    pub missing_timezone: Option<ServerFallback>,
}

/// Deserialize a list of weekday names ("mon", "monday", ...) into
/// [`chrono::Weekday`] values, failing loudly on unknown names.
fn weekday_names<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Weekday>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let names: Option<Vec<String>> = Option::deserialize(deserializer)?;
    names
        .map(|list| {
            list.iter()
                .map(|name| {
                    name.parse::<Weekday>()
                        .map_err(|_| D::Error::custom(format!("unknown weekday name: '{name}'")))
                })
                .collect()
        })
        .transpose()
}

/// Deep-merge a partial override over a base config.
///
/// Pure: neither input is mutated; the result is a new immutable config.
pub fn merge_config(base: &WhennyConfig, patch: &WhennyConfigPatch) -> WhennyConfig {
    let mut merged = base.clone();

    if let Some(locale) = &patch.locale {
        merged.locale = locale.clone();
    }
    if let Some(zone) = &patch.default_timezone {
        merged.default_timezone = Some(zone.clone());
    }
    if let Some(hour12) = patch.hour12 {
        merged.hour12 = hour12;
    }

    if let Some(relative) = &patch.relative {
        if let Some(t) = &relative.thresholds {
            let base_t = &mut merged.relative.thresholds;
            base_t.just_now = t.just_now.unwrap_or(base_t.just_now);
            base_t.seconds = t.seconds.unwrap_or(base_t.seconds);
            base_t.minutes = t.minutes.unwrap_or(base_t.minutes);
            base_t.hours = t.hours.unwrap_or(base_t.hours);
            base_t.days = t.days.unwrap_or(base_t.days);
            base_t.weeks = t.weeks.unwrap_or(base_t.weeks);
            base_t.months = t.months.unwrap_or(base_t.months);
        }
        if let Some(phrases) = relative.phrases {
            merged.relative.phrases = phrases;
        }
    }

    if let Some(smart) = &patch.smart {
        if let Some(past) = &smart.past {
            merged.smart.past = past.clone();
        }
        if let Some(future) = &smart.future {
            merged.smart.future = Some(future.clone());
        }
    }

    if let Some(duration) = &patch.duration {
        if let Some(separator) = &duration.separator {
            merged.duration.separator = separator.clone();
        }
        if let Some(long) = duration.long {
            merged.duration.long = long;
        }
        if let Some(compact) = duration.compact {
            merged.duration.compact = compact;
        }
    }

    if let Some(formats) = &patch.formats {
        for (name, template) in formats {
            merged.formats.insert(name.clone(), template.clone());
        }
    }

    if let Some(calendar) = &patch.calendar {
        if let Some(week_start) = calendar.week_start {
            merged.calendar.week_start = week_start;
        }
        if let Some(days) = &calendar.business_days {
            merged.calendar.business_days = days.clone();
        }
    }

    if let Some(server) = &patch.server {
        if let Some(fallback) = server.missing_timezone {
            merged.server.missing_timezone = fallback;
        }
    }

    for (name, value) in [
        ("compare", &patch.compare),
        ("natural", &patch.natural),
        ("personality", &patch.personality),
    ] {
        if let Some(value) = value {
            merged.extensions.insert(name.to_string(), value.clone());
        }
    }

    merged
}

/// Merge a single named section over a base config.
///
/// This is the section-addressed surface consumed by external
/// configuration loaders.
///
/// # Errors
///
/// [`WhennyError::UnknownModule`] for a section name outside
/// [`RECOGNIZED_SECTIONS`]; [`WhennyError::InvalidConfig`] when the body
/// does not deserialize against the section's shape.
pub fn merge_named_section(
    base: &WhennyConfig,
    name: &str,
    body: &serde_json::Value,
) -> Result<WhennyConfig> {
    if !RECOGNIZED_SECTIONS.contains(&name) {
        return Err(WhennyError::UnknownModule(name.to_string()));
    }

    let invalid = |err: serde_json::Error| {
        WhennyError::InvalidConfig(format!("section '{name}': {err}"))
    };

    let mut patch = WhennyConfigPatch::default();
    match name {
        "locale" => patch.locale = Some(serde_json::from_value(body.clone()).map_err(invalid)?),
        "defaultTimezone" => {
            patch.default_timezone = Some(serde_json::from_value(body.clone()).map_err(invalid)?)
        }
        "relative" => patch.relative = Some(serde_json::from_value(body.clone()).map_err(invalid)?),
        "smart" => patch.smart = Some(serde_json::from_value(body.clone()).map_err(invalid)?),
        "duration" => patch.duration = Some(serde_json::from_value(body.clone()).map_err(invalid)?),
        "formats" => patch.formats = Some(serde_json::from_value(body.clone()).map_err(invalid)?),
        "calendar" => patch.calendar = Some(serde_json::from_value(body.clone()).map_err(invalid)?),
        "server" => patch.server = Some(serde_json::from_value(body.clone()).map_err(invalid)?),
        "compare" => patch.compare = Some(body.clone()),
        "natural" => patch.natural = Some(body.clone()),
        "personality" => patch.personality = Some(body.clone()),
        _ => unreachable!("name checked against RECOGNIZED_SECTIONS"),
    }

    Ok(merge_config(base, &patch))
}
