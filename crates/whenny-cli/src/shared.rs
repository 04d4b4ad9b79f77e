use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};

use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::debug;
use whenny_core::{coerce, merge_config, WhennyConfig, WhennyConfigPatch};

use crate::error::{CliError, CliResult};

/// Line source for a command: a file path, or stdin for `-`.
pub fn line_reader(input: &str, use_stdin: bool) -> CliResult<Box<dyn BufRead>> {
    if use_stdin || input == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }

    let file = File::open(input)
        .map_err(|e| CliError::runtime(format!("Failed to open file '{}': {}", input, e)))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Default config with an optional JSON patch file merged over it.
pub fn load_config(path: Option<&str>) -> CliResult<WhennyConfig> {
    let base = WhennyConfig::default();
    let Some(path) = path else {
        return Ok(base);
    };

    let patch = read_patch_file(path)
        .map_err(|e| CliError::input(format!("Failed to load config '{}': {:#}", path, e)))?;
    debug!(path, "merged config override");
    Ok(merge_config(&base, &patch))
}

fn read_patch_file(path: &str) -> anyhow::Result<WhennyConfigPatch> {
    let body = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&body).with_context(|| format!("parsing {path} as a config patch"))
}

/// Parse an RFC3339 reference anchor, defaulting to now.
pub fn parse_reference(reference: Option<&str>) -> CliResult<DateTime<Utc>> {
    match reference {
        Some(text) => coerce(text).map_err(CliError::from),
        None => Ok(Utc::now()),
    }
}

/// Coerce one input line into an instant, auto-detecting epoch numbers.
pub fn coerce_line(line: &str) -> CliResult<DateTime<Utc>> {
    whenny_core::coerce_text_auto(line).map_err(CliError::from)
}
