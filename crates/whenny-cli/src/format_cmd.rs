use std::io::BufRead;
use std::process::ExitCode;

use serde::Serialize;
use tracing::debug;
use whenny_core::{format_in_timezone, format_preset, format_tokens, WhennyConfig};

use crate::cli::FormatArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{coerce_line, line_reader, load_config};

pub fn run_format(args: FormatArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let reader = line_reader(&args.input, args.stdin)?;

    for line in reader.lines() {
        let line = line.map_err(|e| CliError::runtime(format!("Failed to read line: {}", e)))?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let result = process_format_line(trimmed, &args, &config)
            .map_err(|e| CliError::input(format!("Error processing '{}': {}", trimmed, e)))?;

        match output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string(&result)
                    .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
                println!("{}", json);
            }
            OutputFormat::Text => {
                println!("{}", result.formatted);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

#[derive(Debug, Serialize)]
pub struct FormatLine {
    pub input: String,
    pub formatted: String,
}

fn process_format_line(
    input: &str,
    args: &FormatArgs,
    config: &WhennyConfig,
) -> CliResult<FormatLine> {
    let instant = coerce_line(input)?;
    debug!(%instant, "coerced input line");

    let formatted = match (&args.template, args.tz.as_deref()) {
        (Some(template), Some(zone)) => format_in_timezone(instant, template, config, zone)?,
        (Some(template), None) => format_tokens(instant, template, config),
        (None, zone) => format_preset(instant, &args.preset, config, zone)?,
    };

    Ok(FormatLine {
        input: input.to_string(),
        formatted,
    })
}
