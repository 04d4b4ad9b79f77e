use std::io::BufRead;
use std::process::ExitCode;

use serde::Serialize;
use whenny_core::{smart_at, smart_in_timezone, smart_server, WhennyConfig};

use crate::cli::SmartArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{coerce_line, line_reader, load_config, parse_reference};

pub fn run_smart(args: SmartArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let reference = parse_reference(args.reference.as_deref())?;
    let reader = line_reader(&args.input, args.stdin)?;

    for line in reader.lines() {
        let line = line.map_err(|e| CliError::runtime(format!("Failed to read line: {}", e)))?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let result = process_smart_line(trimmed, &args, reference, &config)
            .map_err(|e| CliError::input(format!("Error processing '{}': {}", trimmed, e)))?;

        match output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string(&result)
                    .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
                println!("{}", json);
            }
            OutputFormat::Text => {
                println!("{}", result.phrase);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

#[derive(Debug, Serialize)]
struct SmartLine {
    input: String,
    phrase: String,
}

fn process_smart_line(
    input: &str,
    args: &SmartArgs,
    reference: chrono::DateTime<chrono::Utc>,
    config: &WhennyConfig,
) -> CliResult<SmartLine> {
    let instant = coerce_line(input)?;

    let phrase = if args.server {
        smart_server(instant, reference, config, args.tz.as_deref())?
    } else {
        match args.tz.as_deref() {
            Some(zone) => smart_in_timezone(instant, reference, config, zone)?,
            None => smart_at(instant, reference, config),
        }
    };

    Ok(SmartLine {
        input: input.to_string(),
        phrase,
    })
}
