use std::io::BufRead;
use std::process::ExitCode;

use chrono::SecondsFormat;
use serde::Serialize;
use whenny_core::relative_at;

use crate::cli::RelativeArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{coerce_line, line_reader, load_config, parse_reference};

pub fn run_relative(args: RelativeArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let reference = parse_reference(args.reference.as_deref())?;
    let reader = line_reader(&args.input, args.stdin)?;

    for line in reader.lines() {
        let line = line.map_err(|e| CliError::runtime(format!("Failed to read line: {}", e)))?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let instant = coerce_line(trimmed)
            .map_err(|e| CliError::input(format!("Error processing '{}': {}", trimmed, e)))?;
        let phrase = relative_at(instant, reference, &config);

        match output_format {
            OutputFormat::Json => {
                let result = RelativeLine {
                    input: trimmed.to_string(),
                    reference: reference.to_rfc3339_opts(SecondsFormat::Millis, true),
                    phrase,
                };
                let json = serde_json::to_string(&result)
                    .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
                println!("{}", json);
            }
            OutputFormat::Text => {
                println!("{}", phrase);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

#[derive(Debug, Serialize)]
struct RelativeLine {
    input: String,
    reference: String,
    phrase: String,
}
