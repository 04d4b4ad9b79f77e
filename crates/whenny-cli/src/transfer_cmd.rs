use std::io::BufRead;
use std::process::ExitCode;

use chrono::SecondsFormat;
use serde::Serialize;
use whenny_core::{create_transfer, from_transfer_value, is_transfer_payload};

use crate::cli::{TransferCreateArgs, TransferUnpackArgs};
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{coerce_line, line_reader};

pub fn run_transfer_create(
    args: TransferCreateArgs,
    output_format: OutputFormat,
) -> CliResult<ExitCode> {
    let reader = line_reader(&args.input, args.stdin)?;

    for line in reader.lines() {
        let line = line.map_err(|e| CliError::runtime(format!("Failed to read line: {}", e)))?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let instant = coerce_line(trimmed)
            .map_err(|e| CliError::input(format!("Error processing '{}': {}", trimmed, e)))?;
        let payload = create_transfer(instant, &args.tz)?;

        match output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string(&payload)
                    .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
                println!("{}", json);
            }
            OutputFormat::Text => {
                println!(
                    "{} {} {}",
                    payload.iso, payload.origin_zone, payload.origin_offset
                );
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

pub fn run_transfer_unpack(
    args: TransferUnpackArgs,
    output_format: OutputFormat,
) -> CliResult<ExitCode> {
    let reader = line_reader(&args.input, args.stdin)?;

    for line in reader.lines() {
        let line = line.map_err(|e| CliError::runtime(format!("Failed to read line: {}", e)))?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let result = process_unpack_line(trimmed)
            .map_err(|e| CliError::input(format!("Error processing '{}': {}", trimmed, e)))?;

        match output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string(&result)
                    .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
                println!("{}", json);
            }
            OutputFormat::Text => {
                println!(
                    "{} -> {} ({} to {})",
                    result.utc, result.origin_wall, result.day_start_utc, result.day_end_utc
                );
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

#[derive(Debug, Serialize)]
struct UnpackLine {
    utc: String,
    origin_zone: String,
    origin_wall: String,
    day_start_utc: String,
    day_end_utc: String,
}

fn process_unpack_line(input: &str) -> CliResult<UnpackLine> {
    let value: serde_json::Value = serde_json::from_str(input)
        .map_err(|e| CliError::input(format!("not JSON: {e}")))?;

    if !is_transfer_payload(&value) {
        return Err(CliError::input(
            "not a transfer payload (expected iso, originZone, originOffset)",
        ));
    }

    let received = from_transfer_value(&value)?;
    let (start, end) = received.day_bounds_in_origin();

    Ok(UnpackLine {
        utc: received.utc().to_rfc3339_opts(SecondsFormat::Millis, true),
        origin_zone: received.origin_zone().to_string(),
        origin_wall: received.in_origin().format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
        day_start_utc: start.to_rfc3339_opts(SecondsFormat::Millis, true),
        day_end_utc: end.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
