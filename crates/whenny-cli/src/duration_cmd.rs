use std::io::BufRead;
use std::process::ExitCode;

use serde::Serialize;
use whenny_core::{parse_duration, WhennyConfig, WhennyDuration};

use crate::cli::DurationArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{line_reader, load_config};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Long,
    Compact,
    Brief,
    Clock,
    Timer,
    Minimal,
    Human,
}

fn parse_style(s: &str) -> CliResult<Style> {
    match s.to_lowercase().as_str() {
        "long" => Ok(Style::Long),
        "compact" => Ok(Style::Compact),
        "brief" => Ok(Style::Brief),
        "clock" => Ok(Style::Clock),
        "timer" => Ok(Style::Timer),
        "minimal" => Ok(Style::Minimal),
        "human" => Ok(Style::Human),
        _ => Err(CliError::input(format!(
            "Invalid style '{}'. Expected: long, compact, brief, clock, timer, minimal, human",
            s
        ))),
    }
}

pub fn run_duration(args: DurationArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let style = parse_style(&args.style)?;
    let reader = line_reader(&args.input, args.stdin)?;

    for line in reader.lines() {
        let line = line.map_err(|e| CliError::runtime(format!("Failed to read line: {}", e)))?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let duration = WhennyDuration::new(parse_duration(trimmed));
        let formatted = render(duration, style, &config);

        match output_format {
            OutputFormat::Json => {
                let result = DurationLine {
                    input: trimmed.to_string(),
                    total_seconds: duration.total_seconds(),
                    formatted,
                };
                let json = serde_json::to_string(&result)
                    .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
                println!("{}", json);
            }
            OutputFormat::Text => {
                println!("{}", formatted);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

#[derive(Debug, Serialize)]
struct DurationLine {
    input: String,
    total_seconds: u64,
    formatted: String,
}

fn render(duration: WhennyDuration, style: Style, config: &WhennyConfig) -> String {
    match style {
        Style::Long => duration.long(&config.duration),
        Style::Compact => duration.compact(&config.duration),
        Style::Brief => duration.brief(&config.duration),
        Style::Clock => duration.clock(),
        Style::Timer => duration.timer(),
        Style::Minimal => duration.minimal(&config.duration),
        Style::Human => duration.human(),
    }
}
