use std::process::ExitCode;

use clap::Parser;

mod cli;
mod duration_cmd;
mod error;
mod format_cmd;
mod relative_cmd;
mod shared;
mod smart_cmd;
mod transfer_cmd;

use cli::{Cli, Commands, TransferCommands};
use duration_cmd::run_duration;
use error::{output_format_hint, parse_output_format, render_error};
use format_cmd::run_format;
use relative_cmd::run_relative;
use smart_cmd::run_smart;
use transfer_cmd::{run_transfer_create, run_transfer_unpack};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Format(args) => {
            let fallback = output_format_hint(&args.output_format);
            let output_format = match parse_output_format(&args.output_format) {
                Ok(format) => format,
                Err(err) => return render_error(&err, fallback),
            };

            match run_format(args, output_format) {
                Ok(code) => code,
                Err(err) => render_error(&err, output_format),
            }
        }
        Commands::Relative(args) => {
            let fallback = output_format_hint(&args.output_format);
            let output_format = match parse_output_format(&args.output_format) {
                Ok(format) => format,
                Err(err) => return render_error(&err, fallback),
            };

            match run_relative(args, output_format) {
                Ok(code) => code,
                Err(err) => render_error(&err, output_format),
            }
        }
        Commands::Smart(args) => {
            let fallback = output_format_hint(&args.output_format);
            let output_format = match parse_output_format(&args.output_format) {
                Ok(format) => format,
                Err(err) => return render_error(&err, fallback),
            };

            match run_smart(args, output_format) {
                Ok(code) => code,
                Err(err) => render_error(&err, output_format),
            }
        }
        Commands::Duration(args) => {
            let fallback = output_format_hint(&args.output_format);
            let output_format = match parse_output_format(&args.output_format) {
                Ok(format) => format,
                Err(err) => return render_error(&err, fallback),
            };

            match run_duration(args, output_format) {
                Ok(code) => code,
                Err(err) => render_error(&err, output_format),
            }
        }
        Commands::Transfer(args) => match args.command {
            TransferCommands::Create(args) => {
                let fallback = output_format_hint(&args.output_format);
                let output_format = match parse_output_format(&args.output_format) {
                    Ok(format) => format,
                    Err(err) => return render_error(&err, fallback),
                };

                match run_transfer_create(args, output_format) {
                    Ok(code) => code,
                    Err(err) => render_error(&err, output_format),
                }
            }
            TransferCommands::Unpack(args) => {
                let fallback = output_format_hint(&args.output_format);
                let output_format = match parse_output_format(&args.output_format) {
                    Ok(format) => format,
                    Err(err) => return render_error(&err, fallback),
                };

                match run_transfer_unpack(args, output_format) {
                    Ok(code) => code,
                    Err(err) => render_error(&err, output_format),
                }
            }
        },
    }
}
