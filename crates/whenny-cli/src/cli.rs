use clap::{Parser, Subcommand};

/// Timezone-aware date formatting tool
#[derive(Parser, Debug)]
#[command(name = "whenny")]
#[command(about = "Timezone-aware date formatting tool")]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render timestamps through a token template or named preset
    Format(FormatArgs),
    /// Phrase timestamps relative to a reference instant
    Relative(RelativeArgs),
    /// Smart-format timestamps via the configured bucket lists
    Smart(SmartArgs),
    /// Decompose and render durations
    Duration(DurationArgs),
    /// Create or unpack timezone transfer payloads
    Transfer(TransferArgs),
}

#[derive(clap::Args, Debug)]
pub struct FormatArgs {
    /// Token template (e.g., "{year}-{month}-{day}")
    #[arg(short = 't', long)]
    pub template: Option<String>,

    /// Named preset: short, long, iso, time, datetime
    #[arg(short = 'p', long, default_value = "iso")]
    pub preset: String,

    /// IANA timezone to project into (e.g., America/New_York)
    #[arg(long)]
    pub tz: Option<String>,

    /// Config override file (JSON, merged over defaults)
    #[arg(long)]
    pub config: Option<String>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,

    /// Input file path (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Read from stdin
    #[arg(long)]
    pub stdin: bool,
}

#[derive(clap::Args, Debug)]
pub struct RelativeArgs {
    /// Reference instant (RFC3339); defaults to now
    #[arg(short = 'r', long)]
    pub reference: Option<String>,

    /// Config override file (JSON, merged over defaults)
    #[arg(long)]
    pub config: Option<String>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,

    /// Input file path (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Read from stdin
    #[arg(long)]
    pub stdin: bool,
}

#[derive(clap::Args, Debug)]
pub struct SmartArgs {
    /// Reference instant (RFC3339); defaults to now
    #[arg(short = 'r', long)]
    pub reference: Option<String>,

    /// IANA timezone for template rendering
    #[arg(long)]
    pub tz: Option<String>,

    /// Apply the configured server fallback when --tz is absent
    #[arg(long)]
    pub server: bool,

    /// Config override file (JSON, merged over defaults)
    #[arg(long)]
    pub config: Option<String>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,

    /// Input file path (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Read from stdin
    #[arg(long)]
    pub stdin: bool,
}

#[derive(clap::Args, Debug)]
pub struct DurationArgs {
    /// Style: long, compact, brief, clock, timer, minimal, human
    #[arg(short = 's', long, default_value = "long")]
    pub style: String,

    /// Config override file (JSON, merged over defaults)
    #[arg(long)]
    pub config: Option<String>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,

    /// Input file path (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Read from stdin
    #[arg(long)]
    pub stdin: bool,
}

#[derive(clap::Args, Debug)]
pub struct TransferArgs {
    #[command(subcommand)]
    pub command: TransferCommands,
}

#[derive(Subcommand, Debug)]
pub enum TransferCommands {
    /// Create payloads from timestamps in an origin timezone
    Create(TransferCreateArgs),
    /// Unpack payload JSON lines into UTC and origin-day boundaries
    Unpack(TransferUnpackArgs),
}

#[derive(clap::Args, Debug)]
pub struct TransferCreateArgs {
    /// Origin IANA timezone (e.g., America/New_York)
    #[arg(long)]
    pub tz: String,

    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,

    /// Input file path (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Read from stdin
    #[arg(long)]
    pub stdin: bool,
}

#[derive(clap::Args, Debug)]
pub struct TransferUnpackArgs {
    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,

    /// Input file path (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Read from stdin
    #[arg(long)]
    pub stdin: bool,
}
