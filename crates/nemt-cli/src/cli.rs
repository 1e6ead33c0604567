//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "nemt837",
    version,
    about = "NEMT 837P toolkit - group trips, encode X12 837P claims, check interchanges",
    long_about = "Group NEMT trip legs into claims, encode them as X12 837P \
                  (005010X222A1) interchanges, and run structural compliance \
                  checks over EDI files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow member identifiers in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Encode a claim JSON file as an 837P interchange.
    Encode(EncodeArgs),

    /// Group a trip batch into claims and encode them.
    Batch(BatchArgs),

    /// Run structural compliance checks over an EDI file.
    Check(CheckArgs),

    /// List the predefined payer profiles.
    Payers,
}

/// Envelope options shared by the encoding commands.
#[derive(Args)]
pub struct EnvelopeArgs {
    /// TOML configuration file.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output EDI file (default: stdout).
    #[arg(long = "out", value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// ISA05 sender qualifier.
    #[arg(long = "sender-qual", value_name = "QUAL")]
    pub sender_qualifier: Option<String>,

    /// ISA06 sender id.
    #[arg(long = "sender-id", env = "NEMT_SENDER_ID", value_name = "ID")]
    pub sender_id: Option<String>,

    /// ISA07 receiver qualifier.
    #[arg(long = "receiver-qual", value_name = "QUAL")]
    pub receiver_qualifier: Option<String>,

    /// ISA08 receiver id.
    #[arg(long = "receiver-id", env = "NEMT_RECEIVER_ID", value_name = "ID")]
    pub receiver_id: Option<String>,

    /// GS02 application sender code.
    #[arg(long = "gs-sender", value_name = "CODE")]
    pub gs_sender: Option<String>,

    /// GS03 application receiver code.
    #[arg(long = "gs-receiver", value_name = "CODE")]
    pub gs_receiver: Option<String>,

    /// ISA15 usage indicator.
    #[arg(long = "usage", value_enum)]
    pub usage: Option<UsageArg>,

    /// Predefined payer profile (see `payers`).
    #[arg(long = "payer", value_name = "KEY")]
    pub payer: Option<String>,

    /// Where ambulance pickup and dropoff addresses are encoded.
    #[arg(long = "location-mode", value_enum)]
    pub location_mode: Option<LocationModeArg>,
}

#[derive(Args)]
pub struct EncodeArgs {
    /// Claim JSON file (one claim object or a list of claims).
    #[arg(value_name = "CLAIM_JSON")]
    pub claim: PathBuf,

    #[command(flatten)]
    pub envelope: EnvelopeArgs,

    /// Check the generated interchange and print the compliance report.
    #[arg(long = "check")]
    pub check: bool,

    /// Run the UnitedHealthcare business rules over each claim.
    #[arg(long = "uhc-rules")]
    pub uhc_rules: bool,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Trip JSON file (a list of trips, or an object with `trips`).
    #[arg(value_name = "TRIPS_JSON")]
    pub trips: PathBuf,

    /// JSON file with submitter, billing provider, payer and place of service
    /// defaults.
    #[arg(long = "defaults", value_name = "PATH")]
    pub defaults: Option<PathBuf>,

    #[command(flatten)]
    pub envelope: EnvelopeArgs,
}

#[derive(Args)]
pub struct CheckArgs {
    /// EDI file to check.
    #[arg(value_name = "EDI_FILE")]
    pub edi: PathBuf,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

/// CLI usage indicator choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum UsageArg {
    #[value(name = "T", alias = "test")]
    Test,
    #[value(name = "P", alias = "production")]
    Production,
}

/// CLI location mode choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LocationModeArg {
    Inline,
    Separate,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
