//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use profqc_model::QcFlag;

#[derive(Parser)]
#[command(
    name = "profqc",
    version,
    about = "Quality control of oceanographic profile data",
    long_about = "Run automatic QC, set manual flags and merge feedback on cruise \
                  profile files.\n\n\
                  Files ending in .csv are comma separated; all other files are \
                  read and written as tab separated text."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the automatic QC pass and report validation remarks.
    Check(CheckArgs),

    /// List visits, optionally filtered.
    Visits(VisitsArgs),

    /// Set a manual flag on points of one parameter in one visit.
    Flag(FlagArgs),

    /// Merge manual flags from an edited changes file.
    MergeFeedback(MergeFeedbackArgs),

    /// Export rows whose total flag differs from the incoming flag.
    Changes(ChangesArgs),
}

/// Where to save results of a command that modifies flags.
#[derive(Args)]
pub struct OutputArgs {
    /// Save the full table, unpacked QC columns included.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Save the changes report.
    #[arg(long = "changes", value_name = "PATH")]
    pub changes: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Measurement file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// QC configuration (TOML). Falls back to $PROFQC_CONFIG, then defaults.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Re-check one visit only; other rows keep their automatic flags.
    #[arg(long = "visit", value_name = "KEY")]
    pub visit: Option<String>,

    #[command(flatten)]
    pub outputs: OutputArgs,
}

#[derive(Args)]
pub struct VisitsArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(long = "year", value_name = "YEAR")]
    pub years: Vec<i32>,

    #[arg(long = "month", value_name = "MONTH", value_parser = clap::value_parser!(u32).range(1..=12))]
    pub months: Vec<u32>,

    #[arg(long = "cruise", value_name = "CRUISE")]
    pub cruises: Vec<String>,

    #[arg(long = "station", value_name = "STATION")]
    pub stations: Vec<String>,
}

#[derive(Args)]
pub struct FlagArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Visit key of the profile.
    #[arg(long = "visit", value_name = "KEY")]
    pub visit: String,

    /// Parameter whose points are flagged.
    #[arg(long = "parameter", value_name = "NAME")]
    pub parameter: String,

    /// Depths of the points to flag, in metres.
    #[arg(long = "depth", value_name = "METRES", required = true, num_args = 1..)]
    pub depths: Vec<f64>,

    /// Manual flag code (0 clears the manual flag).
    #[arg(long = "flag", value_name = "CODE", value_parser = parse_flag)]
    pub flag: QcFlag,

    #[command(flatten)]
    pub outputs: OutputArgs,
}

#[derive(Args)]
pub struct MergeFeedbackArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Feedback file with visit_key, DEPH, parameter and MANUAL_QC columns.
    #[arg(value_name = "FEEDBACK")]
    pub feedback: PathBuf,

    #[command(flatten)]
    pub outputs: OutputArgs,
}

#[derive(Args)]
pub struct ChangesArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination of the changes report.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: PathBuf,
}

fn parse_flag(value: &str) -> Result<QcFlag, String> {
    value.parse::<QcFlag>().map_err(|e| e.to_string())
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
