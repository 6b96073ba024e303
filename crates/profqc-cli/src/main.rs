//! Profile QC command line.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use profqc_cli::commands::{run_changes, run_check, run_flag, run_merge_feedback, run_visits};
use profqc_cli::logging::{LogConfig, LogFormat, init_logging};
use profqc_cli::types::{CheckRequest, FlagRequest, MergeRequest, Outputs, VisitsRequest};
use profqc_model::VisitFilter;

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, OutputArgs};
use crate::summary::{
    print_changes_written, print_check_summary, print_flag_summary, print_merge_summary,
    print_visits,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match cli.command {
        Command::Check(args) => run_check(&CheckRequest {
            input: args.input,
            config: args.config,
            visit: args.visit,
            outputs: outputs(args.outputs),
        })
        .map(|result| print_check_summary(&result)),
        Command::Visits(args) => run_visits(&VisitsRequest {
            input: args.input,
            filter: VisitFilter {
                years: args.years.into_iter().collect(),
                months: args.months.into_iter().collect(),
                cruises: args.cruises.into_iter().collect(),
                stations: args.stations.into_iter().collect(),
            },
        })
        .map(|result| print_visits(&result)),
        Command::Flag(args) => run_flag(&FlagRequest {
            input: args.input,
            visit_key: args.visit,
            parameter: args.parameter,
            depths: args.depths,
            flag: args.flag,
            outputs: outputs(args.outputs),
        })
        .map(|result| print_flag_summary(&result)),
        Command::MergeFeedback(args) => run_merge_feedback(&MergeRequest {
            input: args.input,
            feedback: args.feedback,
            outputs: outputs(args.outputs),
        })
        .map(|result| print_merge_summary(&result)),
        Command::Changes(args) => run_changes(&args.input, &args.output)
            .map(|rows| print_changes_written(&args.output, rows)),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn outputs(args: OutputArgs) -> Outputs {
    Outputs {
        table: args.output,
        changes: args.changes,
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
