//! NEMT 837P command-line tool.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use nemt_cli::logging::{LogConfig, LogFormat, init_logging};
use nemt_compliance::PayerRuleReport;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{print_json, run_batch_command, run_check, run_encode};
use crate::summary::{print_batch_summary, print_compliance, print_payer_rules, print_payers};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Encode(args) => match run_encode(&args) {
            Ok(result) => {
                if args.envelope.out.is_some() {
                    eprintln!("Encoded {} claim(s)", result.claims);
                }
                let rules_ok = result.payer_rules.iter().all(PayerRuleReport::is_compliant);
                if !result.payer_rules.is_empty() {
                    print_payer_rules(&result.payer_rules);
                }
                let structure_ok = result.compliance.as_ref().is_none_or(|report| {
                    print_compliance(report);
                    report.is_compliant()
                });
                i32::from(!(rules_ok && structure_ok))
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Batch(args) => match run_batch_command(&args) {
            Ok(outcome) => {
                print_batch_summary(&outcome);
                i32::from(!outcome.report.is_success())
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Check(args) => match run_check(&args) {
            Ok(report) => {
                let printed = if args.json {
                    print_json(&report)
                } else {
                    print_compliance(&report);
                    Ok(())
                };
                match printed {
                    Ok(()) => i32::from(!report.is_compliant()),
                    Err(error) => {
                        eprintln!("error: {error:#}");
                        1
                    }
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Payers => {
            print_payers();
            0
        }
    };
    std::process::exit(exit_code);
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
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
