//! `ahb-diff` command-line entry point.

use std::io::{self, IsTerminal};

use ahb_cli::cli::{Cli, Command};
use ahb_cli::commands::{run_batch, run_compare, run_versions};
use ahb_cli::logging::init_logging;
use ahb_cli::summary::{print_batch_summary, print_unit_summary};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config(io::stderr().is_terminal());
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Batch(args) => match run_batch(args) {
            Ok(result) => {
                print_batch_summary(&result);
                if result.has_errors() { 1 } else { 0 }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Compare(args) => match run_compare(args) {
            Ok(unit) => {
                print_unit_summary(&unit);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Versions(args) => match run_versions(args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}
