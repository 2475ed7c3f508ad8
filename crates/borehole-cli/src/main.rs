//! Borehole CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info, warn};

use borehole_cli::{Args, error_adapter};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting borehole survey");
    debug!(args:?; "Parsed arguments");

    match borehole_cli::run(&args) {
        Ok(report) => {
            info!(boreholes = report.boreholes().len(); "Completed successfully");
        }
        Err(err) => {
            let rendered = error_adapter::render(&err);
            if err.severity().is_warning() {
                warn!("{rendered}");
            } else {
                error!("Failed\n{rendered}");
            }
            process::exit(1);
        }
    }
}
