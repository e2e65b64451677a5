#![forbid(unsafe_code)]

use crate::config::EchoprobeConfig;
use clap::Parser;
use config::Args;
use std::process::ExitCode;

mod app;
mod config;

/// The exit code used when the probe could not be run at all.
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();
    match EchoprobeConfig::from_args(args).and_then(|cfg| app::run_echoprobe(&cfg)) {
        Ok(result) => ExitCode::from(app::exit_status(&result)),
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
