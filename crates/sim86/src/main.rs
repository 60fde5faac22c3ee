//! CLI entry point for the sim86 binary.

use std::io;
use std::process::ExitCode;

use anyhow as _;
use clap::Parser;
use log as _;
use sim86::{simulate, Args};
use sim86_core as _;
use sim86_decoder as _;
#[cfg(test)]
use tempfile as _;

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut out = io::stdout().lock();
    match simulate(&args, &mut out) {
        Ok(outcome) => match outcome.run_state.halting_fault() {
            Some(cause) => {
                eprintln!("error: execution halted: {cause}");
                ExitCode::FAILURE
            }
            None => ExitCode::SUCCESS,
        },
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
