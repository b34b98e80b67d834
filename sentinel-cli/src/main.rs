//! Server Sentinel CLI - fleet health checks over SSH
//!
//! Lists configured servers, runs on-demand health checks, and runs the
//! daily scheduled check as a foreground daemon.

mod cli;
mod commands;
mod error;
mod format;
mod util;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let quiet = cli.quiet;

    let result = commands::dispatch(&cli.global(), cli.command);

    if let Err(e) = result {
        if !quiet || !e.is_reported() {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
