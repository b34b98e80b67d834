//! Command handler modules for the CLI.

mod daemon;
mod list;
mod run;

use crate::cli::{Commands, GlobalOpts};
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(opts: &GlobalOpts, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::List { format } => list::cmd_list(opts, format),
        Commands::Run {
            servers,
            request,
            format,
        } => run::cmd_run(opts, servers, request.as_deref(), format),
        Commands::Daemon { at, run_now } => daemon::cmd_daemon(opts, at.as_deref(), run_now),
    }
}
