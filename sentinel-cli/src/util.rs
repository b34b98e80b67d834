//! Shared utility functions used across command modules.

use std::sync::Arc;

use sentinel_core::config::ConfigManager;
use sentinel_core::tracing::{TracingLevel, init_tracing};
use sentinel_core::{Orchestrator, TriggerCoordinator};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Loads and validates the configuration named on the command line
pub fn load_config(opts: &GlobalOpts) -> Result<ConfigManager, CliError> {
    ConfigManager::load(&opts.config).map_err(CliError::from)
}

/// Initializes logging from the configuration and command-line flags.
///
/// `base` is the level used when the configuration does not set a custom
/// filter; each `-v` raises it one step and `-q` drops it to errors.
pub fn init_logging(manager: &ConfigManager, opts: &GlobalOpts, base: TracingLevel) {
    let mut config = manager.config().logging.tracing_config();
    config.level = if opts.quiet {
        TracingLevel::Error
    } else {
        base.raised(opts.verbose)
    };

    if let Err(e) = init_tracing(&config) {
        eprintln!("Warning: {e}");
    }
}

/// Wires a coordinator from the configuration
pub fn build_coordinator(manager: &ConfigManager) -> TriggerCoordinator {
    let config = manager.config();
    TriggerCoordinator::new(
        Arc::new(manager.registry().clone()),
        Orchestrator::with_ssh(config.probe.clone()),
        Arc::new(config.reports.writer()),
    )
    .with_notifier(config.notify.notifier())
}

/// Creates the async runtime commands block on
pub fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Run(format!("Failed to create async runtime: {e}")))
}
