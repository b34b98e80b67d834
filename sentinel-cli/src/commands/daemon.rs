//! Scheduled health check daemon.
//!
//! The daemon owns one coordinator for its lifetime. Only the scheduled
//! trigger feeds it; `sentinel run` is a separate process with its own
//! cache. No query surface is exposed, so nothing here reads the cache.

use std::sync::Arc;

use sentinel_core::DailySchedule;
use sentinel_core::scheduler::run_schedule;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::util::{build_coordinator, init_logging, load_config, runtime};

/// Daemon command handler
///
/// Runs until Ctrl-C. `--at` overrides the configured time and enables the
/// schedule even when the configuration disables it.
pub fn cmd_daemon(opts: &GlobalOpts, at: Option<&str>, run_now: bool) -> Result<(), CliError> {
    let manager = load_config(opts)?;
    let level = manager.config().logging.level;
    init_logging(&manager, opts, level);

    let schedule = match at {
        Some(value) => DailySchedule::parse(value)?,
        None if manager.config().schedule.enabled => manager.config().schedule.daily_schedule()?,
        None => {
            return Err(CliError::Config(
                "schedule is disabled; enable it or pass --at HH:MM".to_string(),
            ));
        }
    };

    let coordinator = Arc::new(build_coordinator(&manager));
    tracing::info!(
        servers = coordinator.registry().len(),
        at = %schedule,
        "Scheduler started"
    );

    runtime()?.block_on(async move {
        if run_now
            && let Err(e) = coordinator.run_scheduled().await
        {
            tracing::error!(error = %e, "Startup health check failed");
        }

        tokio::select! {
            () = run_schedule(Arc::clone(&coordinator), schedule) => {}
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    return Err(CliError::Io(e));
                }
                tracing::info!("Interrupted, shutting down");
            }
        }
        Ok::<(), CliError>(())
    })
}
