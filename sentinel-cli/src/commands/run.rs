//! On-demand health check command.
//!
//! Each invocation builds its own coordinator, so the latest-batch cache
//! lives only for this process and nothing reads it after the run. The
//! report file and the printed reports are the outputs. Serving
//! `LatestBatchCache::latest_json` to other callers needs a long-running
//! host process that shares one coordinator between triggers.

use std::sync::Arc;

use sentinel_core::tracing::TracingLevel;
use sentinel_core::{CallbackSink, ProgressEvent, RunRequest, SelectionRequest};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::format::{progress_line, reports_table};
use crate::util::{build_coordinator, init_logging, load_config, runtime};

/// Run command handler
///
/// Progress lines stream to stdout for tables and to stderr for JSON, so
/// JSON output stays machine-readable.
pub fn cmd_run(
    opts: &GlobalOpts,
    servers: Vec<String>,
    request: Option<&str>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let selection = match request {
        Some(raw) => RunRequest::from_json(raw)?.into_selection()?,
        None => SelectionRequest::from_names(servers),
    };

    let manager = load_config(opts)?;
    init_logging(&manager, opts, TracingLevel::Warn);
    let coordinator = build_coordinator(&manager);

    let quiet = opts.quiet;
    let color = opts.color;
    let sink = CallbackSink::new(move |event: &ProgressEvent| {
        if quiet {
            return;
        }
        let line = progress_line(event, color && format == OutputFormat::Table);
        match format {
            OutputFormat::Table => println!("{line}"),
            OutputFormat::Json => eprintln!("{line}"),
        }
    });

    let outcome = runtime()?.block_on(coordinator.trigger_run(selection, Arc::new(sink)))?;
    let batch = &outcome.batch;

    match format {
        OutputFormat::Table => {
            if !quiet && !batch.is_empty() {
                println!();
                println!("{}", reports_table(batch.reports(), color));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(batch.reports())
                .map_err(|e| CliError::Output(format!("Failed to serialize reports: {e}")))?;
            println!("{json}");
        }
    }

    let offline = batch.offline_count();
    if offline > 0 {
        return Err(CliError::HostsOffline {
            offline,
            total: batch.len(),
        });
    }

    Ok(())
}
