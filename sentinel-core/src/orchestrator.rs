//! Batch orchestration
//!
//! Resolves a selection against the registry and probes every selected host
//! concurrently, bounded by [`ProbeSettings::max_concurrency`]. Every probe
//! task is spawned up front and waits for a permit, so a slow host holds one
//! slot and never stalls the rest. Reports come back in resolved selection
//! order regardless of completion order.

use std::sync::Arc;

use chrono::Utc;
use futures::future;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::RunError;
use crate::models::{Batch, HealthReport, HostSpec, SelectionRequest};
use crate::monitoring::{ProbeSettings, RemoteExecutor, SshExecutor, probe_host};
use crate::progress::{ProgressStatus, SharedSink};
use crate::tracing::span_names;
use crate::{trace_operation, trace_operation_debug};

/// Run-level line emitted when a batch starts
pub const STARTING_MESSAGE: &str = "Starting health check process...";

/// Run-level line emitted when the selection resolves to no hosts
pub const NOTHING_SELECTED_MESSAGE: &str = "No servers selected to run.";

/// Probes batches of hosts with a shared executor and settings
#[derive(Clone)]
pub struct Orchestrator {
    executor: Arc<dyn RemoteExecutor>,
    settings: Arc<ProbeSettings>,
}

impl Orchestrator {
    /// Creates an orchestrator around an executor
    #[must_use]
    pub fn new(executor: Arc<dyn RemoteExecutor>, settings: ProbeSettings) -> Self {
        Self {
            executor,
            settings: Arc::new(settings),
        }
    }

    /// Creates an orchestrator that drives the system `ssh` client
    #[must_use]
    pub fn with_ssh(settings: ProbeSettings) -> Self {
        let executor = Arc::new(SshExecutor::new(&settings));
        Self::new(executor, settings)
    }

    /// Probe settings in effect
    #[must_use]
    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Probes the hosts `selection` resolves to and assembles a batch.
    ///
    /// An empty resolution yields an empty batch after a
    /// "No servers selected to run." line.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::ProbeTask`] if a probe task panicked or was
    /// cancelled. Per-host failures are recorded in reports instead.
    pub async fn run_batch(
        &self,
        registry: &[HostSpec],
        selection: &SelectionRequest,
        sink: SharedSink,
    ) -> Result<Batch, RunError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let hosts: Vec<HostSpec> = selection.resolve(registry).into_iter().cloned().collect();

        if hosts.is_empty() {
            tracing::info!(%run_id, "Selection resolved to no hosts");
            sink.run(ProgressStatus::Info, NOTHING_SELECTED_MESSAGE);
            return Ok(Batch::new(run_id, started_at, Vec::new()));
        }

        let concurrency = self.settings.effective_max_concurrency();
        tracing::info!(%run_id, hosts = hosts.len(), concurrency, "Starting batch");
        sink.run(ProgressStatus::Info, STARTING_MESSAGE);

        // Permits bound the fan-out; handles stay in selection order
        let permits = Arc::new(Semaphore::new(concurrency));
        let results: Vec<(String, Result<HealthReport, JoinError>)> = async {
            let handles: Vec<(String, JoinHandle<HealthReport>)> = hosts
                .into_iter()
                .map(|host| {
                    let executor = Arc::clone(&self.executor);
                    let settings = Arc::clone(&self.settings);
                    let sink = Arc::clone(&sink);
                    let permits = Arc::clone(&permits);
                    let name = host.name.clone();
                    let span = trace_operation_debug!(span_names::PROBE_HOST, host = %name);
                    let handle = tokio::spawn(
                        async move {
                            // The semaphore is never closed
                            let _permit = permits.acquire_owned().await;
                            probe_host(&host, executor.as_ref(), &settings, sink.as_ref()).await
                        }
                        .instrument(span),
                    );
                    (name, handle)
                })
                .collect();

            future::join_all(
                handles
                    .into_iter()
                    .map(|(name, handle)| async move { (name, handle.await) }),
            )
            .await
        }
        .instrument(trace_operation!(span_names::BATCH_RUN, %run_id))
        .await;

        let mut reports = Vec::with_capacity(results.len());
        for (host, result) in results {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::error!(%run_id, host = %host, error = %e, "Probe task failed");
                    return Err(RunError::ProbeTask {
                        host,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let batch = Batch::new(run_id, started_at, reports);
        tracing::info!(
            %run_id,
            online = batch.online_count(),
            offline = batch.offline_count(),
            "Batch finished"
        );
        Ok(batch)
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
