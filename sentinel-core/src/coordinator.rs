//! Trigger coordination and the latest-batch cache
//!
//! Scheduled and on-demand triggers both funnel into
//! [`TriggerCoordinator::trigger_run`]. Runs may overlap; each completed
//! batch replaces the cached one wholesale and the last publish wins.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::RunError;
use crate::models::{Batch, HealthReport, HostRegistry, SelectionRequest};
use crate::orchestrator::Orchestrator;
use crate::progress::{LogSink, ProgressEvent, ProgressStatus, SharedSink};
use crate::reporting::{LogNotifier, Notifier, ReportArtifact, ReportWriter};

/// Single-slot holder for the most recently published batch
///
/// The lock is held only for the pointer swap or clone, never while probing.
#[derive(Debug, Default)]
pub struct LatestBatchCache {
    slot: Mutex<Option<Arc<Batch>>>,
}

impl LatestBatchCache {
    /// Creates an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<Batch>>> {
        // A panic while holding the guard cannot leave a half-written slot
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Replaces the cached batch, returning the one it displaced
    pub fn publish(&self, batch: Arc<Batch>) -> Option<Arc<Batch>> {
        self.lock().replace(batch)
    }

    /// The most recently published batch, if any
    #[must_use]
    pub fn latest(&self) -> Option<Arc<Batch>> {
        self.lock().clone()
    }

    /// Reports of the latest batch, empty when nothing was published
    #[must_use]
    pub fn latest_reports(&self) -> Vec<HealthReport> {
        self.latest()
            .map(|batch| batch.reports().to_vec())
            .unwrap_or_default()
    }

    /// JSON array of the latest reports; `[]` when nothing was published
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn latest_json(&self) -> serde_json::Result<String> {
        match self.latest() {
            Some(batch) => serde_json::to_string(batch.reports()),
            None => Ok("[]".to_string()),
        }
    }
}

/// What one triggered run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The completed batch
    pub batch: Arc<Batch>,
    /// Whether the batch was published to the cache
    pub published: bool,
    /// Written report, if reporting succeeded
    pub artifact: Option<ReportArtifact>,
    /// Whether the notification was delivered
    pub notified: bool,
}

/// Runs batches for every trigger source and publishes their results
pub struct TriggerCoordinator {
    registry: Arc<HostRegistry>,
    orchestrator: Orchestrator,
    cache: Arc<LatestBatchCache>,
    reporter: Arc<dyn ReportWriter>,
    notifier: Arc<dyn Notifier>,
}

impl TriggerCoordinator {
    /// Creates a coordinator with an empty cache and a [`LogNotifier`]
    #[must_use]
    pub fn new(
        registry: Arc<HostRegistry>,
        orchestrator: Orchestrator,
        reporter: Arc<dyn ReportWriter>,
    ) -> Self {
        Self {
            registry,
            orchestrator,
            cache: Arc::new(LatestBatchCache::new()),
            reporter,
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Replaces the notifier
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Shares an existing cache
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<LatestBatchCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The shared latest-batch cache
    #[must_use]
    pub fn cache(&self) -> &Arc<LatestBatchCache> {
        &self.cache
    }

    /// The host registry snapshot runs resolve against
    #[must_use]
    pub fn registry(&self) -> &HostRegistry {
        &self.registry
    }

    /// Runs one batch for `selection`, publishes it, then reports and
    /// notifies.
    ///
    /// Progress goes to `sink` and always ends with the "Process complete."
    /// marker. An empty batch is returned but not published. Report and
    /// notification failures are narrated to the sink and never undo the
    /// publish.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] if the batch could not be assembled; nothing is
    /// published in that case.
    pub async fn trigger_run(
        &self,
        selection: SelectionRequest,
        sink: SharedSink,
    ) -> Result<RunOutcome, RunError> {
        let batch = match self
            .orchestrator
            .run_batch(self.registry.hosts(), &selection, Arc::clone(&sink))
            .await
        {
            Ok(batch) => Arc::new(batch),
            Err(e) => {
                sink.run(ProgressStatus::Fail, &format!("Health check failed: {e}"));
                sink.emit(ProgressEvent::complete());
                return Err(e);
            }
        };

        if batch.is_empty() {
            sink.emit(ProgressEvent::complete());
            return Ok(RunOutcome {
                batch,
                published: false,
                artifact: None,
                notified: false,
            });
        }

        let displaced = self.cache.publish(Arc::clone(&batch));
        tracing::info!(
            run_id = %batch.run_id(),
            reports = batch.len(),
            replaced = ?displaced.map(|b| b.run_id()),
            "Published batch"
        );

        let mut outcome = RunOutcome {
            batch: Arc::clone(&batch),
            published: true,
            artifact: None,
            notified: false,
        };

        match self.reporter.write_report(&batch).await {
            Ok(artifact) => {
                sink.run(ProgressStatus::Ok, &format!("Report created: {artifact}"));
                match self.notifier.notify(&artifact).await {
                    Ok(()) => {
                        sink.run(ProgressStatus::Ok, "Notification sent successfully.");
                        outcome.notified = true;
                    }
                    Err(e) => {
                        tracing::warn!(run_id = %batch.run_id(), error = %e, "Notification failed");
                        sink.run(
                            ProgressStatus::Fail,
                            &format!("Error sending notification: {e}"),
                        );
                    }
                }
                outcome.artifact = Some(artifact);
            }
            Err(e) => {
                tracing::warn!(run_id = %batch.run_id(), error = %e, "Report failed");
                sink.run(ProgressStatus::Fail, &format!("Error creating report: {e}"));
            }
        }

        sink.emit(ProgressEvent::complete());
        Ok(outcome)
    }

    /// Scheduled trigger: every host, progress to the operational log
    ///
    /// # Errors
    ///
    /// Same as [`Self::trigger_run`].
    pub async fn run_scheduled(&self) -> Result<RunOutcome, RunError> {
        tracing::info!(source = "schedule", "Scheduled health check starting");
        self.trigger_run(SelectionRequest::All, Arc::new(LogSink))
            .await
    }
}

impl std::fmt::Debug for TriggerCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerCoordinator")
            .field("hosts", &self.registry.len())
            .field("orchestrator", &self.orchestrator)
            .finish_non_exhaustive()
    }
}
