//! JSON report rendering

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::Instrument;

use super::{ReportArtifact, ReportWriter};
use crate::error::DeliveryError;
use crate::models::{Batch, HealthReport};
use crate::trace_operation;
use crate::tracing::span_names;

/// Column names in the order every report row serializes them
pub const REPORT_COLUMNS: [&str; 12] = [
    "Server Name",
    "Status",
    "Timestamp",
    "Cache Cleared",
    "CPU Usage (%)",
    "Mem Total (MB)",
    "Mem Used (MB)",
    "Mem Free (MB)",
    "Swap Total (MB)",
    "Swap Used (MB)",
    "Top 5 Processes by Memory",
    "Error",
];

/// One host's row in a rendered report
///
/// Field order is the column order; keep it in sync with [`REPORT_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Host name
    #[serde(rename = "Server Name")]
    pub server_name: String,
    /// "Online" or "Offline"
    #[serde(rename = "Status")]
    pub status: &'static str,
    /// Probe start, `YYYY-MM-DD HH:MM:SS` UTC
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    /// Maintenance command outcome
    #[serde(rename = "Cache Cleared")]
    pub cache_cleared: bool,
    /// CPU usage
    #[serde(rename = "CPU Usage (%)")]
    pub cpu_usage: f64,
    /// Total memory
    #[serde(rename = "Mem Total (MB)")]
    pub mem_total_mb: u64,
    /// Used memory
    #[serde(rename = "Mem Used (MB)")]
    pub mem_used_mb: u64,
    /// Free memory
    #[serde(rename = "Mem Free (MB)")]
    pub mem_free_mb: u64,
    /// Total swap
    #[serde(rename = "Swap Total (MB)")]
    pub swap_total_mb: u64,
    /// Used swap
    #[serde(rename = "Swap Used (MB)")]
    pub swap_used_mb: u64,
    /// Top processes text block
    #[serde(rename = "Top 5 Processes by Memory")]
    pub top_processes: String,
    /// Error text, empty when none
    #[serde(rename = "Error")]
    pub error: String,
}

impl From<&HealthReport> for ReportRow {
    fn from(report: &HealthReport) -> Self {
        Self {
            server_name: report.server_name.clone(),
            status: report.status_label(),
            timestamp: report.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            cache_cleared: report.cache_cleared,
            cpu_usage: report.cpu_usage_percent,
            mem_total_mb: report.mem_total_mb,
            mem_used_mb: report.mem_used_mb,
            mem_free_mb: report.mem_free_mb,
            swap_total_mb: report.swap_total_mb,
            swap_used_mb: report.swap_used_mb,
            top_processes: report.top_processes.clone(),
            error: report.error.clone().unwrap_or_default(),
        }
    }
}

/// Writes `Health_Report_<YYYY-MM-DD_HH-MM-SS>.json` files into a directory
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    directory: PathBuf,
}

impl JsonReportWriter {
    /// Creates a writer targeting `directory`, created on first write
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Target directory
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Renders the rows of `batch` as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Serialize`] if rendering fails.
    pub fn render(batch: &Batch) -> Result<String, DeliveryError> {
        let rows: Vec<ReportRow> = batch.reports().iter().map(ReportRow::from).collect();
        serde_json::to_string_pretty(&rows).map_err(|e| DeliveryError::Serialize(e.to_string()))
    }

    /// File names to try in order: the plain stamp, then run-id suffixes
    fn candidate_paths(&self, batch: &Batch) -> Vec<PathBuf> {
        let stamp = batch
            .completed_at()
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d_%H-%M-%S");
        let run = batch.run_id().simple().to_string();
        let short = run.get(..8).unwrap_or(&run);
        vec![
            self.directory.join(format!("Health_Report_{stamp}.json")),
            self.directory.join(format!("Health_Report_{stamp}_{short}.json")),
            self.directory.join(format!("Health_Report_{stamp}_{run}.json")),
        ]
    }

    /// Creates `path` exclusively and writes `body` into it
    async fn create_exclusive(path: &Path, body: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        file.write_all(body).await?;
        file.flush().await
    }
}

#[async_trait::async_trait]
impl ReportWriter for JsonReportWriter {
    async fn write_report(&self, batch: &Batch) -> Result<ReportArtifact, DeliveryError> {
        let span = trace_operation!(span_names::REPORT_WRITE, run_id = %batch.run_id());
        async {
            let body = Self::render(batch)?;

            tokio::fs::create_dir_all(&self.directory)
                .await
                .map_err(|source| DeliveryError::Write {
                    path: self.directory.clone(),
                    source,
                })?;

            // Overlapping runs may finish within the same second
            let mut written = None;
            for path in self.candidate_paths(batch) {
                match Self::create_exclusive(&path, body.as_bytes()).await {
                    Ok(()) => {
                        written = Some(path);
                        break;
                    }
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                        tracing::debug!(path = %path.display(), "Report name taken, trying next");
                    }
                    Err(source) => return Err(DeliveryError::Write { path, source }),
                }
            }
            let path = written.ok_or_else(|| DeliveryError::Write {
                path: self.directory.clone(),
                source: std::io::Error::new(
                    ErrorKind::AlreadyExists,
                    "every report file name for this batch is taken",
                ),
            })?;

            tracing::info!(path = %path.display(), rows = batch.len(), "Report written");
            Ok(ReportArtifact::new(path))
        }
        .instrument(span)
        .await
    }
}
