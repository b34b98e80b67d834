//! Per-host health reports and the batches that hold them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::host::HostSpec;

/// Fixed reason recorded for hosts that fail the reachability check
pub const UNREACHABLE_ERROR: &str = "Server is unreachable";

/// One host's probe outcome
///
/// Serialized with the camelCase field names existing consumers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Name from the host registry
    pub server_name: String,
    /// Hostname or IP address
    pub server_host: String,
    /// Whether the reachability check succeeded
    pub is_online: bool,
    /// Why the host is offline or could not be probed
    #[serde(default)]
    pub error: Option<String>,
    /// Whether the maintenance command succeeded
    pub cache_cleared: bool,
    /// CPU usage (0.0–100.0)
    #[serde(rename = "cpuUsage")]
    pub cpu_usage_percent: f64,
    /// Total memory (MB)
    #[serde(rename = "memTotalMB")]
    pub mem_total_mb: u64,
    /// Used memory (MB)
    #[serde(rename = "memUsedMB")]
    pub mem_used_mb: u64,
    /// Free memory (MB)
    #[serde(rename = "memFreeMB")]
    pub mem_free_mb: u64,
    /// Total swap (MB)
    #[serde(rename = "swapTotalMB")]
    pub swap_total_mb: u64,
    /// Used swap (MB)
    #[serde(rename = "swapUsedMB")]
    pub swap_used_mb: u64,
    /// Top processes by memory, verbatim
    pub top_processes: String,
    /// When the probe started
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    /// Creates a report with every metric at its default
    #[must_use]
    pub fn new(spec: &HostSpec) -> Self {
        Self {
            server_name: spec.name.clone(),
            server_host: spec.host.clone(),
            is_online: false,
            error: None,
            cache_cleared: false,
            cpu_usage_percent: 0.0,
            mem_total_mb: 0,
            mem_used_mb: 0,
            mem_free_mb: 0,
            swap_total_mb: 0,
            swap_used_mb: 0,
            top_processes: String::new(),
            timestamp: Utc::now(),
        }
    }

    /// Creates the terminal report for a host that failed reachability
    #[must_use]
    pub fn unreachable(spec: &HostSpec) -> Self {
        Self {
            error: Some(UNREACHABLE_ERROR.to_string()),
            ..Self::new(spec)
        }
    }

    /// "Online" or "Offline"
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        if self.is_online { "Online" } else { "Offline" }
    }

    /// Returns true if the host was reachable and no connection error occurred
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.is_online && self.error.is_none()
    }

    /// Returns true if every numeric metric is at its default
    #[must_use]
    pub fn has_default_metrics(&self) -> bool {
        self.cpu_usage_percent == 0.0
            && self.mem_total_mb == 0
            && self.mem_used_mb == 0
            && self.mem_free_mb == 0
            && self.swap_total_mb == 0
            && self.swap_used_mb == 0
    }
}

/// The ordered reports produced by one orchestration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    reports: Vec<HealthReport>,
}

impl Batch {
    /// Assembles a completed batch
    #[must_use]
    pub fn new(run_id: Uuid, started_at: DateTime<Utc>, reports: Vec<HealthReport>) -> Self {
        Self {
            run_id,
            started_at,
            completed_at: Utc::now(),
            reports,
        }
    }

    /// Identifier of the run that produced this batch
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// When the run started
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the last probe finished
    #[must_use]
    pub const fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Reports in resolved selection order
    #[must_use]
    pub fn reports(&self) -> &[HealthReport] {
        &self.reports
    }

    /// Consumes the batch, returning its reports
    #[must_use]
    pub fn into_reports(self) -> Vec<HealthReport> {
        self.reports
    }

    /// Number of reports
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Returns true if the batch holds no reports
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Number of hosts that passed reachability
    #[must_use]
    pub fn online_count(&self) -> usize {
        self.reports.iter().filter(|r| r.is_online).count()
    }

    /// Number of hosts that failed reachability
    #[must_use]
    pub fn offline_count(&self) -> usize {
        self.len() - self.online_count()
    }
}
