//! Per-host probe pipeline
//!
//! ```text
//! Init → Reachability ─┬─> Unreachable (terminal)
//!                      └─> Online → CacheMaintenance ─┬─> MetricsCollection
//!                                                     │     └─> Complete
//!                                                     └─> ConnectionFailed
//!                                                           (terminal)
//! ```
//!
//! Only connection-level failures (missing credential, unusable key, dial or
//! authentication failure) end a reachable host's probe early. A failing
//! maintenance command or metric sub-probe leaves its fields at defaults.

use super::parser::{
    CPU_IDLE_COMMAND, MEMORY_COMMAND, MemoryReading, MetricsParser, TOP_PROCESSES_COMMAND,
};
use super::settings::ProbeSettings;
use super::ssh_exec::RemoteExecutor;
use crate::connection::check_port_async;
use crate::error::ExecError;
use crate::models::{HealthReport, HostSpec};
use crate::progress::{ProgressSink, ProgressStatus};

/// States of one host's probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeState {
    /// Not started
    Init,
    /// TCP connect in flight
    Reachability,
    /// TCP connect failed
    Unreachable,
    /// TCP connect succeeded
    Online,
    /// Maintenance command in flight
    CacheMaintenance,
    /// Metric sub-probes in flight
    MetricsCollection,
    /// Credentials or transport failed after the host was found online
    ConnectionFailed,
    /// Report fully populated
    Complete,
}

impl ProbeState {
    /// Returns true for states the pipeline never leaves
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Unreachable | Self::ConnectionFailed | Self::Complete
        )
    }

    /// Stable lowercase name for logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Reachability => "reachability",
            Self::Unreachable => "unreachable",
            Self::Online => "online",
            Self::CacheMaintenance => "cache_maintenance",
            Self::MetricsCollection => "metrics_collection",
            Self::ConnectionFailed => "connection_failed",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for ProbeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probes one host and produces its report
pub struct ProbePipeline<'a> {
    spec: &'a HostSpec,
    executor: &'a dyn RemoteExecutor,
    settings: &'a ProbeSettings,
    sink: &'a dyn ProgressSink,
    state: ProbeState,
    report: HealthReport,
}

impl<'a> ProbePipeline<'a> {
    /// Creates a pipeline in [`ProbeState::Init`]
    #[must_use]
    pub fn new(
        spec: &'a HostSpec,
        executor: &'a dyn RemoteExecutor,
        settings: &'a ProbeSettings,
        sink: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            spec,
            executor,
            settings,
            sink,
            state: ProbeState::Init,
            report: HealthReport::new(spec),
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> ProbeState {
        self.state
    }

    /// Drives the pipeline to a terminal state
    pub async fn run(mut self) -> HealthReport {
        self.transition(ProbeState::Reachability);
        self.progress(ProgressStatus::Info, "Pinging server...");

        if let Err(e) = check_port_async(
            &self.spec.host,
            self.spec.port,
            self.settings.reachability_timeout(),
        )
        .await
        {
            tracing::debug!(host = %self.spec.name, error = %e, "Reachability check failed");
            self.transition(ProbeState::Unreachable);
            self.progress(ProgressStatus::Fail, "Server is unreachable.");
            return HealthReport::unreachable(self.spec);
        }

        self.report.is_online = true;
        self.transition(ProbeState::Online);
        self.progress(ProgressStatus::Ok, "Server is online.");

        if let Err(e) = self.spec.credential() {
            return self.fail_connection(&e);
        }

        self.transition(ProbeState::CacheMaintenance);
        self.progress(ProgressStatus::Info, "Attempting to clear cache...");
        match self
            .executor
            .execute(self.spec, &self.settings.maintenance_command)
            .await
        {
            Ok(_) => {
                self.report.cache_cleared = true;
                self.progress(ProgressStatus::Ok, "Cache cleared successfully.");
            }
            Err(e) if e.is_connection_failure() => return self.fail_connection(&e),
            Err(e) => {
                tracing::warn!(host = %self.spec.name, error = %e, "Cache maintenance failed");
                self.progress(ProgressStatus::Warn, &format!("Failed to clear cache: {e}"));
            }
        }

        self.transition(ProbeState::MetricsCollection);
        self.progress(ProgressStatus::Info, "Fetching health metrics...");
        self.collect_metrics().await;

        self.transition(ProbeState::Complete);
        self.progress(ProgressStatus::Ok, "Metrics collected.");
        self.report
    }

    async fn collect_metrics(&mut self) {
        let (cpu, memory, top) = tokio::join!(
            self.executor.execute(self.spec, CPU_IDLE_COMMAND),
            self.executor.execute(self.spec, MEMORY_COMMAND),
            self.executor.execute(self.spec, TOP_PROCESSES_COMMAND),
        );

        match cpu.map_err(|e| e.to_string()).and_then(|out| {
            MetricsParser::parse_cpu_usage(&out).map_err(|e| e.to_string())
        }) {
            Ok(usage) => self.report.cpu_usage_percent = usage,
            Err(e) => self.metric_unavailable("CPU usage", &e),
        }

        match memory {
            Ok(out) => {
                let MemoryReading {
                    total_mb,
                    used_mb,
                    free_mb,
                    swap_total_mb,
                    swap_used_mb,
                } = MetricsParser::parse_memory(&out);
                self.report.mem_total_mb = total_mb;
                self.report.mem_used_mb = used_mb;
                self.report.mem_free_mb = free_mb;
                self.report.swap_total_mb = swap_total_mb;
                self.report.swap_used_mb = swap_used_mb;
            }
            Err(e) => self.metric_unavailable("Memory usage", &e.to_string()),
        }

        match top {
            Ok(out) => self.report.top_processes = MetricsParser::parse_top_processes(&out),
            Err(e) => self.metric_unavailable("Top processes", &e.to_string()),
        }
    }

    fn metric_unavailable(&self, metric: &str, reason: &str) {
        tracing::debug!(host = %self.spec.name, metric, reason, "Metric unavailable");
        self.progress(
            ProgressStatus::Warn,
            &format!("{metric} unavailable: {reason}"),
        );
    }

    fn fail_connection(mut self, error: &ExecError) -> HealthReport {
        tracing::warn!(host = %self.spec.name, error = %error, "Could not open SSH session");
        self.transition(ProbeState::ConnectionFailed);
        self.progress(ProgressStatus::Fail, &format!("Connection failed: {error}"));
        self.report.cache_cleared = false;
        self.report.error = Some(error.to_string());
        self.report
    }

    fn transition(&mut self, next: ProbeState) {
        tracing::trace!(
            host = %self.spec.name,
            from = %self.state,
            to = %next,
            "Probe state transition"
        );
        self.state = next;
    }

    fn progress(&self, status: ProgressStatus, message: &str) {
        self.sink.host(&self.spec.name, status, message);
    }
}

/// Runs a complete probe for one host
pub async fn probe_host(
    spec: &HostSpec,
    executor: &dyn RemoteExecutor,
    settings: &ProbeSettings,
    sink: &dyn ProgressSink,
) -> HealthReport {
    ProbePipeline::new(spec, executor, settings, sink).run().await
}
