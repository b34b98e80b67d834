//! Server Sentinel Core Library
//!
//! Agentless fleet health checks over SSH: probe a selection of hosts
//! concurrently, parse their metrics, publish the batch, then hand it to
//! report and notification collaborators.
//!
//! # Crate Structure
//!
//! - [`models`] - Host specs, selections, health reports and batches
//! - [`config`] - Configuration file loading and validation
//! - [`connection`] - TCP reachability checks
//! - [`monitoring`] - SSH transport, metric parsers and the probe pipeline
//! - [`orchestrator`] - Concurrent batch fan-out
//! - [`coordinator`] - Trigger coordination and the latest-batch cache
//! - [`progress`] - Progress sinks
//! - [`reporting`] - Report writers and notifiers
//! - [`scheduler`] - Daily scheduled trigger

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod connection;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod monitoring;
pub mod orchestrator;
pub mod progress;
pub mod reporting;
pub mod scheduler;
pub mod tracing;

pub use config::{ConfigManager, SentinelConfig};
pub use coordinator::{LatestBatchCache, RunOutcome, TriggerCoordinator};
pub use error::{
    ConfigError, ConfigResult, DeliveryError, ExecError, ExecResult, ParseError, RequestError,
    RunError,
};
pub use models::{
    Batch, HealthReport, HostRegistry, HostSpec, PublicHost, RunRequest, SelectionRequest,
};
pub use monitoring::{ProbeSettings, RemoteExecutor, SshExecutor};
pub use orchestrator::Orchestrator;
pub use progress::{
    CallbackSink, ChannelSink, LogSink, NoOpSink, ProgressEvent, ProgressSink, ProgressStatus,
    SharedSink,
};
pub use reporting::{JsonReportWriter, Notifier, ReportArtifact, ReportWriter};
pub use scheduler::DailySchedule;
