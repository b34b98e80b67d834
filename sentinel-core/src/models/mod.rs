//! Core data structures: hosts, selections, reports and batches

mod host;
mod report;
mod selection;

pub use host::{Credential, DEFAULT_SSH_PORT, HostRegistry, HostSpec, PublicHost};
pub use report::{Batch, HealthReport, UNREACHABLE_ERROR};
pub use selection::{ALL_HOSTS, RUN_ACTION, RunRequest, SelectionRequest};
