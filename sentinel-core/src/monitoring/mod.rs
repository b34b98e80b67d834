//! Agentless host probing over SSH
//!
//! A probe checks TCP reachability, runs a privileged maintenance command,
//! then collects CPU, memory and top-process figures by parsing the output
//! of standard Linux tools. Remote commands go through [`RemoteExecutor`];
//! [`SshExecutor`] drives the system `ssh` client.

mod parser;
mod probe;
mod settings;
pub mod ssh_exec;

pub use parser::{
    CPU_IDLE_COMMAND, DEFAULT_MAINTENANCE_COMMAND, MEMORY_COMMAND, MemoryReading, MetricsParser,
    TOP_PROCESSES_COMMAND,
};
pub use probe::{ProbePipeline, ProbeState, probe_host};
pub use settings::ProbeSettings;
pub use ssh_exec::{RemoteExecutor, SshExecutor, classify_exit, resolve_key_path};
