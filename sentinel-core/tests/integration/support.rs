//! Shared fixtures: a scripted executor and loopback listeners

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sentinel_core::monitoring::{
    CPU_IDLE_COMMAND, DEFAULT_MAINTENANCE_COMMAND, MEMORY_COMMAND, TOP_PROCESSES_COMMAND,
};
use sentinel_core::{ExecError, ExecResult, HostSpec, ProgressEvent, ProgressSink, RemoteExecutor};

pub const FREE_OUTPUT: &str = "\
              total        used        free      shared  buff/cache   available
Mem:           1000         400         600           0           0         600
Swap:           512          12         500
";

pub const PS_OUTPUT: &str = "COMMAND         %MEM\njava            20.0\npostgres         5.0\n";

/// Replies per (host name, command), falling back to per-command replies
#[derive(Default)]
pub struct ScriptedExecutor {
    by_command: HashMap<String, ExecResult<String>>,
    by_host: HashMap<(String, String), ExecResult<String>>,
    pub calls: AtomicUsize,
}

impl ScriptedExecutor {
    /// Answers every standard command like a healthy Linux host
    pub fn healthy() -> Self {
        Self::default()
            .reply(DEFAULT_MAINTENANCE_COMMAND, Ok(String::new()))
            .reply(CPU_IDLE_COMMAND, Ok("87.5\n".to_string()))
            .reply(MEMORY_COMMAND, Ok(FREE_OUTPUT.to_string()))
            .reply(TOP_PROCESSES_COMMAND, Ok(PS_OUTPUT.to_string()))
    }

    pub fn reply(mut self, command: &str, result: ExecResult<String>) -> Self {
        self.by_command.insert(command.to_string(), result);
        self
    }

    pub fn reply_for(mut self, host: &str, command: &str, result: ExecResult<String>) -> Self {
        self.by_host
            .insert((host.to_string(), command.to_string()), result);
        self
    }
}

#[async_trait]
impl RemoteExecutor for ScriptedExecutor {
    async fn execute(&self, host: &HostSpec, command: &str) -> ExecResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(result) = self
            .by_host
            .get(&(host.name.clone(), command.to_string()))
        {
            return result.clone();
        }
        self.by_command
            .get(command)
            .cloned()
            .unwrap_or(Err(ExecError::Command {
                status: 127,
                output: format!("{command}: not found"),
            }))
    }
}

/// Collects every event it receives
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// An open loopback port; keep the listener alive for the test's duration
pub async fn open_port() -> (tokio::net::TcpListener, u16) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// A loopback port with nothing listening
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
