//! Probe settings (stored in the configuration file under `probe:`)

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::parser::DEFAULT_MAINTENANCE_COMMAND;

/// Tunables for the probe pipeline and the SSH transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// TCP reachability timeout in seconds (default: 2)
    #[serde(default = "default_reachability_timeout_secs")]
    pub reachability_timeout_secs: u32,
    /// SSH dial/handshake timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u32,
    /// Remote command execution timeout in seconds (default: 10)
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u32,
    /// Maximum hosts probed at once within one batch (default: 8)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Verify remote host keys against known_hosts (default: false)
    #[serde(default)]
    pub verify_host_key: bool,
    /// Privileged maintenance command run before metrics collection
    #[serde(default = "default_maintenance_command")]
    pub maintenance_command: String,
}

const fn default_reachability_timeout_secs() -> u32 {
    2
}

const fn default_connect_timeout_secs() -> u32 {
    10
}

const fn default_command_timeout_secs() -> u32 {
    10
}

const fn default_max_concurrency() -> usize {
    8
}

fn default_maintenance_command() -> String {
    DEFAULT_MAINTENANCE_COMMAND.to_string()
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            reachability_timeout_secs: default_reachability_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            command_timeout_secs: default_command_timeout_secs(),
            max_concurrency: default_max_concurrency(),
            verify_host_key: false,
            maintenance_command: default_maintenance_command(),
        }
    }
}

impl ProbeSettings {
    /// Reachability timeout, at least one second
    #[must_use]
    pub fn reachability_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.reachability_timeout_secs.max(1)))
    }

    /// Dial timeout handed to the SSH client, at least one second
    #[must_use]
    pub fn effective_connect_timeout_secs(&self) -> u32 {
        self.connect_timeout_secs.max(1)
    }

    /// Upper bound for one remote command including the handshake
    #[must_use]
    pub fn exec_timeout(&self) -> Duration {
        Duration::from_secs(
            u64::from(self.effective_connect_timeout_secs())
                + u64::from(self.command_timeout_secs.max(1)),
        )
    }

    /// Worker limit, at least one
    #[must_use]
    pub fn effective_max_concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }
}
