//! SSH command execution for probes
//!
//! Runs one command per invocation through the system `ssh` client (or
//! `sshpass -e ssh` for password-authenticated hosts). Every invocation is a
//! fresh process, so the session and the connection are torn down when the
//! process exits or, on timeout, when the child is dropped and killed.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tokio::process::Command;

use super::settings::ProbeSettings;
use crate::error::{ExecError, ExecResult};
use crate::models::{Credential, HostSpec};

/// Exit status `ssh` uses for its own failures
const SSH_ERROR_STATUS: i32 = 255;

/// `sshpass` exit status for a rejected password
const SSHPASS_BAD_PASSWORD: i32 = 5;

/// `sshpass` exit status for an unknown host key
const SSHPASS_HOST_KEY_UNKNOWN: i32 = 6;

const AUTH_FAILURE_MARKERS: [&str; 3] = [
    "permission denied",
    "authentication failed",
    "too many authentication failures",
];

/// Client diagnostics that mark a 255 exit as the transport's, not the
/// remote command's
const TRANSPORT_FAILURE_MARKERS: [&str; 6] = [
    "connection closed",
    "connection reset",
    "connection timed out",
    "host key verification failed",
    "kex_exchange_identification",
    "could not resolve hostname",
];

/// Runs commands on remote hosts
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Runs `command` on `host` and returns its combined output.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] for credential, transport, authentication or
    /// command failures.
    async fn execute(&self, host: &HostSpec, command: &str) -> ExecResult<String>;
}

/// [`RemoteExecutor`] backed by the system OpenSSH client
#[derive(Debug, Clone)]
pub struct SshExecutor {
    ssh_program: String,
    sshpass_program: String,
    connect_timeout_secs: u32,
    exec_timeout: std::time::Duration,
    verify_host_key: bool,
}

impl SshExecutor {
    /// Creates an executor from probe settings
    #[must_use]
    pub fn new(settings: &ProbeSettings) -> Self {
        Self {
            ssh_program: "ssh".to_string(),
            sshpass_program: "sshpass".to_string(),
            connect_timeout_secs: settings.effective_connect_timeout_secs(),
            exec_timeout: settings.exec_timeout(),
            verify_host_key: settings.verify_host_key,
        }
    }

    /// Overrides the client binaries (for non-standard installs)
    #[must_use]
    pub fn with_programs(mut self, ssh: impl Into<String>, sshpass: impl Into<String>) -> Self {
        self.ssh_program = ssh.into();
        self.sshpass_program = sshpass.into();
        self
    }

    /// Builds the client invocation for one command.
    ///
    /// Returns the command and whether it goes through `sshpass`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::MissingCredential`] or
    /// [`ExecError::KeyUnavailable`] if no usable credential exists.
    pub fn build_command(&self, host: &HostSpec, command: &str) -> ExecResult<(Command, bool)> {
        let (mut cmd, via_sshpass) = match host.credential()? {
            Credential::Password(password) => {
                let mut cmd = Command::new(&self.sshpass_program);
                // sshpass reads SSHPASS with -e
                cmd.env("SSHPASS", password.expose_secret());
                cmd.arg("-e").arg(&self.ssh_program);
                cmd.arg("-o").arg("PubkeyAuthentication=no");
                cmd.arg("-o")
                    .arg("PreferredAuthentications=password,keyboard-interactive");
                (cmd, true)
            }
            Credential::PrivateKey(raw) => {
                let key = resolve_key_path(raw)?;
                let mut cmd = Command::new(&self.ssh_program);
                cmd.arg("-o").arg("BatchMode=yes");
                cmd.arg("-o").arg("IdentitiesOnly=yes");
                cmd.arg("-i").arg(key);
                (cmd, false)
            }
        };

        if self.verify_host_key {
            cmd.arg("-o").arg("StrictHostKeyChecking=yes");
        } else {
            cmd.arg("-o").arg("StrictHostKeyChecking=no");
            cmd.arg("-o").arg("UserKnownHostsFile=/dev/null");
            cmd.arg("-o").arg("LogLevel=ERROR");
        }
        cmd.arg("-o")
            .arg(format!("ConnectTimeout={}", self.connect_timeout_secs));
        cmd.arg("-p").arg(host.port.to_string());
        cmd.arg(host.destination());
        cmd.arg(command);

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        Ok((cmd, via_sshpass))
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn execute(&self, host: &HostSpec, command: &str) -> ExecResult<String> {
        let (mut cmd, via_sshpass) = self.build_command(host, command)?;

        let output = match tokio::time::timeout(self.exec_timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                let program = if via_sshpass {
                    &self.sshpass_program
                } else {
                    &self.ssh_program
                };
                return Err(ExecError::Dial {
                    host: host.host.clone(),
                    port: host.port,
                    reason: format!("failed to spawn {program}: {e}"),
                });
            }
            Err(_) => {
                tracing::debug!(host = %host.name, command, "SSH command timed out");
                return Err(ExecError::Timeout(self.exec_timeout.as_secs()));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        classify_exit(host, output.status.code(), &stdout, &stderr, via_sshpass)
    }
}

/// Expands a leading `~` and checks that the key file exists.
///
/// # Errors
///
/// Returns [`ExecError::KeyUnavailable`] if the file cannot be read.
pub fn resolve_key_path(raw: &str) -> ExecResult<PathBuf> {
    let expanded = PathBuf::from(shellexpand::tilde(raw).as_ref());
    match std::fs::metadata(&expanded) {
        Ok(meta) if meta.is_file() => Ok(expanded),
        Ok(_) => Err(ExecError::KeyUnavailable {
            path: expanded.display().to_string(),
            reason: "not a regular file".to_string(),
        }),
        Err(e) => Err(ExecError::KeyUnavailable {
            path: expanded.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Maps a finished client process onto the error taxonomy.
///
/// Output on success is stdout followed by stderr. Exit status 255 is only
/// treated as a client failure when stderr carries the client's own
/// diagnostics (an `ssh:` line or a known connection message); a remote
/// command that itself exits 255 is a [`ExecError::Command`].
///
/// # Errors
///
/// Returns [`ExecError::Auth`] or [`ExecError::Dial`] for client-level
/// failures and [`ExecError::Command`] for a non-zero remote exit.
pub fn classify_exit(
    host: &HostSpec,
    status: Option<i32>,
    stdout: &str,
    stderr: &str,
    via_sshpass: bool,
) -> ExecResult<String> {
    let combined = format!("{stdout}{stderr}");

    let Some(code) = status else {
        return Err(ExecError::Command {
            status: -1,
            output: "terminated by signal".to_string(),
        });
    };

    if code == 0 {
        return Ok(combined);
    }

    let reason = stderr.trim().to_string();
    let auth = || ExecError::Auth {
        user: host.user.clone(),
        host: host.host.clone(),
        reason: reason.clone(),
    };
    let dial = || ExecError::Dial {
        host: host.host.clone(),
        port: host.port,
        reason: reason.clone(),
    };

    if via_sshpass && code == SSHPASS_BAD_PASSWORD {
        return Err(auth());
    }
    if via_sshpass && code == SSHPASS_HOST_KEY_UNKNOWN {
        return Err(dial());
    }
    if code == SSH_ERROR_STATUS {
        let lowered = reason.to_lowercase();
        if AUTH_FAILURE_MARKERS.iter().any(|m| lowered.contains(m)) {
            return Err(auth());
        }
        if is_client_diagnostic(&lowered) {
            return Err(dial());
        }
    }

    Err(ExecError::Command {
        status: code,
        output: combined.trim().to_string(),
    })
}

fn is_client_diagnostic(lowered_stderr: &str) -> bool {
    lowered_stderr
        .lines()
        .any(|line| line.trim_start().starts_with("ssh:"))
        || TRANSPORT_FAILURE_MARKERS
            .iter()
            .any(|m| lowered_stderr.contains(m))
}
