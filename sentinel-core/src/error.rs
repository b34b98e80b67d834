//! Error types for Server Sentinel
//!
//! Host- and metric-scoped failures ([`ExecError`], [`ParseError`]) are
//! captured into a host's report by the probe pipeline and never escape it.
//! [`ConfigError`] is fatal at startup, [`RunError`] covers failures outside
//! any single host's scope.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors (fatal, abort process startup)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Configuration content is structurally valid but unusable
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// Two servers share the same name
    #[error("Duplicate server name in registry: {0}")]
    DuplicateHost(String),
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors from running one command on a remote host
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// Neither a password nor a key path is configured for the host
    #[error("no authentication method (password or key_path) provided for server '{0}'")]
    MissingCredential(String),

    /// The configured private key could not be used
    #[error("unable to read private key from {path}: {reason}")]
    KeyUnavailable {
        /// Expanded key path
        path: String,
        /// Why the key is unusable
        reason: String,
    },

    /// Network or transport failure while establishing the session
    #[error("failed to dial {host}:{port}: {reason}")]
    Dial {
        /// Target host
        host: String,
        /// Target port
        port: u16,
        /// Transport error text
        reason: String,
    },

    /// The remote side rejected the credential
    #[error("authentication failed for {user}@{host}: {reason}")]
    Auth {
        /// Remote user
        user: String,
        /// Target host
        host: String,
        /// Rejection text
        reason: String,
    },

    /// The remote command ran but exited non-zero
    #[error("failed to run command (exit {status}): {output}")]
    Command {
        /// Exit status reported by the transport
        status: i32,
        /// Combined output of the failed command
        output: String,
    },

    /// Handshake plus command exceeded the allowed time
    #[error("remote command timed out after {0}s")]
    Timeout(u64),
}

impl ExecError {
    /// Returns true if this failure invalidates the whole connection, not
    /// just one command. Connection-level failures abort the host's probe.
    #[must_use]
    pub const fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential(_)
                | Self::KeyUnavailable { .. }
                | Self::Dial { .. }
                | Self::Auth { .. }
        )
    }
}

/// Result type alias for remote execution
pub type ExecResult<T> = std::result::Result<T, ExecError>;

/// Errors from parsing metric command output
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The output had no usable content
    #[error("command produced no output")]
    Empty,

    /// A value could not be interpreted
    #[error("unparseable {field} value: {value:?}")]
    InvalidValue {
        /// Which metric was being parsed
        field: &'static str,
        /// The offending text
        value: String,
    },
}

/// Failures outside the scope of any single host
#[derive(Debug, Error)]
pub enum RunError {
    /// A probe task could not run to completion, so no complete batch exists
    #[error("probe task for '{host}' did not complete: {reason}")]
    ProbeTask {
        /// Host whose task failed
        host: String,
        /// Join failure text
        reason: String,
    },
}

/// Errors raised by report and notification collaborators
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Could not write the report artifact
    #[error("could not write report {path}: {source}")]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Could not serialize the report
    #[error("could not serialize report: {0}")]
    Serialize(String),

    /// Notification delivery failed
    #[error("could not send notification: {0}")]
    Notify(String),
}

/// Inbound request decoding errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The message was not valid JSON for a run request
    #[error("Invalid message format: {0}")]
    Malformed(String),

    /// The action tag is not one the coordinator understands
    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),
}
