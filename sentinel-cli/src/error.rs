//! CLI error types and exit codes.

use sentinel_core::{ConfigError, RequestError, RunError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, or other non-host errors
    pub const GENERAL_ERROR: i32 = 1;
    /// At least one selected server was offline or could not be probed
    pub const CONNECTION_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or unsupported run request
    #[error("Request error: {0}")]
    Request(String),

    /// The health check could not complete
    #[error("Health check failed: {0}")]
    Run(String),

    /// Some selected servers were offline
    #[error("{offline} of {total} servers offline")]
    HostsOffline {
        /// Offline server count
        offline: usize,
        /// Probed server count
        total: usize,
    },

    /// Output serialization error
    #[error("Output error: {0}")]
    Output(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<RequestError> for CliError {
    fn from(err: RequestError) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<RunError> for CliError {
    fn from(err: RunError) -> Self {
        Self::Run(err.to_string())
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, request, run, output, IO)
    /// - 2: One or more servers offline
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::HostsOffline { .. } => exit_codes::CONNECTION_FAILURE,
            Self::Config(_) | Self::Request(_) | Self::Run(_) | Self::Output(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }

    /// Returns true if the failure was already shown in the command output
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        matches!(self, Self::HostsOffline { .. })
    }
}
