//! TCP reachability check
//!
//! A bare connect to `host:port` decides whether a host is online before any
//! SSH session is attempted.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Error type for port check operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortCheckError {
    /// Host resolution failed
    #[error("Failed to resolve host '{host}': {reason}")]
    ResolutionFailed {
        /// The hostname that failed to resolve
        host: String,
        /// The reason for the failure
        reason: String,
    },
    /// Connection refused or timed out
    #[error("Port {port} on '{host}' is not reachable: {reason}")]
    Unreachable {
        /// The hostname that was unreachable
        host: String,
        /// The port that was unreachable
        port: u16,
        /// The reason for the failure
        reason: String,
    },
}

/// Checks if a TCP port accepts connections within `timeout`.
///
/// Every resolved address is tried in turn; the connection is closed as
/// soon as it is established. Returns the connect latency.
///
/// # Errors
/// * `PortCheckError::ResolutionFailed` if the hostname cannot be resolved
/// * `PortCheckError::Unreachable` if no address accepted the connection in time
pub async fn check_port_async(
    host: &str,
    port: u16,
    timeout: Duration,
) -> Result<Duration, PortCheckError> {
    let start = Instant::now();

    let addrs: Vec<SocketAddr> = match tokio::time::timeout(
        timeout,
        tokio::net::lookup_host((host, port)),
    )
    .await
    {
        Ok(Ok(addrs)) => addrs.collect(),
        Ok(Err(e)) => {
            return Err(PortCheckError::ResolutionFailed {
                host: host.to_string(),
                reason: e.to_string(),
            });
        }
        Err(_) => {
            return Err(PortCheckError::ResolutionFailed {
                host: host.to_string(),
                reason: "Resolution timed out".to_string(),
            });
        }
    };

    if addrs.is_empty() {
        return Err(PortCheckError::ResolutionFailed {
            host: host.to_string(),
            reason: "No addresses found".to_string(),
        });
    }

    let mut last_error = String::new();
    for addr in addrs {
        let remaining = timeout.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            last_error = "Connection timed out".to_string();
            break;
        }
        match tokio::time::timeout(remaining, tokio::net::TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => return Ok(start.elapsed()),
            Ok(Err(e)) => last_error = e.to_string(),
            Err(_) => last_error = "Connection timed out".to_string(),
        }
    }

    Err(PortCheckError::Unreachable {
        host: host.to_string(),
        port,
        reason: last_error,
    })
}
