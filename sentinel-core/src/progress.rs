//! Progress reporting for batch runs
//!
//! Probe pipelines narrate what they do through a [`ProgressSink`] without
//! knowing whether the lines go to a live on-demand channel or to the
//! operational log. Sinks must be safe to call from concurrent probes.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

/// Status category of a progress line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressStatus {
    /// Neutral narration ("Pinging server...")
    Info,
    /// A step succeeded
    Ok,
    /// A step failed without aborting the host
    Warn,
    /// A step failed and ended the host's probe or the run
    Fail,
    /// Terminal marker for a run
    Complete,
}

impl ProgressStatus {
    /// Icon prefix used when rendering a line
    #[must_use]
    pub const fn icon(self) -> Option<&'static str> {
        match self {
            Self::Info => None,
            Self::Ok => Some("✅"),
            Self::Warn => Some("⚠️"),
            Self::Fail => Some("❌"),
            Self::Complete => Some("🏁"),
        }
    }
}

/// One human-readable progress line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Host the line is about; `None` for run-level lines
    pub host: Option<String>,
    /// Status category
    pub status: ProgressStatus,
    /// Message text
    pub message: String,
}

impl ProgressEvent {
    /// Creates a host-scoped event
    #[must_use]
    pub fn for_host(
        host: impl Into<String>,
        status: ProgressStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            host: Some(host.into()),
            status,
            message: message.into(),
        }
    }

    /// Creates a run-level event
    #[must_use]
    pub fn run(status: ProgressStatus, message: impl Into<String>) -> Self {
        Self {
            host: None,
            status,
            message: message.into(),
        }
    }

    /// The terminal "process complete" marker
    #[must_use]
    pub fn complete() -> Self {
        Self::run(ProgressStatus::Complete, "Process complete.")
    }

    /// Returns true if this is the terminal marker
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == ProgressStatus::Complete
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref host) = self.host {
            write!(f, "[{host}] ")?;
        }
        if let Some(icon) = self.status.icon() {
            write!(f, "{icon} ")?;
        }
        f.write_str(&self.message)
    }
}

/// Destination for progress lines
pub trait ProgressSink: Send + Sync {
    /// Delivers one event. Must not block on slow consumers.
    fn emit(&self, event: ProgressEvent);

    /// Emits a host-scoped line
    fn host(&self, host: &str, status: ProgressStatus, message: &str) {
        self.emit(ProgressEvent::for_host(host, status, message));
    }

    /// Emits a run-level line
    fn run(&self, status: ProgressStatus, message: &str) {
        self.emit(ProgressEvent::run(status, message));
    }
}

/// Shared handle to a sink
pub type SharedSink = Arc<dyn ProgressSink>;

/// Writes progress lines to the operational log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&self, event: ProgressEvent) {
        let host = event.host.as_deref().unwrap_or("-");
        match event.status {
            ProgressStatus::Warn => tracing::warn!(host, "{}", event.message),
            ProgressStatus::Fail => tracing::error!(host, "{}", event.message),
            ProgressStatus::Info | ProgressStatus::Ok | ProgressStatus::Complete => {
                tracing::info!(host, "{}", event.message);
            }
        }
    }
}

/// Forwards progress lines to a channel held by an on-demand requester
///
/// A dropped receiver is not an error: the run continues and lines are
/// discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver that reads from it
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Returns true if the receiving side has gone away
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Progress receiver dropped, discarding line");
        }
    }
}

/// Calls a closure for every line
pub struct CallbackSink<F>
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    /// Wraps a closure
    pub const fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressSink for CallbackSink<F>
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: ProgressEvent) {
        (self.callback)(&event);
    }
}

/// Discards every line
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl ProgressSink for NoOpSink {
    fn emit(&self, _event: ProgressEvent) {}
}
