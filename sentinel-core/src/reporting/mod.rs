//! Report and notification collaborators
//!
//! After a batch is published the coordinator hands it to a
//! [`ReportWriter`], then hands the resulting [`ReportArtifact`] to a
//! [`Notifier`]. Neither step can roll back the published batch.

mod notifier;
mod writer;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::models::Batch;

pub use notifier::{CommandNotifier, LogNotifier};
pub use writer::{JsonReportWriter, REPORT_COLUMNS, ReportRow};

/// A persisted report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    path: PathBuf,
}

impl ReportArtifact {
    /// Wraps the path of a written report
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the report
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Display for ReportArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Turns a completed batch into a durable artifact
#[async_trait]
pub trait ReportWriter: Send + Sync {
    /// Persists `batch` and returns where it went
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the report cannot be rendered or written.
    async fn write_report(&self, batch: &Batch) -> Result<ReportArtifact, DeliveryError>;
}

/// Delivers a persisted report to its audience
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announces `artifact`
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Notify`] if delivery fails.
    async fn notify(&self, artifact: &ReportArtifact) -> Result<(), DeliveryError>;
}
