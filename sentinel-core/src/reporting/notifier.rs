//! Notification delivery

use std::process::Stdio;

use async_trait::async_trait;

use super::{Notifier, ReportArtifact};
use crate::error::DeliveryError;

/// Records deliveries in the operational log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, artifact: &ReportArtifact) -> Result<(), DeliveryError> {
        tracing::info!(path = %artifact, "Health report ready");
        Ok(())
    }
}

/// Runs a local program with the report path appended to its arguments
///
/// Used to hand reports to mailers or upload scripts. A non-zero exit is a
/// delivery failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNotifier {
    program: String,
    args: Vec<String>,
}

impl CommandNotifier {
    /// Builds a notifier from an argv, `None` when it is empty
    #[must_use]
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl Notifier for CommandNotifier {
    async fn notify(&self, artifact: &ReportArtifact) -> Result<(), DeliveryError> {
        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(artifact.path())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| DeliveryError::Notify(format!("{}: {e}", self.program)))?;

        if output.status.success() {
            tracing::debug!(
                program = %self.program,
                path = %artifact,
                "Notification command succeeded"
            );
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(DeliveryError::Notify(format!(
            "{} exited with {}: {}",
            self.program,
            output.status,
            stderr.trim()
        )))
    }
}
