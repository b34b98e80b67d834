//! Configuration file schema

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};
use crate::models::HostSpec;
use crate::monitoring::ProbeSettings;
use crate::reporting::{CommandNotifier, JsonReportWriter, LogNotifier, Notifier};
use crate::scheduler::{DEFAULT_DAILY_AT, DailySchedule};
use crate::tracing::{TracingConfig, TracingLevel, TracingOutput};

/// Root of the configuration file
///
/// Unknown top-level keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SentinelConfig {
    /// Monitored hosts, in registry order
    #[serde(default)]
    pub servers: Vec<HostSpec>,
    /// Probe and transport tunables
    #[serde(default)]
    pub probe: ProbeSettings,
    /// Scheduled trigger
    #[serde(default)]
    pub schedule: ScheduleSettings,
    /// Report output
    #[serde(default)]
    pub reports: ReportSettings,
    /// Report delivery
    #[serde(default)]
    pub notify: NotifySettings,
    /// Diagnostics
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl SentinelConfig {
    /// Checks everything serde cannot
    ///
    /// Host entries are validated when the registry is built.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a bad schedule time or a
    /// zero worker limit.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.probe.max_concurrency == 0 {
            return Err(ConfigError::Validation(
                "probe.max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.probe.maintenance_command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "probe.maintenance_command must not be empty".to_string(),
            ));
        }
        self.schedule.daily_schedule()?;
        Ok(())
    }
}

/// `schedule:` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleSettings {
    /// Whether the daemon fires the scheduled trigger (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Local fire time, `HH:MM` (default: 07:00)
    #[serde(default = "default_daily_at")]
    pub daily_at: String,
}

const fn default_true() -> bool {
    true
}

fn default_daily_at() -> String {
    DEFAULT_DAILY_AT.to_string()
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            daily_at: default_daily_at(),
        }
    }
}

impl ScheduleSettings {
    /// Parsed fire time
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `daily_at` is not `HH:MM`.
    pub fn daily_schedule(&self) -> ConfigResult<DailySchedule> {
        DailySchedule::parse(&self.daily_at)
    }
}

/// `reports:` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportSettings {
    /// Directory for report files (default: `reports`)
    #[serde(default = "default_report_directory")]
    pub directory: PathBuf,
}

fn default_report_directory() -> PathBuf {
    PathBuf::from("reports")
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            directory: default_report_directory(),
        }
    }
}

impl ReportSettings {
    /// Writer targeting the configured directory
    #[must_use]
    pub fn writer(&self) -> JsonReportWriter {
        JsonReportWriter::new(&self.directory)
    }
}

/// `notify:` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotifySettings {
    /// Program and arguments run with the report path appended; empty logs
    /// the delivery instead
    #[serde(default)]
    pub command: Vec<String>,
}

impl NotifySettings {
    /// Notifier for this section
    #[must_use]
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        match CommandNotifier::from_argv(&self.command) {
            Some(command) => Arc::new(command),
            None => Arc::new(LogNotifier),
        }
    }
}

/// `logging:` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Level for the sentinel crates (default: info)
    #[serde(default)]
    pub level: TracingLevel,
    /// Full `EnvFilter` directive, overrides `level`
    #[serde(default)]
    pub filter: Option<String>,
    /// Log file; stderr when unset
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoggingSettings {
    /// Tracing configuration for these settings
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        let output = self
            .file
            .as_ref()
            .map_or(TracingOutput::Stderr, |path| TracingOutput::File {
                path: path.clone(),
            });
        let config = TracingConfig::new()
            .with_level(self.level)
            .with_output(output);
        match &self.filter {
            Some(filter) => config.with_filter(filter.clone()),
            None => config,
        }
    }
}
