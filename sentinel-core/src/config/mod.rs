//! Configuration management
//!
//! [`ConfigManager`] loads a YAML (or TOML) file into a [`SentinelConfig`]
//! and validates it before anything is probed.

mod manager;
mod settings;

pub use manager::{ConfigFormat, ConfigManager};
pub use settings::{
    LoggingSettings, NotifySettings, ReportSettings, ScheduleSettings, SentinelConfig,
};
