//! Configuration loading

use std::path::{Path, PathBuf};

use super::settings::SentinelConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::models::HostRegistry;
use crate::trace_operation;
use crate::tracing::span_names;

/// On-disk configuration syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML (default)
    Yaml,
    /// TOML
    Toml,
}

impl ConfigFormat {
    /// Picks the syntax from the file extension; anything but `.toml` is YAML
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// A loaded and validated configuration
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: Option<PathBuf>,
    config: SentinelConfig,
    registry: HostRegistry,
}

impl ConfigManager {
    /// Reads and validates the file at `path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let _span = trace_operation!(span_names::CONFIG_LOAD, path = %path.display()).entered();

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manager = Self::from_str_with_format(&content, ConfigFormat::from_path(path))?;
        manager.path = Some(path.to_path_buf());

        tracing::info!(
            servers = manager.registry.len(),
            "Loaded configuration"
        );
        Ok(manager)
    }

    /// Parses YAML configuration text
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on parse or validation failure.
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Self::from_str_with_format(content, ConfigFormat::Yaml)
    }

    /// Parses TOML configuration text
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on parse or validation failure.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Self::from_str_with_format(content, ConfigFormat::Toml)
    }

    fn from_str_with_format(content: &str, format: ConfigFormat) -> ConfigResult<Self> {
        let config: SentinelConfig = match format {
            ConfigFormat::Yaml if content.trim().is_empty() => SentinelConfig::default(),
            ConfigFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
        };
        Self::from_config(config)
    }

    /// Validates an already-built configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation fails.
    pub fn from_config(config: SentinelConfig) -> ConfigResult<Self> {
        config.validate()?;
        let registry = HostRegistry::new(config.servers.clone())?;
        Ok(Self {
            path: None,
            config,
            registry,
        })
    }

    /// File the configuration came from, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Parsed configuration
    #[must_use]
    pub const fn config(&self) -> &SentinelConfig {
        &self.config
    }

    /// Validated host registry
    #[must_use]
    pub const fn registry(&self) -> &HostRegistry {
        &self.registry
    }

    /// Consumes the manager, returning the configuration and registry
    #[must_use]
    pub fn into_parts(self) -> (SentinelConfig, HostRegistry) {
        (self.config, self.registry)
    }
}
