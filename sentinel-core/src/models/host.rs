//! Host specifications and the host registry

use std::collections::HashSet;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ConfigError, ConfigResult, ExecError, ExecResult};
use crate::models::selection::SelectionRequest;

/// Default SSH port
pub const DEFAULT_SSH_PORT: u16 = 22;

const fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.map(SecretString::from))
}

/// Identity and connection facts for one monitored host
///
/// Credentials are deserialized from configuration but never serialized;
/// use [`PublicHost`] for anything leaving the process.
#[derive(Debug, Clone, Deserialize)]
pub struct HostSpec {
    /// Unique name within the registry
    pub name: String,
    /// Hostname or IP address
    pub host: String,
    /// SSH port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Remote user
    #[serde(default)]
    pub user: String,
    /// Password credential
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub password: Option<SecretString>,
    /// Private key reference; a leading `~` expands to the home directory
    #[serde(default)]
    pub key_path: Option<String>,
}

/// Credential selected for a host
#[derive(Debug, Clone, Copy)]
pub enum Credential<'a> {
    /// Password authentication
    Password(&'a SecretString),
    /// Key-based authentication with an unexpanded key reference
    PrivateKey(&'a str),
}

impl HostSpec {
    /// Creates a host without credentials
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            user: user.into(),
            password: None,
            key_path: None,
        }
    }

    /// Sets the password credential
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Sets the private key reference
    #[must_use]
    pub fn with_key_path(mut self, key_path: impl Into<String>) -> Self {
        self.key_path = Some(key_path.into());
        self
    }

    /// Selects the credential to authenticate with.
    ///
    /// A non-empty password wins over a key reference.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::MissingCredential`] if neither is configured.
    pub fn credential(&self) -> ExecResult<Credential<'_>> {
        if let Some(password) = self
            .password
            .as_ref()
            .filter(|p| !p.expose_secret().is_empty())
        {
            return Ok(Credential::Password(password));
        }

        self.key_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Credential::PrivateKey)
            .ok_or_else(|| ExecError::MissingCredential(self.name.clone()))
    }

    /// Returns true if any credential is configured
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.credential().is_ok()
    }

    /// Returns `host:port`
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the SSH destination (`user@host`, or just `host` without a user)
    #[must_use]
    pub fn destination(&self) -> String {
        if self.user.is_empty() {
            self.host.clone()
        } else {
            format!("{}@{}", self.user, self.host)
        }
    }
}

/// Host view with credential fields excluded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHost {
    /// Host name
    pub name: String,
    /// Hostname or IP address
    pub host: String,
    /// SSH port
    pub port: u16,
    /// Remote user
    pub user: String,
}

impl From<&HostSpec> for PublicHost {
    fn from(spec: &HostSpec) -> Self {
        Self {
            name: spec.name.clone(),
            host: spec.host.clone(),
            port: spec.port,
            user: spec.user.clone(),
        }
    }
}

/// Ordered, validated list of monitored hosts
#[derive(Debug, Clone, Default)]
pub struct HostRegistry {
    hosts: Vec<HostSpec>,
}

impl HostRegistry {
    /// Builds a registry, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a name or host is empty, a port is zero,
    /// or two hosts share a name.
    pub fn new(hosts: Vec<HostSpec>) -> ConfigResult<Self> {
        let mut seen = HashSet::with_capacity(hosts.len());
        for spec in &hosts {
            if spec.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "server entry with empty name".to_string(),
                ));
            }
            if spec.host.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "server '{}' has an empty host",
                    spec.name
                )));
            }
            if spec.port == 0 {
                return Err(ConfigError::Validation(format!(
                    "server '{}' has port 0",
                    spec.name
                )));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateHost(spec.name.clone()));
            }
            if !spec.has_credential() {
                tracing::warn!(
                    host = %spec.name,
                    "Server has no password or key_path; probes will fail authentication"
                );
            }
        }
        Ok(Self { hosts })
    }

    /// Returns all hosts in registry order
    #[must_use]
    pub fn hosts(&self) -> &[HostSpec] {
        &self.hosts
    }

    /// Number of hosts
    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Returns true if no hosts are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Looks up a host by exact name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HostSpec> {
        self.hosts.iter().find(|h| h.name == name)
    }

    /// Resolves a selection against this registry
    #[must_use]
    pub fn resolve(&self, selection: &SelectionRequest) -> Vec<&HostSpec> {
        selection.resolve(&self.hosts)
    }

    /// Lists configured hosts without credentials
    #[must_use]
    pub fn public_hosts(&self) -> Vec<PublicHost> {
        self.hosts.iter().map(PublicHost::from).collect()
    }

    /// Renders [`Self::public_hosts`] as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn public_hosts_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.public_hosts())
    }
}
