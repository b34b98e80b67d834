//! Host selection requests and inbound run requests

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::models::host::HostSpec;

/// Literal request value meaning "every configured host"
pub const ALL_HOSTS: &str = "all";

/// Action tag of an inbound run request
pub const RUN_ACTION: &str = "run";

/// Which hosts a batch should probe
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionRequest {
    /// Every host in registry order
    #[default]
    All,
    /// Hosts whose names appear in the list
    Named(Vec<String>),
}

impl SelectionRequest {
    /// Builds a selection from requested names.
    ///
    /// An empty list, or a list holding only `all`, selects every host. In
    /// any other list `all` is treated as an ordinary host name.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        match names.as_slice() {
            [] => Self::All,
            [only] if only == ALL_HOSTS => Self::All,
            _ => Self::Named(names),
        }
    }

    /// Returns true if this selects every host
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Resolves the selection against a registry.
    ///
    /// The result always follows registry order, never request order. Names
    /// matching no registry entry are ignored, and a name requested twice
    /// still yields one entry.
    #[must_use]
    pub fn resolve<'a>(&self, registry: &'a [HostSpec]) -> Vec<&'a HostSpec> {
        match self {
            Self::All => registry.iter().collect(),
            Self::Named(names) => {
                let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
                let mut included = HashSet::with_capacity(wanted.len());
                registry
                    .iter()
                    .filter(|spec| {
                        wanted.contains(spec.name.as_str()) && included.insert(spec.name.as_str())
                    })
                    .collect()
            }
        }
    }
}

/// Inbound request from the routing layer: `{"action":"run","servers":[...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Action tag; only `run` is understood
    pub action: String,
    /// Requested host names
    #[serde(default)]
    pub servers: Vec<String>,
}

impl RunRequest {
    /// Decodes a JSON run request
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Malformed`] for invalid JSON.
    pub fn from_json(message: &str) -> Result<Self, RequestError> {
        serde_json::from_str(message).map_err(|e| RequestError::Malformed(e.to_string()))
    }

    /// Converts the request into a selection
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::UnsupportedAction`] if the action is not `run`.
    pub fn into_selection(self) -> Result<SelectionRequest, RequestError> {
        if self.action != RUN_ACTION {
            return Err(RequestError::UnsupportedAction(self.action));
        }
        Ok(SelectionRequest::from_names(self.servers))
    }
}
