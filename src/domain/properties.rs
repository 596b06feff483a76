// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings for remote configuration stores and feature management.
//!
//! Both settings types deserialize from kebab-case YAML:
//!
//! ```yaml
//! enabled: true
//! fail-fast: true
//! label: prod
//! stores:
//!   - endpoint: https://myconfig.azconfig.io
//!     connection-string: Endpoint=https://myconfig.azconfig.io;Id=..;Secret=..
//!     prefix: /application/
//! managed-identity:
//!   client-id: 00000000-0000-0000-0000-000000000000
//! ```

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Context prefix used when a store does not name one.
pub const DEFAULT_CONTEXT: &str = "/application/";

fn default_true() -> bool {
    true
}

fn default_context() -> String {
    DEFAULT_CONTEXT.to_string()
}

/// Settings for loading properties from remote configuration stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfigProperties {
    /// When `false`, no remote property sources are created.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// When `true`, a store that cannot be loaded aborts startup instead of being skipped.
    #[serde(default = "default_true")]
    pub fail_fast: bool,
    /// Label applied to stores that do not set their own. Empty means unlabeled.
    #[serde(default)]
    pub label: String,
    /// Stores in precedence order; earlier stores win.
    #[serde(default)]
    pub stores: Vec<ConfigStore>,
    /// Identity used for stores without a connection string.
    #[serde(default)]
    pub managed_identity: Option<ManagedIdentityProperties>,
}

impl Default for AppConfigProperties {
    fn default() -> Self {
        Self {
            enabled: true,
            fail_fast: true,
            label: String::new(),
            stores: Vec::new(),
            managed_identity: None,
        }
    }
}

impl AppConfigProperties {
    /// Parses the settings from a YAML document.
    ///
    /// # Examples
    ///
    /// ```
    /// use azconfig::domain::AppConfigProperties;
    ///
    /// let props = AppConfigProperties::from_yaml_str(
    ///     "label: prod\nstores:\n  - endpoint: https://a.azconfig.io\n",
    /// ).unwrap();
    /// assert!(props.enabled);
    /// assert_eq!(props.stores[0].prefix, "/application/");
    /// assert_eq!(props.label_for(&props.stores[0]), "prod");
    /// ```
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::from_yaml_error("app configuration properties", e))
    }

    /// The label to load `store` with.
    pub fn label_for<'a>(&'a self, store: &'a ConfigStore) -> &'a str {
        store.label.as_deref().unwrap_or(&self.label)
    }
}

/// One remote configuration store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigStore {
    /// Store endpoint URL.
    #[serde(default)]
    pub endpoint: String,
    /// Connection string; when absent the managed identity is used.
    #[serde(default)]
    pub connection_string: Option<String>,
    /// Key prefix ("context") selecting this application's keys.
    #[serde(default = "default_context")]
    pub prefix: String,
    /// Label overriding the global one.
    #[serde(default)]
    pub label: Option<String>,
}

impl ConfigStore {
    /// Creates a store entry with the default context.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connection_string: None,
            prefix: default_context(),
            label: None,
        }
    }

    /// Sets the connection string.
    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    /// Sets the context prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the store label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Managed identity settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ManagedIdentityProperties {
    /// Client id of a user-assigned identity.
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Settings for the feature manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FeatureManagementProperties {
    /// When `true`, a feature naming an unregistered filter fails evaluation
    /// instead of treating the filter as not matching.
    #[serde(default = "default_true")]
    pub fail_fast: bool,
}

impl Default for FeatureManagementProperties {
    fn default() -> Self {
        Self { fail_fast: true }
    }
}

impl FeatureManagementProperties {
    /// Settings with fail-fast switched off.
    pub fn fail_open() -> Self {
        Self { fail_fast: false }
    }

    /// Parses the settings from a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::from_yaml_error("feature management properties", e))
    }
}
