// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection descriptors for the configured stores.
//!
//! The pool only records how each endpoint should be reached. Turning a
//! descriptor into an authenticated client is left to a
//! [`ConfigStoreClientFactory`](crate::ports::ConfigStoreClientFactory).

use crate::domain::errors::{ConfigError, Result};
use crate::domain::properties::AppConfigProperties;
use std::collections::HashMap;

/// How to reach one store endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    /// Authenticate with a connection string.
    ConnectionString(String),
    /// Authenticate with a managed identity; an empty client id selects the
    /// system-assigned identity.
    ManagedIdentity {
        /// Store endpoint
        endpoint: String,
        /// Client id of the identity
        client_id: String,
    },
}

/// Connections keyed by store endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionPool {
    connections: HashMap<String, Connection>,
}

impl ConnectionPool {
    /// Builds the pool from the store settings.
    ///
    /// Stores with a blank endpoint are skipped. A store with a connection
    /// string uses it; any other store falls back to the managed identity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProperties`] when no store yields a connection.
    ///
    /// # Examples
    ///
    /// ```
    /// use azconfig::domain::{AppConfigProperties, ConfigStore, Connection, ConnectionPool};
    ///
    /// let props = AppConfigProperties {
    ///     stores: vec![ConfigStore::new("https://a").with_connection_string("cs")],
    ///     ..AppConfigProperties::default()
    /// };
    /// let pool = ConnectionPool::from_properties(&props).unwrap();
    /// assert_eq!(pool.get("https://a"), Some(&Connection::ConnectionString("cs".into())));
    /// ```
    pub fn from_properties(properties: &AppConfigProperties) -> Result<Self> {
        let mut pool = Self::default();
        let client_id = properties
            .managed_identity
            .as_ref()
            .and_then(|m| m.client_id.clone())
            .unwrap_or_default();

        for store in &properties.stores {
            if store.endpoint.trim().is_empty() {
                tracing::debug!("Skipping store without an endpoint");
                continue;
            }
            let connection = match store.connection_string.as_deref() {
                Some(cs) if !cs.trim().is_empty() => Connection::ConnectionString(cs.to_string()),
                _ => Connection::ManagedIdentity {
                    endpoint: store.endpoint.clone(),
                    client_id: client_id.clone(),
                },
            };
            pool.put(store.endpoint.clone(), connection);
        }

        if pool.is_empty() {
            return Err(ConfigError::InvalidProperties {
                message: "Connection string pool for the configuration stores is empty"
                    .to_string(),
            });
        }
        Ok(pool)
    }

    /// Adds or replaces the connection for `endpoint`.
    pub fn put(&mut self, endpoint: impl Into<String>, connection: Connection) {
        self.connections.insert(endpoint.into(), connection);
    }

    /// The connection for `endpoint`.
    pub fn get(&self, endpoint: &str) -> Option<&Connection> {
        self.connections.get(endpoint)
    }

    /// Number of endpoints in the pool.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Whether the pool has no endpoints.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
