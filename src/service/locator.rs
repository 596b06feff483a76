// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds one property source per configured store.

use crate::adapters::AppConfigPropertySource;
use crate::domain::{AppConfigProperties, ConfigError, ConfigStore, ConnectionPool, Result};
use crate::ports::ConfigStoreClientFactory;
use std::fmt;
use std::sync::Arc;

/// Locates the remote property sources for the configured stores.
///
/// Stores are listed in precedence order, so the first store gets the
/// highest priority in the resolver.
pub struct AppConfigPropertySourceLocator {
    properties: AppConfigProperties,
    pool: ConnectionPool,
    factory: Arc<dyn ConfigStoreClientFactory>,
}

impl AppConfigPropertySourceLocator {
    /// Creates a locator over an existing connection pool.
    pub fn new(
        properties: AppConfigProperties,
        pool: ConnectionPool,
        factory: impl ConfigStoreClientFactory + 'static,
    ) -> Self {
        Self {
            properties,
            pool,
            factory: Arc::new(factory),
        }
    }

    /// Creates a locator, deriving the connection pool from `properties`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProperties`] when loading is enabled and
    /// no store yields a connection.
    pub fn from_properties(
        properties: AppConfigProperties,
        factory: impl ConfigStoreClientFactory + 'static,
    ) -> Result<Self> {
        let pool = if properties.enabled {
            ConnectionPool::from_properties(&properties)?
        } else {
            ConnectionPool::default()
        };
        Ok(Self::new(properties, pool, factory))
    }

    /// The settings this locator was built from.
    pub fn properties(&self) -> &AppConfigProperties {
        &self.properties
    }

    /// Creates and initializes a property source for every store.
    ///
    /// Returns nothing when loading is disabled. A store that fails to load
    /// is skipped with a warning unless fail-fast is set.
    ///
    /// # Errors
    ///
    /// Under fail-fast, the first store error is returned.
    pub fn locate(&self) -> Result<Vec<AppConfigPropertySource>> {
        if !self.properties.enabled {
            tracing::info!("Remote configuration is disabled");
            return Ok(Vec::new());
        }

        let count = self.properties.stores.len();
        let mut sources = Vec::with_capacity(count);

        for (index, store) in self.properties.stores.iter().enumerate() {
            let priority = u8::try_from(count - index).unwrap_or(u8::MAX);
            match self.load_store(store, priority) {
                Ok(Some(source)) => sources.push(source),
                Ok(None) => {}
                Err(e) if self.properties.fail_fast => {
                    tracing::error!("Failed to load store '{}': {}", store.endpoint, e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!("Skipping store '{}': {}", store.endpoint, e);
                }
            }
        }

        tracing::info!("Located {} remote property source(s)", sources.len());
        Ok(sources)
    }

    fn load_store(
        &self,
        store: &ConfigStore,
        priority: u8,
    ) -> Result<Option<AppConfigPropertySource>> {
        if store.endpoint.trim().is_empty() {
            tracing::debug!("Skipping store without an endpoint");
            return Ok(None);
        }

        let connection =
            self.pool
                .get(&store.endpoint)
                .ok_or_else(|| ConfigError::InvalidProperties {
                    message: format!("No connection for store '{}'", store.endpoint),
                })?;
        let client = self.factory.create(&store.endpoint, connection)?;

        let label = self.properties.label_for(store);
        let mut source =
            AppConfigPropertySource::new(store.prefix.clone(), label, client).with_priority(priority);
        source.init_properties()?;

        tracing::debug!(
            "Loaded {} properties from store '{}' (context '{}', label '{}')",
            source.len(),
            store.endpoint,
            store.prefix,
            label
        );
        Ok(Some(source))
    }
}

impl fmt::Debug for AppConfigPropertySourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfigPropertySourceLocator")
            .field("properties", &self.properties)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryConfigStore;
    use crate::domain::{Connection, KeyValueItem};
    use crate::ports::{ConfigSource, ConfigStoreClient};

    fn props(stores: Vec<ConfigStore>) -> AppConfigProperties {
        AppConfigProperties {
            stores,
            ..AppConfigProperties::default()
        }
    }

    #[test]
    fn test_earlier_stores_get_higher_priority() {
        let store = InMemoryConfigStore::new();
        store.insert(KeyValueItem::new("/a/x", "1", ""));
        store.insert(KeyValueItem::new("/b/x", "2", ""));

        let locator = AppConfigPropertySourceLocator::from_properties(
            props(vec![
                ConfigStore::new("https://a").with_prefix("/a/").with_connection_string("cs"),
                ConfigStore::new("https://b").with_prefix("/b/"),
            ]),
            store.factory(),
        )
        .unwrap();

        let sources = locator.locate().unwrap();
        assert_eq!(sources.len(), 2);
        assert!(sources[0].priority() > sources[1].priority());
        assert_eq!(sources[0].get_property("x").unwrap().as_str(), "1");
    }

    #[test]
    fn test_disabled_locates_nothing() {
        let mut properties = props(Vec::new());
        properties.enabled = false;
        let locator =
            AppConfigPropertySourceLocator::from_properties(properties, InMemoryConfigStore::new().factory())
                .unwrap();
        assert!(locator.locate().unwrap().is_empty());
    }

    #[test]
    fn test_store_label_overrides_default() {
        let store = InMemoryConfigStore::new();
        store.insert(KeyValueItem::new("/application/k", "prod", "prod"));
        store.insert(KeyValueItem::new("/application/k", "dev", "dev"));

        let mut properties = props(vec![ConfigStore::new("https://a").with_label("dev")]);
        properties.label = "prod".to_string();
        let locator = AppConfigPropertySourceLocator::from_properties(properties, store.factory()).unwrap();

        let sources = locator.locate().unwrap();
        assert_eq!(sources[0].label(), "dev");
        assert_eq!(sources[0].get_property("k").unwrap().as_str(), "dev");
    }

    #[test]
    fn test_factory_failure_respects_fail_fast() {
        let factory = |endpoint: &str, _: &Connection| -> Result<Box<dyn ConfigStoreClient>> {
            Err(ConfigError::SourceError {
                source_name: endpoint.to_string(),
                message: "refused".to_string(),
                source: None,
            })
        };
        let stores = vec![ConfigStore::new("https://a")];

        let strict = AppConfigPropertySourceLocator::from_properties(props(stores.clone()), factory).unwrap();
        assert!(matches!(strict.locate(), Err(ConfigError::SourceError { .. })));

        let mut lenient = props(stores);
        lenient.fail_fast = false;
        let lenient = AppConfigPropertySourceLocator::from_properties(lenient, factory).unwrap();
        assert!(lenient.locate().unwrap().is_empty());
    }
}
