// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default configuration service implementation.
//!
//! This module provides the layered property resolver. It stacks property
//! sources by priority and answers lookups from the first source that has
//! the key.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, ConfigurationService, Result};
use crate::ports::ConfigSource;
use crate::service::locator::AppConfigPropertySourceLocator;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Default implementation of the configuration service.
///
/// This service manages multiple property sources and queries them in priority
/// order to resolve values. Sources with higher priority values are queried
/// first, and the first value found is returned.
///
/// # Examples
///
/// ```rust
/// use azconfig::adapters::{AppConfigPropertySource, InMemoryConfigStore};
/// use azconfig::domain::{ConfigKey, ConfigurationService, KeyValueItem};
/// use azconfig::service::DefaultConfigService;
///
/// # fn main() -> azconfig::domain::Result<()> {
/// let store = InMemoryConfigStore::new();
/// store.insert(KeyValueItem::new("/application/greeting", "hello", ""));
///
/// let mut source = AppConfigPropertySource::new("/application/", "", Box::new(store));
/// source.init_properties()?;
///
/// let service = DefaultConfigService::builder()
///     .with_source(Box::new(source))
///     .build()?;
/// assert_eq!(service.get(&ConfigKey::from("greeting"))?.as_str(), "hello");
/// # Ok(())
/// # }
/// ```
pub struct DefaultConfigService {
    /// List of property sources, maintained in priority order (highest first)
    sources: Vec<Box<dyn ConfigSource>>,
    /// Cache for resolved values
    cache: RwLock<HashMap<String, ConfigValue>>,
}

impl DefaultConfigService {
    /// Creates a new empty configuration service.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a new configuration service builder.
    pub fn builder() -> ConfigurationServiceBuilder {
        ConfigurationServiceBuilder::new()
    }

    /// Adds a property source to the service.
    ///
    /// Sources are kept sorted by priority. Among sources of equal priority the
    /// one added first is consulted first.
    pub fn add_source(&mut self, source: Box<dyn ConfigSource>) {
        self.sources.push(source);
        self.sort_sources();
        self.invalidate_cache();
    }

    /// Names of the sources in lookup order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Sorts sources by priority (highest first).
    fn sort_sources(&mut self) {
        self.sources.sort_by_key(|b| std::cmp::Reverse(b.priority()));
    }

    fn invalidate_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Queries all sources for a value, respecting priority order.
    fn query_sources(&self, key: &ConfigKey) -> Option<ConfigValue> {
        for source in &self.sources {
            match source.get(key) {
                Ok(Some(value)) => return Some(value),
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!(
                        "Error querying source '{}' for key '{}': {}",
                        source.name(),
                        key,
                        e
                    );
                }
            }
        }
        None
    }
}

impl Default for DefaultConfigService {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DefaultConfigService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultConfigService")
            .field("sources", &self.source_names())
            .finish_non_exhaustive()
    }
}

impl ConfigurationService for DefaultConfigService {
    fn get(&self, key: &ConfigKey) -> Result<ConfigValue> {
        if let Some(value) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key.as_str())
        {
            return Ok(value.clone());
        }

        let value = self
            .query_sources(key)
            .ok_or_else(|| ConfigError::ConfigKeyNotFound {
                key: key.as_str().to_string(),
            })?;

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.as_str().to_string(), value.clone());

        Ok(value)
    }

    fn property_names(&self) -> Vec<ConfigKey> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for source in &self.sources {
            let keys = match source.all_keys() {
                Ok(keys) => keys,
                Err(e) => {
                    tracing::debug!("Error listing keys of source '{}': {}", source.name(), e);
                    continue;
                }
            };
            for key in keys {
                if seen.insert(key.clone()) {
                    names.push(key);
                }
            }
        }
        names
    }

    /// Reloads every source, even after one fails.
    ///
    /// # Errors
    ///
    /// Returns the first failure once all sources have been tried. Sources
    /// that failed keep their previous values.
    fn reload(&mut self) -> Result<()> {
        let mut first_error = None;
        for source in &mut self.sources {
            if let Err(e) = source.reload() {
                tracing::warn!("Failed to reload source '{}': {}", source.name(), e);
                first_error.get_or_insert(e);
            }
        }

        self.invalidate_cache();

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Builder for constructing a `DefaultConfigService`.
///
/// # Examples
///
/// ```rust
/// use azconfig::service::ConfigurationServiceBuilder;
///
/// # fn main() -> azconfig::domain::Result<()> {
/// let service = ConfigurationServiceBuilder::new().build()?;
/// assert!(service.source_names().is_empty());
/// # Ok(())
/// # }
/// ```
pub struct ConfigurationServiceBuilder {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigurationServiceBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a property source to the builder.
    pub fn with_source(mut self, source: Box<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Adds one initialized source per configured store.
    ///
    /// # Errors
    ///
    /// Propagates the locator's error when a store fails under fail-fast.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use azconfig::adapters::InMemoryConfigStore;
    /// use azconfig::domain::{AppConfigProperties, ConfigKey, ConfigStore, ConfigurationService, KeyValueItem};
    /// use azconfig::service::{AppConfigPropertySourceLocator, DefaultConfigService};
    ///
    /// # fn main() -> azconfig::domain::Result<()> {
    /// let store = InMemoryConfigStore::new();
    /// store.insert(KeyValueItem::new("/application/a", "1", ""));
    ///
    /// let props = AppConfigProperties {
    ///     stores: vec![ConfigStore::new("https://a").with_connection_string("cs")],
    ///     ..AppConfigProperties::default()
    /// };
    /// let locator = AppConfigPropertySourceLocator::from_properties(props, store.factory())?;
    ///
    /// let service = DefaultConfigService::builder().with_app_config(&locator)?.build()?;
    /// assert_eq!(service.get(&ConfigKey::from("a"))?.as_str(), "1");
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_app_config(mut self, locator: &AppConfigPropertySourceLocator) -> Result<Self> {
        for source in locator.locate()? {
            self.sources.push(Box::new(source));
        }
        Ok(self)
    }

    /// Builds the configuration service.
    pub fn build(self) -> Result<DefaultConfigService> {
        let mut service = DefaultConfigService::new();

        for source in self.sources {
            service.add_source(source);
        }

        Ok(service)
    }
}

impl Default for ConfigurationServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
