// SPDX-License-Identifier: MIT OR Apache-2.0

//! App Configuration property source adapter.
//!
//! This module provides a property source backed by a remote key/value store.
//! Keys are selected by a context prefix and a label, and the prefix is
//! stripped before the keys reach the property chain.

use crate::domain::{ConfigKey, ConfigValue, Result};
use crate::ports::{ConfigSource, ConfigStoreClient};
use std::collections::HashMap;
use std::fmt;

/// Property source for one context of a remote configuration store.
///
/// The source is empty until [`init_properties`](Self::init_properties) has
/// fetched its entries.
///
/// # Priority
///
/// Remote sources have a default priority of 1, but this can be customized.
///
/// # Examples
///
/// ```rust
/// use azconfig::adapters::{AppConfigPropertySource, InMemoryConfigStore};
/// use azconfig::domain::KeyValueItem;
///
/// # fn main() -> azconfig::domain::Result<()> {
/// let store = InMemoryConfigStore::new();
/// store.insert(KeyValueItem::new("app.a", "1", "prod"));
/// store.insert(KeyValueItem::new("app.b", "2", "dev"));
///
/// let mut source = AppConfigPropertySource::new("app.", "prod", Box::new(store));
/// source.init_properties()?;
///
/// assert_eq!(source.list_property_names(), vec!["a".to_string()]);
/// assert_eq!(source.get_property("a").map(|v| v.as_str()), Some("1"));
/// # Ok(())
/// # }
/// ```
pub struct AppConfigPropertySource {
    /// Key prefix selecting this source's entries
    context: String,
    /// Label the entries must carry
    label: String,
    /// Priority for this source
    priority: u8,
    /// Remote store client
    client: Box<dyn ConfigStoreClient>,
    /// Property names in fetch order
    names: Vec<String>,
    /// Loaded values
    properties: HashMap<String, ConfigValue>,
}

impl AppConfigPropertySource {
    /// Creates an uninitialized source.
    pub fn new(
        context: impl Into<String>,
        label: impl Into<String>,
        client: Box<dyn ConfigStoreClient>,
    ) -> Self {
        Self {
            context: context.into(),
            label: label.into(),
            priority: 1,
            client,
            names: Vec::new(),
            properties: HashMap::new(),
        }
    }

    /// Sets the priority of this source.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// The key prefix of this source.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// The label this source loads.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fetches the entries for this context and label.
    ///
    /// Entries with any other label are skipped. Keys are trimmed, and the
    /// context is stripped from them; a repeated key keeps its first position
    /// and takes the later value.
    ///
    /// # Errors
    ///
    /// Propagates the client's error unchanged. The previously loaded
    /// properties stay in place when the fetch fails.
    pub fn init_properties(&mut self) -> Result<()> {
        let key_filter = format!("{}*", self.context);
        let items = self.client.get_keys(&key_filter, &self.label)?;

        let mut names = Vec::with_capacity(items.len());
        let mut properties = HashMap::with_capacity(items.len());

        for item in items {
            if !item.has_label(&self.label) {
                tracing::debug!(
                    "Skipping key '{}' with label '{}' (expected '{}')",
                    item.key,
                    item.label,
                    self.label
                );
                continue;
            }

            let Some(key) = ConfigKey::from(item.key.as_str()).relative_to(&self.context) else {
                tracing::debug!(
                    "Skipping key '{}' outside context '{}'",
                    item.key,
                    self.context
                );
                continue;
            };
            if key.as_str().is_empty() {
                continue;
            }

            let name = key.into_string();
            if properties
                .insert(name.clone(), ConfigValue::from(item.value))
                .is_none()
            {
                names.push(name);
            }
        }

        tracing::debug!(
            "Loaded {} properties for context '{}' and label '{}'",
            names.len(),
            self.context,
            self.label
        );
        self.names = names;
        self.properties = properties;
        Ok(())
    }

    /// Property names in the order they were fetched.
    pub fn list_property_names(&self) -> Vec<String> {
        self.names.clone()
    }

    /// The value of the property `name`.
    pub fn get_property(&self, name: &str) -> Option<&ConfigValue> {
        self.properties.get(name)
    }

    /// Number of loaded properties.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no properties are loaded.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Debug for AppConfigPropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfigPropertySource")
            .field("context", &self.context)
            .field("label", &self.label)
            .field("priority", &self.priority)
            .field("properties", &self.names.len())
            .finish()
    }
}

impl ConfigSource for AppConfigPropertySource {
    fn name(&self) -> &str {
        &self.context
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        Ok(self.get_property(key.as_str()).cloned())
    }

    fn all_keys(&self) -> Result<Vec<ConfigKey>> {
        Ok(self.names.iter().map(|n| ConfigKey::from(n.as_str())).collect())
    }

    fn reload(&mut self) -> Result<()> {
        self.init_properties()
    }
}
