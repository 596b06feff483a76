// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory configuration store.
//!
//! A [`ConfigStoreClient`] holding its entries in process memory. Useful for
//! local development, demos, and tests; clones share the same entries, so a
//! test can keep a handle and mutate the store under a live property source.

use crate::domain::{Connection, KeyValueItem, Result};
use crate::ports::{ConfigStoreClient, ConfigStoreClientFactory};
use std::sync::{Arc, PoisonError, RwLock};

/// Label filter matching entries with any label.
pub const ANY_LABEL: &str = "*";

/// A shared, mutable list of key/value entries.
///
/// # Examples
///
/// ```rust
/// use azconfig::adapters::InMemoryConfigStore;
/// use azconfig::domain::KeyValueItem;
/// use azconfig::ports::ConfigStoreClient;
///
/// let store = InMemoryConfigStore::from_items(vec![
///     KeyValueItem::new("/application/a", "1", ""),
///     KeyValueItem::new("/application/b", "2", "dev"),
///     KeyValueItem::new("/other/c", "3", ""),
/// ]);
///
/// let unlabeled = store.get_keys("/application/*", "").unwrap();
/// assert_eq!(unlabeled.len(), 1);
/// let any = store.get_keys("/application/*", "*").unwrap();
/// assert_eq!(any.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    items: Arc<RwLock<Vec<KeyValueItem>>>,
}

impl InMemoryConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `items`.
    pub fn from_items(items: Vec<KeyValueItem>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Inserts an entry, replacing any entry with the same key and label.
    pub fn insert(&self, item: KeyValueItem) {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        match items
            .iter_mut()
            .find(|existing| existing.key == item.key && existing.label == item.label)
        {
            Some(existing) => existing.value = item.value,
            None => items.push(item),
        }
    }

    /// Removes the entry with `key` and `label`. Returns whether one was removed.
    pub fn remove(&self, key: &str, label: &str) -> bool {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let before = items.len();
        items.retain(|item| !(item.key == key && item.label == label));
        items.len() != before
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A factory whose clients all share this store's entries, whatever
    /// endpoint they are created for.
    pub fn factory(&self) -> impl ConfigStoreClientFactory {
        let store = self.clone();
        move |_endpoint: &str, _connection: &Connection| -> Result<Box<dyn ConfigStoreClient>> {
            Ok(Box::new(store.clone()))
        }
    }

    fn key_matches(key_filter: &str, key: &str) -> bool {
        match key_filter.strip_suffix('*') {
            Some(prefix) => key.starts_with(prefix),
            None => key == key_filter,
        }
    }
}

impl ConfigStoreClient for InMemoryConfigStore {
    fn get_keys(&self, key_filter: &str, label: &str) -> Result<Vec<KeyValueItem>> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items
            .iter()
            .filter(|item| Self::key_matches(key_filter, &item.key))
            .filter(|item| label == ANY_LABEL || item.has_label(label))
            .cloned()
            .collect())
    }
}
