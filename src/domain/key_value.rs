// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw key/value entries as returned by a remote configuration store.

use serde::{Deserialize, Serialize};

/// One `(key, value, label)` triple from the remote store.
///
/// An empty label means the entry carries no label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueItem {
    /// Full key, including the context prefix.
    pub key: String,
    /// Raw value.
    pub value: String,
    /// Label selecting among values for the same key.
    #[serde(default)]
    pub label: String,
}

impl KeyValueItem {
    /// Creates a new entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use azconfig::domain::KeyValueItem;
    ///
    /// let item = KeyValueItem::new("/application/db.url", "postgres://", "prod");
    /// assert!(item.has_label("prod"));
    /// assert!(!item.has_label("dev"));
    /// ```
    pub fn new(key: impl Into<String>, value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            label: label.into(),
        }
    }

    /// Whether the entry's label is exactly `label`.
    pub fn has_label(&self, label: &str) -> bool {
        self.label == label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_match_is_exact() {
        let item = KeyValueItem::new("k", "v", "Prod");
        assert!(item.has_label("Prod"));
        assert!(!item.has_label("prod"));
        assert!(!item.has_label(""));
    }

    #[test]
    fn test_missing_label_deserializes_empty() {
        let item: KeyValueItem = serde_yaml::from_str("key: a\nvalue: b\n").unwrap();
        assert!(item.has_label(""));
    }
}
