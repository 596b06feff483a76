// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key newtype for type-safe key handling.
//!
//! Keys in this crate are dotted paths (`feature-management.beta.enabled-for`).
//! Remote store keys additionally carry a context prefix (`/application/`)
//! which is stripped before the key reaches the property chain.

use std::fmt;

/// A type-safe wrapper for configuration keys.
///
/// # Examples
///
/// ```
/// use azconfig::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::from("database.host");
/// assert_eq!(key.as_str(), "database.host");
/// assert_eq!(key.segments().collect::<Vec<_>>(), vec!["database", "host"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Joins a dotted prefix and a child segment.
    ///
    /// An empty prefix yields the child unchanged, and a prefix that already
    /// ends with `.` is not given a second separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use azconfig::domain::config_key::ConfigKey;
    ///
    /// assert_eq!(ConfigKey::join("", "beta").as_str(), "beta");
    /// assert_eq!(ConfigKey::join("group", "beta").as_str(), "group.beta");
    /// assert_eq!(ConfigKey::join("group.", "beta").as_str(), "group.beta");
    /// ```
    pub fn join(prefix: &str, child: &str) -> Self {
        if prefix.is_empty() {
            ConfigKey(child.to_string())
        } else if prefix.ends_with('.') {
            ConfigKey(format!("{}{}", prefix, child))
        } else {
            ConfigKey(format!("{}.{}", prefix, child))
        }
    }

    /// Trims surrounding whitespace and removes the `context` prefix.
    ///
    /// Returns `None` when the trimmed key does not start with `context`.
    ///
    /// # Examples
    ///
    /// ```
    /// use azconfig::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::from(" /application/db.url ");
    /// assert_eq!(key.relative_to("/application/").unwrap().as_str(), "db.url");
    /// assert!(key.relative_to("/other/").is_none());
    /// ```
    pub fn relative_to(&self, context: &str) -> Option<ConfigKey> {
        self.0
            .trim()
            .strip_prefix(context)
            .map(|rest| ConfigKey(rest.to_string()))
    }

    /// Iterates over the dot-separated segments of the key.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
