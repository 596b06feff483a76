// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration service trait definition.
//!
//! This module defines the `ConfigurationService` trait, the interface of the
//! layered property resolver that remote property sources plug into.

use crate::domain::{ConfigKey, ConfigValue, Result};

/// A layered resolver over ordered property sources.
///
/// # Examples
///
/// ```rust
/// use azconfig::domain::{ConfigurationService, ConfigKey, ConfigValue, Result};
///
/// struct Single;
///
/// impl ConfigurationService for Single {
///     fn get(&self, _key: &ConfigKey) -> Result<ConfigValue> {
///         Ok(ConfigValue::from("value"))
///     }
///
///     fn property_names(&self) -> Vec<ConfigKey> {
///         vec![ConfigKey::from("only")]
///     }
///
///     fn reload(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let service = Single;
/// assert!(service.has(&ConfigKey::from("only")));
/// assert_eq!(service.get_or_default(&ConfigKey::from("x"), "d").as_str(), "value");
/// ```
pub trait ConfigurationService {
    /// Resolves `key` against the sources in precedence order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigKeyNotFound`](crate::domain::ConfigError::ConfigKeyNotFound)
    /// when no source provides the key.
    fn get(&self, key: &ConfigKey) -> Result<ConfigValue>;

    /// Every key any source provides, without duplicates.
    fn property_names(&self) -> Vec<ConfigKey>;

    /// Reloads every source.
    fn reload(&mut self) -> Result<()>;

    /// Resolves `key`, falling back to `default`.
    fn get_or_default(&self, key: &ConfigKey, default: &str) -> ConfigValue {
        self.get(key).unwrap_or_else(|_| ConfigValue::from(default))
    }

    /// Whether any source provides `key`.
    fn has(&self, key: &ConfigKey) -> bool {
        self.get(key).is_ok()
    }
}
