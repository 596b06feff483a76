// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! A `ConfigSource` is one enumerable, read-only layer of the property chain.
//! The remote App Configuration source implements it, and so can any other
//! layer the host stacks around it.

use crate::domain::{ConfigKey, ConfigValue, Result};

/// An enumerable property source.
///
/// # Priority
///
/// Sources with a higher priority are consulted first by
/// [`DefaultConfigService`](crate::service::DefaultConfigService).
///
/// # Examples
///
/// ```rust
/// use azconfig::ports::ConfigSource;
/// use azconfig::domain::{ConfigKey, ConfigValue, Result};
///
/// struct Defaults;
///
/// impl ConfigSource for Defaults {
///     fn name(&self) -> &str {
///         "defaults"
///     }
///
///     fn priority(&self) -> u8 {
///         0
///     }
///
///     fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
///         Ok((key.as_str() == "app.name").then(|| ConfigValue::from("demo")))
///     }
///
///     fn all_keys(&self) -> Result<Vec<ConfigKey>> {
///         Ok(vec![ConfigKey::from("app.name")])
///     }
///
///     fn reload(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let source = Defaults;
/// assert_eq!(source.get_str("app.name").unwrap().unwrap().as_str(), "demo");
/// ```
pub trait ConfigSource: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Precedence of this source; higher wins.
    fn priority(&self) -> u8;

    /// The value for `key`, or `Ok(None)` if this source does not have it.
    fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>>;

    /// All keys in this source, in the source's own order.
    fn all_keys(&self) -> Result<Vec<ConfigKey>>;

    /// Refreshes the source from its backing store.
    fn reload(&mut self) -> Result<()>;

    /// Convenience wrapper around [`get`](ConfigSource::get) for string keys.
    fn get_str(&self, key: &str) -> Result<Option<ConfigValue>> {
        self.get(&ConfigKey::from(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestSource;

    impl ConfigSource for TestSource {
        fn name(&self) -> &str {
            "test-source"
        }

        fn priority(&self) -> u8 {
            1
        }

        fn get(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
            Ok((key.as_str() == "present").then(|| ConfigValue::from("yes")))
        }

        fn all_keys(&self) -> Result<Vec<ConfigKey>> {
            Ok(vec![ConfigKey::from("present")])
        }

        fn reload(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_get_str_delegates_to_get() {
        let source = TestSource;
        assert!(source.get_str("present").unwrap().is_some());
        assert!(source.get_str("absent").unwrap().is_none());
    }

    #[test]
    fn test_config_source_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ConfigSource>();
    }
}
