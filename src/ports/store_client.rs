// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote configuration store client traits.
//!
//! The HTTP client that talks to the store and the credential handling that
//! builds it are outside this crate. These two traits are the seams a host
//! fills in.

use crate::domain::{Connection, KeyValueItem, Result};

/// Fetches key/value entries from a remote store.
pub trait ConfigStoreClient: Send + Sync {
    /// Returns the entries whose key matches `key_filter` and whose label
    /// matches `label`, in the store's order.
    ///
    /// A trailing `*` in `key_filter` is a prefix wildcard. Implementations
    /// perform one blocking round-trip and do not retry.
    fn get_keys(&self, key_filter: &str, label: &str) -> Result<Vec<KeyValueItem>>;
}

/// Creates a client for a store endpoint.
///
/// Any `Fn(&str, &Connection) -> Result<Box<dyn ConfigStoreClient>>` closure
/// is a factory.
pub trait ConfigStoreClientFactory: Send + Sync {
    /// Builds a client reaching `endpoint` through `connection`.
    fn create(&self, endpoint: &str, connection: &Connection)
        -> Result<Box<dyn ConfigStoreClient>>;
}

impl<F> ConfigStoreClientFactory for F
where
    F: Fn(&str, &Connection) -> Result<Box<dyn ConfigStoreClient>> + Send + Sync,
{
    fn create(
        &self,
        endpoint: &str,
        connection: &Connection,
    ) -> Result<Box<dyn ConfigStoreClient>> {
        self(endpoint, connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl ConfigStoreClient for Fixed {
        fn get_keys(&self, _key_filter: &str, label: &str) -> Result<Vec<KeyValueItem>> {
            Ok(vec![KeyValueItem::new("k", "v", label)])
        }
    }

    #[test]
    fn test_closure_is_a_factory() {
        let factory = |_endpoint: &str,
                       _connection: &Connection|
         -> Result<Box<dyn ConfigStoreClient>> { Ok(Box::new(Fixed)) };
        let client = factory
            .create("https://a", &Connection::ConnectionString("cs".into()))
            .unwrap();
        assert_eq!(client.get_keys("*", "prod").unwrap()[0].label, "prod");
    }
}
