// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! This module contains the types shared by the property sources and the
//! feature manager. It is independent of any concrete store or filter.

pub mod config_key;
pub mod config_value;
pub mod connection;
pub mod errors;
pub mod feature;
pub mod key_value;
pub mod properties;
pub mod service;

// Re-export commonly used types
pub use config_key::ConfigKey;
pub use config_value::ConfigValue;
pub use connection::{Connection, ConnectionPool};
pub use errors::{ConfigError, Result};
pub use feature::{Feature, FeatureEntry, FeatureFilterEvaluationContext};
pub use key_value::KeyValueItem;
pub use properties::{
    AppConfigProperties, ConfigStore, FeatureManagementProperties, ManagedIdentityProperties,
    DEFAULT_CONTEXT,
};
pub use service::ConfigurationService;
