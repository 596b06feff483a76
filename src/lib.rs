// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature flags and remote configuration stores in a hexagonal layout.
//!
//! This crate loads properties from remote key/value configuration stores
//! (Azure App Configuration style: keys selected by a context prefix and a
//! label) into a layered resolver, and evaluates feature flags defined in a
//! `feature-management` tree through pluggable, named filters.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`ConfigKey`, `ConfigValue`, `Feature`, settings, errors)
//! - **Ports**: Trait definitions (`ConfigSource`, `ConfigStoreClient`, `FeatureFilter`, `ConfigRefresh`)
//! - **Adapters**: The remote property source, an in-memory store, and the built-in filters
//! - **Service**: The resolver, the source locator, the feature manager, and refresh
//!
//! # Features
//!
//! - **Feature evaluation**: Boolean flags, nested groups, and filter lists evaluated in order
//! - **Fail-fast**: Missing filters are errors by default and can be relaxed to "off"
//! - **Remote stores**: Prefix and label selection with the prefix stripped from keys
//! - **Precedence**: Earlier stores take precedence over later ones
//! - **Refresh**: Throttled reload of properties and features after handled requests
//!
//! # Feature Flags
//!
//! - `filters`: Enable the built-in `Microsoft.TimeWindow` and `Microsoft.Percentage` filters (default)
//!
//! # Quick Start
//!
//! ```rust
//! use azconfig::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let filters = Arc::new(FilterRegistry::new());
//! filters.register("Beta", |ctx: &FeatureFilterEvaluationContext| {
//!     ctx.parameter("Enabled").and_then(|v| v.as_bool()).unwrap_or(false)
//! });
//!
//! let features = FeatureManager::new(FeatureManagementProperties::default(), filters);
//! features.load_yaml_str(
//!     r#"
//! featureManagement:
//!   search: true
//!   checkout:
//!     enabled-for:
//!       - name: Beta
//!         parameters:
//!           Enabled: true
//! "#,
//! )?;
//!
//! assert!(features.is_enabled("search")?);
//! assert!(features.is_enabled("checkout")?);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        AppConfigProperties, ConfigError, ConfigKey, ConfigStore, ConfigValue,
        ConfigurationService, Feature, FeatureFilterEvaluationContext,
        FeatureManagementProperties, KeyValueItem, Result,
    };
    pub use crate::ports::{ConfigRefresh, ConfigSource, ConfigStoreClient, FeatureFilter};
    pub use crate::service::{
        AppConfigPropertySourceLocator, DefaultConfigService, FeatureManager, FeatureRefresh,
        FilterRegistry, RefreshListener,
    };

    pub use crate::adapters::{AppConfigPropertySource, InMemoryConfigStore};
    #[cfg(feature = "filters")]
    pub use crate::adapters::{PercentageFilter, TimeWindowFilter};
}
