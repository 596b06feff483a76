// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer.
//!
//! This module contains the layered property resolver, the locator that
//! builds remote property sources for it, the feature manager with its filter
//! registry, and the refresh hook tying them together.

pub mod default_service;
pub mod feature_manager;
pub mod filter_registry;
pub mod locator;
pub mod refresh;

// Re-export commonly used types
pub use default_service::{ConfigurationServiceBuilder, DefaultConfigService};
pub use feature_manager::{FeatureManager, FeatureSnapshot, FEATURE_MANAGEMENT_PREFIX};
pub use filter_registry::FilterRegistry;
pub use locator::AppConfigPropertySourceLocator;
pub use refresh::{FeatureRefresh, RefreshListener};
