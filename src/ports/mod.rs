// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the traits (ports) at the edges of the crate: property
//! sources, remote store clients, feature filters, and refresh triggers.
//! Adapters and the host application implement them.

pub mod feature_filter;
pub mod refresh;
pub mod source;
pub mod store_client;

// Re-export commonly used types
pub use feature_filter::FeatureFilter;
pub use refresh::ConfigRefresh;
pub use source::ConfigSource;
pub use store_client::{ConfigStoreClient, ConfigStoreClientFactory};
