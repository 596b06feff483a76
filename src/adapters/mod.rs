// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing implementations of the ports.
//!
//! This module contains the remote App Configuration property source, an
//! in-memory store client, and the built-in feature filters.

pub mod app_config;
#[cfg(feature = "filters")]
pub mod filters;
pub mod in_memory;

pub use app_config::AppConfigPropertySource;
#[cfg(feature = "filters")]
pub use filters::{PercentageFilter, TimeWindowFilter};
pub use in_memory::{InMemoryConfigStore, ANY_LABEL};
