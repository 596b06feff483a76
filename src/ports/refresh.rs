// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration refresh trait definition.

use crate::domain::Result;

/// Refreshes loaded configuration from its remote stores.
///
/// Implementations own any throttling; callers may trigger a refresh after
/// every handled request.
pub trait ConfigRefresh: Send + Sync {
    /// Refreshes if due. Returns `Ok(true)` when a refresh actually ran.
    fn refresh_configurations(&self) -> Result<bool>;
}
