// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in feature filters.
//!
//! Register them all at once with
//! [`FilterRegistry::with_builtin_filters`](crate::service::FilterRegistry::with_builtin_filters).

pub mod percentage;
pub mod time_window;

pub use percentage::PercentageFilter;
pub use time_window::TimeWindowFilter;

use crate::ports::FeatureFilter;
use std::sync::Arc;

/// The built-in filters with their registry names.
pub fn builtin_filters() -> Vec<(&'static str, Arc<dyn FeatureFilter>)> {
    vec![
        (TimeWindowFilter::NAME, Arc::new(TimeWindowFilter)),
        (PercentageFilter::NAME, Arc::new(PercentageFilter)),
    ]
}
