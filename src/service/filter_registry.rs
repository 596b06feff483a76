// SPDX-License-Identifier: MIT OR Apache-2.0

//! Name-keyed registry of feature filters.

use crate::ports::FeatureFilter;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Filters available to the feature manager, looked up by name at evaluation time.
///
/// The host owns the registry and shares it with the manager via `Arc`, so
/// filters registered or removed later are seen by the next evaluation
/// without reloading features.
///
/// # Examples
///
/// ```rust
/// use azconfig::domain::FeatureFilterEvaluationContext;
/// use azconfig::service::FilterRegistry;
///
/// let registry = FilterRegistry::new();
/// registry.register("Always", |_: &FeatureFilterEvaluationContext| true);
///
/// assert!(registry.contains("Always"));
/// let filter = registry.get("Always").unwrap();
/// assert!(filter.evaluate(&FeatureFilterEvaluationContext::new("Always")));
/// ```
#[derive(Default)]
pub struct FilterRegistry {
    filters: RwLock<HashMap<String, Arc<dyn FeatureFilter>>>,
}

impl FilterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in time window and percentage filters.
    #[cfg(feature = "filters")]
    pub fn with_builtin_filters() -> Self {
        let registry = Self::new();
        for (name, filter) in crate::adapters::filters::builtin_filters() {
            registry.register_arc(name, filter);
        }
        registry
    }

    /// Registers `filter` under `name`, replacing any filter with that name.
    pub fn register(&self, name: impl Into<String>, filter: impl FeatureFilter + 'static) {
        self.register_arc(name, Arc::new(filter));
    }

    /// Registers an already shared filter under `name`.
    pub fn register_arc(&self, name: impl Into<String>, filter: Arc<dyn FeatureFilter>) {
        let name = name.into();
        tracing::debug!("Registering feature filter '{}'", name);
        self.filters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, filter);
    }

    /// Removes the filter registered under `name`. Returns whether one was removed.
    pub fn remove(&self, name: &str) -> bool {
        self.filters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some()
    }

    /// The filter registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<dyn FeatureFilter>> {
        self.filters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Whether a filter is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.filters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .filters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no filters are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}
