// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared mocks for the integration tests.

#![allow(dead_code)]

use azconfig::domain::{ConfigError, FeatureFilterEvaluationContext, KeyValueItem, Result};
use azconfig::ports::{ConfigStoreClient, FeatureFilter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A filter returning a fixed answer and counting its invocations.
#[derive(Debug, Clone)]
pub struct MockFilter {
    result: bool,
    calls: Arc<AtomicUsize>,
}

impl MockFilter {
    /// Creates a filter that always answers `result`.
    pub fn new(result: bool) -> Self {
        Self {
            result,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times the filter (or any clone of it) was evaluated.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FeatureFilter for MockFilter {
    fn evaluate(&self, _context: &FeatureFilterEvaluationContext) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
    }
}

/// A filter recording every context it sees, answering from the `Result` parameter.
#[derive(Debug, Clone, Default)]
pub struct RecordingFilter {
    seen: Arc<Mutex<Vec<FeatureFilterEvaluationContext>>>,
}

impl RecordingFilter {
    /// Creates a filter with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Contexts seen so far, in evaluation order.
    pub fn seen(&self) -> Vec<FeatureFilterEvaluationContext> {
        self.seen.lock().unwrap().clone()
    }
}

impl FeatureFilter for RecordingFilter {
    fn evaluate(&self, context: &FeatureFilterEvaluationContext) -> bool {
        self.seen.lock().unwrap().push(context.clone());
        context
            .parameter("Result")
            .and_then(serde_yaml::Value::as_bool)
            .unwrap_or(false)
    }
}

/// A store client returning the same items for every query, without any
/// filtering of its own.
#[derive(Debug, Clone, Default)]
pub struct StaticStoreClient {
    items: Vec<KeyValueItem>,
    queries: Arc<Mutex<Vec<(String, String)>>>,
}

impl StaticStoreClient {
    /// Creates a client answering with `items`.
    pub fn new(items: Vec<KeyValueItem>) -> Self {
        Self {
            items,
            queries: Arc::default(),
        }
    }

    /// `(key_filter, label)` pairs received so far.
    pub fn queries(&self) -> Vec<(String, String)> {
        self.queries.lock().unwrap().clone()
    }
}

impl ConfigStoreClient for StaticStoreClient {
    fn get_keys(&self, key_filter: &str, label: &str) -> Result<Vec<KeyValueItem>> {
        self.queries
            .lock()
            .unwrap()
            .push((key_filter.to_string(), label.to_string()));
        Ok(self.items.clone())
    }
}

/// A store client whose every query fails.
#[derive(Debug, Clone, Default)]
pub struct FailingStoreClient;

impl ConfigStoreClient for FailingStoreClient {
    fn get_keys(&self, key_filter: &str, _label: &str) -> Result<Vec<KeyValueItem>> {
        Err(ConfigError::SourceError {
            source_name: key_filter.to_string(),
            message: "store unreachable".to_string(),
            source: None,
        })
    }
}
