// SPDX-License-Identifier: MIT OR Apache-2.0

//! Throttled reload of remote properties and the features built from them.

use crate::domain::{ConfigurationService, Result};
use crate::ports::ConfigRefresh;
use crate::service::{DefaultConfigService, FeatureManager};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Reloads the shared configuration service and rebuilds the features from it.
///
/// At most one refresh runs per interval. The first call always runs.
///
/// # Examples
///
/// ```rust
/// use azconfig::domain::FeatureManagementProperties;
/// use azconfig::ports::ConfigRefresh;
/// use azconfig::service::{DefaultConfigService, FeatureManager, FeatureRefresh, FilterRegistry};
/// use std::sync::{Arc, RwLock};
/// use std::time::Duration;
///
/// # fn main() -> azconfig::domain::Result<()> {
/// let service = Arc::new(RwLock::new(DefaultConfigService::new()));
/// let features = Arc::new(FeatureManager::new(
///     FeatureManagementProperties::default(),
///     Arc::new(FilterRegistry::new()),
/// ));
///
/// let refresh = FeatureRefresh::new(service, features).with_interval(Duration::from_secs(60));
/// assert!(refresh.refresh_configurations()?);
/// assert!(!refresh.refresh_configurations()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FeatureRefresh {
    service: Arc<RwLock<DefaultConfigService>>,
    features: Arc<FeatureManager>,
    interval: Duration,
    last_refresh: Mutex<Option<Instant>>,
}

impl FeatureRefresh {
    /// Minimum time between two refreshes unless configured otherwise.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

    /// Creates a refresher with the default interval.
    pub fn new(service: Arc<RwLock<DefaultConfigService>>, features: Arc<FeatureManager>) -> Self {
        Self {
            service,
            features,
            interval: Self::DEFAULT_INTERVAL,
            last_refresh: Mutex::new(None),
        }
    }

    /// Sets the minimum time between two refreshes.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// The minimum time between two refreshes.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Claims the current interval. Returns `false` if a refresh already ran in it.
    fn claim(&self) -> bool {
        let mut last = self
            .last_refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(at) = *last {
            if at.elapsed() < self.interval {
                return false;
            }
        }
        *last = Some(Instant::now());
        true
    }
}

impl ConfigRefresh for FeatureRefresh {
    /// # Errors
    ///
    /// Returns the first source reload failure. The feature snapshot is left
    /// as it was in that case, and the next attempt waits for the interval.
    fn refresh_configurations(&self) -> Result<bool> {
        if !self.claim() {
            return Ok(false);
        }

        let mut service = self.service.write().unwrap_or_else(PoisonError::into_inner);
        service.reload()?;
        tracing::debug!("Reloaded {} property source(s)", service.source_names().len());
        self.features.load_from_service(&*service)?;
        Ok(true)
    }
}

/// Triggers a refresh after each handled request.
pub struct RefreshListener {
    refresh: Arc<dyn ConfigRefresh>,
}

impl RefreshListener {
    /// Creates a listener driving `refresh`.
    pub fn new(refresh: Arc<dyn ConfigRefresh>) -> Self {
        Self { refresh }
    }

    /// Refreshes if due. Failures are logged and never reach the caller.
    pub fn on_request_handled(&self) {
        match self.refresh.refresh_configurations() {
            Ok(true) => tracing::debug!("Configuration refreshed"),
            Ok(false) => {}
            Err(e) => tracing::error!("Refresh failed with unexpected exception: {}", e),
        }
    }
}

impl std::fmt::Debug for RefreshListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshListener").finish_non_exhaustive()
    }
}
