// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature flag ingestion and evaluation.
//!
//! A [`FeatureManager`] turns a feature-management tree into an immutable
//! [`FeatureSnapshot`] and answers [`is_enabled`](FeatureManager::is_enabled)
//! against it. Loading a new tree replaces the snapshot as a whole.

use crate::domain::{
    ConfigError, ConfigKey, ConfigurationService, Feature, FeatureEntry,
    FeatureManagementProperties, Result,
};
use crate::service::FilterRegistry;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix of flattened feature keys in a property source.
pub const FEATURE_MANAGEMENT_PREFIX: &str = "feature-management";

/// Single top-level key that wraps a whole feature tree.
const WRAPPER_KEY: &str = "featureManagement";

/// The feature tables built from one feature-management tree.
///
/// Keys are full dotted names: `group: { sub: true }` is stored as `group.sub`.
///
/// # Examples
///
/// ```rust
/// use azconfig::service::FeatureSnapshot;
///
/// let tree = serde_yaml::from_str(
///     "featureManagement:\n  beta: true\n  group:\n    sub: false\n",
/// ).unwrap();
/// let snapshot = FeatureSnapshot::from_tree(&tree);
///
/// assert_eq!(snapshot.boolean_flag("beta"), Some(true));
/// assert_eq!(snapshot.boolean_flag("group.sub"), Some(false));
/// assert!(snapshot.feature("group").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSnapshot {
    on_off: HashMap<String, bool>,
    features: HashMap<String, Feature>,
}

impl FeatureSnapshot {
    /// Flattens and classifies `tree`.
    ///
    /// Malformed entries are logged and left out; the rest of the tree still
    /// loads. A later duplicate of a full key replaces the earlier one.
    pub fn from_tree(tree: &Value) -> Self {
        let mut snapshot = Self::default();

        let root = match tree {
            Value::Mapping(map) => unwrap_feature_management(map),
            Value::Null => return snapshot,
            _ => {
                tracing::error!("Feature management tree must be a mapping; ignoring it");
                return snapshot;
            }
        };

        for (key, value) in root {
            snapshot.ingest(key, value, "");
        }
        snapshot
    }

    fn ingest(&mut self, key: &Value, value: &Value, prefix: &str) {
        let Some(key) = key.as_str() else {
            tracing::error!(
                "Skipping feature with a non-string key under '{}': {:?}",
                prefix,
                key
            );
            return;
        };
        let full_key = ConfigKey::join(prefix, key).into_string();

        match FeatureEntry::classify(&full_key, value) {
            Ok(None) => {}
            Ok(Some(FeatureEntry::BooleanFlag(enabled))) => {
                self.on_off.insert(full_key, enabled);
            }
            Ok(Some(FeatureEntry::MultiFilterFeature(mut feature))) => {
                feature.key = Some(key.to_string());
                self.features.insert(full_key, feature);
            }
            Ok(Some(FeatureEntry::NestedGroup(children))) => {
                for (child_key, child) in children {
                    self.ingest(child_key, child, &full_key);
                }
            }
            Err(e) => tracing::error!("{}", e),
        }
    }

    /// The on/off value of a boolean flag.
    pub fn boolean_flag(&self, key: &str) -> Option<bool> {
        self.on_off.get(key).copied()
    }

    /// The filter-driven feature stored under `key`.
    pub fn feature(&self, key: &str) -> Option<&Feature> {
        self.features.get(key)
    }

    /// Every known feature key, sorted.
    pub fn feature_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .on_off
            .keys()
            .chain(self.features.keys().filter(|k| !self.on_off.contains_key(*k)))
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of boolean flags.
    pub fn boolean_flag_count(&self) -> usize {
        self.on_off.len()
    }

    /// Number of filter-driven features.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Whether the snapshot holds no features at all.
    pub fn is_empty(&self) -> bool {
        self.on_off.is_empty() && self.features.is_empty()
    }
}

fn unwrap_feature_management(map: &Mapping) -> &Mapping {
    if map.len() == 1 {
        if let Some(Value::Mapping(inner)) = map.get(WRAPPER_KEY) {
            return inner;
        }
    }
    map
}

/// Evaluates features against the current snapshot and a filter registry.
///
/// # Examples
///
/// ```rust
/// use azconfig::domain::{FeatureFilterEvaluationContext, FeatureManagementProperties};
/// use azconfig::service::{FeatureManager, FilterRegistry};
/// use std::sync::Arc;
///
/// # fn main() -> azconfig::domain::Result<()> {
/// let filters = Arc::new(FilterRegistry::new());
/// filters.register("Beta", |_: &FeatureFilterEvaluationContext| true);
///
/// let manager = FeatureManager::new(FeatureManagementProperties::default(), filters);
/// manager.load_yaml_str(
///     r#"
/// featureManagement:
///   dark-mode: false
///   checkout:
///     enabled-for:
///       - name: Beta
/// "#,
/// )?;
///
/// assert!(!manager.is_enabled("dark-mode")?);
/// assert!(manager.is_enabled("checkout")?);
/// assert!(!manager.is_enabled("unknown")?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FeatureManager {
    properties: FeatureManagementProperties,
    filters: Arc<FilterRegistry>,
    snapshot: RwLock<Option<Arc<FeatureSnapshot>>>,
}

impl FeatureManager {
    /// Creates a manager with no features loaded.
    pub fn new(properties: FeatureManagementProperties, filters: Arc<FilterRegistry>) -> Self {
        Self {
            properties,
            filters,
            snapshot: RwLock::new(None),
        }
    }

    /// The settings this manager evaluates with.
    pub fn properties(&self) -> &FeatureManagementProperties {
        &self.properties
    }

    /// The registry filters are resolved from.
    pub fn filters(&self) -> &Arc<FilterRegistry> {
        &self.filters
    }

    /// Replaces all features with those in `tree`.
    pub fn put_all(&self, tree: &Value) {
        self.swap(FeatureSnapshot::from_tree(tree));
    }

    /// Replaces all features with those in a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] when `content` is not valid YAML.
    /// The current features stay loaded in that case.
    pub fn load_yaml_str(&self, content: &str) -> Result<()> {
        let tree: Value = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::from_yaml_error("feature management document", e))?;
        self.put_all(&tree);
        Ok(())
    }

    /// Replaces all features with the `feature-management.` keys of `service`.
    ///
    /// The flat keys are nested back into a tree. Values `true`/`false` become
    /// booleans and integral values become numbers, so a flattened filter list
    /// such as `feature-management.f.enabled-for.0.name` loads like its YAML
    /// form.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures from `service`.
    pub fn load_from_service<S>(&self, service: &S) -> Result<()>
    where
        S: ConfigurationService + ?Sized,
    {
        let mut entries = Vec::new();
        for key in service.property_names() {
            if key.relative_to(FEATURE_MANAGEMENT_PREFIX).is_none() {
                continue;
            }
            let value = service.get(&key)?;
            entries.push((key, value.to_yaml_scalar()));
        }
        self.put_all(&nest_properties(entries, FEATURE_MANAGEMENT_PREFIX));
        Ok(())
    }

    /// The current snapshot, if features were ever loaded.
    pub fn snapshot(&self) -> Option<Arc<FeatureSnapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn swap(&self, snapshot: FeatureSnapshot) {
        tracing::info!(
            "Loaded {} boolean flag(s) and {} filtered feature(s)",
            snapshot.boolean_flag_count(),
            snapshot.feature_count()
        );
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(snapshot));
    }

    /// Checks whether `feature` is enabled.
    ///
    /// A boolean flag answers directly. A filtered feature is on as soon as
    /// one of its filters is, in declaration order; the remaining filters are
    /// not run. Unknown features and features with no filters are off.
    ///
    /// # Errors
    ///
    /// With fail-fast set, a filter name missing from the registry returns
    /// [`ConfigError::FilterNotFound`]. Without it the filter counts as off.
    pub fn is_enabled(&self, feature: &str) -> Result<bool> {
        let Some(snapshot) = self.snapshot() else {
            return Ok(false);
        };

        if let Some(enabled) = snapshot.boolean_flag(feature) {
            return Ok(enabled);
        }

        let Some(item) = snapshot.feature(feature) else {
            return Ok(false);
        };

        for context in item.filters() {
            if context.name.is_empty() {
                continue;
            }
            let enabled = match self.filters.get(&context.name) {
                Some(filter) => filter.evaluate(context),
                None => {
                    tracing::error!(
                        "Was unable to find filter '{}' for feature '{}'",
                        context.name,
                        feature
                    );
                    if self.properties.fail_fast {
                        return Err(ConfigError::FilterNotFound {
                            feature: feature.to_string(),
                            filter: context.clone(),
                        });
                    }
                    false
                }
            };
            if enabled {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Async form of [`is_enabled`](Self::is_enabled). Evaluation does not
    /// yield.
    pub async fn is_enabled_async(&self, feature: &str) -> Result<bool> {
        self.is_enabled(feature)
    }
}

/// Nests flat dotted keys under `prefix` back into a mapping tree.
///
/// Keys outside `prefix` are ignored. When a key is both a leaf and a parent,
/// the parent wins.
fn nest_properties<I>(entries: I, prefix: &str) -> Value
where
    I: IntoIterator<Item = (ConfigKey, Value)>,
{
    let mut root = Mapping::new();
    for (key, value) in entries {
        let Some(relative) = key.relative_to(prefix) else {
            continue;
        };
        let Some(relative) = relative.as_str().strip_prefix('.') else {
            continue;
        };
        let segments: Vec<&str> = relative.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            tracing::debug!("Skipping feature property with an empty segment: '{}'", key);
            continue;
        }
        insert_path(&mut root, &segments, value);
    }
    Value::Mapping(root)
}

fn insert_path(root: &mut Mapping, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        let key = Value::from(*segment);
        if !matches!(node.get(&key), Some(Value::Mapping(_))) {
            node.insert(key.clone(), Value::Mapping(Mapping::new()));
        }
        node = match node.get_mut(&key) {
            Some(Value::Mapping(child)) => child,
            _ => return,
        };
    }

    let key = Value::from(*last);
    if matches!(node.get(&key), Some(Value::Mapping(_))) {
        return;
    }
    node.insert(key, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureFilterEvaluationContext;

    fn tree(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_multi_filter_feature_keeps_leaf_key() {
        let snapshot = FeatureSnapshot::from_tree(&tree(
            "group:\n  checkout:\n    enabled-for:\n      - name: A\n",
        ));
        let feature = snapshot.feature("group.checkout").unwrap();
        assert_eq!(feature.key.as_deref(), Some("checkout"));
        assert_eq!(feature.filters()[0].name, "A");
    }

    #[test]
    fn test_wrapper_unwrapped_only_when_sole_entry() {
        let snapshot = FeatureSnapshot::from_tree(&tree(
            "featureManagement:\n  a: true\nother: true\n",
        ));
        assert_eq!(snapshot.boolean_flag("featureManagement.a"), Some(true));
        assert_eq!(snapshot.boolean_flag("other"), Some(true));
        assert!(snapshot.boolean_flag("a").is_none());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let snapshot = FeatureSnapshot::from_tree(&tree(
            "bad: 42\nworse: [1, 2]\nbroken:\n  enabled-for: nope\nnothing: ~\ngood: true\n",
        ));
        assert_eq!(snapshot.feature_names(), vec!["good"]);
    }

    #[test]
    fn test_non_mapping_tree_is_empty() {
        assert!(FeatureSnapshot::from_tree(&Value::Null).is_empty());
        assert!(FeatureSnapshot::from_tree(&Value::from("flag")).is_empty());
    }

    #[test]
    fn test_nest_properties_builds_filter_lists() {
        let entries = vec![
            (
                ConfigKey::from("feature-management.f.enabled-for.0.name"),
                Value::from("A"),
            ),
            (
                ConfigKey::from("feature-management.f.enabled-for.0.parameters.Value"),
                Value::from(50i64),
            ),
            (ConfigKey::from("feature-management.g"), Value::Bool(true)),
            (ConfigKey::from("feature-managementx.h"), Value::Bool(true)),
            (ConfigKey::from("unrelated"), Value::Bool(true)),
        ];
        let snapshot = FeatureSnapshot::from_tree(&nest_properties(entries, FEATURE_MANAGEMENT_PREFIX));

        assert_eq!(snapshot.boolean_flag("g"), Some(true));
        assert!(snapshot.boolean_flag("h").is_none());
        let context = &snapshot.feature("f").unwrap().filters()[0];
        assert_eq!(context.name, "A");
        assert_eq!(context.parameter("Value").and_then(Value::as_i64), Some(50));
    }

    #[test]
    fn test_nest_properties_parent_wins_over_leaf() {
        let entries = vec![
            (ConfigKey::from("feature-management.a"), Value::Bool(true)),
            (ConfigKey::from("feature-management.a.b"), Value::Bool(false)),
            (ConfigKey::from("feature-management.a"), Value::Bool(true)),
        ];
        let snapshot = FeatureSnapshot::from_tree(&nest_properties(entries, FEATURE_MANAGEMENT_PREFIX));
        assert_eq!(snapshot.boolean_flag("a.b"), Some(false));
        assert!(snapshot.boolean_flag("a").is_none());
    }

    #[test]
    fn test_reload_replaces_snapshot() {
        let manager = FeatureManager::new(
            FeatureManagementProperties::default(),
            Arc::new(FilterRegistry::new()),
        );
        assert!(manager.snapshot().is_none());

        manager.load_yaml_str("a: true\n").unwrap();
        let first = manager.snapshot().unwrap();
        manager.load_yaml_str("b: true\n").unwrap();

        assert!(!manager.is_enabled("a").unwrap());
        assert!(manager.is_enabled("b").unwrap());
        assert_eq!(first.boolean_flag("a"), Some(true));
    }

    #[test]
    fn test_invalid_yaml_keeps_current_features() {
        let manager = FeatureManager::new(
            FeatureManagementProperties::default(),
            Arc::new(FilterRegistry::new()),
        );
        manager.load_yaml_str("a: true\n").unwrap();
        assert!(matches!(
            manager.load_yaml_str("a: [unclosed"),
            Err(ConfigError::ParseError { .. })
        ));
        assert!(manager.is_enabled("a").unwrap());
    }

    #[test]
    fn test_unnamed_filters_are_skipped() {
        let filters = Arc::new(FilterRegistry::new());
        filters.register("On", |_: &FeatureFilterEvaluationContext| true);
        let manager = FeatureManager::new(FeatureManagementProperties::default(), filters);
        manager.load_yaml_str("f:\n  enabled-for:\n    - name: ''\n    - name: On\n").unwrap();
        assert!(manager.is_enabled("f").unwrap());
    }
}
