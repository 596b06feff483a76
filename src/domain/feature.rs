// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature definitions and their classification.
//!
//! A feature-management tree holds three kinds of values: plain booleans,
//! features that list filters under `enabled-for`, and nested groups whose
//! child keys extend the dotted feature name. [`FeatureEntry::classify`] sorts
//! a raw YAML value into exactly one of those cases.

use crate::domain::errors::{ConfigError, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;

/// A single filter entry of a feature: the filter name and its parameters.
///
/// # Examples
///
/// ```
/// use azconfig::domain::feature::FeatureFilterEvaluationContext;
///
/// let context = FeatureFilterEvaluationContext::new("Microsoft.Percentage")
///     .with_parameter("Value", 50);
/// assert_eq!(context.name, "Microsoft.Percentage");
/// assert_eq!(context.parameter("value").and_then(|v| v.as_i64()), Some(50));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureFilterEvaluationContext {
    /// Registered name of the filter to run. Entries with an empty name are skipped.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Filter-specific parameters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: HashMap<String, Value>,
}

impl FeatureFilterEvaluationContext {
    /// Creates a context for the named filter with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: HashMap::new(),
        }
    }

    /// Adds a parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Looks up a parameter by exact name, then case-insensitively.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name).or_else(|| {
            self.parameters
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        })
    }
}

/// A feature evaluated through an ordered list of filters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Feature {
    /// The feature's own key (the last segment of its dotted name).
    #[serde(default)]
    pub key: Option<String>,
    /// Filters in evaluation order.
    #[serde(
        default,
        rename = "enabled-for",
        alias = "enabledFor",
        deserialize_with = "deserialize_filter_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub enabled_for: Option<Vec<FeatureFilterEvaluationContext>>,
}

impl Feature {
    /// Creates a feature with the given filters.
    pub fn with_filters(
        key: impl Into<String>,
        filters: Vec<FeatureFilterEvaluationContext>,
    ) -> Self {
        Self {
            key: Some(key.into()),
            enabled_for: Some(filters),
        }
    }

    /// The filter list, empty when none was declared.
    pub fn filters(&self) -> &[FeatureFilterEvaluationContext] {
        self.enabled_for.as_deref().unwrap_or(&[])
    }
}

/// The three shapes a feature-management value can take.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureEntry<'a> {
    /// A feature switched on or off outright.
    BooleanFlag(bool),
    /// A feature driven by filters.
    MultiFilterFeature(Feature),
    /// A deeper level of the dotted key hierarchy.
    NestedGroup(&'a Mapping),
}

impl<'a> FeatureEntry<'a> {
    /// Classifies `value`, found under the full dotted `key`.
    ///
    /// Returns `Ok(None)` for null values, which carry nothing to store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedFeature`] for scalars other than
    /// booleans, sequences, and mappings whose feature fields have the wrong
    /// shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use azconfig::domain::feature::FeatureEntry;
    /// use serde_yaml::Value;
    ///
    /// let value: Value = serde_yaml::from_str("sub: true").unwrap();
    /// assert!(matches!(
    ///     FeatureEntry::classify("group", &value),
    ///     Ok(Some(FeatureEntry::NestedGroup(_)))
    /// ));
    /// ```
    pub fn classify(key: &str, value: &'a Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(FeatureEntry::BooleanFlag(*b))),
            Value::Mapping(map) if !declares_feature(map) => {
                Ok(Some(FeatureEntry::NestedGroup(map)))
            }
            Value::Mapping(_) => {
                let feature: Feature = serde_yaml::from_value(value.clone()).map_err(|e| {
                    ConfigError::MalformedFeature {
                        key: key.to_string(),
                        message: e.to_string(),
                    }
                })?;
                Ok(Some(FeatureEntry::MultiFilterFeature(feature)))
            }
            other => Err(ConfigError::MalformedFeature {
                key: key.to_string(),
                message: format!("expected a boolean or a mapping, found {}", kind(other)),
            }),
        }
    }
}

/// A mapping is a feature when it carries a filter list or a string `key`.
///
/// Anything else is a group, even when a child feature is named `key` or
/// `enabled-for`.
fn declares_feature(map: &Mapping) -> bool {
    let has_filters = ["enabled-for", "enabledFor"]
        .iter()
        .any(|field| map.get(*field).is_some_and(|v| v.is_sequence() || v.is_mapping()));
    has_filters || map.get("key").is_some_and(Value::is_string)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a sequence of filters or an index-keyed mapping (`{"0": .., "1": ..}`).
///
/// Flattened property sources can only express lists the second way.
fn deserialize_filter_list<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<FeatureFilterEvaluationContext>>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Sequence(items)) => items,
        Some(Value::Mapping(map)) => {
            let mut indexed = Vec::with_capacity(map.len());
            for (index, entry) in map {
                let position = filter_index(&index).ok_or_else(|| {
                    D::Error::custom(format!("invalid filter index {:?}", index))
                })?;
                indexed.push((position, entry));
            }
            indexed.sort_by_key(|(position, _)| *position);
            indexed.into_iter().map(|(_, entry)| entry).collect()
        }
        Some(other) => {
            return Err(D::Error::custom(format!(
                "expected a list of filters, found {}",
                kind(&other)
            )))
        }
    };

    let mut filters = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.is_null() {
            continue;
        }
        filters.push(serde_yaml::from_value(entry).map_err(D::Error::custom)?);
    }
    Ok(Some(filters))
}

fn filter_index(index: &Value) -> Option<u64> {
    match index {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_classify_boolean() {
        let value = Value::Bool(false);
        assert_eq!(
            FeatureEntry::classify("flag", &value).unwrap(),
            Some(FeatureEntry::BooleanFlag(false))
        );
    }

    #[test]
    fn test_classify_null_is_skipped() {
        assert_eq!(FeatureEntry::classify("flag", &Value::Null).unwrap(), None);
    }

    #[test]
    fn test_classify_feature_with_sequence() {
        let value = yaml(
            "enabled-for:\n  - name: Alpha\n    parameters:\n      Value: 10\n  - name: Beta\n",
        );
        let Some(FeatureEntry::MultiFilterFeature(feature)) =
            FeatureEntry::classify("beta", &value).unwrap()
        else {
            panic!("expected a feature");
        };
        let names: Vec<&str> = feature.filters().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(
            feature.filters()[0].parameter("Value").and_then(Value::as_i64),
            Some(10)
        );
    }

    #[test]
    fn test_classify_feature_with_camel_case_alias() {
        let value = yaml("enabledFor:\n  - name: Alpha\n");
        let entry = FeatureEntry::classify("beta", &value).unwrap();
        assert!(matches!(entry, Some(FeatureEntry::MultiFilterFeature(_))));
    }

    #[test]
    fn test_classify_feature_with_index_keyed_filters() {
        let value = yaml("enabled-for:\n  \"1\":\n    name: Second\n  \"0\":\n    name: First\n");
        let Some(FeatureEntry::MultiFilterFeature(feature)) =
            FeatureEntry::classify("beta", &value).unwrap()
        else {
            panic!("expected a feature");
        };
        let names: Vec<&str> = feature.filters().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_null_filter_entries_are_dropped() {
        let value = yaml("enabled-for:\n  - ~\n  - name: Only\n");
        let Some(FeatureEntry::MultiFilterFeature(feature)) =
            FeatureEntry::classify("beta", &value).unwrap()
        else {
            panic!("expected a feature");
        };
        assert_eq!(feature.filters().len(), 1);
    }

    #[test]
    fn test_classify_declared_key_only_is_feature() {
        let value = yaml("key: beta\n");
        let Some(FeatureEntry::MultiFilterFeature(feature)) =
            FeatureEntry::classify("beta", &value).unwrap()
        else {
            panic!("expected a feature");
        };
        assert!(feature.filters().is_empty());
    }

    #[test]
    fn test_classify_nested_group() {
        let value = yaml("sub: true\nother:\n  deeper: false\n");
        match FeatureEntry::classify("group", &value).unwrap() {
            Some(FeatureEntry::NestedGroup(map)) => assert_eq!(map.len(), 2),
            other => panic!("expected a nested group, got {:?}", other),
        }
    }

    #[test]
    fn test_child_named_key_keeps_group() {
        let value = yaml("key: true\nother: true\n");
        match FeatureEntry::classify("group", &value).unwrap() {
            Some(FeatureEntry::NestedGroup(map)) => assert_eq!(map.len(), 2),
            other => panic!("expected a nested group, got {:?}", other),
        }
    }

    #[test]
    fn test_child_named_enabled_for_keeps_group() {
        let value = yaml("enabled-for: false\nother: true\n");
        match FeatureEntry::classify("group", &value).unwrap() {
            Some(FeatureEntry::NestedGroup(map)) => assert_eq!(map.len(), 2),
            other => panic!("expected a nested group, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_null_filter_list_is_group() {
        let value = yaml("enabled-for: ~\nsub: true\n");
        assert!(matches!(
            FeatureEntry::classify("group", &value).unwrap(),
            Some(FeatureEntry::NestedGroup(_))
        ));
    }

    #[test]
    fn test_classify_string_is_malformed() {
        let value = Value::from("yes please");
        let err = FeatureEntry::classify("group.flag", &value).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedFeature { ref key, .. } if key == "group.flag"));
    }

    #[test]
    fn test_classify_sequence_is_malformed() {
        let value = yaml("- a\n- b\n");
        assert!(FeatureEntry::classify("list", &value).is_err());
    }

    #[test]
    fn test_classify_wrong_filter_entry_shape_is_malformed() {
        let value = yaml("enabled-for:\n  - 42\n");
        assert!(FeatureEntry::classify("beta", &value).is_err());
    }

    #[test]
    fn test_classify_bad_filter_index_is_malformed() {
        let value = yaml("enabled-for:\n  first:\n    name: A\n");
        assert!(FeatureEntry::classify("beta", &value).is_err());
    }

    #[test]
    fn test_parameter_lookup_prefers_exact_match() {
        let context = FeatureFilterEvaluationContext::new("F")
            .with_parameter("value", 1)
            .with_parameter("Value", 2);
        assert_eq!(context.parameter("Value").and_then(Value::as_i64), Some(2));
        assert!(context.parameter("missing").is_none());
    }

    #[test]
    fn test_null_name_and_parameters_default() {
        let value = yaml("name: ~\nparameters: ~\n");
        let context: FeatureFilterEvaluationContext = serde_yaml::from_value(value).unwrap();
        assert!(context.name.is_empty());
        assert!(context.parameters.is_empty());
    }
}
