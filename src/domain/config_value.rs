// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value type with type-safe conversions.
//!
//! Remote stores and flat property sources hand out plain strings. This module
//! wraps them and provides conversions to Rust types and back into YAML
//! scalars for feature ingestion.

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A type-safe wrapper for configuration values.
///
/// # Examples
///
/// ```
/// use azconfig::domain::config_value::ConfigValue;
///
/// let value = ConfigValue::new("42".to_string());
/// assert_eq!(value.as_str(), "42");
/// assert_eq!(value.as_i64("test.key").unwrap(), 42);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue(String);

impl ConfigValue {
    /// Creates a new `ConfigValue` from a `String`.
    pub fn new(value: String) -> Self {
        ConfigValue(value)
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the value to a boolean.
    ///
    /// Recognizes the following values (case-insensitive):
    /// - `true`: "true", "yes", "1", "on"
    /// - `false`: "false", "no", "0", "off"
    ///
    /// # Examples
    ///
    /// ```
    /// use azconfig::domain::config_value::ConfigValue;
    ///
    /// assert!(ConfigValue::from("on").as_bool("test.key").unwrap());
    /// assert!(!ConfigValue::from("No").as_bool("test.key").unwrap());
    /// ```
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self.0.to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => self
                .0
                .parse::<bool>()
                .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
        }
    }

    /// Converts the value to an `i64`.
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        self.0
            .parse::<i64>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to an `f64`.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        self.0
            .parse::<f64>()
            .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e))
    }

    /// Parses the value into any type that implements `FromStr`.
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.0
            .parse::<T>()
            .map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }

    /// Converts the string into the YAML scalar it most likely came from.
    ///
    /// Only the literal words `true` and `false` (any case) become booleans, so
    /// a percentage of `"1"` stays a number. Integral strings become numbers;
    /// everything else stays a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use azconfig::domain::config_value::ConfigValue;
    /// use serde_yaml::Value;
    ///
    /// assert_eq!(ConfigValue::from("TRUE").to_yaml_scalar(), Value::Bool(true));
    /// assert_eq!(ConfigValue::from("50").to_yaml_scalar(), Value::from(50i64));
    /// assert_eq!(ConfigValue::from("on").to_yaml_scalar(), Value::from("on"));
    /// ```
    pub fn to_yaml_scalar(&self) -> serde_yaml::Value {
        let trimmed = self.0.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            serde_yaml::Value::Bool(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            serde_yaml::Value::Bool(false)
        } else if let Ok(n) = trimmed.parse::<i64>() {
            serde_yaml::Value::from(n)
        } else {
            serde_yaml::Value::String(self.0.clone())
        }
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue(s.to_string())
    }
}

impl From<ConfigValue> for String {
    fn from(value: ConfigValue) -> Self {
        value.0
    }
}

impl AsRef<str> for ConfigValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
