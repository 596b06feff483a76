// SPDX-License-Identifier: MIT OR Apache-2.0

//! Percentage feature filter.

use crate::domain::FeatureFilterEvaluationContext;
use crate::ports::FeatureFilter;
use rand::Rng;
use serde_yaml::Value;

/// Enables a feature for roughly `Value` percent of evaluations.
///
/// Each evaluation draws a fresh number, so the result is not sticky per user.
///
/// # Examples
///
/// ```rust
/// use azconfig::adapters::filters::PercentageFilter;
/// use azconfig::domain::FeatureFilterEvaluationContext;
/// use azconfig::ports::FeatureFilter;
///
/// let all = FeatureFilterEvaluationContext::new(PercentageFilter::NAME).with_parameter("Value", 100);
/// let none = FeatureFilterEvaluationContext::new(PercentageFilter::NAME).with_parameter("Value", 0);
/// assert!(PercentageFilter.evaluate(&all));
/// assert!(!PercentageFilter.evaluate(&none));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentageFilter;

impl PercentageFilter {
    /// Registry name of this filter.
    pub const NAME: &'static str = "Microsoft.Percentage";

    /// Evaluates against a draw in `[0, 100)` instead of a random one.
    pub fn evaluate_with(&self, context: &FeatureFilterEvaluationContext, draw: f64) -> bool {
        match threshold(context) {
            Some(value) => draw < value,
            None => {
                tracing::warn!(
                    "Percentage filter '{}' needs a numeric Value parameter",
                    context.name
                );
                false
            }
        }
    }
}

impl FeatureFilter for PercentageFilter {
    fn evaluate(&self, context: &FeatureFilterEvaluationContext) -> bool {
        let draw = rand::rng().random_range(0.0..100.0);
        self.evaluate_with(context, draw)
    }
}

fn threshold(context: &FeatureFilterEvaluationContext) -> Option<f64> {
    let value = match context.parameter("Value")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(value: impl Into<Value>) -> FeatureFilterEvaluationContext {
        FeatureFilterEvaluationContext::new(PercentageFilter::NAME).with_parameter("Value", value)
    }

    #[test]
    fn test_draw_below_value_enables() {
        assert!(PercentageFilter.evaluate_with(&context(25), 24.9));
        assert!(!PercentageFilter.evaluate_with(&context(25), 25.0));
    }

    #[test]
    fn test_string_values_are_parsed() {
        assert!(PercentageFilter.evaluate_with(&context("50"), 10.0));
        assert!(PercentageFilter.evaluate_with(&context(" 12.5 "), 12.0));
    }

    #[test]
    fn test_missing_or_invalid_value_disables() {
        let missing = FeatureFilterEvaluationContext::new(PercentageFilter::NAME);
        assert!(!PercentageFilter.evaluate_with(&missing, 0.0));
        assert!(!PercentageFilter.evaluate_with(&context("half"), 0.0));
        assert!(!PercentageFilter.evaluate_with(&context(true), 0.0));
    }

    #[test]
    fn test_bounds_are_deterministic() {
        for _ in 0..100 {
            assert!(PercentageFilter.evaluate(&context(100)));
            assert!(!PercentageFilter.evaluate(&context(0)));
        }
    }
}
