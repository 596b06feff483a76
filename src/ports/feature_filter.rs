// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature filter trait definition.

use crate::domain::FeatureFilterEvaluationContext;

/// A named, pluggable predicate deciding whether a feature is on.
///
/// The filter receives the entry from the feature's `enabled-for` list,
/// including its parameters. Closures with the matching signature are filters.
///
/// # Examples
///
/// ```rust
/// use azconfig::domain::FeatureFilterEvaluationContext;
/// use azconfig::ports::FeatureFilter;
///
/// struct Always;
///
/// impl FeatureFilter for Always {
///     fn evaluate(&self, _context: &FeatureFilterEvaluationContext) -> bool {
///         true
///     }
/// }
///
/// let context = FeatureFilterEvaluationContext::new("Always");
/// assert!(Always.evaluate(&context));
///
/// let never = |_: &FeatureFilterEvaluationContext| false;
/// assert!(!never.evaluate(&context));
/// ```
pub trait FeatureFilter: Send + Sync {
    /// Returns `true` if the feature should be enabled for this filter entry.
    fn evaluate(&self, context: &FeatureFilterEvaluationContext) -> bool;
}

impl<F> FeatureFilter for F
where
    F: Fn(&FeatureFilterEvaluationContext) -> bool + Send + Sync,
{
    fn evaluate(&self, context: &FeatureFilterEvaluationContext) -> bool {
        self(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_reads_parameters() {
        let filter = |context: &FeatureFilterEvaluationContext| {
            context
                .parameter("Enabled")
                .and_then(serde_yaml::Value::as_bool)
                .unwrap_or(false)
        };
        let on = FeatureFilterEvaluationContext::new("Param").with_parameter("Enabled", true);
        let off = FeatureFilterEvaluationContext::new("Param");
        assert!(filter.evaluate(&on));
        assert!(!filter.evaluate(&off));
    }

    #[test]
    fn test_feature_filter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn FeatureFilter>();
    }
}
