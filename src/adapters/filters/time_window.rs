// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time window feature filter.

use crate::domain::FeatureFilterEvaluationContext;
use crate::ports::FeatureFilter;
use chrono::{DateTime, Utc};
use serde_yaml::Value;

/// Enables a feature between the `Start` and `End` parameters.
///
/// Both bounds are optional, but at least one must be set. Bounds are RFC 2822
/// (`Wed, 01 May 2019 13:59:59 GMT`) or RFC 3339 timestamps. The window
/// includes `Start` and excludes `End`.
///
/// # Examples
///
/// ```rust
/// use azconfig::adapters::filters::TimeWindowFilter;
/// use azconfig::domain::FeatureFilterEvaluationContext;
/// use chrono::{TimeZone, Utc};
///
/// let context = FeatureFilterEvaluationContext::new(TimeWindowFilter::NAME)
///     .with_parameter("Start", "Wed, 01 May 2019 00:00:00 GMT")
///     .with_parameter("End", "2019-06-01T00:00:00Z");
///
/// let inside = Utc.with_ymd_and_hms(2019, 5, 15, 12, 0, 0).unwrap();
/// let after = Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap();
/// assert!(TimeWindowFilter.evaluate_at(&context, inside));
/// assert!(!TimeWindowFilter.evaluate_at(&context, after));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeWindowFilter;

impl TimeWindowFilter {
    /// Registry name of this filter.
    pub const NAME: &'static str = "Microsoft.TimeWindow";

    /// Evaluates the window against `now`.
    pub fn evaluate_at(&self, context: &FeatureFilterEvaluationContext, now: DateTime<Utc>) -> bool {
        let (start, end) = match (bound(context, "Start"), bound(context, "End")) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(message), _) | (_, Err(message)) => {
                tracing::warn!("Time window filter '{}': {}", context.name, message);
                return false;
            }
        };

        if start.is_none() && end.is_none() {
            tracing::warn!(
                "Time window filter '{}' has neither a Start nor an End",
                context.name
            );
            return false;
        }

        start.map_or(true, |start| now >= start) && end.map_or(true, |end| now < end)
    }
}

impl FeatureFilter for TimeWindowFilter {
    fn evaluate(&self, context: &FeatureFilterEvaluationContext) -> bool {
        self.evaluate_at(context, Utc::now())
    }
}

fn bound(
    context: &FeatureFilterEvaluationContext,
    name: &str,
) -> std::result::Result<Option<DateTime<Utc>>, String> {
    match context.parameter(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_datetime(s)
            .map(Some)
            .ok_or_else(|| format!("{} '{}' is not an RFC 2822 or RFC 3339 timestamp", name, s)),
        Some(_) => Err(format!("{} must be a timestamp string", name)),
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
