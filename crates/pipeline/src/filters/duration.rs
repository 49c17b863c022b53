//! Rule that hides content outside the user's preferred length.

use crate::traits::FilterRule;
use feed_model::ContentItem;

/// Filters items shorter than `min_secs` or longer than `max_secs`.
///
/// ## Algorithm
/// 1. Items without a duration cannot be judged and always pass
/// 2. Filter if duration < min (when set)
/// 3. Filter if duration > max (when set)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationRule {
    min_secs: Option<u32>,
    max_secs: Option<u32>,
}

impl DurationRule {
    /// Create a new DurationRule.
    ///
    /// # Arguments
    /// * `min_secs` - Shortest acceptable duration in seconds
    /// * `max_secs` - Longest acceptable duration in seconds
    pub fn new(min_secs: Option<u32>, max_secs: Option<u32>) -> Self {
        Self { min_secs, max_secs }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min_secs.is_none() && self.max_secs.is_none()
    }
}

fn minutes(secs: u32) -> String {
    match secs / 60 {
        1 => "1 minute".to_string(),
        n => format!("{} minutes", n),
    }
}

impl FilterRule for DurationRule {
    fn name(&self) -> &str {
        "DurationRule"
    }

    fn matches(&self, item: &ContentItem) -> bool {
        let Some(duration) = item.duration else {
            return false;
        };

        let too_short = self.min_secs.is_some_and(|min| duration < min);
        let too_long = self.max_secs.is_some_and(|max| duration > max);
        too_short || too_long
    }

    fn reason(&self) -> String {
        match (self.min_secs, self.max_secs) {
            (Some(min), Some(max)) => format!(
                "Duration outside {}-{} minutes",
                min / 60,
                max / 60
            ),
            (Some(min), None) => format!("Shorter than {}", minutes(min)),
            (None, Some(max)) => format!("Longer than {}", minutes(max)),
            (None, None) => "No duration limits".to_string(),
        }
    }
}
