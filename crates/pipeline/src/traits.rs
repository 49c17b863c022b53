//! Core trait for filter rules.
//!
//! A rule answers one question about one content item: should it be kept
//! out of the feed? The FilterEngine combines rules with logical OR.

use feed_model::ContentItem;

/// Capability shared by every filter rule.
///
/// ## Design Note
/// - `Send + Sync` lets a FilterEngine be shared across request threads
/// - Rules are immutable once built; matching never has side effects
pub trait FilterRule: Send + Sync {
    /// Short name of the rule kind (for logging/debugging)
    fn name(&self) -> &str;

    /// Returns true if the item should be filtered out
    fn matches(&self, item: &ContentItem) -> bool;

    /// Human-readable explanation shown when the rule matches
    fn reason(&self) -> String;
}
