//! The FilterEngine evaluates content against a fixed set of rules.
//!
//! An item is filtered out as soon as any rule matches. The engine is built
//! once with the builder pattern and then only read.

use crate::filters::{DurationRule, KeywordRule, Rule, SourceTypeRule};
use crate::traits::FilterRule;
use feed_model::{ContentItem, FeedPreferences};

/// Outcome of evaluating one item.
#[derive(Debug, Clone)]
pub struct FilterResult<'a> {
    pub is_filtered: bool,
    /// Every rule that matched, in engine order
    pub matched_rules: Vec<&'a Rule>,
    /// One reason per matched rule
    pub reasons: Vec<String>,
}

/// Combines rules with logical OR.
///
/// ## Usage
/// ```ignore
/// let engine = FilterEngine::new()
///     .add_rule(KeywordRule::whole_word("politics")?)
///     .add_rule(DurationRule::new(Some(60), Some(3600)));
///
/// let visible = engine.evaluate_batch(items);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    rules: Vec<Rule>,
}

impl FilterEngine {
    /// Create a new engine with no rules (nothing is filtered).
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule to the engine (builder pattern).
    pub fn add_rule(mut self, rule: impl Into<Rule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Build the rules implied by a user's preferences.
    ///
    /// ## Algorithm
    /// 1. One DurationRule if either duration bound is set
    /// 2. One KeywordRule per muted keyword
    /// 3. One SourceTypeRule if an allow-list is set
    ///
    /// # Returns
    /// * `Err` - If a keyword pattern cannot be compiled
    pub fn from_preferences(preferences: &FeedPreferences) -> Result<Self, regex::Error> {
        let mut engine = Self::new();

        let duration = DurationRule::new(preferences.min_duration_secs, preferences.max_duration_secs);
        if !duration.is_unbounded() {
            engine = engine.add_rule(duration);
        }

        for filter in &preferences.muted_keywords {
            engine = engine.add_rule(KeywordRule::from_filter(filter)?);
        }

        if let Some(allowed) = &preferences.allowed_source_types {
            engine = engine.add_rule(SourceTypeRule::new(allowed.iter().copied()));
        }

        Ok(engine)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule against one item.
    pub fn evaluate(&self, item: &ContentItem) -> FilterResult<'_> {
        let matched_rules: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(item))
            .collect();
        let reasons: Vec<String> = matched_rules.iter().map(|rule| rule.reason()).collect();

        FilterResult {
            is_filtered: !matched_rules.is_empty(),
            matched_rules,
            reasons,
        }
    }

    /// Keep only the items no rule matches, preserving their order.
    pub fn evaluate_batch(&self, items: Vec<ContentItem>) -> Vec<ContentItem> {
        let input_count = items.len();
        let kept: Vec<ContentItem> = items
            .into_iter()
            .filter(|item| !self.evaluate(item).is_filtered)
            .collect();

        tracing::debug!(
            "FilterEngine: {} rules, {} items in, {} items out",
            self.rules.len(),
            input_count,
            kept.len()
        );
        kept
    }
}
