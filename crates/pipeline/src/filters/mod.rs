//! Filter rule implementations.
//!
//! The set of rule kinds is closed: [`Rule`] wraps each of them, and the
//! FilterEngine only ever holds `Rule` values.

pub mod duration;
pub mod keyword;
pub mod source_type;

// Re-export for convenience
pub use duration::DurationRule;
pub use keyword::KeywordRule;
pub use source_type::SourceTypeRule;

use crate::traits::FilterRule;
use feed_model::ContentItem;

/// Any filter rule the engine can evaluate.
#[derive(Debug, Clone)]
pub enum Rule {
    Keyword(KeywordRule),
    Duration(DurationRule),
    SourceType(SourceTypeRule),
}

impl FilterRule for Rule {
    fn name(&self) -> &str {
        match self {
            Rule::Keyword(rule) => rule.name(),
            Rule::Duration(rule) => rule.name(),
            Rule::SourceType(rule) => rule.name(),
        }
    }

    fn matches(&self, item: &ContentItem) -> bool {
        match self {
            Rule::Keyword(rule) => rule.matches(item),
            Rule::Duration(rule) => rule.matches(item),
            Rule::SourceType(rule) => rule.matches(item),
        }
    }

    fn reason(&self) -> String {
        match self {
            Rule::Keyword(rule) => rule.reason(),
            Rule::Duration(rule) => rule.reason(),
            Rule::SourceType(rule) => rule.reason(),
        }
    }
}

impl From<KeywordRule> for Rule {
    fn from(rule: KeywordRule) -> Self {
        Rule::Keyword(rule)
    }
}

impl From<DurationRule> for Rule {
    fn from(rule: DurationRule) -> Self {
        Rule::Duration(rule)
    }
}

impl From<SourceTypeRule> for Rule {
    fn from(rule: SourceTypeRule) -> Self {
        Rule::SourceType(rule)
    }
}
