//! Rule that keeps only content from allowed platforms.

use crate::traits::FilterRule;
use feed_model::{ContentItem, SourceType};
use std::collections::BTreeSet;

/// Filters items whose source type is not in the allow-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTypeRule {
    allowed: BTreeSet<SourceType>,
}

impl SourceTypeRule {
    pub fn new(allowed: impl IntoIterator<Item = SourceType>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn allows(&self, source_type: SourceType) -> bool {
        self.allowed.contains(&source_type)
    }
}

impl FilterRule for SourceTypeRule {
    fn name(&self) -> &str {
        "SourceTypeRule"
    }

    fn matches(&self, item: &ContentItem) -> bool {
        !self.allows(item.source_type)
    }

    fn reason(&self) -> String {
        let allowed: Vec<&str> = self.allowed.iter().map(SourceType::as_str).collect();
        format!("Source type not in allowed set [{}]", allowed.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_allow_list() {
        let rule = SourceTypeRule::new([SourceType::Youtube, SourceType::Podcast]);
        let now = Utc::now();

        let video = ContentItem::new("c1", "Video", "UC1", SourceType::Youtube, now);
        let post = ContentItem::new("c2", "Post", "blog", SourceType::Rss, now);
        let episode = ContentItem::new("c3", "Episode", "show", SourceType::Podcast, now);

        assert!(!rule.matches(&video));
        assert!(rule.matches(&post));
        assert!(!rule.matches(&episode));
    }

    #[test]
    fn test_reason_lists_allowed_types() {
        let rule = SourceTypeRule::new([SourceType::Rss, SourceType::Youtube]);
        assert_eq!(rule.reason(), "Source type not in allowed set [YOUTUBE, RSS]");
    }
}
