//! Rule that hides content mentioning a muted keyword.
//!
//! The keyword is searched in the title and description together. Plain
//! keywords match whole words only, so muting "war" hides "War in Ukraine"
//! but keeps "Star Wars Review". Wildcard keywords (containing `*`) match
//! anywhere as a substring once the `*` characters are stripped.

use crate::traits::FilterRule;
use feed_model::{ContentItem, KeywordFilter};
use regex::{Regex, RegexBuilder};

#[derive(Debug, Clone)]
enum Matcher {
    WholeWord(Regex),
    Substring(String),
}

/// Filters items whose title or description contains a keyword.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    keyword: String,
    case_sensitive: bool,
    matcher: Matcher,
}

impl KeywordRule {
    /// Create a new KeywordRule.
    ///
    /// # Arguments
    /// * `keyword` - The keyword as the user typed it (kept verbatim for reasons)
    /// * `wildcard` - Match as a substring after stripping `*`
    /// * `case_sensitive` - Compare case-sensitively (usually false)
    ///
    /// # Returns
    /// * `Err` - If the whole-word pattern cannot be compiled
    pub fn new(
        keyword: impl Into<String>,
        wildcard: bool,
        case_sensitive: bool,
    ) -> Result<Self, regex::Error> {
        let keyword = keyword.into();

        let matcher = if wildcard {
            let stripped = keyword.replace('*', "");
            if case_sensitive {
                Matcher::Substring(stripped)
            } else {
                Matcher::Substring(stripped.to_lowercase())
            }
        } else {
            let pattern = format!(r"\b{}\b", regex::escape(&keyword));
            Matcher::WholeWord(
                RegexBuilder::new(&pattern)
                    .case_insensitive(!case_sensitive)
                    .build()?,
            )
        };

        Ok(Self {
            keyword,
            case_sensitive,
            matcher,
        })
    }

    /// Case-insensitive whole-word rule
    pub fn whole_word(keyword: impl Into<String>) -> Result<Self, regex::Error> {
        Self::new(keyword, false, false)
    }

    pub fn from_filter(filter: &KeywordFilter) -> Result<Self, regex::Error> {
        Self::new(filter.keyword.clone(), filter.wildcard, filter.case_sensitive)
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    fn search_text(item: &ContentItem) -> String {
        format!(
            "{} {}",
            item.title,
            item.description.as_deref().unwrap_or("")
        )
    }
}

impl FilterRule for KeywordRule {
    fn name(&self) -> &str {
        "KeywordRule"
    }

    fn matches(&self, item: &ContentItem) -> bool {
        let text = Self::search_text(item);
        match &self.matcher {
            Matcher::WholeWord(regex) => regex.is_match(&text),
            // "*" alone would match everything
            Matcher::Substring(needle) if needle.is_empty() => false,
            Matcher::Substring(needle) if self.case_sensitive => text.contains(needle.as_str()),
            Matcher::Substring(needle) => text.to_lowercase().contains(needle.as_str()),
        }
    }

    fn reason(&self) -> String {
        format!("Contains keyword \"{}\"", self.keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use feed_model::SourceType;

    fn item(title: &str) -> ContentItem {
        ContentItem::new("c1", title, "UC1", SourceType::Youtube, Utc::now())
    }

    #[test]
    fn test_whole_word_boundary() {
        let rule = KeywordRule::whole_word("war").unwrap();

        assert!(rule.matches(&item("War in Ukraine")));
        assert!(rule.matches(&item("Updates on the war, day 3")));
        assert!(!rule.matches(&item("Star Wars Review")));
        assert!(!rule.matches(&item("Software engineering")));
    }

    #[test]
    fn test_description_is_searched() {
        let rule = KeywordRule::whole_word("crypto").unwrap();
        let with_description = item("Weekly roundup").with_description("Crypto markets fall");

        assert!(rule.matches(&with_description));
        assert!(!rule.matches(&item("Weekly roundup")));
    }

    #[test]
    fn test_title_and_description_do_not_merge_words() {
        let rule = KeywordRule::whole_word("endstart").unwrap();
        let split = item("the end").with_description("start here");
        assert!(!rule.matches(&split));
    }

    #[test]
    fn test_wildcard_substring() {
        let rule = KeywordRule::new("*war*", true, false).unwrap();

        assert!(rule.matches(&item("Star Wars Review")));
        assert!(rule.matches(&item("Software tips")));
        assert!(!rule.matches(&item("Cooking pasta")));
    }

    #[test]
    fn test_wildcard_of_only_stars_never_matches() {
        let rule = KeywordRule::new("**", true, false).unwrap();
        assert!(!rule.matches(&item("Anything at all")));
    }

    #[test]
    fn test_case_sensitivity() {
        let sensitive = KeywordRule::new("Rust", false, true).unwrap();
        assert!(sensitive.matches(&item("Learning Rust today")));
        assert!(!sensitive.matches(&item("Removing rust from bikes")));

        let sensitive_wildcard = KeywordRule::new("Rust*", true, true).unwrap();
        assert!(sensitive_wildcard.matches(&item("Rustaceans unite")));
        assert!(!sensitive_wildcard.matches(&item("rustaceans unite")));

        let insensitive = KeywordRule::whole_word("RUST").unwrap();
        assert!(insensitive.matches(&item("removing rust from bikes")));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let rule = KeywordRule::whole_word("a.b").unwrap();
        assert!(rule.matches(&item("about a.b testing")));
        assert!(!rule.matches(&item("about axb testing")));
    }

    #[test]
    fn test_reason_keeps_original_keyword() {
        let rule = KeywordRule::new("*Elect*", true, false).unwrap();
        assert_eq!(rule.reason(), "Contains keyword \"*Elect*\"");
        assert_eq!(rule.keyword(), "*Elect*");
    }
}
