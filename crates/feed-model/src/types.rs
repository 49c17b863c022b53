//! Core domain types for feed generation.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Content items and the sources they come from
//! - The append-only interaction log
//! - Per-user feed preferences
//! - The FeedItem projection handed back to callers

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::error::{FeedError, Result};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a content item
pub type ContentId = String;

/// Identifier of a source within its source type (channel id, feed url, ...)
pub type SourceId = String;

/// Content published within this many days counts as recent (and "new").
pub const RECENT_WINDOW_DAYS: i64 = 7;

// =============================================================================
// Sources
// =============================================================================

/// Platform a source lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    Youtube,
    Spotify,
    Rss,
    Podcast,
}

impl SourceType {
    pub const ALL: [SourceType; 4] = [
        SourceType::Youtube,
        SourceType::Spotify,
        SourceType::Rss,
        SourceType::Podcast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Youtube => "YOUTUBE",
            SourceType::Spotify => "SPOTIFY",
            SourceType::Rss => "RSS",
            SourceType::Podcast => "PODCAST",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "YOUTUBE" => Ok(SourceType::Youtube),
            "SPOTIFY" => Ok(SourceType::Spotify),
            "RSS" => Ok(SourceType::Rss),
            "PODCAST" => Ok(SourceType::Podcast),
            _ => Err(FeedError::invalid_config(
                "source_type",
                format!(
                    "unknown source type '{}', expected one of {}",
                    s,
                    SourceType::ALL.map(|t| t.as_str()).join(", ")
                ),
            )),
        }
    }
}

/// Natural key of a source: the id is only unique within its type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceKey {
    pub source_id: SourceId,
    pub source_type: SourceType,
}

/// A subscribed channel or feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSource {
    pub source_id: SourceId,
    pub source_type: SourceType,
    pub display_name: String,
    #[serde(default)]
    pub is_muted: bool,
}

impl ContentSource {
    pub fn key(&self) -> SourceKey {
        SourceKey {
            source_id: self.source_id.clone(),
            source_type: self.source_type,
        }
    }

    /// True if `item` was published by this source
    pub fn owns(&self, item: &ContentItem) -> bool {
        self.source_id == item.source_id && self.source_type == item.source_type
    }
}

// =============================================================================
// Content
// =============================================================================

/// A single piece of content fetched from a source.
///
/// The core treats items as immutable; `last_seen_in_feed` is bookkeeping
/// owned by the ingestion side and is only carried through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    /// Id of the item on its platform; `(source_type, original_id)` is unique
    pub original_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub url: String,
    /// Length in seconds, if the platform reports one
    #[serde(default)]
    pub duration: Option<u32>,
    pub published_at: DateTime<Utc>,
    pub source_id: SourceId,
    pub source_type: SourceType,
    #[serde(default)]
    pub last_seen_in_feed: Option<DateTime<Utc>>,
}

impl ContentItem {
    /// Minimal item; `original_id` defaults to `id` and the url is derived from it.
    pub fn new(
        id: impl Into<ContentId>,
        title: impl Into<String>,
        source_id: impl Into<SourceId>,
        source_type: SourceType,
        published_at: DateTime<Utc>,
    ) -> Self {
        let id = id.into();
        Self {
            original_id: id.clone(),
            url: format!("https://content.invalid/{}", id),
            id,
            title: title.into(),
            description: None,
            thumbnail_url: None,
            duration: None,
            published_at,
            source_id: source_id.into(),
            source_type,
            last_seen_in_feed: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn source_key(&self) -> SourceKey {
        SourceKey {
            source_id: self.source_id.clone(),
            source_type: self.source_type,
        }
    }

    /// Both items come from the same `(source_id, source_type)` pair
    pub fn same_source(&self, other: &ContentItem) -> bool {
        self.source_id == other.source_id && self.source_type == other.source_type
    }

    /// Published within the recent window relative to `now`.
    ///
    /// Items dated in the future count as recent.
    pub fn is_recent(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.published_at) <= Duration::days(RECENT_WINDOW_DAYS)
    }
}

// =============================================================================
// Interactions
// =============================================================================

/// Kind of signal a user left on a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionType {
    Watched,
    Dismissed,
    Saved,
    Blocked,
    NotNow,
}

impl InteractionType {
    /// Signals that remove an item from every future feed
    pub fn is_permanent_exclusion(&self) -> bool {
        !matches!(self, InteractionType::NotNow)
    }
}

/// One entry of the append-only interaction log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentInteraction {
    pub content_id: ContentId,
    pub interaction_type: InteractionType,
    pub timestamp: DateTime<Utc>,
    /// Collection a saved item was filed into
    #[serde(default)]
    pub collection: Option<String>,
}

impl ContentInteraction {
    pub fn new(
        content_id: impl Into<ContentId>,
        interaction_type: InteractionType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            content_id: content_id.into(),
            interaction_type,
            timestamp,
            collection: None,
        }
    }
}

// =============================================================================
// Preferences
// =============================================================================

/// A keyword the user never wants to see
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordFilter {
    pub keyword: String,
    /// `*` in the keyword means "match as a substring anywhere"
    #[serde(default)]
    pub wildcard: bool,
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Per-user knobs for feed generation.
///
/// Values are validated by the caller through [`FeedPreferences::validate`]
/// before any pipeline stage sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPreferences {
    /// Target fraction of the feed drawn from the backlog, in [0, 1]
    #[serde(default = "default_backlog_ratio")]
    pub backlog_ratio: f64,
    #[serde(default = "default_max_consecutive")]
    pub max_consecutive_from_source: NonZeroUsize,
    #[serde(default)]
    pub min_duration_secs: Option<u32>,
    #[serde(default)]
    pub max_duration_secs: Option<u32>,
    #[serde(default)]
    pub muted_keywords: Vec<KeywordFilter>,
    /// `None` allows every source type
    #[serde(default)]
    pub allowed_source_types: Option<Vec<SourceType>>,
}

fn default_backlog_ratio() -> f64 {
    0.3
}

fn default_max_consecutive() -> NonZeroUsize {
    NonZeroUsize::MIN.saturating_add(1)
}

impl Default for FeedPreferences {
    fn default() -> Self {
        Self {
            backlog_ratio: default_backlog_ratio(),
            max_consecutive_from_source: default_max_consecutive(),
            min_duration_secs: None,
            max_duration_secs: None,
            muted_keywords: Vec::new(),
            allowed_source_types: None,
        }
    }
}

impl FeedPreferences {
    /// Reject values the pipeline stages assume never happen.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.backlog_ratio) {
            return Err(FeedError::invalid_config(
                "backlog_ratio",
                format!("{} is outside [0, 1]", self.backlog_ratio),
            ));
        }

        if let (Some(min), Some(max)) = (self.min_duration_secs, self.max_duration_secs) {
            if min > max {
                return Err(FeedError::invalid_config(
                    "min_duration_secs",
                    format!("minimum {}s exceeds maximum {}s", min, max),
                ));
            }
        }

        if let Some(empty) = self.muted_keywords.iter().find(|k| k.keyword.trim().is_empty()) {
            return Err(FeedError::invalid_config(
                "muted_keywords",
                format!("blank keyword '{}'", empty.keyword),
            ));
        }

        if matches!(&self.allowed_source_types, Some(types) if types.is_empty()) {
            return Err(FeedError::invalid_config(
                "allowed_source_types",
                "allow-list is empty, nothing could ever be shown",
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Feed projection
// =============================================================================

/// How the user last interacted with an item, as shown next to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionState {
    NeverSeen,
    DismissedTemp { will_return_at: DateTime<Utc> },
    Saved { collection: Option<String> },
    Watched { at: DateTime<Utc> },
}

/// A content item placed in a generated feed
#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    pub content: ContentItem,
    /// Zero-based index into the feed
    pub position: usize,
    pub is_new: bool,
    pub source_display_name: String,
    /// Filled in by callers that classify interactions; `None` from the generator
    pub interaction_state: Option<InteractionState>,
    pub is_recommended: bool,
}
