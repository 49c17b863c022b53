//! # Feed Generator
//!
//! This module coordinates the entire feed pipeline:
//! 1. Remove content the user has already dealt with
//! 2. Apply optional rule-based filtering
//! 3. Split the rest into recent and backlog by publish date
//! 4. Mix both pools at the preferred backlog ratio
//! 5. Spread sources out so none dominates a stretch of the feed
//! 6. Reinsert a bounded number of deferred ("not now") items that still
//!    pass the rule stage
//! 7. Project everything into FeedItems
//!
//! Every stage produces a new collection; the caller's inputs are only read.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use feed_model::{
    ContentInteraction, ContentItem, ContentSource, FeedItem, FeedPreferences, InteractionIndex,
    SourceKey, Snapshot,
};
use pipeline::{FilterEngine, diversity, mixer};

/// Display name used when an item's source is not in the source list
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// Deferred items may make up at most 1/5 of the feed they are inserted into
const DEFERRED_SHARE_DIVISOR: usize = 5;

/// Runs the feed pipeline.
///
/// The generator holds no per-request state and can be shared between
/// threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct FeedGenerator {
    filter_engine: Option<FilterEngine>,
    skip_muted_sources: bool,
}

impl FeedGenerator {
    /// Generator running only the core stages
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `engine` on the unseen items before they are split and mixed
    pub fn with_filter_engine(mut self, engine: FilterEngine) -> Self {
        self.filter_engine = Some(engine);
        self
    }

    /// Drop items whose source is marked muted
    pub fn skip_muted_sources(mut self) -> Self {
        self.skip_muted_sources = true;
        self
    }

    /// Generate a feed using the thread RNG and the current time.
    pub fn generate(
        &self,
        sources: &[ContentSource],
        all_content: &[ContentItem],
        preferences: &FeedPreferences,
        interactions: &[ContentInteraction],
    ) -> Vec<FeedItem> {
        self.generate_with(
            sources,
            all_content,
            preferences,
            interactions,
            Utc::now(),
            &mut rand::rng(),
        )
    }

    /// Generate a feed with an explicit clock and random source.
    ///
    /// `preferences` must already be validated.
    pub fn generate_with<R>(
        &self,
        sources: &[ContentSource],
        all_content: &[ContentItem],
        preferences: &FeedPreferences,
        interactions: &[ContentInteraction],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<FeedItem>
    where
        R: Rng + ?Sized,
    {
        let start_time = Instant::now();
        let index = InteractionIndex::from_interactions(interactions);

        let unseen = self.remove_seen(all_content, &index);
        debug!(
            "Seen filter: {} of {} items remain",
            unseen.len(),
            all_content.len()
        );

        let eligible = self.apply_rules(unseen, sources);

        let (recent, backlog) = split_by_age(eligible, now);
        debug!(
            "Age split: {} recent, {} backlog",
            recent.len(),
            backlog.len()
        );

        let mixed = mixer::mix(&recent, &backlog, preferences.backlog_ratio, rng);
        let diverse = diversity::enforce(mixed, preferences.max_consecutive_from_source);

        let deferred = self.apply_rules(collect_deferred(all_content, &index), sources);
        let before_reinsert = diverse.len();
        let combined = reinsert_deferred(diverse, deferred, rng);
        debug!(
            "Reinserted {} deferred items",
            combined.len() - before_reinsert
        );

        let feed = project(combined, sources, now);

        info!(
            "Generated feed of {} items from {} candidates in {:.2?}",
            feed.len(),
            all_content.len(),
            start_time.elapsed()
        );
        feed
    }

    /// Validate preferences, then generate a feed from a loaded snapshot.
    pub fn generate_for_snapshot(
        &self,
        snapshot: &Snapshot,
        preferences: &FeedPreferences,
    ) -> Result<Vec<FeedItem>> {
        preferences
            .validate()
            .context("Refusing to generate feed with invalid preferences")?;

        Ok(self.generate(
            &snapshot.sources,
            &snapshot.content,
            preferences,
            &snapshot.interactions,
        ))
    }

    /// Drop permanently excluded items, and hold deferred ones back for reinsertion
    fn remove_seen(&self, all_content: &[ContentItem], index: &InteractionIndex) -> Vec<ContentItem> {
        all_content
            .iter()
            .filter(|item| !index.is_excluded(&item.id) && !index.is_deferred(&item.id))
            .cloned()
            .collect()
    }

    /// Optional stage: preference rules and muted sources.
    ///
    /// Runs on the primary candidates and again on the deferred ones.
    fn apply_rules(&self, items: Vec<ContentItem>, sources: &[ContentSource]) -> Vec<ContentItem> {
        let items = match &self.filter_engine {
            Some(engine) => engine.evaluate_batch(items),
            None => items,
        };

        if !self.skip_muted_sources {
            return items;
        }

        let muted: HashSet<SourceKey> = sources
            .iter()
            .filter(|source| source.is_muted)
            .map(ContentSource::key)
            .collect();
        if muted.is_empty() {
            return items;
        }

        let before = items.len();
        let kept: Vec<ContentItem> = items
            .into_iter()
            .filter(|item| !muted.contains(&item.source_key()))
            .collect();
        debug!("Muted sources removed {} items", before - kept.len());
        kept
    }
}

/// Partition into (recent, backlog) relative to `now`
fn split_by_age(items: Vec<ContentItem>, now: DateTime<Utc>) -> (Vec<ContentItem>, Vec<ContentItem>) {
    items.into_iter().partition(|item| item.is_recent(now))
}

/// Deferred items that were never permanently excluded, in catalog order
fn collect_deferred(all_content: &[ContentItem], index: &InteractionIndex) -> Vec<ContentItem> {
    let reinsertable: HashSet<&str> = index.reinsertable_ids().map(String::as_str).collect();
    if reinsertable.is_empty() {
        return Vec::new();
    }

    all_content
        .iter()
        .filter(|item| reinsertable.contains(item.id.as_str()))
        .cloned()
        .collect()
}

/// Insert a bounded, random subset of deferred items at random positions.
///
/// ## Algorithm
/// 1. Cap = floor(20% of the current feed length)
/// 2. Shuffle the candidates and keep the first `cap`
/// 3. Insert them one at a time, each at a uniform position in
///    `[0, current_len]` of the list as it grows
pub fn reinsert_deferred<R>(
    feed: Vec<ContentItem>,
    deferred: Vec<ContentItem>,
    rng: &mut R,
) -> Vec<ContentItem>
where
    R: Rng + ?Sized,
{
    let cap = feed.len() / DEFERRED_SHARE_DIVISOR;
    if cap == 0 || deferred.is_empty() {
        return feed;
    }

    let mut candidates = deferred;
    candidates.shuffle(rng);
    candidates.truncate(cap);

    let mut result = feed;
    result.reserve(candidates.len());
    for item in candidates {
        let position = rng.random_range(0..=result.len());
        result.insert(position, item);
    }
    result
}

/// Turn ordered content into FeedItems.
///
/// Positions are the final indices. Interaction state is left unset for
/// callers to resolve.
pub fn project(items: Vec<ContentItem>, sources: &[ContentSource], now: DateTime<Utc>) -> Vec<FeedItem> {
    let names: HashMap<SourceKey, &str> = sources
        .iter()
        .map(|source| (source.key(), source.display_name.as_str()))
        .collect();

    items
        .into_iter()
        .enumerate()
        .map(|(position, content)| {
            let source_display_name = names
                .get(&content.source_key())
                .copied()
                .unwrap_or(UNKNOWN_SOURCE)
                .to_string();
            FeedItem {
                is_new: content.is_recent(now),
                position,
                source_display_name,
                interaction_state: None,
                is_recommended: false,
                content,
            }
        })
        .collect()
}
