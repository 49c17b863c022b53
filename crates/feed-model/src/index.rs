//! Lookup structure over the interaction log.
//!
//! The log is append-only and may hold several interactions per item. The
//! pipeline only needs a few questions answered per item, so they are
//! precomputed once here:
//! - the latest interaction (for presenting interaction state)
//! - whether any permanent exclusion exists
//! - whether the item was deferred with NOT_NOW

use crate::types::{ContentId, ContentInteraction, InteractionType};
use std::collections::{HashMap, HashSet};

/// Precomputed view of one user's interaction log.
#[derive(Debug, Default, Clone)]
pub struct InteractionIndex {
    latest: HashMap<ContentId, ContentInteraction>,
    excluded: HashSet<ContentId>,
    deferred: HashSet<ContentId>,
    /// Deferred ids in the order they first appear in the log
    deferred_order: Vec<ContentId>,
}

impl InteractionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from a log slice
    pub fn from_interactions(interactions: &[ContentInteraction]) -> Self {
        let mut index = Self::new();
        for interaction in interactions {
            index.insert(interaction);
        }
        index
    }

    /// Record one interaction.
    ///
    /// On equal timestamps the later insert wins, matching log order.
    pub fn insert(&mut self, interaction: &ContentInteraction) {
        let id = &interaction.content_id;

        if interaction.interaction_type.is_permanent_exclusion() {
            self.excluded.insert(id.clone());
        }

        if interaction.interaction_type == InteractionType::NotNow && self.deferred.insert(id.clone()) {
            self.deferred_order.push(id.clone());
        }

        self.latest
            .entry(id.clone())
            .and_modify(|existing| {
                if interaction.timestamp >= existing.timestamp {
                    *existing = interaction.clone();
                }
            })
            .or_insert_with(|| interaction.clone());
    }

    /// Most recent interaction for an item
    pub fn latest(&self, content_id: &str) -> Option<&ContentInteraction> {
        self.latest.get(content_id)
    }

    /// Item was watched, dismissed, saved or blocked at some point
    pub fn is_excluded(&self, content_id: &str) -> bool {
        self.excluded.contains(content_id)
    }

    /// Item was deferred with NOT_NOW at some point
    pub fn is_deferred(&self, content_id: &str) -> bool {
        self.deferred.contains(content_id)
    }

    /// Ids eligible for reinsertion: deferred and never permanently excluded
    pub fn reinsertable_ids(&self) -> impl Iterator<Item = &ContentId> {
        self.deferred_order
            .iter()
            .filter(|id| !self.excluded.contains(id.as_str()))
    }

    /// All deferred ids, in first-seen log order
    pub fn deferred_ids(&self) -> &[ContentId] {
        &self.deferred_order
    }

    /// Number of items with at least one interaction
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}
