//! Classify a user's interactions into the state shown next to a feed item.
//!
//! The generator leaves `interaction_state` empty; presentation code that
//! has the interaction log fills it in here.

use chrono::Duration;
use feed_model::{ContentInteraction, FeedItem, InteractionIndex, InteractionState, InteractionType};

/// How long a NOT_NOW dismissal keeps an item away
pub const NOT_NOW_COOLDOWN_DAYS: i64 = 1;

/// Map the latest interaction for an item to its display state.
///
/// DISMISSED and BLOCKED items never reach a feed, so they map to
/// `NeverSeen` like items without any interaction.
pub fn create_interaction_state(interaction: Option<&ContentInteraction>) -> InteractionState {
    let Some(interaction) = interaction else {
        return InteractionState::NeverSeen;
    };

    match interaction.interaction_type {
        InteractionType::Watched => InteractionState::Watched {
            at: interaction.timestamp,
        },
        InteractionType::Saved => InteractionState::Saved {
            collection: interaction.collection.clone(),
        },
        InteractionType::NotNow => InteractionState::DismissedTemp {
            will_return_at: interaction.timestamp + Duration::days(NOT_NOW_COOLDOWN_DAYS),
        },
        InteractionType::Dismissed | InteractionType::Blocked => InteractionState::NeverSeen,
    }
}

/// Fill in `interaction_state` for every item from its latest interaction.
pub fn resolve_interaction_states(feed: &mut [FeedItem], index: &InteractionIndex) {
    for entry in feed.iter_mut() {
        entry.interaction_state = Some(create_interaction_state(index.latest(&entry.content.id)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::project;
    use chrono::{TimeZone, Utc};
    use feed_model::{ContentItem, SourceType};

    fn at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 18, 30, 0).unwrap()
    }

    #[test]
    fn test_no_interaction() {
        assert_eq!(create_interaction_state(None), InteractionState::NeverSeen);
    }

    #[test]
    fn test_each_interaction_type() {
        let watched = ContentInteraction::new("c1", InteractionType::Watched, at());
        assert_eq!(
            create_interaction_state(Some(&watched)),
            InteractionState::Watched { at: at() }
        );

        let mut saved = ContentInteraction::new("c1", InteractionType::Saved, at());
        saved.collection = Some("Watch later".to_string());
        assert_eq!(
            create_interaction_state(Some(&saved)),
            InteractionState::Saved {
                collection: Some("Watch later".to_string())
            }
        );

        let not_now = ContentInteraction::new("c1", InteractionType::NotNow, at());
        assert_eq!(
            create_interaction_state(Some(&not_now)),
            InteractionState::DismissedTemp {
                will_return_at: Utc.with_ymd_and_hms(2024, 3, 11, 18, 30, 0).unwrap()
            }
        );

        for kind in [InteractionType::Dismissed, InteractionType::Blocked] {
            let interaction = ContentInteraction::new("c1", kind, at());
            assert_eq!(
                create_interaction_state(Some(&interaction)),
                InteractionState::NeverSeen
            );
        }
    }

    #[test]
    fn test_resolve_uses_latest_interaction() {
        let items = vec![
            ContentItem::new("c1", "One", "s1", SourceType::Rss, at()),
            ContentItem::new("c2", "Two", "s1", SourceType::Rss, at()),
        ];
        let mut feed = project(items, &[], at());

        let log = vec![
            ContentInteraction::new("c1", InteractionType::Watched, at()),
            ContentInteraction::new("c1", InteractionType::NotNow, at() + Duration::hours(1)),
        ];
        resolve_interaction_states(&mut feed, &InteractionIndex::from_interactions(&log));

        assert_eq!(
            feed[0].interaction_state,
            Some(InteractionState::DismissedTemp {
                will_return_at: at() + Duration::hours(25)
            })
        );
        assert_eq!(feed[1].interaction_state, Some(InteractionState::NeverSeen));
    }
}
