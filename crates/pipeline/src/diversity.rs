//! Diversity enforcer: avoid long runs from a single source.
//!
//! Reorders a feed so that no more than `max_consecutive` items in a row
//! come from the same `(source_id, source_type)`, moving items as little as
//! possible. When the queue holds nothing but the repeated source, the run
//! is allowed to continue.

use feed_model::ContentItem;
use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Reorder `items` so runs from one source stay within `max_consecutive`.
///
/// ## Algorithm
/// Greedy single pass over a queue of unplaced items:
/// 1. Look at the last `max_consecutive` placed items
/// 2. If that window is full and from one source, place the first queued
///    item from a different source next
/// 3. If no such item exists, or the window is mixed, place the queue head
///
/// The output holds exactly the input items.
pub fn enforce(items: Vec<ContentItem>, max_consecutive: NonZeroUsize) -> Vec<ContentItem> {
    let window = max_consecutive.get();
    let mut queue: VecDeque<ContentItem> = items.into();
    let mut result: Vec<ContentItem> = Vec::with_capacity(queue.len());
    let mut moved = 0usize;
    let mut tolerated = 0usize;

    while !queue.is_empty() {
        let next_index = match saturated_window(&result, window) {
            Some(last) => match queue.iter().position(|item| !item.same_source(last)) {
                Some(index) => {
                    if index > 0 {
                        moved += 1;
                    }
                    index
                }
                None => {
                    tolerated += 1;
                    0
                }
            },
            None => 0,
        };

        if let Some(item) = queue.remove(next_index) {
            result.push(item);
        }
    }

    tracing::debug!(
        "Diversity pass: {} items, {} pulled forward, {} tolerated repeats (max consecutive {})",
        result.len(),
        moved,
        tolerated,
        window
    );

    result
}

/// The last placed item, if the last `window` items all share its source.
fn saturated_window(placed: &[ContentItem], window: usize) -> Option<&ContentItem> {
    if placed.len() < window {
        return None;
    }
    let recent = &placed[placed.len() - window..];
    let last = recent.last()?;
    recent.iter().all(|item| item.same_source(last)).then_some(last)
}

/// Length of the longest run of consecutive items from one source.
pub fn longest_run(items: &[ContentItem]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for (i, item) in items.iter().enumerate() {
        current = match i {
            0 => 1,
            _ if item.same_source(&items[i - 1]) => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use feed_model::SourceType;

    fn item(id: &str, source: &str) -> ContentItem {
        ContentItem::new(id, id, source, SourceType::Youtube, Utc::now())
    }

    fn max(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn sources(items: &[ContentItem]) -> String {
        items.iter().map(|i| i.source_id.as_str()).collect::<Vec<_>>().join("")
    }

    #[test]
    fn test_empty_input() {
        assert!(enforce(Vec::new(), max(2)).is_empty());
    }

    #[test]
    fn test_already_diverse_is_unchanged() {
        let items = vec![item("1", "a"), item("2", "b"), item("3", "a"), item("4", "b")];
        let result = enforce(items.clone(), max(1));
        assert_eq!(result, items);
    }

    #[test]
    fn test_breaks_long_run() {
        let items = vec![
            item("1", "a"),
            item("2", "a"),
            item("3", "a"),
            item("4", "a"),
            item("5", "b"),
            item("6", "c"),
        ];
        let result = enforce(items, max(2));
        assert_eq!(sources(&result), "aabaac");
        assert_eq!(longest_run(&result), 2);
    }

    #[test]
    fn test_pulls_first_different_source() {
        let items = vec![
            item("1", "a"),
            item("2", "a"),
            item("3", "a"),
            item("4", "b"),
            item("5", "c"),
        ];
        let result = enforce(items, max(2));
        let ids: Vec<&str> = result.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "4", "3", "5"]);
    }

    #[test]
    fn test_fallback_when_no_alternative() {
        let items = vec![
            item("1", "b"),
            item("2", "a"),
            item("3", "a"),
            item("4", "a"),
            item("5", "a"),
        ];
        let result = enforce(items, max(2));
        // only "a" remains once "b" is placed, so the run is tolerated
        assert_eq!(sources(&result), "baaaa");
    }

    #[test]
    fn test_source_type_is_part_of_identity() {
        let mut podcast = item("3", "a");
        podcast.source_type = SourceType::Podcast;
        let items = vec![item("1", "a"), item("2", "a"), item("4", "a"), podcast];

        let result = enforce(items, max(2));
        let ids: Vec<&str> = result.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_same_multiset() {
        let items: Vec<ContentItem> = (0..30)
            .map(|i| item(&i.to_string(), ["a", "a", "a", "b", "c"][i % 5]))
            .collect();
        let result = enforce(items.clone(), max(1));

        let mut before: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        let mut after: Vec<&str> = result.iter().map(|i| i.id.as_str()).collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    /// Replays the queue to check that every over-long run happened only
    /// when no other source was left to place.
    #[test]
    fn test_violations_only_without_alternative() {
        let pattern = ["a", "a", "a", "a", "a", "b", "a", "a", "c", "a", "a", "a"];
        let items: Vec<ContentItem> = pattern
            .iter()
            .enumerate()
            .map(|(i, s)| item(&i.to_string(), s))
            .collect();
        let window = 2;
        let result = enforce(items, max(window));

        for end in window..result.len() {
            let run = &result[end - window..=end];
            if run.iter().all(|i| i.same_source(&result[end])) {
                let remaining = &result[end..];
                assert!(
                    remaining.iter().all(|i| i.same_source(&result[end])),
                    "run ending at {} had an alternative available",
                    end
                );
            }
        }
    }

    #[test]
    fn test_longest_run() {
        assert_eq!(longest_run(&[]), 0);
        let items = vec![item("1", "a"), item("2", "b"), item("3", "b"), item("4", "b"), item("5", "a")];
        assert_eq!(longest_run(&items), 3);
    }
}
