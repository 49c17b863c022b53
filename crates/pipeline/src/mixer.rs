//! Backlog mixer: blend recent content with older backlog.
//!
//! The feed should mostly surface fresh items while still resurfacing some
//! older ones. `ratio` is the target fraction of the result taken from the
//! backlog. Selection and order within each pool are random.

use feed_model::ContentItem;
use rand::Rng;
use rand::seq::SliceRandom;

/// How many items each pool should contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixQuota {
    pub recent: usize,
    pub backlog: usize,
}

impl MixQuota {
    /// `backlog = floor(total * ratio)`, recent gets the rest.
    ///
    /// `ratio` must already be validated to lie in [0, 1].
    pub fn for_ratio(total: usize, ratio: f64) -> Self {
        let backlog = ((total as f64) * ratio).floor() as usize;
        let backlog = backlog.min(total);
        Self {
            recent: total - backlog,
            backlog,
        }
    }
}

/// Sample and interleave two pools.
///
/// ## Algorithm
/// 1. Compute quotas from the combined size and the ratio
/// 2. Shuffle each pool (Fisher-Yates) and keep up to its quota;
///    a short pool is not topped up from the other one
/// 3. Interleave recent-first, one from each, then append the longer tail
///
/// The inputs are not modified.
pub fn mix<R>(
    recent: &[ContentItem],
    backlog: &[ContentItem],
    ratio: f64,
    rng: &mut R,
) -> Vec<ContentItem>
where
    R: Rng + ?Sized,
{
    let quota = MixQuota::for_ratio(recent.len() + backlog.len(), ratio);

    let recent_pick = sample(recent, quota.recent, rng);
    let backlog_pick = sample(backlog, quota.backlog, rng);

    tracing::debug!(
        "Mixing {} recent (quota {}) with {} backlog (quota {})",
        recent_pick.len(),
        quota.recent,
        backlog_pick.len(),
        quota.backlog
    );

    interleave(recent_pick, backlog_pick)
}

fn sample<R>(pool: &[ContentItem], count: usize, rng: &mut R) -> Vec<ContentItem>
where
    R: Rng + ?Sized,
{
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}

/// Alternate between `first` and `second`, starting with `first`.
fn interleave(first: Vec<ContentItem>, second: Vec<ContentItem>) -> Vec<ContentItem> {
    let mut result = Vec::with_capacity(first.len() + second.len());
    let mut first = first.into_iter();
    let mut second = second.into_iter();

    loop {
        match (first.next(), second.next()) {
            (Some(a), Some(b)) => {
                result.push(a);
                result.push(b);
            }
            (Some(a), None) => {
                result.push(a);
                result.extend(first);
                break;
            }
            (None, Some(b)) => {
                result.push(b);
                result.extend(second);
                break;
            }
            (None, None) => break,
        }
    }

    result
}
