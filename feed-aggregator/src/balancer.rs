//! Quota-based balanced selection for the unified feed.
//!
//! Every partition contributes at most its quota. A partition with fewer
//! candidates than its quota contributes everything it has and the shortfall
//! is never handed to another partition.

use crate::rss_utils::feed;
use crate::types::{BalancePolicy, Category, NormalizedItem, Topic};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Candidates grouped by how the balancer treats them
#[derive(Debug, Default, Clone)]
pub struct CandidatePools {
    pub news: Vec<NormalizedItem>,
    pub history: Vec<NormalizedItem>,
    pub research: Vec<NormalizedItem>,
    pub hackathon: Vec<NormalizedItem>,
    pub job: Vec<NormalizedItem>,
    pub terminology: Vec<NormalizedItem>,
}

impl CandidatePools {
    /// Route items into pools by category
    pub fn from_items(items: impl IntoIterator<Item = NormalizedItem>) -> Self {
        let mut pools = Self::default();
        for item in items {
            match item.category {
                Category::News => pools.news.push(item),
                Category::History => pools.history.push(item),
                Category::Research => pools.research.push(item),
                Category::Hackathon => pools.hackathon.push(item),
                Category::Job => pools.job.push(item),
                Category::Terminology => pools.terminology.push(item),
            }
        }
        pools
    }

    pub fn len(&self) -> usize {
        self.news.len()
            + self.history.len()
            + self.research.len()
            + self.hackathon.len()
            + self.job.len()
            + self.terminology.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Uniformly sample up to `quota` items without replacement
pub fn sample<T, R: Rng + ?Sized>(mut pool: Vec<T>, quota: usize, rng: &mut R) -> Vec<T> {
    pool.shuffle(rng);
    pool.truncate(quota);
    pool
}

/// Pick up to `policy.topic_quota` items from one topic partition.
///
/// The minority region is guaranteed `min(minority_minimum, available)` slots;
/// the remainder is filled from the other items (untagged items count as
/// majority).
pub fn balance_topic<R: Rng + ?Sized>(
    candidates: Vec<NormalizedItem>,
    policy: &BalancePolicy,
    rng: &mut R,
) -> Vec<NormalizedItem> {
    let (minority, majority): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|item| item.region == Some(policy.minority_region));

    let guaranteed = policy.minority_minimum.min(policy.topic_quota);
    let mut picked = sample(minority, guaranteed, rng);
    let remainder = policy.topic_quota - picked.len();
    picked.extend(sample(majority, remainder, rng));
    picked
}

/// Whether a history item belongs to the regional pool.
///
/// Items tagged with the minority region were marker-tested on their full
/// text when built; untagged ones fall back to their title and snippet.
pub fn is_regional(item: &NormalizedItem, policy: &BalancePolicy) -> bool {
    item.region == Some(policy.minority_region)
        || policy.regional_markers.iter().any(|marker| {
            feed::contains_marker(&item.title, marker) || feed::contains_marker(&item.snippet, marker)
        })
}

/// Split into (regional, other) by `is_regional`
pub fn split_by_markers(
    items: Vec<NormalizedItem>,
    policy: &BalancePolicy,
) -> (Vec<NormalizedItem>, Vec<NormalizedItem>) {
    items.into_iter().partition(|item| is_regional(item, policy))
}

/// Apply every quota and concatenate the sampled subsets (unshuffled)
pub fn balanced_selection<R: Rng + ?Sized>(
    pools: CandidatePools,
    policy: &BalancePolicy,
    rng: &mut R,
) -> Vec<NormalizedItem> {
    let CandidatePools {
        news,
        history,
        research,
        hackathon,
        job,
        terminology,
    } = pools;

    let mut selected = Vec::new();

    for topic in Topic::ALL {
        let partition: Vec<NormalizedItem> = news
            .iter()
            .filter(|item| item.topic == Some(topic))
            .cloned()
            .collect();
        let available = partition.len();
        let picked = balance_topic(partition, policy, rng);
        debug!("Topic {}: picked {} of {} candidates", topic, picked.len(), available);
        selected.extend(picked);
    }

    let (regional, other) = split_by_markers(history, policy);
    debug!("History pools: {} regional, {} other", regional.len(), other.len());
    selected.extend(sample(regional, policy.history_quota, rng));
    selected.extend(sample(other, policy.history_quota, rng));

    selected.extend(sample(research, policy.research_quota, rng));
    selected.extend(sample(hackathon, policy.hackathon_quota, rng));
    selected.extend(sample(job, policy.job_quota, rng));
    selected.extend(sample(terminology, policy.terminology_quota, rng));

    selected
}
