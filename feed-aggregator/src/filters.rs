//! Display adapters for the column dashboard.
//!
//! Every function here is pure: same input, same output.

use crate::types::{Category, ColumnLimits, ItemOrigin, NormalizedItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column view of one aggregation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub generated_at: Option<DateTime<Utc>>,
    pub news: Vec<NormalizedItem>,
    pub history: Vec<NormalizedItem>,
    pub hackathons: Vec<NormalizedItem>,
    pub jobs: Vec<NormalizedItem>,
}

impl Dashboard {
    pub fn len(&self) -> usize {
        self.news.len() + self.history.len() + self.hackathons.len() + self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drop items dated strictly after `now`
pub fn exclude_future(items: Vec<NormalizedItem>, now: DateTime<Utc>) -> Vec<NormalizedItem> {
    items.into_iter().filter(|item| item.published_at <= now).collect()
}

/// Drop live "on this day" entries from the history column
pub fn curated_history_only(items: Vec<NormalizedItem>) -> Vec<NormalizedItem> {
    items
        .into_iter()
        .filter(|item| !(item.category == Category::History && item.origin == ItemOrigin::Live))
        .collect()
}

/// Stable sort, newest `published_at` first
pub fn newest_first(mut items: Vec<NormalizedItem>) -> Vec<NormalizedItem> {
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    items
}

/// Keep the first `limit` items of each capped category, in input order.
///
/// Categories without a column limit pass through untouched.
pub fn cap_per_category(items: Vec<NormalizedItem>, limits: &ColumnLimits) -> Vec<NormalizedItem> {
    let mut seen: HashMap<Category, usize> = HashMap::new();
    items
        .into_iter()
        .filter(|item| match limits.limit_for(item.category) {
            Some(limit) => {
                let count = seen.entry(item.category).or_insert(0);
                *count += 1;
                *count <= limit
            }
            None => true,
        })
        .collect()
}

/// Compose the adapters and split the result into columns
pub fn build_dashboard(
    items: Vec<NormalizedItem>,
    now: DateTime<Utc>,
    limits: &ColumnLimits,
) -> Dashboard {
    let mut items = exclude_future(items, now);
    if limits.curated_history_only {
        items = curated_history_only(items);
    }
    let items = cap_per_category(newest_first(items), limits);

    let mut dashboard = Dashboard {
        generated_at: Some(now),
        ..Dashboard::default()
    };
    for item in items {
        match item.category {
            Category::News => dashboard.news.push(item),
            Category::History => dashboard.history.push(item),
            Category::Hackathon => dashboard.hackathons.push(item),
            Category::Job => dashboard.jobs.push(item),
            Category::Research | Category::Terminology => {}
        }
    }
    dashboard
}
