use crate::types::{FeedSource, NormalizedItem, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Transport used to retrieve feed documents and article pages.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    /// GET `url` and return the body as text. Non-2xx statuses are errors.
    async fn get_text(&self, url: &str) -> Result<String>;
}

/// Trait for pulling normalized items from one configured source
#[async_trait]
pub trait PullFeed: Send + Sync {
    /// Configuration this puller was built from
    fn source(&self) -> &FeedSource;

    /// Human-readable name for this source
    fn source_name(&self) -> String {
        self.source().source.clone()
    }

    /// Fetch and normalize items relative to `now`.
    ///
    /// Never fails: a broken or slow source yields an empty vec.
    async fn pull(&self, now: DateTime<Utc>) -> Vec<NormalizedItem>;
}
