use crate::parser::FeedParser;
use crate::rss_utils::{feed, time, url};
use crate::traits::{FeedTransport, PullFeed};
use crate::types::{
    AggregatorError, Category, FeedSource, ItemOrigin, NormalizedItem, ParsedFeed, RawEntry, Region,
    Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

const UNKNOWN_SOURCE: &str = "Unknown source";

/// Generic RSS/Atom feed source implementation
pub struct RssFeedSource {
    source: FeedSource,
    transport: Arc<dyn FeedTransport>,
    timeout: Duration,
    word_cap: usize,
    regional_markers: Vec<String>,
    marked_region: Option<Region>,
}

impl RssFeedSource {
    pub fn new(
        source: FeedSource,
        transport: Arc<dyn FeedTransport>,
        timeout: Duration,
        word_cap: usize,
    ) -> Self {
        Self {
            source,
            transport,
            timeout,
            word_cap,
            regional_markers: Vec::new(),
            marked_region: None,
        }
    }

    /// Tag untagged history entries whose full text mentions a marker
    pub fn with_regional_markers(mut self, markers: Vec<String>, region: Region) -> Self {
        self.regional_markers = markers;
        self.marked_region = Some(region);
        self
    }

    fn regional_tag(&self, entry: &RawEntry, item: &NormalizedItem) -> Option<Region> {
        if item.category != Category::History || item.region.is_some() {
            return item.region;
        }
        let title = entry.title.as_deref().unwrap_or_default();
        self.marked_region
            .filter(|_| feed::mentions_any(title, entry.body(), &self.regional_markers))
    }

    /// Fetch and parse, racing the whole operation against the timeout.
    ///
    /// The work runs in its own task; on timeout the handle is dropped,
    /// which detaches the task instead of cancelling it.
    async fn fetch_parsed(&self) -> Result<ParsedFeed> {
        let transport = self.transport.clone();
        let url = self.source.url.clone();

        let task = tokio::spawn(async move {
            let content = transport.get_text(&url).await?;
            if !FeedParser::is_valid_feed_content(&content) {
                return Err(AggregatorError::Parse(format!(
                    "{} did not return an RSS/Atom document",
                    url
                )));
            }
            FeedParser::parse_feed(&content)
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                error!("Fetch task for {} aborted: {}", self.source.url, join_error);
                Err(AggregatorError::Parse(join_error.to_string()))
            }
            Err(_) => Err(AggregatorError::Timeout {
                millis: self.timeout.as_millis(),
            }),
        }
    }
}

#[async_trait]
impl PullFeed for RssFeedSource {
    fn source(&self) -> &FeedSource {
        &self.source
    }

    async fn pull(&self, now: DateTime<Utc>) -> Vec<NormalizedItem> {
        info!("Fetching {} from {}...", self.source.source, self.source.url);
        let start_time = Instant::now();

        match self.fetch_parsed().await {
            Ok(parsed) => {
                let items: Vec<NormalizedItem> = parsed
                    .entries
                    .iter()
                    .map(|entry| {
                        let mut item = normalize_entry(entry, &self.source, now, self.word_cap);
                        item.region = self.regional_tag(entry, &item);
                        item
                    })
                    .collect();
                info!(
                    "Successfully fetched {}: {} items in {}ms",
                    self.source.source,
                    items.len(),
                    start_time.elapsed().as_millis()
                );
                items
            }
            Err(e) => {
                warn!("Error fetching {} ({}): {}", self.source.source, self.source.url, e);
                Vec::new()
            }
        }
    }
}

/// Map one raw entry onto the canonical item shape.
///
/// Pure in its inputs: the same entry, source, `now` and cap always give the
/// same item.
pub fn normalize_entry(
    entry: &RawEntry,
    source: &FeedSource,
    now: DateTime<Utc>,
    word_cap: usize,
) -> NormalizedItem {
    NormalizedItem {
        title: feed::clean_title(entry.title.as_deref()),
        link: url::absolute_link_or_placeholder(entry.link.as_deref()),
        published_at: time::clamp_published(entry.published_at, now),
        snippet: feed::clean_snippet(entry.body(), word_cap),
        source_label: source_label(source),
        category: source.category,
        topic: source.topic.filter(|_| source.category == Category::News),
        region: source.region,
        origin: ItemOrigin::Live,
    }
}

/// The configured label, or the feed's domain when the label is blank
fn source_label(source: &FeedSource) -> String {
    let label = source.source.trim();
    if !label.is_empty() {
        return label.to_string();
    }
    url::extract_domain(&source.url).unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
}
