use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
// Shared contracts live in the interfaces crate
pub use interfaces::defs::{
    Category, HistoricalEvent, ItemOrigin, KnowledgeSource, NormalizedItem, Region, Summarizer,
    TerminologyEntry, Topic,
};

/// One configured external feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub url: String,
    pub source: String,
    pub category: Category,
    pub topic: Option<Topic>,
    pub region: Option<Region>,
}

impl FeedSource {
    pub fn new(url: &str, source: &str, category: Category) -> Self {
        Self {
            url: url.to_string(),
            source: source.to_string(),
            category,
            topic: None,
            region: None,
        }
    }

    /// A `news` feed tagged with its topic and region.
    pub fn news(url: &str, source: &str, topic: Topic, region: Region) -> Self {
        Self {
            topic: Some(topic),
            region: Some(region),
            ..Self::new(url, source, Category::News)
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            timeout: Duration::from_secs(5),
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// Quotas used when building the unified feed.
#[derive(Debug, Clone)]
pub struct BalancePolicy {
    pub topic_quota: usize,
    pub minority_region: Region,
    pub minority_minimum: usize,
    /// Sampled from each of the two history pools (regional and other).
    pub history_quota: usize,
    pub research_quota: usize,
    pub terminology_quota: usize,
    pub hackathon_quota: usize,
    pub job_quota: usize,
    pub regional_markers: Vec<String>,
}

impl Default for BalancePolicy {
    fn default() -> Self {
        Self {
            topic_quota: 5,
            minority_region: Region::India,
            minority_minimum: 2,
            history_quota: 3,
            research_quota: 3,
            terminology_quota: 5,
            hackathon_quota: 2,
            job_quota: 2,
            regional_markers: [
                "India", "Indian", "RBI", "Reserve Bank of India", "SEBI", "NSE", "BSE",
                "Sensex", "Nifty", "UPI", "NPCI", "Rupee", "Mumbai", "Bombay", "Paytm",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
        }
    }
}

/// Per-category caps for the column dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLimits {
    pub news: usize,
    pub history: usize,
    pub hackathon: usize,
    pub job: usize,
    pub curated_history_only: bool,
}

impl ColumnLimits {
    pub fn limit_for(&self, category: Category) -> Option<usize> {
        match category {
            Category::News => Some(self.news),
            Category::History => Some(self.history),
            Category::Hackathon => Some(self.hackathon),
            Category::Job => Some(self.job),
            Category::Research | Category::Terminology => None,
        }
    }
}

impl Default for ColumnLimits {
    fn default() -> Self {
        Self {
            news: 10,
            history: 10,
            hackathon: 5,
            job: 5,
            curated_history_only: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub fetch: FetchConfig,
    pub balance: BalancePolicy,
    pub snippet_word_cap: usize,
    pub enrichment_limit: usize,
    pub enrichment_word_cap: usize,
    pub enrichment_timeout: Duration,
    pub column_limits: ColumnLimits,
    pub seed: Option<u64>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            balance: BalancePolicy::default(),
            snippet_word_cap: 40,
            enrichment_limit: 3,
            enrichment_word_cap: 200,
            enrichment_timeout: Duration::from_secs(15),
            column_limits: ColumnLimits::default(),
            seed: None,
        }
    }
}

impl AggregatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout.is_zero() {
            return Err(AggregatorError::Config("fetch timeout must be non-zero".to_string()));
        }
        if self.snippet_word_cap == 0 || self.enrichment_word_cap == 0 {
            return Err(AggregatorError::Config("word caps must be non-zero".to_string()));
        }
        if self.balance.minority_minimum > self.balance.topic_quota {
            return Err(AggregatorError::Config(format!(
                "minority minimum {} exceeds topic quota {}",
                self.balance.minority_minimum, self.balance.topic_quota
            )));
        }
        Ok(())
    }
}

/// Raw entry as parsed from a feed, before normalization.
///
/// Feeds disagree on where the body lives, so every candidate field is kept
/// and resolved first-non-empty-wins by `RawEntry::body`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub full_content: Option<String>,
    pub content: Option<String>,
    pub content_snippet: Option<String>,
    pub description: Option<String>,
}

impl RawEntry {
    pub fn body(&self) -> &str {
        [
            &self.full_content,
            &self.content,
            &self.content_snippet,
            &self.description,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .find(|text| !text.trim().is_empty())
        .unwrap_or("")
    }
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<RawEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Timed out after {millis}ms")]
    Timeout { millis: u128 },

    #[error("Summarizer error: {0}")]
    Summarizer(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
