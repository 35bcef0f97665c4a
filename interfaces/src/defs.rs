use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NO_TITLE: &str = "No Title";
pub const NO_LINK: &str = "#";
pub const NO_DESCRIPTION: &str = "No description available.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    News,
    History,
    Hackathon,
    Job,
    Research,
    Terminology,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::News => "news",
            Category::History => "history",
            Category::Hackathon => "hackathon",
            Category::Job => "job",
            Category::Research => "research",
            Category::Terminology => "terminology",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topic of a `news` item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Fintech,
    Finance,
    Tech,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Fintech, Topic::Finance, Topic::Tech];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Fintech => "fintech",
            Topic::Finance => "finance",
            Topic::Tech => "tech",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    India,
    Global,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::India => f.write_str("india"),
            Region::Global => f.write_str("global"),
        }
    }
}

/// Where an item came from: a live feed or a curated in-process table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemOrigin {
    Live,
    Curated,
}

/// The canonical unit handed to the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedItem {
    pub title: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    pub snippet: String,
    pub source_label: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    pub origin: ItemOrigin,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalEvent {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub link: String,
    pub attribution_source: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminologyEntry {
    pub term: String,
    pub category: String,
    pub definition: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub attribution_source: Option<String>,
}

// Object style note:
// Implementations of the traits below are handed to the aggregator once at
// startup and shared across calls, so they hold only read-only state.

/// Read-only historical events (keyed by `MM-DD`) and terminology glossary.
pub trait KnowledgeSource: Send + Sync {
    /// Every `MM-DD` key present in the table, in a stable order.
    fn history_dates(&self) -> Vec<&str>;

    /// Events recorded for `month_day`; empty when the key is absent.
    fn events_on(&self, month_day: &str) -> &[HistoricalEvent];

    fn terminology(&self) -> &[TerminologyEntry];
}

/// Best-effort snippet replacement for a single article.
///
/// Implementations return the original `snippet` whenever they cannot do
/// better. An `Err` is still tolerated by callers, which keep the original.
#[async_trait]
pub trait Summarizer: Send + Sync {
    fn adapter_name(&self) -> String;

    async fn summarize(&self, url: &str, title: &str, snippet: &str) -> Result<String>;
}
