pub mod aggregator;
pub mod article;
pub mod balancer;
pub mod fetcher;
pub mod filters;
pub mod knowledge;
pub mod llm_adapter;
pub mod parser;
pub mod processing;
pub mod rss_utils;
pub mod sources;
pub mod traits;
pub mod types;

pub use aggregator::FeedAggregator;
pub use fetcher::Fetcher;
pub use filters::Dashboard;
pub use knowledge::StaticKnowledge;
pub use llm_adapter::{build_summarizer, GeminiAdapter, PassthroughAdapter, SummarizerConfig};
pub use parser::FeedParser;
pub use processing::SummarizationStage;
pub use traits::{FeedTransport, PullFeed};
pub use types::*;
