use crate::rss_utils::feed;
use crate::types::{Category, NormalizedItem, Summarizer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Stage that replaces snippets on the head of the final sequence
pub struct SummarizationStage {
    summarizer: Arc<dyn Summarizer>,
    limit: usize,
    timeout: Duration,
    word_cap: usize,
}

impl SummarizationStage {
    pub fn new(summarizer: Arc<dyn Summarizer>, limit: usize, timeout: Duration, word_cap: usize) -> Self {
        Self {
            summarizer,
            limit,
            timeout,
            word_cap,
        }
    }

    pub fn stage_name(&self) -> String {
        format!("summarizer ({})", self.summarizer.adapter_name())
    }

    /// Enrich the first `limit` positions, one call at a time.
    ///
    /// History items are skipped but still occupy a position. Returns the
    /// number of snippets that were replaced.
    pub async fn process(&self, items: &mut [NormalizedItem]) -> usize {
        let mut enriched = 0;

        for item in items.iter_mut().take(self.limit) {
            if item.category == Category::History {
                debug!("Skipping summary for history item: {}", item.title);
                continue;
            }

            let call = self.summarizer.summarize(&item.link, &item.title, &item.snippet);
            match tokio::time::timeout(self.timeout, call).await {
                Ok(Ok(summary)) => {
                    let summary = feed::clean_snippet(&summary, self.word_cap);
                    if summary != item.snippet {
                        item.snippet = summary;
                        enriched += 1;
                    }
                }
                Ok(Err(e)) => {
                    warn!("Error generating summary for {}: {}", item.link, e);
                }
                Err(_) => {
                    warn!(
                        "Summary for {} timed out after {}ms, keeping original snippet",
                        item.link,
                        self.timeout.as_millis()
                    );
                }
            }
        }

        info!("{} enriched {} item(s)", self.stage_name(), enriched);
        enriched
    }
}
