use crate::balancer::{balanced_selection, CandidatePools};
use crate::filters::{build_dashboard, Dashboard};
use crate::knowledge::{curated_history_items, history_item, terminology_item};
use crate::processing::SummarizationStage;
use crate::rss_utils::{feed, time};
use crate::sources::{default_feeds, RssFeedSource};
use crate::traits::{FeedTransport, PullFeed};
use crate::types::{
    AggregatorConfig, AggregatorError, Category, FeedSource, KnowledgeSource, NormalizedItem,
    Result, Summarizer,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Fan-out over every configured source, then balance, shuffle and enrich
pub struct FeedAggregator {
    sources: Vec<Arc<dyn PullFeed>>,
    knowledge: Arc<dyn KnowledgeSource>,
    summarizer: Option<Arc<dyn Summarizer>>,
    config: AggregatorConfig,
}

impl FeedAggregator {
    pub fn new(
        sources: Vec<Arc<dyn PullFeed>>,
        knowledge: Arc<dyn KnowledgeSource>,
        summarizer: Option<Arc<dyn Summarizer>>,
        config: AggregatorConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sources,
            knowledge,
            summarizer,
            config,
        })
    }

    /// Build one `RssFeedSource` per entry of `feeds`, sharing `transport`
    pub fn with_feeds(
        feeds: Vec<FeedSource>,
        transport: Arc<dyn FeedTransport>,
        knowledge: Arc<dyn KnowledgeSource>,
        summarizer: Option<Arc<dyn Summarizer>>,
        config: AggregatorConfig,
    ) -> Result<Self> {
        let sources = feeds
            .into_iter()
            .map(|source| {
                let feed = RssFeedSource::new(
                    source,
                    transport.clone(),
                    config.fetch.timeout,
                    config.snippet_word_cap,
                )
                .with_regional_markers(
                    config.balance.regional_markers.clone(),
                    config.balance.minority_region,
                );
                Arc::new(feed) as Arc<dyn PullFeed>
            })
            .collect();
        Self::new(sources, knowledge, summarizer, config)
    }

    /// Aggregator over the built-in feed catalog
    pub fn from_catalog(
        transport: Arc<dyn FeedTransport>,
        knowledge: Arc<dyn KnowledgeSource>,
        summarizer: Option<Arc<dyn Summarizer>>,
        config: AggregatorConfig,
    ) -> Result<Self> {
        Self::with_feeds(default_feeds(), transport, knowledge, summarizer, config)
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Unified feed with a generator seeded from the config or the OS
    pub async fn aggregate(&self) -> Result<Vec<NormalizedItem>> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.aggregate_with_rng(&mut rng).await
    }

    pub async fn aggregate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<NormalizedItem>> {
        let now = Utc::now();
        let start_time = Instant::now();

        let live = self.pull_all(now).await;
        let live_count = live.len();

        let cap = self.config.snippet_word_cap;
        let mut pools = CandidatePools::from_items(live);
        pools
            .history
            .extend(curated_history_items(
                self.knowledge.as_ref(),
                now,
                cap,
                &self.config.balance,
            ));
        pools.terminology.extend(
            self.knowledge
                .terminology()
                .iter()
                .map(|entry| terminology_item(entry, now, cap)),
        );
        debug!("{} candidates before balancing", pools.len());

        let mut items = balanced_selection(pools, &self.config.balance, rng);
        items.shuffle(rng);

        check_invariants(&items, now, cap)?;

        if let Some(summarizer) = &self.summarizer {
            let stage = SummarizationStage::new(
                summarizer.clone(),
                self.config.enrichment_limit,
                self.config.enrichment_timeout,
                self.config.enrichment_word_cap,
            );
            stage.process(&mut items).await;
        }

        info!(
            "Aggregated {} items from {} live entries across {} sources in {}ms",
            items.len(),
            live_count,
            self.sources.len(),
            start_time.elapsed().as_millis()
        );
        Ok(items)
    }

    /// Column mode: today's history only, filtered for display
    pub async fn dashboard(&self) -> Dashboard {
        let now = Utc::now();
        let mut items = self.pull_all(now).await;

        let today = time::month_day_key(now);
        let cap = self.config.snippet_word_cap;
        let todays_events = self.knowledge.events_on(&today);
        debug!("{} curated events for {}", todays_events.len(), today);
        items.extend(
            todays_events
                .iter()
                .map(|event| history_item(&today, event, now, cap)),
        );

        let dashboard = build_dashboard(items, now, &self.config.column_limits);
        info!(
            "Dashboard: {} news, {} history, {} hackathons, {} jobs",
            dashboard.news.len(),
            dashboard.history.len(),
            dashboard.hackathons.len(),
            dashboard.jobs.len()
        );
        dashboard
    }

    async fn pull_all(&self, now: DateTime<Utc>) -> Vec<NormalizedItem> {
        let results = join_all(self.sources.iter().map(|source| source.pull(now))).await;
        results.into_iter().flatten().collect()
    }
}

/// Post-condition on the unified sequence before enrichment
pub fn check_invariants(items: &[NormalizedItem], now: DateTime<Utc>, word_cap: usize) -> Result<()> {
    for item in items {
        let violation = if item.title.trim().is_empty() {
            Some("empty title")
        } else if item.link.trim().is_empty() {
            Some("empty link")
        } else if item.source_label.trim().is_empty() {
            Some("empty source label")
        } else if item.snippet.trim().is_empty() {
            Some("empty snippet")
        } else if item.published_at > now {
            Some("published after run start")
        } else if feed::word_count(&item.snippet) > word_cap
            && item.snippet != interfaces::defs::NO_DESCRIPTION
        {
            Some("snippet over word cap")
        } else if item.topic.is_some() && item.category != Category::News {
            Some("topic on non-news item")
        } else {
            None
        };

        if let Some(violation) = violation {
            return Err(AggregatorError::Invariant(format!("{}: {}", violation, item.title)));
        }
    }
    Ok(())
}
