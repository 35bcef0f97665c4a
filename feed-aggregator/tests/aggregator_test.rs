use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use feed_aggregator::{
    aggregator::check_invariants,
    rss_utils::{feed, time},
    AggregatorConfig, AggregatorError, Category, FeedAggregator, FeedSource, HistoricalEvent,
    ItemOrigin, NormalizedItem, PassthroughAdapter, PullFeed, Region, StaticKnowledge,
    SummarizationStage, Summarizer, TerminologyEntry, Topic,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Once;
use std::time::Duration;
use tracing::info;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

/// Source that returns a fixed list of items
struct StubFeed {
    source: FeedSource,
    items: Vec<NormalizedItem>,
}

#[async_trait]
impl PullFeed for StubFeed {
    fn source(&self) -> &FeedSource {
        &self.source
    }

    async fn pull(&self, _now: DateTime<Utc>) -> Vec<NormalizedItem> {
        self.items.clone()
    }
}

fn past() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()
}

fn item(title: &str, category: Category, topic: Option<Topic>, region: Option<Region>) -> NormalizedItem {
    NormalizedItem {
        title: title.to_string(),
        link: format!("https://example.com/{}", title.replace(' ', "-")),
        published_at: past(),
        snippet: format!("Snippet for {}", title),
        source_label: "Stub".to_string(),
        category,
        topic,
        region,
        origin: ItemOrigin::Live,
    }
}

fn news_items(prefix: &str, count: usize, topic: Topic, region: Region) -> Vec<NormalizedItem> {
    (0..count)
        .map(|i| item(&format!("{} {}", prefix, i), Category::News, Some(topic), Some(region)))
        .collect()
}

fn stub(items: Vec<NormalizedItem>) -> Arc<dyn PullFeed> {
    Arc::new(StubFeed {
        source: FeedSource::new("https://stub.example.com/feed", "Stub", Category::News),
        items,
    })
}

fn glossary(count: usize) -> Vec<TerminologyEntry> {
    (0..count)
        .map(|i| TerminologyEntry {
            term: format!("Term{}", i),
            category: "Payments".to_string(),
            definition: format!("Definition number {}", i),
            link: None,
            attribution_source: None,
        })
        .collect()
}

fn event(title: &str, year: i32, description: &str) -> HistoricalEvent {
    HistoricalEvent {
        title: title.to_string(),
        year,
        description: description.to_string(),
        link: "https://en.wikipedia.org/wiki/Example".to_string(),
        attribution_source: "Wikipedia".to_string(),
    }
}

fn aggregator(
    sources: Vec<Arc<dyn PullFeed>>,
    knowledge: StaticKnowledge,
    summarizer: Option<Arc<dyn Summarizer>>,
) -> FeedAggregator {
    FeedAggregator::new(sources, Arc::new(knowledge), summarizer, AggregatorConfig::default()).unwrap()
}

/// Summarizer that replaces every snippet with a long fixed text
struct VerboseSummarizer;

#[async_trait]
impl Summarizer for VerboseSummarizer {
    fn adapter_name(&self) -> String {
        "verbose".to_string()
    }

    async fn summarize(&self, _url: &str, _title: &str, _snippet: &str) -> anyhow::Result<String> {
        Ok(vec!["summary"; 300].join(" "))
    }
}

struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    fn adapter_name(&self) -> String {
        "failing".to_string()
    }

    async fn summarize(&self, _url: &str, _title: &str, _snippet: &str) -> anyhow::Result<String> {
        anyhow::bail!("provider unavailable")
    }
}

struct StalledSummarizer;

#[async_trait]
impl Summarizer for StalledSummarizer {
    fn adapter_name(&self) -> String {
        "stalled".to_string()
    }

    async fn summarize(&self, _url: &str, _title: &str, snippet: &str) -> anyhow::Result<String> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(snippet.to_string())
    }
}

#[tokio::test]
async fn test_terminology_quota_and_titles() {
    init_tracing();

    let knowledge = StaticKnowledge::new(BTreeMap::new(), glossary(8));
    let aggregator = aggregator(Vec::new(), knowledge, None);
    let mut rng = StdRng::seed_from_u64(42);

    let items = aggregator.aggregate_with_rng(&mut rng).await.unwrap();
    let terms: Vec<_> = items
        .iter()
        .filter(|item| item.category == Category::Terminology)
        .collect();

    assert_eq!(terms.len(), 5);
    for term in terms {
        assert!(term.title.starts_with("Term"));
        assert!(term.title.ends_with(" (Payments)"));
        assert_eq!(term.source_label, "Glossary");
        assert_eq!(term.origin, ItemOrigin::Curated);
    }
}

#[tokio::test]
async fn test_blank_attribution_falls_back_to_glossary() {
    init_tracing();

    let mut entries = glossary(2);
    entries[0].attribution_source = Some(String::new());
    entries[1].attribution_source = Some("   ".to_string());
    let knowledge = StaticKnowledge::new(BTreeMap::new(), entries);
    let aggregator = aggregator(Vec::new(), knowledge, None);

    let items = aggregator
        .aggregate_with_rng(&mut StdRng::seed_from_u64(0))
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.source_label == "Glossary"));
}

#[tokio::test]
async fn test_empty_history_table_is_not_an_error() {
    init_tracing();

    let sources = vec![stub(news_items("Global fintech", 3, Topic::Fintech, Region::Global))];
    let aggregator = aggregator(sources, StaticKnowledge::empty(), None);
    let mut rng = StdRng::seed_from_u64(1);

    let items = aggregator.aggregate_with_rng(&mut rng).await.unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|item| item.category != Category::History));
}

#[tokio::test]
async fn test_regional_minimum_per_topic() {
    init_tracing();

    let mut news = news_items("India fintech", 3, Topic::Fintech, Region::India);
    news.extend(news_items("Global fintech", 12, Topic::Fintech, Region::Global));
    news.extend(news_items("Global finance", 8, Topic::Finance, Region::Global));
    let aggregator = aggregator(vec![stub(news)], StaticKnowledge::empty(), None);

    for seed in 0..25 {
        let mut rng = StdRng::seed_from_u64(seed);
        let items = aggregator.aggregate_with_rng(&mut rng).await.unwrap();

        let fintech: Vec<_> = items
            .iter()
            .filter(|item| item.topic == Some(Topic::Fintech))
            .collect();
        let india = fintech
            .iter()
            .filter(|item| item.region == Some(Region::India))
            .count();

        assert_eq!(fintech.len(), 5);
        assert!(india >= 2, "seed {} picked {} india items", seed, india);
        assert_eq!(
            items.iter().filter(|item| item.topic == Some(Topic::Finance)).count(),
            5
        );
    }
}

#[tokio::test]
async fn test_shortfall_is_not_redistributed() {
    init_tracing();

    let mut news = news_items("India tech", 1, Topic::Tech, Region::India);
    news.extend(news_items("Global tech", 1, Topic::Tech, Region::Global));
    news.extend(news_items("Global finance", 20, Topic::Finance, Region::Global));
    let aggregator = aggregator(vec![stub(news)], StaticKnowledge::empty(), None);
    let mut rng = StdRng::seed_from_u64(3);

    let items = aggregator.aggregate_with_rng(&mut rng).await.unwrap();
    assert_eq!(items.iter().filter(|item| item.topic == Some(Topic::Tech)).count(), 2);
    assert_eq!(items.iter().filter(|item| item.topic == Some(Topic::Finance)).count(), 5);
    assert_eq!(items.len(), 7);
}

#[tokio::test]
async fn test_history_pool_uses_every_date() {
    init_tracing();

    let mut history = BTreeMap::new();
    history.insert(
        "04-01".to_string(),
        vec![event("Reserve Bank of India Established", 1935, "The RBI began operations.")],
    );
    history.insert(
        "07-22".to_string(),
        vec![event("Bretton Woods Agreement Concluded", 1944, "A post-war monetary system.")],
    );
    history.insert(
        "10-19".to_string(),
        vec![event("Black Monday", 1987, "Stock markets crashed worldwide.")],
    );
    let aggregator = aggregator(Vec::new(), StaticKnowledge::new(history, Vec::new()), None);
    let mut rng = StdRng::seed_from_u64(9);

    let start = Utc::now();
    let items = aggregator.aggregate_with_rng(&mut rng).await.unwrap();

    assert_eq!(items.len(), 3);
    for item in &items {
        assert_eq!(item.category, Category::History);
        assert!(item.published_at <= start);
        assert!(item.source_label.starts_with("History ("));
    }
    let black_monday = items.iter().find(|item| item.title == "Black Monday").unwrap();
    assert_eq!(
        black_monday.published_at,
        Utc.with_ymd_and_hms(1987, 10, 19, 0, 0, 0).unwrap()
    );
    assert_eq!(black_monday.source_label, "History (1987)");
}

#[tokio::test]
async fn test_history_marker_beyond_word_cap_is_regional() {
    init_tracing();

    let long_description = format!(
        "{} until the Reserve Bank of India stepped in.",
        vec!["markets"; 50].join(" ")
    );
    let mut history = BTreeMap::new();
    history.insert(
        "05-01".to_string(),
        vec![event("Currency crisis", 1991, &long_description)],
    );
    for (i, key) in ["06-01", "06-02", "06-03", "06-04", "06-05"].iter().enumerate() {
        history.insert(
            key.to_string(),
            vec![event(&format!("Wall Street milestone {}", i), 1950, "Trading began in New York.")],
        );
    }
    let aggregator = aggregator(Vec::new(), StaticKnowledge::new(history, Vec::new()), None);

    for seed in 0..10 {
        let items = aggregator
            .aggregate_with_rng(&mut StdRng::seed_from_u64(seed))
            .await
            .unwrap();

        // One regional event plus three of the five others
        assert_eq!(items.len(), 4);
        let crisis = items.iter().find(|item| item.title == "Currency crisis").unwrap();
        assert_eq!(crisis.region, Some(Region::India));
        assert!(!crisis.snippet.contains("Reserve Bank"));
    }
}

#[tokio::test]
async fn test_curated_run_respects_bounds() {
    init_tracing();

    let mut news = news_items("India fintech", 4, Topic::Fintech, Region::India);
    news.extend(news_items("Global finance", 6, Topic::Finance, Region::Global));
    news.extend(news_items("Global tech", 6, Topic::Tech, Region::Global));
    let aggregator = aggregator(vec![stub(news)], StaticKnowledge::curated(), None);

    let start = Utc::now();
    let items = aggregator.aggregate().await.unwrap();
    info!("Curated run produced {} items", items.len());

    let history = items.iter().filter(|item| item.category == Category::History).count();
    let terms = items.iter().filter(|item| item.category == Category::Terminology).count();
    assert_eq!(history, 6);
    assert_eq!(terms, 5);
    for item in &items {
        assert!(item.published_at <= start + ChronoDuration::seconds(1));
        assert!(feed::word_count(&item.snippet) <= 40);
        assert!(!item.title.is_empty());
        assert!(!item.link.is_empty());
    }
}

#[tokio::test]
async fn test_seeded_runs_are_reproducible() {
    init_tracing();

    let mut news = news_items("India fintech", 6, Topic::Fintech, Region::India);
    news.extend(news_items("Global fintech", 6, Topic::Fintech, Region::Global));
    news.push(item("Hackathon A", Category::Hackathon, None, None));
    news.push(item("Job A", Category::Job, None, None));
    news.push(item("Paper A", Category::Research, None, None));

    let mut config = AggregatorConfig::default();
    config.seed = Some(2024);
    let aggregator = FeedAggregator::new(
        vec![stub(news)],
        Arc::new(StaticKnowledge::new(BTreeMap::new(), glossary(8))),
        None,
        config,
    )
    .unwrap();

    let first: Vec<String> = aggregator.aggregate().await.unwrap().into_iter().map(|i| i.title).collect();
    let second: Vec<String> = aggregator.aggregate().await.unwrap().into_iter().map(|i| i.title).collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 5 + 1 + 1 + 1 + 5);
}

#[tokio::test]
async fn test_passthrough_leaves_snippets_unchanged() {
    init_tracing();

    let mut news = news_items("India fintech", 4, Topic::Fintech, Region::India);
    news.extend(news_items("Global fintech", 4, Topic::Fintech, Region::Global));
    let sources = vec![stub(news)];
    let knowledge = StaticKnowledge::new(BTreeMap::new(), glossary(6));

    let plain = aggregator(sources.clone(), knowledge.clone(), None);
    let passthrough = aggregator(sources, knowledge, Some(Arc::new(PassthroughAdapter)));

    let without: Vec<_> = plain
        .aggregate_with_rng(&mut StdRng::seed_from_u64(5))
        .await
        .unwrap()
        .into_iter()
        .map(|i| (i.title, i.snippet))
        .collect();
    let with: Vec<_> = passthrough
        .aggregate_with_rng(&mut StdRng::seed_from_u64(5))
        .await
        .unwrap()
        .into_iter()
        .map(|i| (i.title, i.snippet))
        .collect();

    assert_eq!(without, with);
}

#[tokio::test]
async fn test_enrichment_bounded_to_prefix_and_skips_history() {
    init_tracing();

    let mut items = vec![
        item("Old news", Category::History, None, None),
        item("Story one", Category::News, Some(Topic::Tech), Some(Region::Global)),
        item("Story two", Category::Research, None, None),
        item("Story three", Category::News, Some(Topic::Tech), Some(Region::Global)),
    ];
    let original: Vec<String> = items.iter().map(|i| i.snippet.clone()).collect();

    let stage = SummarizationStage::new(Arc::new(VerboseSummarizer), 3, Duration::from_secs(1), 200);
    let enriched = stage.process(&mut items).await;

    assert_eq!(enriched, 2);
    assert_eq!(items[0].snippet, original[0]);
    assert_ne!(items[1].snippet, original[1]);
    assert_ne!(items[2].snippet, original[2]);
    assert_eq!(items[3].snippet, original[3]);
    assert_eq!(feed::word_count(&items[1].snippet), 200);
    assert!(items[1].snippet.ends_with(feed::ELLIPSIS));
}

#[tokio::test]
async fn test_enrichment_failures_keep_original() {
    init_tracing();

    let mut items = vec![
        item("Story one", Category::News, Some(Topic::Tech), Some(Region::Global)),
        item("Story two", Category::Job, None, None),
    ];
    let original = items.clone();

    let failing = SummarizationStage::new(Arc::new(FailingSummarizer), 3, Duration::from_secs(1), 200);
    assert_eq!(failing.process(&mut items).await, 0);
    assert_eq!(items, original);

    let stalled = SummarizationStage::new(Arc::new(StalledSummarizer), 3, Duration::from_millis(100), 200);
    let start = std::time::Instant::now();
    assert_eq!(stalled.process(&mut items).await, 0);
    assert_eq!(items, original);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    init_tracing();

    let mut config = AggregatorConfig::default();
    config.balance.minority_minimum = 6;
    let result = FeedAggregator::new(Vec::new(), Arc::new(StaticKnowledge::empty()), None, config);
    assert!(matches!(result, Err(AggregatorError::Config(_))));

    let mut config = AggregatorConfig::default();
    config.fetch.timeout = Duration::ZERO;
    let result = FeedAggregator::new(Vec::new(), Arc::new(StaticKnowledge::empty()), None, config);
    assert!(matches!(result, Err(AggregatorError::Config(_))));
}

#[test]
fn test_invariant_check_flags_future_items() {
    let now = Utc::now();
    let mut future = item("Tomorrow", Category::News, Some(Topic::Tech), Some(Region::Global));
    future.published_at = now + ChronoDuration::days(1);

    let ok = item("Yesterday", Category::News, Some(Topic::Tech), Some(Region::Global));
    assert!(check_invariants(&[ok.clone()], now, 40).is_ok());
    assert!(matches!(
        check_invariants(&[ok, future], now, 40),
        Err(AggregatorError::Invariant(_))
    ));
}

#[tokio::test]
async fn test_dashboard_columns() {
    init_tracing();

    let today = time::month_day_key(Utc::now());
    let other_day = if today == "01-01" { "01-02" } else { "01-01" };
    let mut history = BTreeMap::new();
    history.insert(today.clone(), vec![event("Today in finance", 2000, "Something happened today.")]);
    history.insert(other_day.to_string(), vec![event("Another day", 2000, "Something else.")]);

    let mut live = vec![item("Live on this day", Category::History, None, None)];
    let mut future = item("From the future", Category::News, Some(Topic::Tech), Some(Region::Global));
    future.published_at = Utc::now() + ChronoDuration::days(3);
    live.push(future);
    for i in 0..12u32 {
        let mut news = item(&format!("News {}", i), Category::News, Some(Topic::Tech), Some(Region::Global));
        news.published_at = past() + ChronoDuration::hours(i64::from(i));
        live.push(news);
    }
    live.extend((0..7).map(|i| item(&format!("Hackathon {}", i), Category::Hackathon, None, None)));
    live.push(item("Paper", Category::Research, None, None));

    let aggregator = aggregator(vec![stub(live)], StaticKnowledge::new(history, Vec::new()), None);
    let dashboard = aggregator.dashboard().await;

    assert_eq!(dashboard.history.len(), 1);
    assert_eq!(dashboard.history[0].title, "Today in finance");
    assert_eq!(dashboard.news.len(), 10);
    assert_eq!(dashboard.news[0].title, "News 11");
    assert!(dashboard.news.iter().all(|n| n.title != "From the future"));
    assert_eq!(dashboard.hackathons.len(), 5);
    assert!(dashboard.jobs.is_empty());
}

#[tokio::test]
async fn test_dashboard_without_todays_history() {
    init_tracing();

    let mut history = BTreeMap::new();
    let today = time::month_day_key(Utc::now());
    let other_day = if today == "06-15" { "06-16" } else { "06-15" };
    history.insert(other_day.to_string(), vec![event("Elsewhere", 1999, "Not today.")]);

    let aggregator = aggregator(Vec::new(), StaticKnowledge::new(history, Vec::new()), None);
    let dashboard = aggregator.dashboard().await;
    assert!(dashboard.is_empty());
}
