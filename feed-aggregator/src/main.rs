use anyhow::Context;
use clap::{Parser, Subcommand};
use feed_aggregator::{
    build_summarizer, AggregatorConfig, FeedAggregator, FeedTransport, Fetcher, StaticKnowledge,
    SummarizerConfig,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fintech news, history and glossary aggregator", long_about = None)]
struct Cli {
    /// Indent the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Balanced, shuffled unified feed
    Feed {
        /// Seed the selection for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Skip AI summaries even when GEMINI_API_KEY is set
        #[arg(long)]
        no_enrich: bool,
    },
    /// Column view: news, market history, hackathons and jobs
    Dashboard,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = AggregatorConfig::default();
    let fetcher = Fetcher::new(config.fetch.clone()).context("failed to build HTTP client")?;
    let transport: Arc<dyn FeedTransport> = Arc::new(fetcher);
    let knowledge = Arc::new(StaticKnowledge::curated());

    match cli.command {
        Command::Feed { seed, no_enrich } => {
            config.seed = seed;
            let summarizer = if no_enrich {
                None
            } else {
                Some(build_summarizer(SummarizerConfig::from_env(), transport.clone())?)
            };
            let aggregator = FeedAggregator::from_catalog(transport, knowledge, summarizer, config)?;
            info!("Starting aggregation over {} feeds", aggregator.source_count());

            let items = aggregator.aggregate().await?;
            print_json(&items, cli.pretty)?;
        }
        Command::Dashboard => {
            let aggregator = FeedAggregator::from_catalog(transport, knowledge, None, config)?;
            info!("Building dashboard over {} feeds", aggregator.source_count());

            let dashboard = aggregator.dashboard().await;
            print_json(&dashboard, cli.pretty)?;
        }
    }

    Ok(())
}
