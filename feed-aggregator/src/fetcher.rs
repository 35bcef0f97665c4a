use crate::traits::FeedTransport;
use crate::types::{AggregatorError, FetchConfig, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// HTTP transport shared by every feed source and the summarizer
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    fn max_bytes(&self) -> u64 {
        self.config.max_feed_size_mb as u64 * BYTES_PER_MB
    }

    fn too_large(bytes: u64) -> AggregatorError {
        AggregatorError::FeedTooLarge {
            size_mb: bytes.div_ceil(BYTES_PER_MB) as usize,
        }
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching feed: {}", url);

        let parsed = Url::parse(url)?;
        let response = self.client.get(parsed).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AggregatorError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // Check content length
        if let Some(content_length) = response.content_length() {
            if content_length > self.max_bytes() {
                return Err(Self::too_large(content_length));
            }
        }

        let content = response.text().await?;
        if content.len() as u64 > self.max_bytes() {
            return Err(Self::too_large(content.len() as u64));
        }

        info!(
            "Fetched {} ({} bytes in {}ms)",
            url,
            content.len(),
            start_time.elapsed().as_millis()
        );
        Ok(content)
    }
}

#[async_trait]
impl FeedTransport for Fetcher {
    async fn get_text(&self, url: &str) -> Result<String> {
        self.fetch_feed(url).await
    }
}
