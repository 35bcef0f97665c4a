use crate::article::extract_article_text;
use crate::traits::FeedTransport;
use crate::types::{AggregatorError, Result, Summarizer};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tracing::{debug, info, warn};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Extracted text shorter than this is not worth summarizing
pub const MIN_ARTICLE_CHARS: usize = 100;
/// Summaries this short are discarded in favour of the original snippet
pub const MIN_SUMMARY_CHARS: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct SummarizerConfig {
    pub api_key: Option<String>,
    pub model: String,
}

impl SummarizerConfig {
    /// Read `GEMINI_API_KEY` and `GEMINI_MODEL` from the environment
    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY").ok().filter(|key| !key.trim().is_empty());
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self { api_key, model }
    }
}

/// Pick the Gemini adapter when credentials exist, otherwise passthrough
pub fn build_summarizer(
    config: SummarizerConfig,
    transport: Arc<dyn FeedTransport>,
) -> Result<Arc<dyn Summarizer>> {
    match config.api_key {
        Some(api_key) => Ok(Arc::new(GeminiAdapter::new(api_key, config.model, transport)?)),
        None => {
            info!("No Gemini API key found, using original snippets");
            Ok(Arc::new(PassthroughAdapter))
        }
    }
}

/// Adapter that keeps every snippet as-is
pub struct PassthroughAdapter;

#[async_trait]
impl Summarizer for PassthroughAdapter {
    fn adapter_name(&self) -> String {
        "passthrough".to_string()
    }

    async fn summarize(&self, _url: &str, _title: &str, snippet: &str) -> anyhow::Result<String> {
        Ok(snippet.to_string())
    }
}

/// Summarizes the linked article with Google's Gemini API
pub struct GeminiAdapter {
    api_key: String,
    model: String,
    transport: Arc<dyn FeedTransport>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiAdapter {
    pub fn new(api_key: String, model: String, transport: Arc<dyn FeedTransport>) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AggregatorError::Config("empty Gemini API key".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            api_key,
            model,
            transport,
            client,
        })
    }

    fn build_prompt(title: &str, article_text: &str) -> String {
        format!(
            "Summarize the following news article in exactly 200 words. Focus on the key facts, main points, and important details. Make it informative and engaging.\n\nTitle: {}\n\nArticle Content:\n{}\n\nSummary (200 words):",
            title, article_text
        )
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let url = format!("{}/{}:generateContent", GEMINI_ENDPOINT, self.model);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AggregatorError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body: GenerateResponse = response.json().await?;
        body.candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| AggregatorError::Summarizer("Gemini returned no text".to_string()))
    }

    async fn try_summarize(&self, url: &str, title: &str, snippet: &str) -> Result<String> {
        let html = self.transport.get_text(url).await?;
        let article_text = extract_article_text(&html);

        if article_text.chars().count() < MIN_ARTICLE_CHARS {
            info!("Insufficient content extracted from {}", url);
            return Ok(snippet.to_string());
        }

        debug!("Requesting summary for {} ({} chars)", url, article_text.len());
        let summary = self.generate(Self::build_prompt(title, &article_text)).await?;

        if summary.chars().count() > MIN_SUMMARY_CHARS {
            info!("Generated AI summary for: {}", title.chars().take(50).collect::<String>());
            Ok(summary)
        } else {
            Ok(snippet.to_string())
        }
    }
}

#[async_trait]
impl Summarizer for GeminiAdapter {
    fn adapter_name(&self) -> String {
        format!("gemini ({})", self.model)
    }

    async fn summarize(&self, url: &str, title: &str, snippet: &str) -> anyhow::Result<String> {
        match self.try_summarize(url, title, snippet).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                warn!("Error generating summary for {}: {}", url, e);
                Ok(snippet.to_string())
            }
        }
    }
}
