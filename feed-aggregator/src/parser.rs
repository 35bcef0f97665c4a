use crate::types::{AggregatorError, ParsedFeed, RawEntry, Result};
use feed_rs::parser;
use tracing::debug;

pub struct FeedParser;

impl FeedParser {
    /// Parse an RSS or Atom document into raw entries
    pub fn parse_feed(content: &str) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);
        let entries: Vec<RawEntry> = feed.entries.into_iter().map(Self::parse_entry).collect();

        debug!("Parsed feed with {} entries", entries.len());

        Ok(ParsedFeed { title, entries })
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> RawEntry {
        let title = entry.title.map(|t| t.content);

        // Prefer an alternate link, then whatever comes first
        let link = entry
            .links
            .iter()
            .find(|l| l.rel.as_deref() == Some("alternate"))
            .or_else(|| entry.links.first())
            .map(|l| l.href.clone());

        // content:encoded and Atom html content land in `full_content`,
        // plain-text content in `content`
        let (full_content, content) = match entry.content {
            Some(content) => {
                let is_html = content.content_type.essence_str().contains("html");
                match content.body {
                    Some(body) if is_html => (Some(body), None),
                    Some(body) => (None, Some(body)),
                    None => (None, None),
                }
            }
            None => (None, None),
        };

        let content_snippet = entry
            .media
            .iter()
            .find_map(|m| m.description.as_ref().map(|d| d.content.clone()));

        let description = entry.summary.map(|s| s.content);

        RawEntry {
            title,
            link,
            published_at: entry.published.or(entry.updated),
            full_content,
            content,
            content_snippet,
            description,
        }
    }

    pub fn is_valid_feed_content(content: &str) -> bool {
        let content_lower = content.to_lowercase();

        content_lower.contains("<rss")
            || content_lower.contains("<feed")
            || content_lower.contains("<rdf:rdf")
            || content_lower.contains("<channel")
    }
}
