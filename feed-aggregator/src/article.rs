//! Article text extraction for summarization.

use crate::rss_utils::feed;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text never counts as article content
const BOILERPLATE_TAGS: [&str; 6] = ["script", "style", "nav", "header", "footer", "aside"];

const CONTENT_SELECTORS: [&str; 6] = [
    "article",
    "[role=\"main\"]",
    ".article-content",
    ".post-content",
    ".entry-content",
    "main",
];

/// A content block must be longer than this to win over `body`
pub const MIN_BLOCK_CHARS: usize = 200;
pub const MAX_ARTICLE_CHARS: usize = 3000;

/// Extract readable text from a page, bounded to `MAX_ARTICLE_CHARS`
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut text = String::new();
    for selector_str in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let candidate = feed::collapse_whitespace(&visible_text(element));
                if candidate.chars().count() > MIN_BLOCK_CHARS {
                    text = candidate;
                    break;
                }
            }
        }
    }

    // Fall back to body if no main content found
    if text.chars().count() <= MIN_BLOCK_CHARS {
        if let Ok(body_selector) = Selector::parse("body") {
            if let Some(body) = document.select(&body_selector).next() {
                text = feed::collapse_whitespace(&visible_text(body));
            }
        }
    }

    text.chars().take(MAX_ARTICLE_CHARS).collect()
}

fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| BOILERPLATE_TAGS.contains(&el.name()))
        });
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }
    out
}
