/// Feed-specific utility functions used during normalization

/// URL utilities for feed items
pub mod url {
    use url::Url;

    /// Extract domain from URL; labels feeds configured without a name
    pub fn extract_domain(url_str: &str) -> Option<String> {
        Url::parse(url_str)
            .ok()
            .and_then(|url| url.domain().map(|d| d.to_string()))
    }

    /// Validate feed URL format
    pub fn is_valid_feed_url(url_str: &str) -> bool {
        if let Ok(url) = Url::parse(url_str) {
            (url.scheme() == "http" || url.scheme() == "https") && url.host().is_some()
        } else {
            false
        }
    }

    /// Return the link if it is an absolute http(s) URL, otherwise `#`
    pub fn absolute_link_or_placeholder(link: Option<&str>) -> String {
        match link.map(str::trim) {
            Some(link) if is_valid_feed_url(link) => link.to_string(),
            _ => interfaces::defs::NO_LINK.to_string(),
        }
    }
}

/// Time utilities for item timestamps
pub mod time {
    use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

    /// Missing or future timestamps collapse to `now`
    pub fn clamp_published(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
        match published {
            Some(published) if published <= now => published,
            _ => now,
        }
    }

    /// `MM-DD` key used by the historical table
    pub fn month_day_key(date: DateTime<Utc>) -> String {
        format!("{:02}-{:02}", date.month(), date.day())
    }

    /// Midnight UTC of `year` on the month/day encoded by `key`
    pub fn historical_date(key: &str, year: i32) -> Option<DateTime<Utc>> {
        let (month, day) = key.split_once('-')?;
        let date = NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)?;
        Utc.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single()
    }
}

/// Text cleaning utilities for snippets
pub mod feed {
    /// Entities decoded in snippets; `&amp;` goes last so `&amp;lt;` stays literal
    const ENTITIES: [(&str, &str); 4] = [
        ("&nbsp;", " "),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&amp;", "&"),
    ];

    pub const ELLIPSIS: &str = "...";

    /// Remove HTML tags, keeping a space where each tag was.
    ///
    /// A `<` only opens a tag when followed by a letter, `/`, `!` or `?` and
    /// closed by a later `>`; any other `<` is kept as text.
    pub fn strip_tags(html: &str) -> String {
        let mut text = String::with_capacity(html.len());
        let mut rest = html;
        while let Some(start) = rest.find('<') {
            text.push_str(&rest[..start]);
            let candidate = &rest[start..];
            match tag_len(candidate) {
                Some(len) => {
                    text.push(' ');
                    rest = &candidate[len..];
                }
                None => {
                    text.push('<');
                    rest = &candidate[1..];
                }
            }
        }
        text.push_str(rest);
        text
    }

    /// Byte length of the tag at the start of `candidate`, if it is one
    fn tag_len(candidate: &str) -> Option<usize> {
        let opener = candidate[1..].chars().next()?;
        if !(opener.is_ascii_alphabetic() || matches!(opener, '/' | '!' | '?')) {
            return None;
        }
        candidate.find('>').map(|end| end + 1)
    }

    pub fn decode_entities(text: &str) -> String {
        ENTITIES
            .iter()
            .fold(text.to_string(), |acc, (entity, replacement)| acc.replace(entity, replacement))
    }

    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Keep at most `max_words` words, appending `...` when anything was cut
    pub fn truncate_words(text: &str, max_words: usize) -> String {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() <= max_words {
            return words.join(" ");
        }
        format!("{}{}", words[..max_words].join(" "), ELLIPSIS)
    }

    pub fn word_count(text: &str) -> usize {
        text.split_whitespace().count()
    }

    /// Extract clean text content from HTML
    pub fn extract_text_from_html(html: &str) -> String {
        collapse_whitespace(&decode_entities(&strip_tags(html)))
    }

    /// Full snippet pipeline: strip, decode, collapse, cap, fall back
    pub fn clean_snippet(raw: &str, max_words: usize) -> String {
        let text = extract_text_from_html(raw);
        if text.is_empty() {
            return interfaces::defs::NO_DESCRIPTION.to_string();
        }
        truncate_words(&text, max_words)
    }

    /// Trimmed title, or the `No Title` sentinel
    pub fn clean_title(raw: Option<&str>) -> String {
        let title = raw.map(extract_text_from_html).unwrap_or_default();
        if title.is_empty() {
            interfaces::defs::NO_TITLE.to_string()
        } else {
            title
        }
    }

    /// Case-insensitive whole-word match of `marker` inside `text`
    pub fn contains_marker(text: &str, marker: &str) -> bool {
        let tokens = tokenize(text);
        let needle = tokenize(marker);
        if needle.is_empty() || needle.len() > tokens.len() {
            return false;
        }
        tokens.windows(needle.len()).any(|window| window == needle.as_slice())
    }

    /// Whether any marker appears in `title` or the cleaned, untruncated `body`
    pub fn mentions_any(title: &str, body: &str, markers: &[String]) -> bool {
        let body = extract_text_from_html(body);
        markers
            .iter()
            .any(|marker| contains_marker(title, marker) || contains_marker(&body, marker))
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(|token| token.to_lowercase())
            .collect()
    }
}
