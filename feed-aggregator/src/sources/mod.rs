pub mod catalog;
pub mod rss_feed;

pub use catalog::default_feeds;
pub use rss_feed::{normalize_entry, RssFeedSource};
