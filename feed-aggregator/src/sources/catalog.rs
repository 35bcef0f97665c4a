use crate::types::{Category, FeedSource, Region, Topic};

/// Every feed the dashboard pulls from, across all categories
pub fn default_feeds() -> Vec<FeedSource> {
    let mut feeds = news_feeds();
    feeds.extend(hackathon_feeds());
    feeds.extend(job_feeds());
    feeds.extend(research_feeds());
    feeds.extend(history_feeds());
    feeds
}

pub fn news_feeds() -> Vec<FeedSource> {
    vec![
        // Fintech
        FeedSource::news("https://techcrunch.com/category/fintech/feed/", "TechCrunch", Topic::Fintech, Region::Global),
        FeedSource::news("https://www.finextra.com/rss/headlines.aspx", "Finextra", Topic::Fintech, Region::Global),
        FeedSource::news("https://www.coindesk.com/arc/outboundfeeds/rss/", "CoinDesk", Topic::Fintech, Region::Global),
        FeedSource::news("https://inc42.com/buzz/feed/", "Inc42", Topic::Fintech, Region::India),
        FeedSource::news("https://entrackr.com/feed/", "Entrackr", Topic::Fintech, Region::India),
        // Finance
        FeedSource::news(
            "https://search.cnbc.com/rs/search/combinedcms/view.xml?partnerId=wrss01&id=10000664",
            "CNBC Finance",
            Topic::Finance,
            Region::Global,
        ),
        FeedSource::news("https://www.investing.com/rss/news_25.rss", "Investing.com", Topic::Finance, Region::Global),
        FeedSource::news(
            "https://economictimes.indiatimes.com/markets/rssfeeds/1977021501.cms",
            "Economic Times Markets",
            Topic::Finance,
            Region::India,
        ),
        FeedSource::news("https://www.moneycontrol.com/rss/business.xml", "Moneycontrol", Topic::Finance, Region::India),
        // Technology
        FeedSource::news("https://www.theverge.com/rss/index.xml", "The Verge", Topic::Tech, Region::Global),
        FeedSource::news("https://arstechnica.com/feed/", "Ars Technica", Topic::Tech, Region::Global),
        FeedSource::news("https://www.wired.com/feed/rss", "Wired", Topic::Tech, Region::Global),
        FeedSource::news("https://yourstory.com/feed", "YourStory", Topic::Tech, Region::India),
    ]
}

pub fn hackathon_feeds() -> Vec<FeedSource> {
    vec![
        FeedSource::new("https://dev.to/feed/tag/hackathon", "Dev.to", Category::Hackathon),
        FeedSource::new("https://medium.com/feed/tag/hackathon", "Medium", Category::Hackathon),
    ]
}

pub fn job_feeds() -> Vec<FeedSource> {
    vec![
        FeedSource::new(
            "https://weworkremotely.com/categories/remote-management-and-finance-jobs.rss",
            "WeWorkRemotely",
            Category::Job,
        ),
        FeedSource::new("https://remoteok.com/rss?tags=finance", "RemoteOK", Category::Job),
    ]
}

pub fn research_feeds() -> Vec<FeedSource> {
    vec![
        FeedSource::new("https://rss.arxiv.org/rss/q-fin", "arXiv q-fin", Category::Research),
        FeedSource::new("https://rss.arxiv.org/rss/econ.GN", "arXiv econ", Category::Research),
    ]
}

/// Live "on this day" listings; the curated table covers milestones
pub fn history_feeds() -> Vec<FeedSource> {
    vec![FeedSource::new(
        "https://en.wikipedia.org/w/api.php?action=featuredfeed&feed=onthisday&feedformat=atom",
        "Wikipedia On This Day",
        Category::History,
    )]
}
