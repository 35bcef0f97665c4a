use crate::rss_utils::{feed, time, url};
use crate::types::{
    BalancePolicy, Category, HistoricalEvent, ItemOrigin, KnowledgeSource, NormalizedItem,
    TerminologyEntry,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

const GLOSSARY_LABEL: &str = "Glossary";

/// In-process, read-only knowledge tables
#[derive(Debug, Clone, Default)]
pub struct StaticKnowledge {
    history: BTreeMap<String, Vec<HistoricalEvent>>,
    terminology: Vec<TerminologyEntry>,
}

impl StaticKnowledge {
    pub fn new(
        history: BTreeMap<String, Vec<HistoricalEvent>>,
        terminology: Vec<TerminologyEntry>,
    ) -> Self {
        Self {
            history,
            terminology,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The curated finance and fintech milestones plus the glossary
    pub fn curated() -> Self {
        let mut history: BTreeMap<String, Vec<HistoricalEvent>> = BTreeMap::new();
        for (key, event) in curated_events() {
            history.entry(key.to_string()).or_default().push(event);
        }
        Self::new(history, curated_terminology())
    }
}

impl KnowledgeSource for StaticKnowledge {
    fn history_dates(&self) -> Vec<&str> {
        self.history.keys().map(String::as_str).collect()
    }

    fn events_on(&self, month_day: &str) -> &[HistoricalEvent] {
        self.history.get(month_day).map(Vec::as_slice).unwrap_or(&[])
    }

    fn terminology(&self) -> &[TerminologyEntry] {
        &self.terminology
    }
}

/// Build a `history` item dated on the event's own year/month/day
pub fn history_item(
    month_day: &str,
    event: &HistoricalEvent,
    now: DateTime<Utc>,
    word_cap: usize,
) -> NormalizedItem {
    let published_at = time::historical_date(month_day, event.year)
        .map(|date| time::clamp_published(Some(date), now))
        .unwrap_or(now);

    NormalizedItem {
        title: feed::clean_title(Some(&event.title)),
        link: url::absolute_link_or_placeholder(Some(&event.link)),
        published_at,
        snippet: feed::clean_snippet(&event.description, word_cap),
        source_label: format!("History ({})", event.year),
        category: Category::History,
        topic: None,
        region: None,
        origin: ItemOrigin::Curated,
    }
}

/// Build a `terminology` item titled `"<term> (<category>)"`
pub fn terminology_item(entry: &TerminologyEntry, now: DateTime<Utc>, word_cap: usize) -> NormalizedItem {
    NormalizedItem {
        title: feed::clean_title(Some(&format!("{} ({})", entry.term.trim(), entry.category.trim()))),
        link: url::absolute_link_or_placeholder(entry.link.as_deref()),
        published_at: now,
        snippet: feed::clean_snippet(&entry.definition, word_cap),
        source_label: entry
            .attribution_source
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or(GLOSSARY_LABEL)
            .to_string(),
        category: Category::Terminology,
        topic: None,
        region: None,
        origin: ItemOrigin::Curated,
    }
}

/// Every curated event with its `MM-DD` key.
///
/// Events whose title or full description mention a regional marker are
/// tagged with the policy's minority region.
pub fn curated_history_items(
    knowledge: &dyn KnowledgeSource,
    now: DateTime<Utc>,
    word_cap: usize,
    policy: &BalancePolicy,
) -> Vec<NormalizedItem> {
    knowledge
        .history_dates()
        .into_iter()
        .flat_map(|key| {
            knowledge.events_on(key).iter().map(move |event| {
                let mut item = history_item(key, event, now, word_cap);
                if feed::mentions_any(&event.title, &event.description, &policy.regional_markers) {
                    item.region = Some(policy.minority_region);
                }
                item
            })
        })
        .collect()
}

fn event(title: &str, year: i32, description: &str, link: &str) -> HistoricalEvent {
    HistoricalEvent {
        title: title.to_string(),
        year,
        description: description.to_string(),
        link: link.to_string(),
        attribution_source: "Wikipedia".to_string(),
    }
}

fn term(term: &str, category: &str, definition: &str, link: Option<&str>) -> TerminologyEntry {
    TerminologyEntry {
        term: term.to_string(),
        category: category.to_string(),
        definition: definition.to_string(),
        link: link.map(str::to_string),
        attribution_source: link.map(|_| "Investopedia".to_string()),
    }
}

fn curated_events() -> Vec<(&'static str, HistoricalEvent)> {
    vec![
        ("01-01", event(
            "Euro Introduced as an Accounting Currency",
            1999,
            "Eleven EU member states locked their exchange rates and adopted the euro for electronic payments and financial markets.",
            "https://en.wikipedia.org/wiki/Euro",
        )),
        ("01-03", event(
            "Bitcoin Genesis Block Mined",
            2009,
            "Satoshi Nakamoto mined the first block of the Bitcoin blockchain, embedding a newspaper headline about bank bailouts.",
            "https://en.wikipedia.org/wiki/Genesis_block",
        )),
        ("02-08", event(
            "Nasdaq Begins Trading",
            1971,
            "The Nasdaq opened as the world's first electronic stock market, quoting prices by computer instead of on a trading floor.",
            "https://en.wikipedia.org/wiki/Nasdaq",
        )),
        ("03-10", event(
            "Dot-com Bubble Peaks",
            2000,
            "The Nasdaq Composite closed at a record high before the collapse of internet stocks wiped out trillions in market value.",
            "https://en.wikipedia.org/wiki/Dot-com_bubble",
        )),
        ("04-01", event(
            "Reserve Bank of India Established",
            1935,
            "The Reserve Bank of India began operations as the central bank responsible for the Indian rupee and monetary policy.",
            "https://en.wikipedia.org/wiki/Reserve_Bank_of_India",
        )),
        ("04-11", event(
            "UPI Launched in India",
            2016,
            "The National Payments Corporation of India launched the Unified Payments Interface, enabling instant bank-to-bank mobile payments.",
            "https://en.wikipedia.org/wiki/Unified_Payments_Interface",
        )),
        ("04-12", event(
            "SEBI Constituted",
            1988,
            "The Securities and Exchange Board of India was set up to regulate the Indian securities market and protect investors.",
            "https://en.wikipedia.org/wiki/Securities_and_Exchange_Board_of_India",
        )),
        ("05-17", event(
            "Buttonwood Agreement Signed",
            1792,
            "Twenty-four stockbrokers signed an agreement under a buttonwood tree on Wall Street, the origin of the New York Stock Exchange.",
            "https://en.wikipedia.org/wiki/Buttonwood_Agreement",
        )),
        ("05-18", event(
            "Facebook IPO",
            2012,
            "Facebook listed on the Nasdaq in one of the largest technology public offerings in history.",
            "https://en.wikipedia.org/wiki/Initial_public_offering_of_Facebook",
        )),
        ("07-09", event(
            "Bombay Stock Exchange Founded",
            1875,
            "The Native Share & Stock Brokers' Association, later the BSE, was founded in Bombay as Asia's first stock exchange.",
            "https://en.wikipedia.org/wiki/Bombay_Stock_Exchange",
        )),
        ("07-22", event(
            "Bretton Woods Agreement Concluded",
            1944,
            "Delegates from 44 nations agreed a post-war monetary system and created the IMF and the World Bank.",
            "https://en.wikipedia.org/wiki/Bretton_Woods_system",
        )),
        ("07-24", event(
            "India's Liberalisation Budget",
            1991,
            "Finance Minister Manmohan Singh presented the budget that opened the Indian economy to foreign investment and trade.",
            "https://en.wikipedia.org/wiki/Economic_liberalisation_in_India",
        )),
        ("08-15", event(
            "Nixon Shock",
            1971,
            "President Nixon suspended the convertibility of the US dollar into gold, ending the Bretton Woods system of fixed exchange rates.",
            "https://en.wikipedia.org/wiki/Nixon_shock",
        )),
        ("08-19", event(
            "Google IPO",
            2004,
            "Google went public through an unusual Dutch auction, pricing shares at $85 on the Nasdaq.",
            "https://en.wikipedia.org/wiki/Google",
        )),
        ("09-15", event(
            "Lehman Brothers Files for Bankruptcy",
            2008,
            "The largest bankruptcy filing in US history triggered the most acute phase of the global financial crisis.",
            "https://en.wikipedia.org/wiki/Bankruptcy_of_Lehman_Brothers",
        )),
        ("10-19", event(
            "Black Monday",
            1987,
            "Stock markets around the world crashed and the Dow Jones Industrial Average fell 22.6% in a single day.",
            "https://en.wikipedia.org/wiki/Black_Monday_(1987)",
        )),
        ("10-29", event(
            "Black Tuesday",
            1929,
            "Panic selling on the New York Stock Exchange marked the start of the Great Depression.",
            "https://en.wikipedia.org/wiki/Wall_Street_crash_of_1929",
        )),
        ("10-31", event(
            "Bitcoin Whitepaper Published",
            2008,
            "Satoshi Nakamoto published \"Bitcoin: A Peer-to-Peer Electronic Cash System\" to a cryptography mailing list.",
            "https://en.wikipedia.org/wiki/Bitcoin",
        )),
        ("11-03", event(
            "NSE Begins Equity Trading",
            1994,
            "The National Stock Exchange of India started screen-based equity trading, bringing electronic markets to India.",
            "https://en.wikipedia.org/wiki/National_Stock_Exchange_of_India",
        )),
        ("11-08", event(
            "Indian Demonetisation Announced",
            2016,
            "The Government of India withdrew ₹500 and ₹1000 banknotes, accelerating the shift to UPI and digital wallets like Paytm.",
            "https://en.wikipedia.org/wiki/2016_Indian_banknote_demonetisation",
        )),
        ("12-12", event(
            "Apple IPO",
            1980,
            "Apple Computer went public, creating more instant millionaires than any company before it.",
            "https://en.wikipedia.org/wiki/Apple_Inc.",
        )),
        ("12-23", event(
            "Federal Reserve Act Signed",
            1913,
            "President Wilson signed the act creating the Federal Reserve System as the central bank of the United States.",
            "https://en.wikipedia.org/wiki/Federal_Reserve_Act",
        )),
    ]
}

fn curated_terminology() -> Vec<TerminologyEntry> {
    vec![
        term("UPI", "Payments", "Unified Payments Interface: India's real-time system for instant transfers between bank accounts from a mobile phone.", Some("https://www.investopedia.com/unified-payments-interface-upi-8545470")),
        term("KYC", "Compliance", "Know Your Customer: the checks a financial institution performs to verify the identity of its clients.", Some("https://www.investopedia.com/terms/k/knowyourclient.asp")),
        term("Blockchain", "Crypto", "A distributed ledger in which records are grouped into blocks linked by cryptographic hashes.", Some("https://www.investopedia.com/terms/b/blockchain.asp")),
        term("DeFi", "Crypto", "Decentralized finance: financial services such as lending and trading built on public blockchains without intermediaries.", Some("https://www.investopedia.com/decentralized-finance-defi-5113835")),
        term("Open Banking", "Banking", "A practice that lets third-party providers access bank data through APIs with the customer's consent.", None),
        term("BNPL", "Lending", "Buy now, pay later: point-of-sale financing that splits a purchase into short-term instalments.", Some("https://www.investopedia.com/buy-now-pay-later-5182291")),
        term("Neobank", "Banking", "A digital-only bank that operates without physical branches.", None),
        term("Stablecoin", "Crypto", "A cryptocurrency designed to hold a stable value by pegging it to a reserve asset such as the US dollar.", Some("https://www.investopedia.com/terms/s/stablecoin.asp")),
        term("IPO", "Markets", "Initial public offering: the first sale of a private company's shares to the public.", Some("https://www.investopedia.com/terms/i/ipo.asp")),
        term("Market Capitalisation", "Markets", "The total value of a company's outstanding shares, computed as share price times share count.", None),
        term("Repo Rate", "Monetary Policy", "The rate at which a central bank such as the RBI lends short-term money to commercial banks.", None),
        term("Payment Gateway", "Payments", "A service that authorises and processes card and online payments for merchants.", None),
        term("RegTech", "Compliance", "Technology that helps firms meet regulatory requirements more efficiently.", None),
        term("Sensex", "Markets", "The benchmark index of 30 large companies listed on the BSE.", None),
    ]
}
