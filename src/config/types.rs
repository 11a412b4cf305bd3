use crate::crawler::PageOrder;
use crate::query::Query;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Rent-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub query: Query,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to do when a request cannot be built or executed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportPolicy {
    /// Abort the whole crawl
    #[default]
    Abort,

    /// Log the failure, drop the affected page (or partition) and keep going
    SkipPage,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of in-flight page workers (0 = unbounded)
    #[serde(rename = "max-concurrent-pages", default)]
    pub max_concurrent_pages: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(rename = "transport-policy", default)]
    pub transport_policy: TransportPolicy,

    /// Concatenate page results by page index instead of completion order
    #[serde(rename = "preserve-page-order", default)]
    pub preserve_page_order: bool,

    /// Fetch each record's detail page after the list crawl
    #[serde(rename = "enrich-details", default = "default_true")]
    pub enrich_details: bool,

    /// Detail pages fetched at once (1 = sequential)
    #[serde(rename = "enrich-concurrency", default = "default_enrich_concurrency")]
    pub enrich_concurrency: usize,
}

impl CrawlerConfig {
    /// Returns the page ordering discipline for the aggregator
    pub fn page_order(&self) -> PageOrder {
        if self.preserve_page_order {
            PageOrder::Index
        } else {
            PageOrder::Arrival
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_pages: 0,
            request_timeout_secs: default_request_timeout(),
            transport_policy: TransportPolicy::default(),
            preserve_page_order: false,
            enrich_details: true,
            enrich_concurrency: default_enrich_concurrency(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON export
    #[serde(rename = "json-path")]
    pub json_path: Option<String>,

    /// Path of the spreadsheet (CSV) export
    #[serde(rename = "spreadsheet-path")]
    pub spreadsheet_path: Option<String>,

    /// Path of the area list used to replace section codes with names
    #[serde(rename = "areas-path")]
    pub areas_path: Option<String>,
}

impl OutputConfig {
    /// JSON export path, `YYYY-MM-DD.json` for today when unset
    pub fn json_file(&self) -> PathBuf {
        self.json_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| dated_file("json"))
    }

    /// Spreadsheet export path, `YYYY-MM-DD.csv` for today when unset
    pub fn spreadsheet_file(&self) -> PathBuf {
        self.spreadsheet_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| dated_file("csv"))
    }
}

fn dated_file(extension: &str) -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d");
    PathBuf::from(format!("{}.{}", date, extension))
}

fn default_request_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_enrich_concurrency() -> usize {
    1
}
