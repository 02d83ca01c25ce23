use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Sitemap-Scout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub discovery: DiscoveryConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum link depth from the base URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of pages recorded before the crawl stops
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Pause between page fetches (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,
}

impl CrawlerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_pages: 500,
            delay_ms: 100,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Maximum redirect hops followed for a single request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("sitemap-scout/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 10,
        }
    }
}

/// What to do when no usable sitemap is found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnMissing {
    /// Ask interactively
    Prompt,
    /// Crawl the site from scratch
    Crawl,
    /// Abort the run
    Cancel,
}

/// Discovery behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Also crawl when a sitemap was found and merge the results
    pub augment: bool,

    /// Fallback when the sitemap is missing, empty or malformed
    #[serde(rename = "on-missing")]
    pub on_missing: OnMissing,

    /// Where the final sitemap document is persisted
    pub output: PathBuf,

    /// Number of sitemap-index children fetched at once
    #[serde(rename = "index-concurrency")]
    pub index_concurrency: usize,

    /// Cap on the number of URLs handed downstream
    pub limit: Option<usize>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            augment: false,
            on_missing: OnMissing::Prompt,
            output: PathBuf::from("sitemap.xml"),
            index_concurrency: 4,
            limit: None,
        }
    }
}
