use serde::Deserialize;

/// Default number of concurrent downloads across all hosts
pub const DEFAULT_DOWNLOADERS: usize = 16;

/// Default number of concurrent link extractions
pub const DEFAULT_EXTRACTORS: usize = 16;

/// Default number of concurrent downloads to a single host
pub const DEFAULT_PER_HOST: usize = 4;

/// Default crawl depth (the seed page plus one level of links)
pub const DEFAULT_DEPTH: u32 = 2;

/// Main configuration structure for Ripple-Crawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Crawler pool sizes and crawl scope
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Size of the download worker pool
    #[serde(default = "default_downloaders")]
    pub downloaders: usize,

    /// Size of the link extraction worker pool
    #[serde(default = "default_extractors")]
    pub extractors: usize,

    /// Maximum number of in-flight downloads to a single host
    #[serde(rename = "per-host", default = "default_per_host")]
    pub per_host: usize,

    /// Number of BFS levels to download, the seed being level 1
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Host allow-list; `None` means every host may be downloaded
    #[serde(default)]
    pub hosts: Option<Vec<String>>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            downloaders: DEFAULT_DOWNLOADERS,
            extractors: DEFAULT_EXTRACTORS,
            per_host: DEFAULT_PER_HOST,
            depth: DEFAULT_DEPTH,
            hosts: None,
        }
    }
}

/// User agent identification for the HTTP downloader
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_downloaders() -> usize {
    DEFAULT_DOWNLOADERS
}

fn default_extractors() -> usize {
    DEFAULT_EXTRACTORS
}

fn default_per_host() -> usize {
    DEFAULT_PER_HOST
}

fn default_depth() -> u32 {
    DEFAULT_DEPTH
}

fn default_crawler_name() -> String {
    "RippleCrawl".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
