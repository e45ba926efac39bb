//! Ripple-Crawl: a bounded-concurrency breadth-first web crawler
//!
//! This crate walks the web level by level from a seed URL, keeping every
//! host under a fixed number of simultaneous downloads and every URL to a
//! single visit per crawl.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Ripple-Crawl operations
///
/// Per-URL failures never surface here; they are recorded in
/// [`crawler::CrawlResult::errors`] instead.
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawler has been closed")]
    Closed,

    #[error("Crawl depth must be at least 1, got {0}")]
    InvalidDepth(u32),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid host: {0}")]
    InvalidHost(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Ripple-Crawl operations
pub type Result<T, E = RippleError> = std::result::Result<T, E>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlError, CrawlResult, Crawler, Document, DownloadError, Downloader};
pub use crate::url::extract_host;
