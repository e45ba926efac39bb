//! Collaborator traits and per-URL outcome types
//!
//! The crawler never speaks HTTP or parses HTML itself. It schedules calls
//! into a [`Downloader`] and into the [`Document`]s it returns, and records
//! what happened to each URL in a [`CrawlResult`].

use crate::UrlError;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Fetches a URL and returns its content as a [`Document`]
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, url: &str) -> Result<Box<dyn Document>, DownloadError>;
}

/// Fetched content that can list its outbound links
#[async_trait]
pub trait Document: Send + Sync {
    async fn extract_links(&self) -> Result<Vec<String>, ExtractError>;
}

/// Failure reported by a [`Downloader`]
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("Request timeout")]
    Timeout,

    #[error("Host unreachable: {0}")]
    Unreachable(String),

    #[error("{0}")]
    Other(String),
}

/// Failure reported by [`Document::extract_links`]
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Extraction task failed: {0}")]
    Join(String),
}

/// Why a URL ended up in [`CrawlResult::errors`]
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Malformed URL {url}: {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: UrlError,
    },

    #[error("Download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: DownloadError,
    },
}

impl CrawlError {
    /// Short label used when grouping errors for display
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedUrl { .. } => "malformed-url",
            Self::Download {
                source: DownloadError::Status { .. },
                ..
            } => "http-status",
            Self::Download {
                source: DownloadError::Timeout,
                ..
            } => "timeout",
            Self::Download {
                source: DownloadError::Unreachable(_),
                ..
            } => "unreachable",
            Self::Download { .. } => "download",
        }
    }
}

/// Outcome of one crawl
///
/// A URL appears in at most one of `downloaded` and `errors`. URLs excluded by
/// the host allow-list appear in neither.
#[derive(Debug, Default)]
pub struct CrawlResult {
    /// URLs downloaded successfully, in no particular order
    pub downloaded: Vec<String>,

    /// URLs that failed, with the reason
    pub errors: HashMap<String, CrawlError>,
}
