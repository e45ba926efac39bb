//! HTTP downloader implementation
//!
//! This module provides the production `Downloader`:
//! - Building HTTP clients with a proper user agent string
//! - GET requests with bounded redirects and timeouts
//! - Error classification into `DownloadError`
//!
//! Failed downloads are reported once and never retried.

use crate::config::UserAgentConfig;
use crate::crawler::parser::HtmlDocument;
use crate::crawler::traits::{Document, DownloadError, Downloader};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::UserAgentConfig;
/// use ripple_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent(config))
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent: `Name/Version` or `Name/Version (+ContactURL)`
fn user_agent(config: &UserAgentConfig) -> String {
    match &config.contact_url {
        Some(contact) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    }
}

/// Downloads pages over HTTP(S) and wraps them as `HtmlDocument`s
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str) -> Result<Box<dyn Document>, DownloadError> {
        let response = self.client.get(url).send().await.map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|content_type| content_type.contains("html"))
            .unwrap_or(true);

        if !is_html {
            // Non-HTML content downloads fine but has no links to follow.
            tracing::debug!("{} is not HTML, not reading body", final_url);
            return Ok(Box::new(HtmlDocument::new(final_url, String::new())));
        }

        let body = response.text().await.map_err(classify_error)?;
        Ok(Box::new(HtmlDocument::new(final_url, body)))
    }
}

fn classify_error(error: reqwest::Error) -> DownloadError {
    if error.is_timeout() {
        DownloadError::Timeout
    } else if error.is_connect() {
        DownloadError::Unreachable(error.to_string())
    } else {
        DownloadError::Http(error)
    }
}
