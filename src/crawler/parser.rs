//! HTML link extraction
//!
//! This module handles parsing downloaded HTML to extract links to follow
//! (from `<a>` tags and canonical links).

use crate::crawler::traits::{Document, ExtractError};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// A downloaded HTML page
///
/// Parsing is deferred until `extract_links` is called, and then runs on the
/// blocking thread pool.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    /// The URL the page was served from, used to resolve relative links
    url: Url,
    body: Arc<str>,
}

impl HtmlDocument {
    pub fn new(url: Url, body: String) -> Self {
        Self {
            url,
            body: Arc::from(body),
        }
    }
}

#[async_trait]
impl Document for HtmlDocument {
    async fn extract_links(&self) -> Result<Vec<String>, ExtractError> {
        let body = Arc::clone(&self.body);
        let base_url = self.url.clone();
        tokio::task::spawn_blocking(move || parse_links(&body, &base_url))
            .await
            .map_err(|e| ExtractError::Join(e.to_string()))?
    }
}

/// Parses HTML content and extracts the links to follow
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
/// - Anything that is not HTTP(S) after resolution
///
/// Links are returned in document order with duplicates removed.
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::parse_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = parse_links(html, &base_url).unwrap();
/// assert_eq!(links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_links(html: &str, base_url: &Url) -> Result<Vec<String>, ExtractError> {
    let document = Html::parse_document(html);
    let anchors = selector("a[href]", base_url)?;
    let canonical = selector("link[rel='canonical'][href]", base_url)?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let anchor_hrefs = document
        .select(&anchors)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"));
    let canonical_hrefs = document
        .select(&canonical)
        .filter_map(|element| element.value().attr("href"));

    for href in anchor_hrefs.chain(canonical_hrefs) {
        if let Some(absolute_url) = resolve_link(href, base_url) {
            if seen.insert(absolute_url.clone()) {
                links.push(absolute_url);
            }
        }
    }

    Ok(links)
}

fn selector(css: &str, base_url: &Url) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Parse {
        url: base_url.to_string(),
        message: format!("invalid selector {}: {:?}", css, e),
    })
}

/// Resolves a link href to an absolute URL and validates it
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
