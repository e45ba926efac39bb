use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the host from a URL string
///
/// The host is what the per-host admission gate and the allow-list key on.
/// Ports are not part of the host, so `http://a.com:80/` and
/// `http://a.com:8080/` share one gate.
///
/// # Returns
///
/// * `Ok(String)` - The host, lowercased by the URL parser for domain names
/// * `Err(UrlError)` - The string does not parse or has no host
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::extract_host;
///
/// assert_eq!(extract_host("https://example.com/path").unwrap(), "example.com");
/// assert_eq!(extract_host("https://EXAMPLE.COM/").unwrap(), "example.com");
/// assert!(extract_host("not a url").is_err());
/// ```
pub fn extract_host(url: &str) -> UrlResult<String> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;
    parsed
        .host_str()
        .map(str::to_string)
        .ok_or(UrlError::MissingHost)
}

/// Brings an allow-list entry into the form `extract_host` returns
///
/// Trims surrounding whitespace and lowercases ASCII letters, so `Example.COM`
/// matches URLs on `example.com`.
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::normalize_host;
///
/// assert_eq!(normalize_host(" Example.COM "), "example.com");
/// ```
pub fn normalize_host(host: &str) -> String {
    host.trim().to_ascii_lowercase()
}
