//! URL handling module for Ripple-Crawl
//!
//! URLs are opaque strings to the crawler: two URLs are the same URL only if
//! their strings are equal. The only structure the crawler reads from a URL is
//! its host, used for admission control and allow-list filtering.

mod host;

pub use host::{extract_host, normalize_host};
