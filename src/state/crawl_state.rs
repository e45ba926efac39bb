use crate::crawler::{CrawlError, CrawlResult};
use dashmap::{DashMap, DashSet};
use std::collections::HashMap;

/// Shared bookkeeping for a single crawl
///
/// Every collection supports concurrent insert-if-absent, so download and
/// extract tasks can update it without a crawl-wide lock.
#[derive(Debug, Default)]
pub struct CrawlState {
    /// URLs that have been scheduled for download (write-once per URL)
    visited: DashSet<String>,

    /// URLs whose download completed without error
    downloaded: DashSet<String>,

    /// URLs whose download (or host derivation) failed
    errors: DashMap<String, CrawlError>,
}

impl CrawlState {
    /// Creates an empty crawl state
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as scheduled
    ///
    /// Returns `true` if this call inserted it, `false` if it was already
    /// visited. Exactly one caller wins for any URL.
    pub fn mark_visited(&self, url: &str) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string())
    }

    /// Returns whether `url` has been scheduled
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Records a successful download
    pub fn record_success(&self, url: &str) {
        self.downloaded.insert(url.to_string());
    }

    /// Records a failed URL; the first failure recorded for a URL is kept
    pub fn record_error(&self, url: &str, error: CrawlError) {
        self.errors.entry(url.to_string()).or_insert(error);
    }

    /// Turns discovered links into the next frontier
    ///
    /// Only links that have never been scheduled survive, and each of them is
    /// marked visited in the same step.
    pub fn next_frontier<I>(&self, discovered: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        discovered
            .into_iter()
            .filter(|url| self.mark_visited(url))
            .collect()
    }

    /// Number of URLs scheduled so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of successful downloads so far
    pub fn downloaded_count(&self) -> usize {
        self.downloaded.len()
    }

    /// Number of failed URLs so far
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Moves the successes and errors out into a `CrawlResult`
    ///
    /// Called once the crawl's last level has finished. Both collections are
    /// drained, so a second call returns an empty result. The visited set is
    /// left alone.
    pub fn take_result(&self) -> CrawlResult {
        let keys: Vec<String> = self.downloaded.iter().map(|url| url.key().clone()).collect();
        let downloaded: Vec<String> = keys
            .iter()
            .filter_map(|key| self.downloaded.remove(key))
            .collect();

        let keys: Vec<String> = self.errors.iter().map(|entry| entry.key().clone()).collect();
        let errors: HashMap<String, CrawlError> = keys
            .iter()
            .filter_map(|key| self.errors.remove(key))
            .collect();

        CrawlResult { downloaded, errors }
    }
}
