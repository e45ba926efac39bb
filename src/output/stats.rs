//! Statistics derived from a finished crawl

use crate::crawler::CrawlResult;
use crate::url::extract_host;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Number of URLs downloaded successfully
    pub downloaded: usize,

    /// Number of URLs that failed
    pub failed: usize,

    /// Successful downloads per host
    pub downloads_by_host: HashMap<String, usize>,

    /// Error counts grouped by `CrawlError::kind`
    pub errors_by_kind: HashMap<&'static str, usize>,

    /// Wall-clock time the crawl took
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Computes statistics from a crawl result
    pub fn from_result(result: &CrawlResult, elapsed: Duration) -> Self {
        let mut downloads_by_host = HashMap::new();
        for url in &result.downloaded {
            if let Ok(host) = extract_host(url) {
                *downloads_by_host.entry(host).or_insert(0) += 1;
            }
        }

        let mut errors_by_kind = HashMap::new();
        for error in result.errors.values() {
            *errors_by_kind.entry(error.kind()).or_insert(0) += 1;
        }

        Self {
            downloaded: result.downloaded.len(),
            failed: result.errors.len(),
            downloads_by_host,
            errors_by_kind,
            elapsed,
        }
    }

    /// Total number of URLs with an outcome
    pub fn total(&self) -> usize {
        self.downloaded + self.failed
    }

    /// Percentage of URLs with an outcome that downloaded successfully
    pub fn success_rate(&self) -> f64 {
        if self.total() > 0 {
            (self.downloaded as f64 / self.total() as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Downloaded: {}", stats.downloaded);
    println!("  Failed: {}", stats.failed);
    println!("  Elapsed: {:.2?}", stats.elapsed);
    println!();

    if !stats.downloads_by_host.is_empty() {
        println!("Downloads by Host:");
        let mut host_counts: Vec<_> = stats.downloads_by_host.iter().collect();
        host_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (host, count) in host_counts {
            println!("  {}: {}", host, count);
        }
        println!();
    }

    if !stats.errors_by_kind.is_empty() {
        println!("Error Summary:");
        let mut error_counts: Vec<_> = stats.errors_by_kind.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (kind, count) in error_counts {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} URLs downloaded)",
        stats.success_rate(),
        stats.downloaded,
        stats.total()
    );
}

/// Prints the downloaded and failed URLs, sorted
pub fn print_result(result: &CrawlResult) {
    let mut downloaded: Vec<&String> = result.downloaded.iter().collect();
    downloaded.sort();

    println!("Downloaded ({}):", downloaded.len());
    for url in downloaded {
        println!("  {}", url);
    }

    let errors: BTreeMap<&String, String> = result
        .errors
        .iter()
        .map(|(url, error)| (url, error.to_string()))
        .collect();
    if !errors.is_empty() {
        println!("\nFailed ({}):", errors.len());
        for (url, error) in errors {
            println!("  {}: {}", url, error);
        }
    }
}
