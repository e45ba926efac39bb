//! Output module for reporting crawl results
//!
//! Results are summarised on stdout only; nothing is written to disk.

pub mod stats;

pub use stats::{print_result, print_statistics, CrawlStatistics};
