//! Crawler module: the concurrent breadth-first crawl
//!
//! This module contains:
//! - The `Downloader`/`Document` collaborator traits
//! - Bounded worker pools for the download and extract stages
//! - The level barrier that keeps BFS levels strictly ordered
//! - The `Crawler` orchestrator
//! - An HTTP downloader and HTML link extractor

mod barrier;
mod coordinator;
mod fetcher;
mod parser;
mod pool;
mod traits;

pub use barrier::{BarrierUnit, LevelBarrier};
pub use coordinator::Crawler;
pub use fetcher::{build_http_client, HttpDownloader};
pub use parser::{parse_links, HtmlDocument};
pub use pool::WorkerPool;
pub use traits::{CrawlError, CrawlResult, Document, DownloadError, Downloader, ExtractError};
