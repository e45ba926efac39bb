//! Crawler coordinator - level-by-level crawl orchestration
//!
//! This module drives the breadth-first crawl:
//! - Submitting each frontier URL to the download stage
//! - Gating downloads per host and filtering them by the allow-list
//! - Handing downloaded documents to the extract stage
//! - Waiting on the level barrier before computing the next frontier
//! - Building the final `CrawlResult`

use crate::config::{validate_crawler_config, CrawlerConfig};
use crate::crawler::barrier::LevelBarrier;
use crate::crawler::pool::WorkerPool;
use crate::crawler::traits::{CrawlError, CrawlResult, Document, Downloader};
use crate::state::{CrawlState, HostGate};
use crate::url::{extract_host, normalize_host};
use crate::{ConfigError, Result, RippleError};
use dashmap::DashSet;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Number of timed waits `shutdown` makes before giving up on the pools
const SHUTDOWN_ATTEMPTS: u32 = 5;

/// Length of each timed wait in `shutdown`
const SHUTDOWN_WAIT: Duration = Duration::from_millis(200);

/// The stages shared by every task a crawler spawns
#[derive(Clone)]
struct Pipeline {
    downloader: Arc<dyn Downloader>,
    gate: Arc<HostGate>,
    downloads: WorkerPool,
    extracts: WorkerPool,
}

/// Everything a task needs to know about the level it belongs to
#[derive(Clone)]
struct Level {
    number: u32,
    follow_links: bool,
    state: Arc<CrawlState>,
    hosts: Option<Arc<HashSet<String>>>,
    discovered: Arc<DashSet<String>>,
    barrier: Arc<LevelBarrier>,
}

/// Bounded-concurrency breadth-first web crawler
///
/// A crawler owns two worker pools (downloads and link extraction) and a
/// per-host admission gate. All three are fixed at construction and shared by
/// every crawl it runs; the host gate in particular persists across crawls.
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::UserAgentConfig;
/// use ripple_crawl::crawler::{Crawler, HttpDownloader};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = Arc::new(HttpDownloader::new(&UserAgentConfig::default())?);
/// let crawler = Crawler::new(downloader, 16, 16, 4)?;
/// let result = crawler.crawl("https://example.com/", 2).await?;
/// println!("{} pages downloaded", result.downloaded.len());
/// crawler.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct Crawler {
    pipeline: Pipeline,
    closed: AtomicBool,
}

impl Crawler {
    /// Creates a crawler
    ///
    /// # Arguments
    ///
    /// * `downloader` - Fetches pages
    /// * `downloaders` - Download pool size
    /// * `extractors` - Extract pool size
    /// * `per_host` - Maximum in-flight downloads per host
    ///
    /// # Returns
    ///
    /// * `Err(RippleError::Config)` - One of the sizes is zero
    pub fn new(
        downloader: Arc<dyn Downloader>,
        downloaders: usize,
        extractors: usize,
        per_host: usize,
    ) -> Result<Self> {
        for (name, value) in [
            ("downloaders", downloaders),
            ("extractors", extractors),
            ("per-host", per_host),
        ] {
            if value == 0 {
                return Err(ConfigError::Validation(format!("{} must be positive", name)).into());
            }
        }

        tracing::debug!(
            "Creating crawler: {} downloaders, {} extractors, {} per host",
            downloaders,
            extractors,
            per_host
        );

        Ok(Self {
            pipeline: Pipeline {
                downloader,
                gate: Arc::new(HostGate::new(per_host)),
                downloads: WorkerPool::new("download", downloaders),
                extracts: WorkerPool::new("extract", extractors),
            },
            closed: AtomicBool::new(false),
        })
    }

    /// Creates a crawler sized by a validated `CrawlerConfig`
    pub fn from_config(
        downloader: Arc<dyn Downloader>,
        config: &CrawlerConfig,
    ) -> Result<Self> {
        validate_crawler_config(config)?;
        Self::new(
            downloader,
            config.downloaders,
            config.extractors,
            config.per_host,
        )
    }

    /// Crawls from `url` down to `depth` levels with no host restriction
    ///
    /// `depth = 1` downloads only `url` and extracts nothing.
    pub async fn crawl(&self, url: &str, depth: u32) -> Result<CrawlResult> {
        self.crawl_with_hosts(url, depth, None).await
    }

    /// Crawls from `url`, downloading only URLs whose host is in `hosts`
    ///
    /// `None` means unrestricted. Entries are compared case-insensitively
    /// against the URL's host, which never includes the port. URLs outside the
    /// allow-list are excluded silently: they appear in neither `downloaded`
    /// nor `errors`.
    ///
    /// Per-URL failures never make this return `Err`; they are collected in
    /// the result. `Err` means the crawl could not start at all.
    pub async fn crawl_with_hosts(
        &self,
        url: &str,
        depth: u32,
        hosts: Option<HashSet<String>>,
    ) -> Result<CrawlResult> {
        if self.is_closed() {
            return Err(RippleError::Closed);
        }
        if depth < 1 {
            return Err(RippleError::InvalidDepth(depth));
        }

        let start_time = Instant::now();
        let state = Arc::new(CrawlState::new());
        let hosts = hosts.map(|hosts| {
            Arc::new(
                hosts
                    .iter()
                    .map(|host| normalize_host(host))
                    .collect::<HashSet<_>>(),
            )
        });

        tracing::info!("Starting crawl of {} (depth {})", url, depth);

        state.mark_visited(url);
        let mut frontier = vec![url.to_string()];

        for number in 1..=depth {
            if frontier.is_empty() {
                tracing::info!("Frontier is empty, crawl complete after level {}", number - 1);
                break;
            }
            if self.is_closed() {
                tracing::warn!("Crawler closed, abandoning crawl before level {}", number);
                break;
            }

            let level = Level {
                number,
                follow_links: number < depth,
                state: Arc::clone(&state),
                hosts: hosts.clone(),
                discovered: Arc::new(DashSet::new()),
                barrier: LevelBarrier::new(),
            };

            tracing::info!("Level {}: {} URLs in frontier", number, frontier.len());
            self.run_level(&level, frontier).await;

            let discovered: Vec<String> = level
                .discovered
                .iter()
                .map(|link| link.key().clone())
                .collect();
            frontier = if level.follow_links {
                state.next_frontier(discovered)
            } else {
                Vec::new()
            };

            tracing::info!(
                "Level {} done: {} downloaded, {} errors, {} new URLs",
                number,
                state.downloaded_count(),
                state.error_count(),
                frontier.len()
            );
            tracing::debug!(
                "{} URLs visited across {} hosts so far",
                state.visited_count(),
                self.pipeline.gate.host_count()
            );
        }

        let result = state.take_result();
        tracing::info!(
            "Crawl of {} finished in {:?}: {} downloaded, {} errors",
            url,
            start_time.elapsed(),
            result.downloaded.len(),
            result.errors.len()
        );

        Ok(result)
    }

    /// Submits one level's frontier and waits for all of its work
    async fn run_level(&self, level: &Level, frontier: Vec<String>) {
        {
            // Held while submitting so the barrier cannot open early.
            let _submitting = level.barrier.register();
            for url in frontier {
                self.pipeline.submit_download(url, level.clone());
            }
        }
        level.barrier.wait().await;
    }

    /// Terminates both worker pools and abandons queued and running tasks
    ///
    /// Idempotent and non-blocking. A crawl in progress returns what it has
    /// gathered so far; later calls to `crawl` return `RippleError::Closed`.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("Closing crawler");
        self.request_termination();
    }

    /// Closes the crawler and waits for both pools to terminate
    ///
    /// Waits in a bounded loop of timed attempts, re-requesting termination
    /// after each one that times out, and gives up after the last attempt.
    /// Returns `true` if both pools reported termination.
    pub async fn shutdown(&self) -> bool {
        self.close();

        for attempt in 1..=SHUTDOWN_ATTEMPTS {
            let (downloads, extracts) = tokio::join!(
                self.pipeline.downloads.await_termination(SHUTDOWN_WAIT),
                self.pipeline.extracts.await_termination(SHUTDOWN_WAIT)
            );
            if downloads && extracts {
                tracing::debug!("Worker pools terminated");
                return true;
            }

            for pool in [&self.pipeline.downloads, &self.pipeline.extracts] {
                tracing::warn!(
                    "{} pool has {} tasks running after shutdown attempt {}/{}",
                    pool.name(),
                    pool.pending_tasks(),
                    attempt,
                    SHUTDOWN_ATTEMPTS
                );
            }
            self.request_termination();
        }

        tracing::warn!("Giving up waiting for worker pools to terminate");
        false
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of downloads currently admitted to `host`
    pub fn in_flight(&self, host: &str) -> usize {
        self.pipeline.gate.in_flight(host)
    }

    fn request_termination(&self) {
        self.pipeline.downloads.close();
        self.pipeline.extracts.close();
        self.pipeline.gate.close();
    }
}

impl Drop for Crawler {
    fn drop(&mut self) {
        self.close();
    }
}

impl Pipeline {
    fn submit_download(&self, url: String, level: Level) {
        let unit = level.barrier.register();
        let pipeline = self.clone();
        self.downloads.spawn(async move {
            pipeline.download_one(url, &level).await;
            drop(unit);
        });
    }

    /// Download stage for one URL
    async fn download_one(&self, url: String, level: &Level) {
        let host = match extract_host(&url) {
            Ok(host) => host,
            Err(source) => {
                tracing::warn!("Malformed URL {}: {}", url, source);
                level.state.record_error(
                    &url,
                    CrawlError::MalformedUrl {
                        url: url.clone(),
                        source,
                    },
                );
                return;
            }
        };

        if let Some(hosts) = &level.hosts {
            if !hosts.contains(&host) {
                tracing::debug!("Skipping {}: host {} is not allowed", url, host);
                return;
            }
        }

        // Host admission comes before the worker slot, so a busy host never
        // ties up workers other hosts could use.
        let Some(permit) = self.gate.acquire(&host).await else {
            return;
        };
        let outcome = self.downloads.run(self.downloader.download(&url)).await;
        drop(permit);

        match outcome {
            None => tracing::debug!("Download pool closed before {} started", url),
            Some(Ok(document)) => {
                tracing::debug!("Downloaded {} (level {})", url, level.number);
                level.state.record_success(&url);
                if level.follow_links {
                    self.submit_extract(url, document, level.clone());
                }
            }
            Some(Err(source)) => {
                tracing::warn!("Failed to download {}: {}", url, source);
                level.state.record_error(
                    &url,
                    CrawlError::Download {
                        url: url.clone(),
                        source,
                    },
                );
            }
        }
    }

    /// Extract stage for one downloaded document
    ///
    /// Extraction failures end this branch of the crawl: they are logged, not
    /// recorded as errors, since the page itself downloaded fine.
    fn submit_extract(&self, url: String, document: Box<dyn Document>, level: Level) {
        let unit = level.barrier.register();
        let extracts = self.extracts.clone();
        self.extracts.spawn(async move {
            match extracts.run(document.extract_links()).await {
                None => tracing::debug!("Extract pool closed before {} started", url),
                Some(Ok(links)) => {
                    tracing::trace!("Extracted {} links from {}", links.len(), url);
                    for link in links {
                        if !level.state.is_visited(&link) {
                            level.discovered.insert(link);
                        }
                    }
                }
                Some(Err(e)) => tracing::warn!("Failed to extract links from {}: {}", url, e),
            }
            drop(unit);
        });
    }
}
