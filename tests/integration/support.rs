//! An instrumented in-memory web for crawler tests

use async_trait::async_trait;
use ripple_crawl::crawler::{Document, DownloadError, Downloader, ExtractError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a single URL behaves when downloaded
#[derive(Debug, Clone, Default)]
pub struct MockPage {
    pub links: Vec<String>,
    pub fail_download: bool,
    pub fail_extract: bool,
    pub delay: Duration,
}

impl MockPage {
    pub fn links(links: &[&str]) -> Self {
        Self {
            links: links.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_download: true,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_failing_extract(mut self) -> Self {
        self.fail_extract = true;
        self
    }
}

/// Download start/finish events, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started(String),
    Finished(String),
}

#[derive(Debug, Default)]
struct HostLoad {
    current: usize,
    peak: usize,
}

/// A `Downloader` over a fixed set of pages that records how it was called
///
/// URLs with no page fail like a 404.
#[derive(Default)]
pub struct MockWeb {
    pages: HashMap<String, MockPage>,
    calls: Mutex<HashMap<String, usize>>,
    hosts: Mutex<HashMap<String, HostLoad>>,
    events: Mutex<Vec<Event>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    extractions: Arc<AtomicUsize>,
}

impl MockWeb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, page: MockPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Number of `download` calls per URL
    pub fn calls(&self) -> HashMap<String, usize> {
        self.calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Highest number of simultaneous downloads seen for `host`
    pub fn peak_for_host(&self, host: &str) -> usize {
        self.hosts
            .lock()
            .unwrap()
            .get(host)
            .map(|load| load.peak)
            .unwrap_or(0)
    }

    /// Highest number of simultaneous downloads seen across all hosts
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn extractions(&self) -> usize {
        self.extractions.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn enter(&self, url: &str) {
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
        self.events
            .lock()
            .unwrap()
            .push(Event::Started(url.to_string()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Ok(host) = ripple_crawl::extract_host(url) {
            let mut hosts = self.hosts.lock().unwrap();
            let load = hosts.entry(host).or_default();
            load.current += 1;
            load.peak = load.peak.max(load.current);
        }
    }

    fn leave(&self, url: &str) {
        if let Ok(host) = ripple_crawl::extract_host(url) {
            if let Some(load) = self.hosts.lock().unwrap().get_mut(&host) {
                load.current -= 1;
            }
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.events
            .lock()
            .unwrap()
            .push(Event::Finished(url.to_string()));
    }
}

/// Decrements the in-flight counters even if the download future is dropped
struct InFlight<'a> {
    web: &'a MockWeb,
    url: &'a str,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.web.leave(self.url);
    }
}

#[async_trait]
impl Downloader for MockWeb {
    async fn download(&self, url: &str) -> Result<Box<dyn Document>, DownloadError> {
        self.enter(url);
        let _guard = InFlight { web: self, url };

        let page = self.pages.get(url).cloned();
        if let Some(page) = &page {
            if !page.delay.is_zero() {
                tokio::time::sleep(page.delay).await;
            } else {
                tokio::task::yield_now().await;
            }
        }

        match page {
            Some(page) if !page.fail_download => Ok(Box::new(MockDocument {
                page,
                extractions: Arc::clone(&self.extractions),
            })),
            Some(_) => Err(DownloadError::Other(format!("connection reset: {}", url))),
            None => Err(DownloadError::Status { status: 404 }),
        }
    }
}

struct MockDocument {
    page: MockPage,
    extractions: Arc<AtomicUsize>,
}

#[async_trait]
impl Document for MockDocument {
    async fn extract_links(&self) -> Result<Vec<String>, ExtractError> {
        self.extractions.fetch_add(1, Ordering::SeqCst);
        if self.page.fail_extract {
            return Err(ExtractError::Parse {
                url: "mock".to_string(),
                message: "unterminated tag".to_string(),
            });
        }
        Ok(self.page.links.clone())
    }
}
