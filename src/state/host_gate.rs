use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Per-host admission control for downloads
///
/// Each distinct host gets its own counting semaphore of `per_host` permits,
/// created on first use and kept for the life of the gate. Semaphores are
/// handed out through `DashMap::entry`, so racing callers for a new host all
/// receive the same pool.
#[derive(Debug)]
pub struct HostGate {
    hosts: DashMap<String, Arc<Semaphore>>,
    per_host: usize,
}

/// An admission permit for one in-flight download
///
/// Dropping the permit releases it, which also covers tasks that are
/// abandoned while holding one.
#[derive(Debug)]
pub struct HostPermit {
    host: String,
    _permit: OwnedSemaphorePermit,
}

impl Drop for HostPermit {
    fn drop(&mut self) {
        tracing::trace!("Released host permit for {}", self.host);
    }
}

impl HostGate {
    /// Creates a gate allowing `per_host` concurrent downloads per host
    pub fn new(per_host: usize) -> Self {
        Self {
            hosts: DashMap::new(),
            per_host,
        }
    }

    /// Waits until `host` has a free slot and takes it
    ///
    /// Returns `None` only if the gate was closed while waiting.
    pub async fn acquire(&self, host: &str) -> Option<HostPermit> {
        let semaphore = self.semaphore(host);
        let permit = semaphore.acquire_owned().await.ok()?;
        tracing::trace!("Acquired host permit for {}", host);
        Some(HostPermit {
            host: host.to_string(),
            _permit: permit,
        })
    }

    /// Number of downloads currently admitted to `host`
    pub fn in_flight(&self, host: &str) -> usize {
        self.hosts
            .get(host)
            .map(|semaphore| self.per_host - semaphore.available_permits())
            .unwrap_or(0)
    }

    /// Number of distinct hosts seen so far
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Closes every host semaphore, waking all waiters with `None`
    pub fn close(&self) {
        for entry in self.hosts.iter() {
            entry.value().close();
        }
    }

    fn semaphore(&self, host: &str) -> Arc<Semaphore> {
        // The map guard is released at the end of this statement, before any await.
        Arc::clone(
            self.hosts
                .entry(host.to_string())
                .or_insert_with(|| Arc::new(Semaphore::new(self.per_host)))
                .value(),
        )
    }
}
