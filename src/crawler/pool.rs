//! Bounded worker pools for the download and extract stages

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// A fixed-size pool of workers running async tasks
///
/// Tasks are spawned onto the runtime right away, but only `size` of them can
/// be inside [`WorkerPool::run`] at once. Closing the pool cancels every task
/// at its next suspension point, queued or running.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    name: &'static str,
    slots: Arc<Semaphore>,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl WorkerPool {
    /// Creates a pool with `size` worker slots
    pub fn new(name: &'static str, size: usize) -> Self {
        Self {
            name,
            slots: Arc::new(Semaphore::new(size)),
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Spawns a tracked task that is dropped as soon as the pool closes
    ///
    /// A task spawned after [`WorkerPool::close`] is dropped without being
    /// polled.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        let name = self.name;
        self.tracker.spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => tracing::debug!("{} task abandoned", name),
                _ = task => {}
            }
        });
    }

    /// Runs `work` while holding one worker slot
    ///
    /// Returns `None` if the pool was closed before a slot became free.
    pub async fn run<F: Future>(&self, work: F) -> Option<F::Output> {
        let _slot = self.slots.acquire().await.ok()?;
        Some(work.await)
    }

    /// Pool name, used in log lines
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of spawned tasks that have not finished yet
    pub fn pending_tasks(&self) -> usize {
        self.tracker.len()
    }

    /// Requests termination of every queued and running task
    ///
    /// Non-blocking and safe to call repeatedly.
    pub fn close(&self) {
        self.cancel.cancel();
        self.slots.close();
        self.tracker.close();
    }

    /// Waits up to `timeout` for every task to finish after [`WorkerPool::close`]
    ///
    /// Returns `true` if the pool is terminated.
    pub async fn await_termination(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .is_ok()
    }
}
