//! Level barrier: waits for a dynamically growing set of tasks

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Counts outstanding units of work for one BFS level
///
/// Units can be registered at any time, including while [`LevelBarrier::wait`]
/// is already blocked, as long as the registering code itself holds a unit.
/// The count therefore only reaches zero once every download and every
/// extraction it spawned is done.
#[derive(Debug, Default)]
pub struct LevelBarrier {
    pending: AtomicUsize,
    notify: Notify,
}

/// One registered unit of work; dropping it arrives at the barrier
#[derive(Debug)]
#[must_use = "dropping a BarrierUnit immediately arrives at the barrier"]
pub struct BarrierUnit {
    barrier: Arc<LevelBarrier>,
}

impl LevelBarrier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers one more unit of outstanding work
    pub fn register(self: &Arc<Self>) -> BarrierUnit {
        self.pending.fetch_add(1, Ordering::AcqRel);
        BarrierUnit {
            barrier: Arc::clone(self),
        }
    }

    /// Number of units still outstanding
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Blocks until the outstanding count is zero
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Enable before checking the count so a concurrent arrive cannot be missed.
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn arrive(&self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.notify.notify_waiters();
        }
    }
}

impl Drop for BarrierUnit {
    fn drop(&mut self) {
        self.barrier.arrive();
    }
}
