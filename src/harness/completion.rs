use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Barrier, Notify};

/// Start barrier plus finish count shared by every worker of one run.
#[derive(Debug)]
pub struct CompletionTracker {
    total: usize,
    initialized: AtomicUsize,
    finished: AtomicUsize,
    barrier: Barrier,
    all_finished: Notify,
}

impl CompletionTracker {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            initialized: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
            barrier: Barrier::new(total),
            all_finished: Notify::new(),
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn initialized(&self) -> usize {
        self.initialized.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::Acquire)
    }

    /// Marks the caller initialized and waits until every worker is.
    pub async fn arrive(&self) {
        self.initialized.fetch_add(1, Ordering::AcqRel);
        self.barrier.wait().await;
    }

    /// Marks one worker finished; the last one wakes [`Self::wait_all`].
    pub fn finish(&self) {
        let done = self.finished.fetch_add(1, Ordering::AcqRel).saturating_add(1);
        if done >= self.total {
            // Stores a permit when nobody is waiting yet.
            self.all_finished.notify_one();
        }
    }

    /// Resolves once every worker called [`Self::finish`].
    pub async fn wait_all(&self) {
        while self.finished() < self.total {
            self.all_finished.notified().await;
        }
    }

    /// Guard that calls [`Self::finish`] when dropped.
    #[must_use]
    pub fn finish_guard(self: &Arc<Self>) -> FinishGuard {
        FinishGuard {
            tracker: Arc::clone(self),
        }
    }
}

#[derive(Debug)]
pub struct FinishGuard {
    tracker: Arc<CompletionTracker>,
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.tracker.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn wait_all_returns_after_last_guard_drops() -> Result<(), String> {
        let tracker = Arc::new(CompletionTracker::new(3));
        let mut handles = Vec::new();
        for _ in 0..3 {
            let worker = Arc::clone(&tracker);
            handles.push(tokio::spawn(async move {
                let _guard = worker.finish_guard();
                worker.arrive().await;
            }));
        }

        tokio::time::timeout(Duration::from_secs(5), tracker.wait_all())
            .await
            .map_err(|err| format!("workers never finished: {}", err))?;
        for handle in handles {
            handle.await.map_err(|err| err.to_string())?;
        }
        assert_eq!(tracker.initialized(), 3);
        assert_eq!(tracker.finished(), 3);
        Ok(())
    }

    #[tokio::test(flavor = "current_thread")]
    async fn finish_before_wait_is_not_lost() -> Result<(), String> {
        let tracker = Arc::new(CompletionTracker::new(1));
        drop(tracker.finish_guard());
        tokio::time::timeout(Duration::from_secs(1), tracker.wait_all())
            .await
            .map_err(|err| format!("missed the completion signal: {}", err))
    }
}
