//! Single-flight coalescing: concurrent callers of the same operation share
//! one underlying execution and its result. The operation runs on a detached
//! task, so a caller that stops waiting (for example under a guard timeout)
//! never cancels the shared run; later joiners still receive its outcome.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

/// A reusable "pending operation" slot.
///
/// While a run is in flight, `run` attaches new callers to it instead of
/// starting another execution. The slot is cleared on settlement (success or
/// failure), so a subsequent call starts a fresh run.
pub struct Singleflight<T> {
    slot: Arc<Mutex<Option<watch::Receiver<Option<T>>>>>,
}

impl<T> Default for Singleflight<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Singleflight<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Singleflight<T> {
    /// Joins the in-flight run if one exists, otherwise starts `operation` on
    /// a background task and waits for it. Futures passed by joiners are
    /// dropped unexecuted.
    ///
    /// Returns `None` only if the executing task terminated without
    /// publishing a value (it panicked or the runtime shut down).
    pub async fn run<F>(&self, operation: F) -> Option<T>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let mut rx = {
            let mut slot = lock(&self.slot);
            if let Some(rx) = slot.as_ref() {
                rx.clone()
            } else {
                let (tx, rx) = watch::channel(None);
                *slot = Some(rx.clone());
                let slot_handle = Arc::clone(&self.slot);
                tokio::spawn(async move {
                    let value = operation.await;
                    // Clear the slot before publishing so a caller arriving
                    // after settlement starts a fresh run.
                    *lock(&slot_handle) = None;
                    let _ = tx.send(Some(value));
                });
                rx
            }
        };

        loop {
            if let Some(value) = rx.borrow_and_update().as_ref() {
                return Some(value.clone());
            }
            if rx.changed().await.is_err() {
                // Sender dropped; take whatever was published, if anything.
                return rx.borrow().as_ref().cloned();
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::Singleflight;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    fn counted_op(
        counter: &Arc<AtomicUsize>,
        delay: Duration,
    ) -> impl std::future::Future<Output = usize> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            sleep(delay).await;
            counter.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_execution() {
        let flight = Arc::new(Singleflight::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let (a, b, c) = tokio::join!(
            flight.run(counted_op(&counter, Duration::from_millis(50))),
            flight.run(counted_op(&counter, Duration::from_millis(50))),
            flight.run(counted_op(&counter, Duration::from_millis(50))),
        );

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(a, Some(1));
        assert_eq!(b, Some(1));
        assert_eq!(c, Some(1));
    }

    #[tokio::test]
    async fn slot_clears_after_settlement() {
        let flight = Singleflight::new();
        let counter = Arc::new(AtomicUsize::new(0));

        flight
            .run(counted_op(&counter, Duration::from_millis(1)))
            .await;
        flight
            .run(counted_op(&counter, Duration::from_millis(1)))
            .await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn abandoned_waiter_does_not_cancel_the_run() {
        let flight = Arc::new(Singleflight::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let waited = timeout(
            Duration::from_millis(10),
            flight.run(counted_op(&counter, Duration::from_millis(80))),
        )
        .await;
        assert!(waited.is_err());

        // The same run is still in flight; a fresh caller joins it and the
        // operation body executes exactly once.
        let joined = flight
            .run(counted_op(&counter, Duration::from_millis(80)))
            .await;
        assert_eq!(joined, Some(1));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
