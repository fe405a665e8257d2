//! Signature-keyed debouncing of deferred tasks.
//!
//! At most one task is pending per signature. Scheduling again under the
//! same signature aborts the pending task before arming the new one, so a
//! superseded task never starts. A task that has already started is not
//! pending any more and runs to completion.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;

#[derive(Debug)]
struct Pending {
    id: u64,
    abort: AbortHandle,
}

type PendingMap = Arc<Mutex<HashMap<String, Pending>>>;

fn lock(pending: &PendingMap) -> MutexGuard<'_, HashMap<String, Pending>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Delays tasks until a quiet period elapses for their signature.
///
/// Timers run on the Tokio clock, so tests can drive them with a paused
/// runtime. Cloning is cheap; clones share pending timers.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    pending: PendingMap,
    next_id: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once `delay` has elapsed with no further `schedule` call
    /// for `signature`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, signature: impl Into<String>, delay: Duration, task: F) -> DebounceHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let signature = signature.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        // The map stays locked until the new timer is registered, so the
        // timer cannot fire against a map that does not know it yet.
        let mut pending = lock(&self.pending);
        if let Some(previous) = pending.remove(&signature) {
            previous.abort.abort();
            tracing::trace!(signature = %signature, "superseded pending task");
        }

        let state = Arc::clone(&self.pending);
        let key = signature.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut pending = lock(&state);
                match pending.get(&key) {
                    Some(entry) if entry.id == id => {
                        pending.remove(&key);
                    }
                    _ => return,
                }
            }
            task.await;
        });

        pending.insert(signature.clone(), Pending { id, abort: timer.abort_handle() });

        DebounceHandle { signature, id, pending: Arc::clone(&self.pending) }
    }

    pub fn is_pending(&self, signature: &str) -> bool {
        lock(&self.pending).contains_key(signature)
    }

    /// Number of signatures with a pending task.
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }
}

/// Cancels the task it was returned for, if that task is still pending.
#[derive(Debug)]
pub struct DebounceHandle {
    signature: String,
    id: u64,
    pending: PendingMap,
}

impl DebounceHandle {
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Cancel the task. Returns false if it already started, finished or
    /// was superseded.
    pub fn cancel(&self) -> bool {
        let mut pending = lock(&self.pending);
        match pending.get(&self.signature) {
            Some(entry) if entry.id == self.id => {
                entry.abort.abort();
                pending.remove(&self.signature);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::time::sleep;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn bump(count: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let count = Arc::clone(count);
        async move {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_after_delay() {
        let debouncer = Debouncer::new();
        let ran = counter();

        debouncer.schedule("page:shop.example", Duration::from_millis(1000), bump(&ran));
        assert!(debouncer.is_pending("page:shop.example"));

        sleep(Duration::from_millis(999)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(debouncer.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_supersede_runs_only_last() {
        let debouncer = Debouncer::new();
        let first = counter();
        let second = counter();

        debouncer.schedule("page:shop.example", Duration::from_millis(1000), bump(&first));
        sleep(Duration::from_millis(500)).await;
        debouncer.schedule("page:shop.example", Duration::from_millis(1000), bump(&second));

        sleep(Duration::from_millis(600)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(500)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);

        sleep(Duration::from_millis(5_000)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_one() {
        let debouncer = Debouncer::new();
        let ran = counter();

        for _ in 0..10 {
            debouncer.schedule("page:shop.example", Duration::from_millis(1000), bump(&ran));
            sleep(Duration::from_millis(100)).await;
        }

        sleep(Duration::from_millis(2_000)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_signatures_are_independent() {
        let debouncer = Debouncer::new();
        let a = counter();
        let b = counter();

        debouncer.schedule("page:a.example", Duration::from_millis(1000), bump(&a));
        debouncer.schedule("page:b.example", Duration::from_millis(1000), bump(&b));
        assert_eq!(debouncer.pending_count(), 2);

        sleep(Duration::from_millis(1_100)).await;
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_handle() {
        let debouncer = Debouncer::new();
        let ran = counter();

        let handle = debouncer.schedule("form:abc", Duration::from_millis(1000), bump(&ran));
        assert_eq!(handle.signature(), "form:abc");
        assert!(handle.cancel());
        assert!(!handle.cancel());

        sleep(Duration::from_millis(2_000)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_handle_does_not_cancel_successor() {
        let debouncer = Debouncer::new();
        let first = counter();
        let second = counter();

        let stale = debouncer.schedule("form:abc", Duration::from_millis(1000), bump(&first));
        debouncer.schedule("form:abc", Duration::from_millis(1000), bump(&second));
        assert!(!stale.cancel());

        sleep(Duration::from_millis(1_100)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_started_task_is_not_cancelled_by_supersede() {
        let debouncer = Debouncer::new();
        let finished = counter();

        let slow = {
            let finished = Arc::clone(&finished);
            async move {
                sleep(Duration::from_millis(5_000)).await;
                finished.fetch_add(1, Ordering::SeqCst);
            }
        };
        debouncer.schedule("page:shop.example", Duration::from_millis(100), slow);
        sleep(Duration::from_millis(200)).await;

        debouncer.schedule("page:shop.example", Duration::from_millis(100), bump(&finished));
        sleep(Duration::from_millis(6_000)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }
}
