// ── Debounced task scheduling ──
//
// Each `schedule` call supersedes the previous one: only the task whose
// ticket is still current when the quiet period ends gets to run.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

pub(crate) struct Debouncer {
    interval: Duration,
    generation: Arc<AtomicU64>,
    cancel: CancellationToken,
}

impl Debouncer {
    pub(crate) fn new(interval: Duration, cancel: CancellationToken) -> Self {
        Self {
            interval,
            generation: Arc::new(AtomicU64::new(0)),
            cancel,
        }
    }

    /// Zero interval, or no runtime to spawn on: callers run inline.
    pub(crate) fn is_immediate(&self) -> bool {
        self.interval.is_zero() || tokio::runtime::Handle::try_current().is_err()
    }

    /// Run `task` after the quiet period unless a newer call supersedes it
    /// or the owner shuts down first.
    pub(crate) fn schedule<F, Fut>(&self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let interval = self.interval;
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(interval) => {
                    if generation.load(Ordering::SeqCst) == ticket {
                        task().await;
                    }
                }
            }
        });
    }

    /// Drop any pending task without scheduling a new one.
    pub(crate) fn cancel_pending(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_scheduled_task_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(100), CancellationToken::new());
        let ran = Arc::new(Mutex::new(Vec::new()));

        for query in ["a", "ab", "abc"] {
            let ran = Arc::clone(&ran);
            debouncer.schedule(move || async move {
                ran.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push(query);
            });
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(*ran.lock().unwrap_or_else(std::sync::PoisonError::into_inner), vec!["abc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_drops_pending_tasks() {
        let cancel = CancellationToken::new();
        let debouncer = Debouncer::new(Duration::from_millis(100), cancel.clone());
        let ran = Arc::new(Mutex::new(false));

        let flag = Arc::clone(&ran);
        debouncer.schedule(move || async move {
            *flag.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = true;
        });
        cancel.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(!*ran.lock().unwrap_or_else(std::sync::PoisonError::into_inner));
    }
}
