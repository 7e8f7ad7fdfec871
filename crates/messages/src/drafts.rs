use std::sync::Arc;

use {
    courier_common::Peer,
    tokio::runtime::Handle,
    tokio_util::task::TaskTracker,
    tracing::{debug, warn},
};

#[cfg(feature = "metrics")]
use courier_metrics::{counter, messages as msg_metrics};

use crate::traits::DraftStore;

/// Fire-and-forget draft cleanup after a successful send.
///
/// Tasks capture only plain ids and run on the runtime, not inside the
/// request future, so dropping or timing out the request leaves them running.
/// The runtime is the one current at construction, so callers polling the
/// pipeline from another executor still get their drafts cleared.
pub struct DraftClearScheduler {
    store: Arc<dyn DraftStore>,
    tracker: TaskTracker,
    runtime: Option<Handle>,
}

impl DraftClearScheduler {
    /// Bind to the current tokio runtime, if there is one.
    pub fn new(store: Arc<dyn DraftStore>) -> Self {
        Self {
            store,
            tracker: TaskTracker::new(),
            runtime: Handle::try_current().ok(),
        }
    }

    /// Spawn draft-clear tasks onto `runtime`.
    #[must_use]
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Spawn a draft-clear task. Without a bound or current runtime the
    /// clear is skipped and logged.
    pub fn schedule(&self, user_id: i64, auth_id: i64, peer: Peer) {
        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            warn!(user_id, %peer, "no tokio runtime, draft clear skipped");
            return;
        };
        let store = Arc::clone(&self.store);
        let task = async move {
            #[cfg(feature = "metrics")]
            counter!(msg_metrics::DRAFT_CLEAR_TOTAL).increment(1);
            match store.clear_draft(user_id, auth_id, &peer).await {
                Ok(()) => debug!(user_id, %peer, "draft cleared"),
                Err(e) => {
                    #[cfg(feature = "metrics")]
                    counter!(msg_metrics::DRAFT_CLEAR_ERRORS_TOTAL).increment(1);
                    warn!(user_id, %peer, error = %e, "failed to clear draft");
                },
            }
        };
        self.tracker.spawn_on(task, &runtime);
    }

    /// Number of draft-clear tasks still running.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Wait for every scheduled task to finish. Used at shutdown.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        crate::error::DraftError,
        async_trait::async_trait,
        std::sync::atomic::{AtomicUsize, Ordering},
    };

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl DraftStore for Counting {
        async fn clear_draft(
            &self,
            _user_id: i64,
            _auth_id: i64,
            _peer: &Peer,
        ) -> Result<(), DraftError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DraftError::message("store offline"));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn runs_each_scheduled_clear() {
        let store = Arc::new(Counting::default());
        let scheduler = DraftClearScheduler::new(store.clone());
        scheduler.schedule(1, 2, Peer::user(3));
        scheduler.schedule(1, 2, Peer::chat(4));
        scheduler.shutdown().await;
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn schedules_onto_bound_runtime_from_outside() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let store = Arc::new(Counting::default());
        let scheduler = {
            let _guard = runtime.enter();
            DraftClearScheduler::new(store.clone())
        };

        // No runtime context on this thread.
        assert!(Handle::try_current().is_err());
        scheduler.schedule(1, 2, Peer::user(3));
        runtime.block_on(scheduler.shutdown());
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn without_runtime_schedule_is_skipped() {
        let store = Arc::new(Counting::default());
        let scheduler = DraftClearScheduler::new(store.clone());
        scheduler.schedule(1, 2, Peer::user(3));
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn explicit_runtime_is_used() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let store = Arc::new(Counting::default());
        let scheduler =
            DraftClearScheduler::new(store.clone()).with_runtime(runtime.handle().clone());
        scheduler.schedule(1, 2, Peer::chat(4));
        runtime.block_on(scheduler.shutdown());
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_stay_inside_the_task() {
        let store = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let scheduler = DraftClearScheduler::new(store.clone());
        scheduler.schedule(1, 2, Peer::user(3));
        scheduler.shutdown().await;
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }
}
