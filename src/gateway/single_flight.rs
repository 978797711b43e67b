//! Single-flight coordination for token refresh.
//!
//! DESIGN
//! ======
//! Two logical states: `Idle` (slot empty) and `Refreshing` (slot holds a
//! shared handle to the outstanding operation). The first 401 starts the
//! refresh; every later 401 that lands while it is outstanding clones the
//! handle and waits on the same outcome. Refresh tokens are commonly
//! single-use, so letting N failing requests each mint their own refresh
//! would have them invalidating each other server-side.
//!
//! The refresh itself runs in a spawned task: a waiter that gets cancelled
//! drops only its handle, never the operation other waiters still need.

use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::session::lock;

/// What every waiter observes once the refresh settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The store now holds a fresh token pair.
    Refreshed,
    /// The refresh was rejected or unreachable; the store has been cleared.
    Expired,
}

type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

pub struct RefreshCoordinator {
    inflight: Arc<Mutex<Option<SharedRefresh>>>,
}

impl RefreshCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self { inflight: Arc::new(Mutex::new(None)) }
    }

    /// Join the outstanding refresh, or start one with `operation` if the
    /// coordinator is idle. The slot returns to idle after the operation has
    /// settled and published its outcome to the store.
    pub async fn join_or_start<F, Fut>(&self, operation: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome> + Send + 'static,
    {
        let shared = {
            let mut slot = lock(&self.inflight);
            if let Some(existing) = slot.as_ref() {
                existing.clone()
            } else {
                let inflight = Arc::clone(&self.inflight);
                let refresh = operation();
                let task = tokio::spawn(async move {
                    // Catch a panicking operation so the slot still returns
                    // to idle; waiters observe it as Expired.
                    let outcome = std::panic::AssertUnwindSafe(refresh)
                        .catch_unwind()
                        .await
                        .unwrap_or(RefreshOutcome::Expired);
                    *lock(&inflight) = None;
                    outcome
                });
                let shared: SharedRefresh =
                    async move { task.await.unwrap_or(RefreshOutcome::Expired) }.boxed().shared();
                *slot = Some(shared.clone());
                shared
            }
        };
        shared.await
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "single_flight_test.rs"]
mod tests;
