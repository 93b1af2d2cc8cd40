//! Single-flight execution - Coalesces concurrent work for the same key
//!
//! The first caller for a key spawns the work onto the runtime; callers that
//! arrive while it is running await the same shared result. The entry is
//! removed as soon as the work finishes, so later callers start fresh.

use std::{collections::HashMap, fmt, future::Future, sync::Arc};

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::debug;

use crate::error::ApplicationError;

type SharedResult<T> = Shared<BoxFuture<'static, Option<T>>>;

/// Map of in-flight executions keyed by string
pub struct SingleFlight<T: Clone> {
    in_flight: Arc<Mutex<HashMap<String, SharedResult<T>>>>,
}

impl<T: Clone> fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

impl<T: Clone> SingleFlight<T> {
    /// Number of executions currently running
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

/// Removes the map entry when the spawned work ends, including by panic
struct EntryGuard<T: Clone> {
    registry: Arc<Mutex<HashMap<String, SharedResult<T>>>>,
    key: String,
}

impl<T: Clone> Drop for EntryGuard<T> {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.key);
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty single-flight map
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` for `key`, or join the execution already running for it
    ///
    /// The work runs on a spawned task and completes even if every caller
    /// stops waiting. A panicking task surfaces as `ApplicationError::Internal`.
    pub async fn run<F, Fut>(&self, key: String, work: F) -> Result<T, ApplicationError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = {
            let mut map = self.in_flight.lock();
            if let Some(existing) = map.get(&key) {
                debug!(key = %key, "Joining in-flight execution");
                existing.clone()
            } else {
                let guard = EntryGuard {
                    registry: Arc::clone(&self.in_flight),
                    key: key.clone(),
                };
                let task = work();
                // The lock is held until the entry is inserted, so the guard
                // can never remove it before the insert.
                let handle = tokio::spawn(async move {
                    let _guard = guard;
                    task.await
                });
                let shared = async move { handle.await.ok() }.boxed().shared();
                map.insert(key.clone(), shared.clone());
                shared
            }
        };

        shared.await.ok_or_else(|| {
            ApplicationError::Internal(format!("execution for '{key}' did not complete"))
        })
    }
}
