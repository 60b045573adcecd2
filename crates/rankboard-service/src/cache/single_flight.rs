//! Per-key single-flight guard.
//!
//! At most one caller holds the guard for a key; others with the same key
//! wait for it to be released. Callers re-check the cache after acquiring,
//! so a waiter normally finds the value the previous holder stored.

use crate::metrics::ServiceMetrics;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

type FlightMap = DashMap<String, Arc<Mutex<()>>>;

/// Registry of in-flight computations keyed by cache key.
#[derive(Clone, Default)]
pub struct SingleFlight {
    inflight: Arc<FlightMap>,
}

impl SingleFlight {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other caller holds `key`, then claims it.
    ///
    /// The claim is released when the returned guard is dropped, including
    /// when the owning future is cancelled.
    pub async fn acquire(&self, key: &str) -> FlightGuard {
        // Entries left by waiters cancelled after their holder released.
        self.inflight.retain(|_, lock| Arc::strong_count(lock) > 1);

        let lock = Arc::clone(&*self.inflight.entry(key.to_owned()).or_default());

        let guard = match Arc::clone(&lock).try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                ServiceMetrics::single_flight_wait();
                debug!(key, "Waiting on in-flight computation");
                lock.lock_owned().await
            }
        };

        FlightGuard {
            key: key.to_owned(),
            guard: Some(guard),
            inflight: Arc::clone(&self.inflight),
        }
    }

    /// Returns the number of keys with a holder or waiters.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }
}

/// Exclusive claim on one key.
pub struct FlightGuard {
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
    inflight: Arc<FlightMap>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map still references the lock when nobody is waiting.
        self.inflight
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
