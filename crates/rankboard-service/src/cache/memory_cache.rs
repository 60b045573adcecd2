//! In-memory cache store with TTL expiry and a background sweeper.

use super::CacheStore;
use crate::metrics::ServiceMetrics;
use dashmap::DashMap;
use rankboard_config::CacheConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Default TTL for leaderboard pages (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default interval between expired-entry sweeps (10 minutes).
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

struct CacheEntry<V> {
    value: Arc<V>,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Sharded in-memory cache store.
///
/// Reads re-check expiry and drop stale entries they find; the sweeper
/// reclaims entries nobody reads again. A disabled store stores nothing.
pub struct MemoryCacheStore<V> {
    entries: DashMap<String, CacheEntry<V>>,
    enabled: bool,
}

impl<V: Send + Sync + 'static> MemoryCacheStore<V> {
    /// Creates an enabled, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            enabled: true,
        }
    }

    /// Creates a store that never returns entries and ignores writes.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            entries: DashMap::new(),
            enabled: false,
        }
    }

    /// Creates a store from configuration.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        if config.enabled {
            Self::new()
        } else {
            info!("Leaderboard cache disabled by configuration");
            Self::disabled()
        }
    }

    /// Starts the background sweep task.
    ///
    /// The task holds only a weak reference and exits once the store is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let Some(store) = store.upgrade() else {
                    debug!("Cache store dropped, stopping sweeper");
                    break;
                };

                let removed = store.purge_expired();
                let remaining = store.len();
                ServiceMetrics::cache_swept(removed, remaining);
                debug!(removed, remaining, "Cache sweep completed");
            }
        })
    }
}

impl<V: Send + Sync + 'static> Default for MemoryCacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Send + Sync + 'static> CacheStore<V> for MemoryCacheStore<V> {
    fn get(&self, key: &str) -> Option<Arc<V>> {
        if !self.enabled {
            return None;
        }

        let now = Instant::now();
        let entry = self.entries.get(key)?;
        if entry.is_live(now) {
            return Some(Arc::clone(&entry.value));
        }
        drop(entry);

        // A concurrent set may have refreshed the entry since the read.
        self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        None
    }

    fn set(&self, key: String, value: Arc<V>, ttl: Duration) {
        if !self.enabled {
            return;
        }

        let expires_at = Instant::now() + ttl;
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let live = entry.is_live(now);
            if !live {
                removed += 1;
            }
            live
        });
        removed
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
