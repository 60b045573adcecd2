//! Cache store trait for abstracted caching operations.

use std::sync::Arc;
use std::time::Duration;

/// Key-value store with per-entry expiry.
///
/// Values are immutable snapshots shared by reference: a hit hands out the
/// same `Arc` that was stored, so every reader sees an identical value.
///
/// Operations are synchronous and never held across an `.await`.
pub trait CacheStore<V>: Send + Sync {
    /// Returns the value for `key` if present and not yet expired.
    ///
    /// Expiry is checked on every call, whether or not a sweep has run.
    fn get(&self, key: &str) -> Option<Arc<V>>;

    /// Stores `value` under `key` for `ttl`, replacing any existing entry
    /// and resetting its expiry.
    fn set(&self, key: String, value: Arc<V>, ttl: Duration);

    /// Removes every expired entry, returning how many were removed.
    fn purge_expired(&self) -> usize;

    /// Returns the number of stored entries, expired or not.
    fn len(&self) -> usize;

    /// Returns true if no entries are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}
