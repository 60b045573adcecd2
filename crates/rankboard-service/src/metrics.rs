//! Prometheus metrics for the leaderboard cache and service.

use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Metric names for the service layer.
pub mod names {
    /// Total leaderboard cache lookups, labelled `result=hit|miss`.
    pub const CACHE_REQUESTS_TOTAL: &str = "rankboard_cache_requests_total";
    /// Total expired entries removed by the sweeper.
    pub const CACHE_ENTRIES_SWEPT_TOTAL: &str = "rankboard_cache_entries_swept_total";
    /// Current number of cache entries.
    pub const CACHE_ENTRIES: &str = "rankboard_cache_entries";
    /// Total requests that waited on another request's computation.
    pub const SINGLE_FLIGHT_WAITS_TOTAL: &str = "rankboard_single_flight_waits_total";
    /// Total leaderboard requests that failed with a data access error.
    pub const LEADERBOARD_FAILURES_TOTAL: &str = "rankboard_leaderboard_failures_total";
}

/// Register service metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_REQUESTS_TOTAL,
        "Total number of leaderboard cache lookups by result"
    );
    describe_counter!(
        names::CACHE_ENTRIES_SWEPT_TOTAL,
        "Total number of expired cache entries removed by the sweeper"
    );
    describe_gauge!(
        names::CACHE_ENTRIES,
        "Current number of leaderboard cache entries"
    );
    describe_counter!(
        names::SINGLE_FLIGHT_WAITS_TOTAL,
        "Total number of requests that waited on an in-flight computation"
    );
    describe_counter!(
        names::LEADERBOARD_FAILURES_TOTAL,
        "Total number of leaderboard requests that failed"
    );
}

/// Service metrics recorder.
#[derive(Clone)]
pub struct ServiceMetrics;

impl ServiceMetrics {
    /// Record a cache hit.
    pub fn cache_hit() {
        counter!(names::CACHE_REQUESTS_TOTAL, "result" => "hit").increment(1);
    }

    /// Record a cache miss.
    pub fn cache_miss() {
        counter!(names::CACHE_REQUESTS_TOTAL, "result" => "miss").increment(1);
    }

    /// Record a sweep pass.
    pub fn cache_swept(removed: usize, remaining: usize) {
        counter!(names::CACHE_ENTRIES_SWEPT_TOTAL).increment(removed as u64);
        Self::cache_entries(remaining);
    }

    /// Update the cache size gauge.
    pub fn cache_entries(count: usize) {
        gauge!(names::CACHE_ENTRIES).set(count as f64);
    }

    /// Record a single-flight wait.
    pub fn single_flight_wait() {
        counter!(names::SINGLE_FLIGHT_WAITS_TOTAL).increment(1);
    }

    /// Record a failed leaderboard request.
    pub fn leaderboard_failure() {
        counter!(names::LEADERBOARD_FAILURES_TOTAL).increment(1);
    }
}
