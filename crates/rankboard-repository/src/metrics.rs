//! Prometheus metrics for leaderboard data access.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Metric names for the repository layer.
pub mod names {
    /// Total rows skipped because they could not be decoded.
    pub const ROWS_SKIPPED_TOTAL: &str = "rankboard_rows_skipped_total";
    /// Query execution duration in seconds.
    pub const QUERY_DURATION_SECONDS: &str = "rankboard_query_duration_seconds";
}

/// Register repository metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::ROWS_SKIPPED_TOTAL,
        "Total number of leaderboard rows skipped due to decode errors"
    );
    describe_histogram!(
        names::QUERY_DURATION_SECONDS,
        "Leaderboard query duration in seconds"
    );
}

/// Repository metrics recorder.
#[derive(Clone)]
pub struct RepositoryMetrics;

impl RepositoryMetrics {
    /// Record a skipped row.
    pub fn row_skipped() {
        counter!(names::ROWS_SKIPPED_TOTAL).increment(1);
    }

    /// Record a query duration. `query` is `count` or `data`.
    pub fn query_duration(query: &'static str, duration: Duration) {
        histogram!(names::QUERY_DURATION_SECONDS, "query" => query).record(duration.as_secs_f64());
    }
}
