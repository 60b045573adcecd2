//! Application state for Axum handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use rankboard_repository::DatabasePoolInterface;
use rankboard_service::LeaderboardService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub leaderboard_service: Arc<dyn LeaderboardService>,
    pub database: Arc<dyn DatabasePoolInterface>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        leaderboard_service: Arc<dyn LeaderboardService>,
        database: Arc<dyn DatabasePoolInterface>,
    ) -> Self {
        Self {
            leaderboard_service,
            database,
            metrics: None,
        }
    }

    /// Attaches the Prometheus handle rendered by the metrics endpoint.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
