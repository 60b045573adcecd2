//! Application assembly.

use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use rankboard_config::{AppConfig, CacheConfig};
use rankboard_core::{RankboardError, RankboardResult};
use rankboard_repository::{
    create_pool, DatabasePool, DatabasePoolInterface, LeaderboardRepository, PgLeaderboardRepository,
};
use rankboard_rest::{create_router, AppState};
use rankboard_service::{LeaderboardPage, LeaderboardService, LeaderboardServiceImpl, MemoryCacheStore};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

/// A leaderboard service together with its cache sweeper task.
pub struct LeaderboardComponents {
    pub service: Arc<dyn LeaderboardService>,
    pub sweeper: JoinHandle<()>,
}

/// Builds the cached leaderboard service over a repository.
///
/// Must be called inside a Tokio runtime; the sweeper is spawned immediately.
pub fn build_leaderboard_service(
    repository: Arc<dyn LeaderboardRepository>,
    cache_config: &CacheConfig,
) -> LeaderboardComponents {
    let cache = Arc::new(MemoryCacheStore::<LeaderboardPage>::from_config(cache_config));
    let sweeper = cache.spawn_sweeper(cache_config.sweep_interval());

    let service: Arc<dyn LeaderboardService> = Arc::new(LeaderboardServiceImpl::new(repository, cache, cache_config.ttl()));

    LeaderboardComponents { service, sweeper }
}

/// A fully wired server, bound and ready to accept connections.
pub struct Application {
    listener: TcpListener,
    router: Router,
    pool: Arc<DatabasePool>,
    sweeper: JoinHandle<()>,
}

impl Application {
    /// Connects to the database, builds the service stack, and binds the listener.
    pub async fn build(config: &AppConfig, metrics: Option<PrometheusHandle>) -> RankboardResult<Self> {
        let pool = create_pool(&config.database).await?;

        let repository = Arc::new(PgLeaderboardRepository::new(pool.clone()));
        let LeaderboardComponents { service, sweeper } =
            build_leaderboard_service(repository, &config.cache);

        let mut state = AppState::new(service, pool.clone());
        if let Some(handle) = metrics {
            state = state.with_metrics(handle);
        }

        let router = create_router(state, &config.server, &config.observability);

        let addr = config.server.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| RankboardError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        Ok(Self {
            listener,
            router,
            pool,
            sweeper,
        })
    }

    /// Returns the bound address.
    pub fn local_addr(&self) -> RankboardResult<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| RankboardError::internal(format!("Failed to read local address: {}", e)))
    }

    /// Serves requests until `shutdown` resolves, then drains and closes the pool.
    pub async fn run_until<F>(self, shutdown: F) -> RankboardResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(addr = %self.local_addr()?, "Starting REST server");

        let served = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RankboardError::internal(format!("REST server error: {}", e)));

        self.sweeper.abort();
        self.pool.close().await;

        served
    }
}
