//! Server startup utilities.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use rankboard_config::AppConfig;
use rankboard_core::{RankboardError, RankboardResult};
use tokio::signal;
use tracing::{info, warn};

/// Installs the global Prometheus recorder and describes every metric.
///
/// Returns `None` when metrics are disabled; the scrape route is then not mounted.
pub fn install_metrics_recorder(enabled: bool) -> RankboardResult<Option<PrometheusHandle>> {
    if !enabled {
        info!("Metrics disabled by configuration");
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| RankboardError::internal(format!("Failed to install metrics recorder: {}", e)))?;

    rankboard_repository::metrics::register_metrics();
    rankboard_service::metrics::register_metrics();

    Ok(Some(handle))
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let addr = config.server.addr();
    info!("{}", separator);
    info!("Leaderboard: http://{}/api/players", addr);
    info!("Health:      http://{}/health", addr);
    info!("API Docs:    http://{}/api-docs/openapi.json", addr);
    if config.observability.metrics_enabled {
        info!("Metrics:     http://{}{}", addr, config.observability.metrics_path);
    }
    info!(
        "Cache:       enabled={} ttl={}s sweep={}s",
        config.cache.enabled, config.cache.ttl_secs, config.cache.sweep_interval_secs
    );
    info!("{}", separator);
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
