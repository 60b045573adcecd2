//! # Rankboard Server
//!
//! Main entry point for the Rankboard leaderboard service.

use rankboard_config::ConfigLoader;
use rankboard_core::{init_telemetry, RankboardResult};
use rankboard_server::{
    startup::{install_metrics_recorder, print_startup_info, shutdown_signal},
    Application,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> RankboardResult<()> {
    let config = ConfigLoader::from_default_location()?.into_config();

    init_telemetry(&config.observability.telemetry())?;

    info!("Starting Rankboard Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let metrics = install_metrics_recorder(config.observability.metrics_enabled)?;

    let app = Application::build(&config, metrics).await?;
    print_startup_info(&config);

    app.run_until(shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}
