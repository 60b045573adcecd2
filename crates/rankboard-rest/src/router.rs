//! Main application router.

use crate::{
    controllers::{health_controller, metrics_controller, players_controller},
    middleware::logging_middleware,
    openapi::ApiDoc,
    responses::AppError,
    state::AppState,
};
use axum::{
    error_handling::HandleErrorLayer,
    http::{HeaderName, HeaderValue, Method},
    middleware,
    routing::get,
    BoxError, Json, Router,
};
use rankboard_config::{ObservabilityConfig, ServerConfig};
use rankboard_core::RankboardError;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;

/// Creates the main application router.
///
/// The request timeout drops the handler future when it fires, which
/// cancels any in-flight query before its result can be cached. The
/// client sees the same plain-text 500 as any other data access failure.
pub fn create_router(
    state: AppState,
    server_config: &ServerConfig,
    observability: &ObservabilityConfig,
) -> Router {
    let mut router = Router::new()
        .merge(health_controller::router())
        .nest("/api", players_controller::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/", get(root));

    if observability.metrics_enabled && state.metrics.is_some() {
        router = router.route(&observability.metrics_path, get(metrics_controller::render_metrics));
    }

    let router = router
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(server_config.request_timeout())),
        )
        .layer(CompressionLayer::new())
        .layer(create_cors_layer(server_config))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!(
        timeout_secs = server_config.request_timeout_secs,
        "Router created with leaderboard endpoint at /api/players"
    );
    router
}

/// Creates a CORS layer based on server configuration.
///
/// The API is read-only, so only `GET` is allowed cross-origin.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    let origin = if server_config.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = server_config
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static("x-cache")])
}

/// Maps errors raised by the timeout layer onto the generic failure response.
async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError(RankboardError::database("request timed out before the leaderboard query completed"))
    } else {
        AppError(RankboardError::internal(format!("unhandled middleware error: {}", err)))
    }
}

/// OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Rankboard API v1"
}
