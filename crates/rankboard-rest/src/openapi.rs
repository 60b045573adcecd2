//! OpenAPI documentation configuration.

use crate::controllers::HealthResponse;
use rankboard_core::PlayerRecord;
use rankboard_service::LeaderboardPage;
use utoipa::OpenApi;

/// OpenAPI documentation for the Rankboard API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rankboard API",
        version = "1.0.0",
        description = "Read-only ranked leaderboard of player characters",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::controllers::players_controller::list_players,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            PlayerRecord,
            LeaderboardPage,
            HealthResponse,
        )
    ),
    tags(
        (name = "players", description = "Leaderboard endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
