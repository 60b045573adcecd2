//! Leaderboard controller.

use crate::{extractors::PlayersQuery, responses::ApiResult, state::AppState};
use axum::{
    extract::State,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use rankboard_service::LeaderboardPage;
use tracing::debug;

/// Response header reporting whether the page came from the cache.
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Creates the players router.
pub fn router() -> Router<AppState> {
    Router::new().route("/players", get(list_players))
}

/// Ranked leaderboard page.
#[utoipa::path(
    get,
    path = "/api/players",
    tag = "players",
    params(
        ("page" = Option<i64>, Query, description = "Page number, 1-based; values below 1 mean 1"),
        ("limit" = Option<i64>, Query, description = "Page size in 1..=100; anything else means 10"),
        ("search" = Option<String>, Query, description = "Case-insensitive username substring")
    ),
    responses(
        (status = 200, description = "Leaderboard page", body = LeaderboardPage,
            headers(("X-Cache" = String, description = "HIT or MISS"))),
        (status = 500, description = "Database unavailable", body = String, content_type = "text/plain")
    )
)]
pub async fn list_players(State(state): State<AppState>, query: PlayersQuery) -> ApiResult<Response> {
    debug!(?query, "List players request");

    let response = state.leaderboard_service.get_leaderboard(query.into()).await?;

    let mut http = Json(response.page.as_ref()).into_response();
    http.headers_mut()
        .insert(X_CACHE, HeaderValue::from_static(response.cache.as_str()));
    Ok(http)
}
