//! Lenient leaderboard query extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use rankboard_service::LeaderboardQuery;
use std::convert::Infallible;

/// Query parameters for `GET /api/players`.
///
/// Never rejects a request: a missing or non-numeric `page`/`limit` is
/// treated as absent, and the first occurrence of a repeated key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl PlayersQuery {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                "search" => &mut query.search,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

fn parse_int(raw: Option<String>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

impl From<PlayersQuery> for LeaderboardQuery {
    fn from(query: PlayersQuery) -> Self {
        LeaderboardQuery {
            page: parse_int(query.page),
            limit: parse_int(query.limit),
            search: query.search,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PlayersQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();
        Ok(Self::from_pairs(pairs))
    }
}
