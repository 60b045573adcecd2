//! Leaderboard DTOs.

use rankboard_core::{total_pages, PageRequest, PlayerRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Raw leaderboard query parameters, before normalization.
///
/// Absent and unparseable values are both `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

impl LeaderboardQuery {
    /// Applies the pagination defaults and bounds.
    #[must_use]
    pub fn normalize(self) -> PageRequest {
        PageRequest::normalized(self.page, self.limit, self.search)
    }
}

/// One page of the leaderboard with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardPage {
    /// Ranked players on this page, at most `limit` of them.
    pub players: Vec<PlayerRecord>,
    /// Number of characters matching the search across all pages.
    pub total_count: u64,
    /// The normalized page number.
    pub current_page: u64,
    /// `ceil(total_count / limit)`; zero when nothing matches.
    pub total_pages: u64,
}

impl LeaderboardPage {
    /// Assembles a page for the given request.
    #[must_use]
    pub fn new(players: Vec<PlayerRecord>, total_count: u64, request: &PageRequest) -> Self {
        Self {
            players,
            total_count,
            current_page: request.page,
            total_pages: total_pages(total_count, request.limit),
        }
    }
}
