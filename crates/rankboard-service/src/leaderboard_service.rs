//! Leaderboard service trait definition.

use crate::dto::{LeaderboardPage, LeaderboardQuery};
use async_trait::async_trait;
use rankboard_core::RankboardResult;
use std::fmt;
use std::sync::Arc;

/// Whether a response was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Returns the `X-Cache` header value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leaderboard page tagged with its cache status.
#[derive(Debug, Clone)]
pub struct LeaderboardResponse {
    pub page: Arc<LeaderboardPage>,
    pub cache: CacheStatus,
}

/// Leaderboard service trait.
#[async_trait]
pub trait LeaderboardService: Send + Sync {
    /// Returns one page of the ranked leaderboard.
    ///
    /// Never rejects pagination input; fails only when the database does.
    async fn get_leaderboard(&self, query: LeaderboardQuery) -> RankboardResult<LeaderboardResponse>;
}
