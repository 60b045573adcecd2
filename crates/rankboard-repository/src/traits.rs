//! Repository trait definitions.

use async_trait::async_trait;
use rankboard_core::{PlayerRecord, RankboardResult};

/// Read access to the ranked leaderboard.
///
/// `search` is the raw username filter; an empty string matches every
/// character. Implementations must apply the same filter to `count` and
/// `fetch` so totals agree with the pages they describe.
#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Counts characters matching the filter, independent of pagination.
    async fn count(&self, search: &str) -> RankboardResult<u64>;

    /// Fetches one page of ranked characters.
    ///
    /// Rows that cannot be decoded are skipped, so the result may be
    /// shorter than `limit` even in the middle of the ranking.
    async fn fetch(&self, limit: i64, offset: i64, search: &str) -> RankboardResult<Vec<PlayerRecord>>;
}
