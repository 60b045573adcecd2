//! Pagination types for leaderboard queries.

use serde::{Deserialize, Serialize};

/// A normalized request for one page of the leaderboard.
///
/// Out-of-range inputs are never rejected: a page below 1 becomes 1 and a
/// limit outside `1..=MAX_LIMIT` becomes `DEFAULT_LIMIT`. Two raw requests
/// that normalize to the same values are indistinguishable downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: u64,
    /// The number of items per page.
    pub limit: u32,
    /// Username substring filter; empty means no filter.
    pub search: String,
}

impl PageRequest {
    /// The first page number.
    pub const FIRST_PAGE: u64 = 1;
    /// The default page size.
    pub const DEFAULT_LIMIT: u32 = 10;
    /// The maximum allowed page size.
    pub const MAX_LIMIT: u32 = 100;

    /// Creates a page request from raw, possibly absent inputs.
    #[must_use]
    pub fn normalized(page: Option<i64>, limit: Option<i64>, search: Option<String>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p.unsigned_abs(),
            _ => Self::FIRST_PAGE,
        };

        let limit = match limit {
            Some(l) if (1..=i64::from(Self::MAX_LIMIT)).contains(&l) => {
                u32::try_from(l).unwrap_or(Self::DEFAULT_LIMIT)
            }
            _ => Self::DEFAULT_LIMIT,
        };

        Self {
            page,
            limit,
            search: search.unwrap_or_default(),
        }
    }

    /// Creates a request for the first page with default size and no filter.
    #[must_use]
    pub fn first() -> Self {
        Self::normalized(None, None, None)
    }

    /// Returns the row offset for database queries.
    ///
    /// Saturates at `i64::MAX`, the largest offset PostgreSQL accepts.
    #[must_use]
    pub fn offset(&self) -> i64 {
        let offset = (self.page - 1).saturating_mul(u64::from(self.limit));
        i64::try_from(offset).unwrap_or(i64::MAX)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Returns the number of pages needed to show `total_count` rows.
///
/// Integer ceiling; zero rows means zero pages.
#[must_use]
pub fn total_pages(total_count: u64, limit: u32) -> u64 {
    let limit = u64::from(limit.max(1));
    total_count.div_ceil(limit)
}
