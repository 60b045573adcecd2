//! Cache key generators for consistent key naming.

use rankboard_core::PageRequest;

/// Generate the cache key for one leaderboard page.
///
/// Built from normalized values, so raw requests that normalize to the same
/// page share an entry.
#[must_use]
pub fn players(request: &PageRequest) -> String {
    format!(
        "players:page={}:limit={}:search={}",
        request.page, request.limit, request.search
    )
}
