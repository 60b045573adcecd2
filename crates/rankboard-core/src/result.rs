//! Result type aliases for Rankboard.

use crate::RankboardError;

/// A specialized `Result` type for Rankboard operations.
pub type RankboardResult<T> = Result<T, RankboardError>;
