//! Player entity.

use serde::{Deserialize, Serialize};

/// One ranked character on the leaderboard.
///
/// A character is joined to its owning account for the username and
/// optionally to a score row. Characters without a score row carry a
/// `reward_score` of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PlayerRecord {
    /// Character identifier.
    pub char_id: i64,

    /// Username of the owning account.
    pub username: String,

    /// Character class identifier.
    pub class_id: i32,

    /// Reward score, zero when the character has no score row.
    pub reward_score: f64,
}

impl PlayerRecord {
    /// Creates a new player record.
    #[must_use]
    pub fn new(char_id: i64, username: impl Into<String>, class_id: i32, reward_score: f64) -> Self {
        Self {
            char_id,
            username: username.into(),
            class_id,
            reward_score,
        }
    }
}
