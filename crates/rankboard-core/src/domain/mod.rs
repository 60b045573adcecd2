//! Domain entities for the leaderboard.

pub mod entities;

pub use entities::*;
