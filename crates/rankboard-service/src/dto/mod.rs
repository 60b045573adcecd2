//! Data Transfer Objects for the service layer.

mod leaderboard_dto;

pub use leaderboard_dto::*;
