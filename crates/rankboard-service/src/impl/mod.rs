//! Leaderboard service implementations.
//!
//! This module contains the concrete implementations of service traits.
//! Trait definitions live in the parent module (e.g. `leaderboard_service.rs`).

pub mod leaderboard_service_impl;

pub use leaderboard_service_impl::LeaderboardServiceImpl;
