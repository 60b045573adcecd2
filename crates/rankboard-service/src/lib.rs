//! # Rankboard Service
//!
//! The cache-aside leaderboard service: normalizes page requests, serves
//! repeated queries from an in-process TTL cache, and collapses concurrent
//! identical misses into a single database round trip.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod leaderboard_service;
pub mod metrics;

pub use cache::*;
pub use dto::*;
pub use leaderboard_service::*;
pub use r#impl::LeaderboardServiceImpl;
