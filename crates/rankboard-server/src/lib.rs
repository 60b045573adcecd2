//! # Rankboard Server Library
//!
//! Wires configuration, the PostgreSQL pool, the cached leaderboard
//! service, and the HTTP router into a runnable application.

pub mod app;
pub mod startup;

pub use app::*;
