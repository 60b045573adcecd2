//! # Rankboard REST
//!
//! REST API layer using Axum for Rankboard.
//! Serves the leaderboard, health probes, and Prometheus metrics.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
