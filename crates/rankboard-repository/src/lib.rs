//! # Rankboard Repository
//!
//! Read-only data access for the leaderboard:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn LeaderboardRepository>  (domain interface)
//! PgLeaderboardRepository              (executes built queries, maps rows)
//!   ↓  LeaderboardQueryBuilder         (count + data statement pair)
//! PostgreSQL
//! ```
//!
//! Row-level decode failures are skipped and counted, never fatal to a page.

pub mod metrics;
pub mod pool;
pub mod postgres;
pub mod query_builder;
pub mod traits;

pub use pool::*;
pub use postgres::*;
pub use query_builder::*;
pub use traits::*;
