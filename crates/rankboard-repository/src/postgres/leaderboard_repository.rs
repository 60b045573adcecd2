//! PostgreSQL leaderboard repository implementation.

use crate::metrics::RepositoryMetrics;
use crate::query_builder::{BuiltQuery, LeaderboardQueryBuilder, QueryParam};
use crate::traits::LeaderboardRepository;
use crate::DatabasePool;
use async_trait::async_trait;
use futures::TryStreamExt;
use rankboard_core::{PlayerRecord, RankboardError, RankboardResult};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{FromRow, Postgres, Row};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// PostgreSQL leaderboard repository.
#[derive(Clone)]
pub struct PgLeaderboardRepository {
    pool: Arc<DatabasePool>,
}

impl PgLeaderboardRepository {
    /// Creates a new PostgreSQL leaderboard repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a ranked character.
#[derive(Debug, FromRow)]
struct PlayerRow {
    char_id: i64,
    username: String,
    class_id: i32,
    reward_score: f64,
}

impl From<PlayerRow> for PlayerRecord {
    fn from(row: PlayerRow) -> Self {
        PlayerRecord::new(row.char_id, row.username, row.class_id, row.reward_score)
    }
}

/// Rows decoded from one page, with a tally of the ones dropped.
#[derive(Debug, Default)]
pub(crate) struct DecodedRows {
    pub(crate) players: Vec<PlayerRecord>,
    pub(crate) skipped: usize,
}

impl DecodedRows {
    /// Keeps a decoded row, or logs and counts a row that failed to decode.
    pub(crate) fn push(&mut self, row: Result<PlayerRecord, sqlx::Error>) {
        match row {
            Ok(player) => self.players.push(player),
            Err(e) => {
                self.skipped += 1;
                warn!(error = %e, position = self.players.len() + self.skipped, "Skipping undecodable leaderboard row");
                RepositoryMetrics::row_skipped();
            }
        }
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [QueryParam],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            QueryParam::Text(value) => query.bind(value.as_str()),
            QueryParam::Int(value) => query.bind(*value),
        };
    }
    query
}

fn decode_player(row: &PgRow) -> Result<PlayerRecord, sqlx::Error> {
    PlayerRow::from_row(row).map(PlayerRecord::from)
}

fn row_count(total: i64) -> RankboardResult<u64> {
    u64::try_from(total)
        .map_err(|_| RankboardError::database(format!("COUNT(*) returned a negative total: {}", total)))
}

#[async_trait]
impl LeaderboardRepository for PgLeaderboardRepository {
    async fn count(&self, search: &str) -> RankboardResult<u64> {
        let BuiltQuery { sql, params } = LeaderboardQueryBuilder::new(search).count();
        debug!(search = %search, "Counting leaderboard rows");

        let started = Instant::now();
        let row = bind_params(sqlx::query(sql), &params)
            .fetch_one(self.pool.inner())
            .await?;
        RepositoryMetrics::query_duration("count", started.elapsed());

        row_count(row.try_get("total")?)
    }

    async fn fetch(&self, limit: i64, offset: i64, search: &str) -> RankboardResult<Vec<PlayerRecord>> {
        let BuiltQuery { sql, params } = LeaderboardQueryBuilder::new(search).data(limit, offset);
        debug!(limit, offset, search = %search, "Fetching leaderboard page");

        let started = Instant::now();
        let mut rows = bind_params(sqlx::query(sql), &params).fetch(self.pool.inner());

        let mut decoded = DecodedRows::default();
        while let Some(row) = rows.try_next().await? {
            decoded.push(decode_player(&row));
        }
        RepositoryMetrics::query_duration("data", started.elapsed());

        if decoded.skipped > 0 {
            warn!(skipped = decoded.skipped, returned = decoded.players.len(), "Leaderboard page returned with skipped rows");
        }

        Ok(decoded.players)
    }
}
