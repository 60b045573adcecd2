//! Leaderboard SQL construction.
//!
//! One statement pair serves both the filtered and unfiltered cases: the
//! username pattern is always bound, and an empty search binds `%%`,
//! which matches every row. Search text never reaches the SQL text.

/// Shared `FROM`/`WHERE` clause. `$1` is the escaped `LIKE` pattern.
macro_rules! ranked_characters {
    () => {
        r#"
        FROM "character" c
        INNER JOIN account a ON a.acc_id = c.acc_id
        LEFT JOIN scores s ON s.char_id = c.char_id
        WHERE LOWER(a.username) LIKE LOWER($1) ESCAPE '\'
        "#
    };
}

/// Counts the characters matching the filter.
pub const COUNT_SQL: &str = concat!("SELECT COUNT(*) AS total", ranked_characters!());

/// Selects one ranked page. Unscored characters sort after every scored
/// one; `char_id` breaks ties so paging is stable.
pub const DATA_SQL: &str = concat!(
    r#"
        SELECT c.char_id::BIGINT AS char_id,
               a.username AS username,
               c.class_id::INTEGER AS class_id,
               COALESCE(s.reward_score, 0)::DOUBLE PRECISION AS reward_score
    "#,
    ranked_characters!(),
    r#"
        ORDER BY s.reward_score DESC NULLS LAST, c.char_id ASC
        LIMIT $2 OFFSET $3
    "#
);

/// A positional bind parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Text(String),
    Int(i64),
}

/// A statement and its parameters in positional order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: &'static str,
    pub params: Vec<QueryParam>,
}

/// Builds the count and data queries for one username filter.
#[derive(Debug, Clone)]
pub struct LeaderboardQueryBuilder {
    pattern: String,
}

impl LeaderboardQueryBuilder {
    /// Creates a builder for the given raw search text.
    #[must_use]
    pub fn new(search: &str) -> Self {
        Self {
            pattern: like_pattern(search),
        }
    }

    /// Returns the bound `LIKE` pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Builds the count query.
    #[must_use]
    pub fn count(&self) -> BuiltQuery {
        BuiltQuery {
            sql: COUNT_SQL,
            params: vec![QueryParam::Text(self.pattern.clone())],
        }
    }

    /// Builds the data query for one page.
    #[must_use]
    pub fn data(&self, limit: i64, offset: i64) -> BuiltQuery {
        BuiltQuery {
            sql: DATA_SQL,
            params: vec![
                QueryParam::Text(self.pattern.clone()),
                QueryParam::Int(limit),
                QueryParam::Int(offset),
            ],
        }
    }
}

/// Escapes `LIKE` metacharacters so they match literally.
#[must_use]
pub fn escape_like(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len());
    for ch in search.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Wraps escaped search text for a substring match.
#[must_use]
pub fn like_pattern(search: &str) -> String {
    format!("%{}%", escape_like(search))
}
