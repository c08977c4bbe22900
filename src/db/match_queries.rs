use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::helpers::{finish_transaction, require_record};
use crate::db::MatchRepository;
use crate::error::{LeagueError, LeagueResult};
use crate::models::fixture::{Lifecycle, Match};

const INSERT_MATCH: &str = r#"
    INSERT INTO matches (id, home_team_id, away_team_id, match_date, match_time, venue, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
"#;

pub(crate) const FIND_MATCH_BY_ID: &str = r#"
    SELECT id, home_team_id, away_team_id, match_date, match_time, venue, created_at, updated_at, deleted_at
    FROM matches
    WHERE id = $1 AND deleted_at IS NULL
"#;

pub(crate) const FIND_ALL_MATCHES: &str = r#"
    SELECT id, home_team_id, away_team_id, match_date, match_time, venue, created_at, updated_at, deleted_at
    FROM matches
    WHERE deleted_at IS NULL
    ORDER BY match_date DESC, match_time DESC, id DESC
"#;

const SOFT_DELETE_GOALS_BY_MATCH_ID: &str = r#"
    UPDATE goals SET deleted_at = NOW()
    WHERE result_id IN (SELECT id FROM match_results WHERE match_id = $1)
      AND deleted_at IS NULL
"#;

const SOFT_DELETE_RESULT_BY_MATCH_ID: &str = r#"
    UPDATE match_results SET deleted_at = NOW()
    WHERE match_id = $1 AND deleted_at IS NULL
"#;

const SOFT_DELETE_MATCH: &str = r#"
    UPDATE matches SET deleted_at = NOW(), updated_at = NOW()
    WHERE id = $1 AND deleted_at IS NULL
"#;

#[derive(Debug, FromRow)]
pub(crate) struct MatchRow {
    pub id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub match_date: NaiveDate,
    pub match_time: String,
    pub venue: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<MatchRow> for Match {
    fn from(row: MatchRow) -> Self {
        Match {
            id: row.id,
            home_team_id: row.home_team_id,
            away_team_id: row.away_team_id,
            match_date: row.match_date,
            match_time: row.match_time,
            venue: row.venue,
            created_at: row.created_at,
            updated_at: row.updated_at,
            lifecycle: Lifecycle::from_deleted_at(row.deleted_at),
        }
    }
}

/// Postgres-backed fixture storage
#[derive(Debug, Clone)]
pub struct PgMatchRepository {
    pool: PgPool,
}

impl PgMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Goals, then the result, then the fixture itself.
    async fn soft_delete_cascade(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> LeagueResult<()> {
        sqlx::query(SOFT_DELETE_GOALS_BY_MATCH_ID)
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to soft delete goals"))?;

        sqlx::query(SOFT_DELETE_RESULT_BY_MATCH_ID)
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to soft delete match result"))?;

        let deleted = sqlx::query(SOFT_DELETE_MATCH)
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to soft delete match"))?;

        if deleted.rows_affected() == 0 {
            return Err(LeagueError::not_found("match not found"));
        }
        Ok(())
    }
}

#[async_trait]
impl MatchRepository for PgMatchRepository {
    async fn create(&self, fixture: &Match) -> LeagueResult<()> {
        sqlx::query(INSERT_MATCH)
            .bind(fixture.id)
            .bind(fixture.home_team_id)
            .bind(fixture.away_team_id)
            .bind(fixture.match_date)
            .bind(&fixture.match_time)
            .bind(&fixture.venue)
            .bind(fixture.created_at)
            .bind(fixture.updated_at)
            .execute(&self.pool)
            .await
            .map_err(LeagueError::storage("failed to insert match"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> LeagueResult<Match> {
        let row = require_record(
            sqlx::query_as::<_, MatchRow>(FIND_MATCH_BY_ID)
                .bind(id)
                .fetch_optional(&self.pool)
                .await,
            "failed to find match",
            "match not found",
        )?;
        Ok(row.into())
    }

    async fn find_all(&self) -> LeagueResult<Vec<Match>> {
        let rows = sqlx::query_as::<_, MatchRow>(FIND_ALL_MATCHES)
            .fetch_all(&self.pool)
            .await
            .map_err(LeagueError::storage("failed to query matches"))?;
        Ok(rows.into_iter().map(Match::from).collect())
    }

    async fn delete(&self, id: Uuid) -> LeagueResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(LeagueError::storage("failed to begin transaction"))?;
        let outcome = Self::soft_delete_cascade(&mut tx, id).await;
        finish_transaction(tx, outcome).await
    }
}
