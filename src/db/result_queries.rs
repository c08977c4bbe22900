use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::helpers::{finish_transaction, is_unique_violation, require_record};
use crate::db::MatchResultRepository;
use crate::error::{LeagueError, LeagueResult};
use crate::models::fixture::{Goal, Lifecycle, MatchResult};

const INSERT_MATCH_RESULT: &str = r#"
    INSERT INTO match_results (id, match_id, home_score, away_score, created_at)
    VALUES ($1, $2, $3, $4, $5)
"#;

const INSERT_GOAL: &str = r#"
    INSERT INTO goals (id, result_id, player_id, team_id, goal_minute)
    VALUES ($1, $2, $3, $4, $5)
"#;

const FIND_RESULT_BY_MATCH_ID: &str = r#"
    SELECT id, match_id, home_score, away_score, created_at, deleted_at
    FROM match_results
    WHERE match_id = $1 AND deleted_at IS NULL
"#;

const FIND_GOALS_BY_RESULT_ID: &str = r#"
    SELECT g.id, g.result_id, g.player_id, p.name AS player_name, g.team_id, g.goal_minute, g.deleted_at
    FROM goals g
    LEFT JOIN players p ON p.id = g.player_id AND p.deleted_at IS NULL
    WHERE g.result_id = $1 AND g.deleted_at IS NULL
    ORDER BY g.goal_minute ASC, g.id ASC
"#;

const EXISTS_RESULT_BY_MATCH_ID: &str = r#"
    SELECT EXISTS(SELECT 1 FROM match_results WHERE match_id = $1 AND deleted_at IS NULL)
"#;

#[derive(Debug, FromRow)]
pub(crate) struct MatchResultRow {
    pub id: Uuid,
    pub match_id: Uuid,
    pub home_score: i32,
    pub away_score: i32,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl MatchResultRow {
    pub fn into_result(self, goals: Vec<Goal>) -> MatchResult {
        MatchResult {
            id: self.id,
            match_id: self.match_id,
            home_score: self.home_score,
            away_score: self.away_score,
            goals,
            created_at: self.created_at,
            lifecycle: Lifecycle::from_deleted_at(self.deleted_at),
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct GoalRow {
    pub id: Uuid,
    pub result_id: Uuid,
    pub player_id: Uuid,
    pub player_name: Option<String>,
    pub team_id: Uuid,
    pub goal_minute: i32,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<GoalRow> for Goal {
    fn from(row: GoalRow) -> Self {
        Goal {
            id: row.id,
            result_id: row.result_id,
            player_id: row.player_id,
            team_id: row.team_id,
            goal_minute: row.goal_minute,
            player_name: row.player_name,
            lifecycle: Lifecycle::from_deleted_at(row.deleted_at),
        }
    }
}

/// Postgres-backed result storage
#[derive(Debug, Clone)]
pub struct PgMatchResultRepository {
    pool: PgPool,
}

impl PgMatchResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_result_with_goals(
        tx: &mut Transaction<'_, Postgres>,
        result: &MatchResult,
    ) -> LeagueResult<()> {
        sqlx::query(INSERT_MATCH_RESULT)
            .bind(result.id)
            .bind(result.match_id)
            .bind(result.home_score)
            .bind(result.away_score)
            .bind(result.created_at)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                // Partial unique index on match_results(match_id) WHERE deleted_at IS NULL
                if is_unique_violation(&e) {
                    LeagueError::duplicate("match result already reported")
                } else {
                    LeagueError::storage("failed to insert match result")(e)
                }
            })?;

        for goal in &result.goals {
            sqlx::query(INSERT_GOAL)
                .bind(goal.id)
                .bind(goal.result_id)
                .bind(goal.player_id)
                .bind(goal.team_id)
                .bind(goal.goal_minute)
                .execute(&mut **tx)
                .await
                .map_err(LeagueError::storage("failed to insert goal event"))?;
        }

        Ok(())
    }
}

#[async_trait]
impl MatchResultRepository for PgMatchResultRepository {
    async fn create(&self, result: &MatchResult) -> LeagueResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(LeagueError::storage("failed to begin transaction"))?;
        let outcome = Self::insert_result_with_goals(&mut tx, result).await;
        finish_transaction(tx, outcome).await
    }

    async fn find_by_match_id(&self, match_id: Uuid) -> LeagueResult<MatchResult> {
        let row = require_record(
            sqlx::query_as::<_, MatchResultRow>(FIND_RESULT_BY_MATCH_ID)
                .bind(match_id)
                .fetch_optional(&self.pool)
                .await,
            "failed to find match result",
            "match result not found",
        )?;

        let goals = sqlx::query_as::<_, GoalRow>(FIND_GOALS_BY_RESULT_ID)
            .bind(row.id)
            .fetch_all(&self.pool)
            .await
            .map_err(LeagueError::storage("failed to query goals"))?;

        Ok(row.into_result(goals.into_iter().map(Goal::from).collect()))
    }

    async fn exists_by_match_id(&self, match_id: Uuid) -> LeagueResult<bool> {
        sqlx::query_scalar::<_, bool>(EXISTS_RESULT_BY_MATCH_ID)
            .bind(match_id)
            .fetch_one(&self.pool)
            .await
            .map_err(LeagueError::storage("failed to check match result existence"))
    }
}
