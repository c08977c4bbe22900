use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::helpers::finish_transaction;
use crate::db::match_queries::{MatchRow, FIND_ALL_MATCHES, FIND_MATCH_BY_ID};
use crate::db::registry_queries::{PlayerRow, TeamRow, FIND_ACTIVE_PLAYERS, FIND_ACTIVE_TEAMS};
use crate::db::result_queries::{GoalRow, MatchResultRow};
use crate::db::LeagueSnapshotSource;
use crate::error::{LeagueError, LeagueResult};
use crate::models::fixture::{Goal, Match, MatchResult};
use crate::models::report::LeagueSnapshot;

const SNAPSHOT_ISOLATION: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

const FIND_ACTIVE_RESULTS: &str = r#"
    SELECT id, match_id, home_score, away_score, created_at, deleted_at
    FROM match_results
    WHERE deleted_at IS NULL
"#;

const FIND_ACTIVE_GOALS: &str = r#"
    SELECT g.id, g.result_id, g.player_id, p.name AS player_name, g.team_id, g.goal_minute, g.deleted_at
    FROM goals g
    JOIN match_results mr ON mr.id = g.result_id AND mr.deleted_at IS NULL
    LEFT JOIN players p ON p.id = g.player_id AND p.deleted_at IS NULL
    WHERE g.deleted_at IS NULL
    ORDER BY g.goal_minute ASC, g.id ASC
"#;

/// Reads the active league corpus in one repeatable-read transaction so
/// every report sees a single committed state.
#[derive(Debug, Clone)]
pub struct PgSnapshotSource {
    pool: PgPool,
}

impl PgSnapshotSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin_snapshot(&self) -> LeagueResult<Transaction<'static, Postgres>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(LeagueError::storage("failed to begin transaction"))?;
        if let Err(e) = sqlx::query(SNAPSHOT_ISOLATION).execute(&mut *tx).await {
            // Dropping the transaction rolls it back
            return Err(LeagueError::storage("failed to set snapshot isolation")(e));
        }
        Ok(tx)
    }

    async fn read_snapshot(tx: &mut Transaction<'_, Postgres>) -> LeagueResult<LeagueSnapshot> {
        let teams = sqlx::query_as::<_, TeamRow>(FIND_ACTIVE_TEAMS)
            .fetch_all(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to query teams"))?;

        let players = sqlx::query_as::<_, PlayerRow>(FIND_ACTIVE_PLAYERS)
            .fetch_all(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to query players"))?;

        let matches = sqlx::query_as::<_, MatchRow>(FIND_ALL_MATCHES)
            .fetch_all(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to query matches"))?;

        let results = sqlx::query_as::<_, MatchResultRow>(FIND_ACTIVE_RESULTS)
            .fetch_all(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to query match results"))?;

        let goal_rows = sqlx::query_as::<_, GoalRow>(FIND_ACTIVE_GOALS)
            .fetch_all(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to query goals"))?;

        Ok(LeagueSnapshot {
            teams: teams.into_iter().map(Into::into).collect(),
            players: players.into_iter().map(Into::into).collect(),
            matches: matches.into_iter().map(Match::from).collect(),
            results: assemble_results(results, goal_rows),
        })
    }

    async fn read_match_snapshot(
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
    ) -> LeagueResult<Option<LeagueSnapshot>> {
        let fixture = sqlx::query_as::<_, MatchRow>(FIND_MATCH_BY_ID)
            .bind(match_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to find match"))?;
        let Some(fixture) = fixture else {
            return Ok(None);
        };
        let (home, away) = (fixture.home_team_id, fixture.away_team_id);

        let teams = sqlx::query_as::<_, TeamRow>(FIND_TEAMS_BY_IDS)
            .bind(home)
            .bind(away)
            .fetch_all(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to query teams"))?;

        let players = sqlx::query_as::<_, PlayerRow>(FIND_SCORERS_OF_MATCH)
            .bind(match_id)
            .fetch_all(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to query scorers"))?;

        let matches = sqlx::query_as::<_, MatchRow>(FIND_MATCHES_OF_TEAMS)
            .bind(home)
            .bind(away)
            .fetch_all(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to query matches"))?;

        let results = sqlx::query_as::<_, MatchResultRow>(FIND_RESULTS_OF_TEAMS)
            .bind(home)
            .bind(away)
            .fetch_all(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to query match results"))?;

        let goal_rows = sqlx::query_as::<_, GoalRow>(FIND_GOALS_OF_MATCH)
            .bind(match_id)
            .fetch_all(&mut **tx)
            .await
            .map_err(LeagueError::storage("failed to query goals"))?;

        Ok(Some(LeagueSnapshot {
            teams: teams.into_iter().map(Into::into).collect(),
            players: players.into_iter().map(Into::into).collect(),
            matches: matches.into_iter().map(Match::from).collect(),
            results: assemble_results(results, goal_rows),
        }))
    }
}

#[async_trait]
impl LeagueSnapshotSource for PgSnapshotSource {
    async fn load_snapshot(&self) -> LeagueResult<LeagueSnapshot> {
        let mut tx = self.begin_snapshot().await?;
        let outcome = Self::read_snapshot(&mut tx).await;
        finish_transaction(tx, outcome).await
    }

    async fn load_match_snapshot(&self, match_id: Uuid) -> LeagueResult<Option<LeagueSnapshot>> {
        let mut tx = self.begin_snapshot().await?;
        let outcome = Self::read_match_snapshot(&mut tx, match_id).await;
        finish_transaction(tx, outcome).await
    }
}
