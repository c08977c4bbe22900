use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::TeamRegistry;
use crate::error::{LeagueError, LeagueResult};
use crate::models::fixture::Lifecycle;
use crate::models::team::{Player, Team};

const TEAM_EXISTS: &str = r#"
    SELECT EXISTS(SELECT 1 FROM teams WHERE id = $1 AND deleted_at IS NULL)
"#;

const PLAYER_EXISTS: &str = r#"
    SELECT EXISTS(SELECT 1 FROM players WHERE id = $1 AND deleted_at IS NULL)
"#;

pub(crate) const FIND_ACTIVE_TEAMS: &str = r#"
    SELECT id, name, deleted_at
    FROM teams
    WHERE deleted_at IS NULL
"#;

pub(crate) const FIND_ACTIVE_PLAYERS: &str = r#"
    SELECT id, team_id, name, deleted_at
    FROM players
    WHERE deleted_at IS NULL
"#;

#[derive(Debug, FromRow)]
pub(crate) struct TeamRow {
    pub id: Uuid,
    pub name: String,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team {
            id: row.id,
            name: row.name,
            lifecycle: Lifecycle::from_deleted_at(row.deleted_at),
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PlayerRow {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<PlayerRow> for Player {
    fn from(row: PlayerRow) -> Self {
        Player {
            id: row.id,
            team_id: row.team_id,
            name: row.name,
            lifecycle: Lifecycle::from_deleted_at(row.deleted_at),
        }
    }
}

/// Read access to the club registry tables
#[derive(Debug, Clone)]
pub struct PgTeamRegistry {
    pool: PgPool,
}

impl PgTeamRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRegistry for PgTeamRegistry {
    async fn team_exists(&self, id: Uuid) -> LeagueResult<bool> {
        sqlx::query_scalar::<_, bool>(TEAM_EXISTS)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(LeagueError::storage("failed to check team existence"))
    }

    async fn player_exists(&self, id: Uuid) -> LeagueResult<bool> {
        sqlx::query_scalar::<_, bool>(PLAYER_EXISTS)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(LeagueError::storage("failed to check player existence"))
    }
}
