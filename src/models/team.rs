// src/models/team.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::fixture::Lifecycle;

/// Registry view of a team. Teams are owned by the club registry; the
/// league core only reads them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl Team {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            lifecycle: Lifecycle::Active,
        }
    }
}

/// Registry view of a player and their current team.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Player {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl Player {
    pub fn new(id: Uuid, team_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            team_id,
            name: name.into(),
            lifecycle: Lifecycle::Active,
        }
    }
}
