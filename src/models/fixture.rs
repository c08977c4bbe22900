// src/models/fixture.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Soft-delete state of a persisted row.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Active,
    Deleted { at: DateTime<Utc> },
}

impl Lifecycle {
    /// Maps the nullable `deleted_at` column onto a lifecycle state.
    pub fn from_deleted_at(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            Some(at) => Lifecycle::Deleted { at },
            None => Lifecycle::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Lifecycle::Active => None,
            Lifecycle::Deleted { at } => Some(*at),
        }
    }
}

/// A scheduled fixture between two teams.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Match {
    pub id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub match_date: NaiveDate,
    pub match_time: String, // HH:MM
    pub venue: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

/// The reported final score of a match together with its goal log.
///
/// There is no update path: a result is created once, atomically with its
/// goals, and only disappears through the match deletion cascade.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchResult {
    pub id: Uuid,
    pub match_id: Uuid,
    pub home_score: i32,
    pub away_score: i32,
    pub goals: Vec<Goal>,
    pub created_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

impl MatchResult {
    pub fn status(&self) -> MatchStatus {
        MatchStatus::from_scores(self.home_score, self.away_score)
    }

    /// True when `team_id` won this result, whichever side it played on.
    pub fn is_won_by(&self, fixture: &Match, team_id: Uuid) -> bool {
        match self.status() {
            MatchStatus::HomeWin => fixture.home_team_id == team_id,
            MatchStatus::AwayWin => fixture.away_team_id == team_id,
            MatchStatus::Draw => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Goal {
    pub id: Uuid,
    pub result_id: Uuid,
    pub player_id: Uuid,
    pub team_id: Uuid,
    pub goal_minute: i32,
    // Resolved on read only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    #[serde(rename = "Home Win")]
    HomeWin,
    #[serde(rename = "Away Win")]
    AwayWin,
    #[serde(rename = "Draw")]
    Draw,
}

impl MatchStatus {
    pub fn from_scores(home_score: i32, away_score: i32) -> Self {
        if home_score > away_score {
            MatchStatus::HomeWin
        } else if away_score > home_score {
            MatchStatus::AwayWin
        } else {
            MatchStatus::Draw
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::HomeWin => "Home Win",
            MatchStatus::AwayWin => "Away Win",
            MatchStatus::Draw => "Draw",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Request/Response DTOs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateMatchRequest {
    pub home_team_id: String,
    pub away_team_id: String,
    pub match_date: String, // YYYY-MM-DD
    pub match_time: String, // HH:MM
    pub venue: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReportResultRequest {
    pub home_score: i32,
    pub away_score: i32,
    #[serde(default)]
    pub goals: Vec<GoalRequest>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GoalRequest {
    pub player_id: String,
    pub team_id: String,
    pub goal_minute: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchResponse {
    pub id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub match_date: NaiveDate,
    pub match_time: String,
    pub venue: String,
}

impl From<&Match> for MatchResponse {
    fn from(fixture: &Match) -> Self {
        Self {
            id: fixture.id,
            home_team_id: fixture.home_team_id,
            away_team_id: fixture.away_team_id,
            match_date: fixture.match_date,
            match_time: fixture.match_time.clone(),
            venue: fixture.venue.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GoalResponse {
    pub id: Uuid,
    pub player_id: Uuid,
    pub player_name: Option<String>,
    pub team_id: Uuid,
    pub goal_minute: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchResultResponse {
    pub id: Uuid,
    pub match_id: Uuid,
    pub home_score: i32,
    pub away_score: i32,
    pub match_status: MatchStatus,
    pub goals: Vec<GoalResponse>,
}

impl From<&MatchResult> for MatchResultResponse {
    fn from(result: &MatchResult) -> Self {
        Self {
            id: result.id,
            match_id: result.match_id,
            home_score: result.home_score,
            away_score: result.away_score,
            match_status: result.status(),
            goals: result
                .goals
                .iter()
                .map(|goal| GoalResponse {
                    id: goal.id,
                    player_id: goal.player_id,
                    player_name: goal.player_name.clone(),
                    team_id: goal.team_id,
                    goal_minute: goal.goal_minute,
                })
                .collect(),
        }
    }
}
