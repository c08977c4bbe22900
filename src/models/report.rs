// src/models/report.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::fixture::{Match, MatchResult, MatchStatus};
use crate::models::team::{Player, Team};

/// Derived per-match view. Never stored, always rebuilt from the
/// persisted fixtures, results and goals.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchReportView {
    pub match_id: Uuid,
    pub match_date: NaiveDate,
    pub match_time: String,
    pub venue: String,
    pub home_team_name: String,
    pub away_team_name: String,
    pub home_score: i32,
    pub away_score: i32,
    pub match_status: MatchStatus,
    pub top_scorer: Option<String>,
    pub top_scorer_goals: i32,
    /// Total wins of the home side across every active result
    pub home_team_wins: i32,
    /// Total wins of the away side across every active result
    pub away_team_wins: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TeamStanding {
    pub team_id: Uuid,
    pub team_name: String,
    pub played: i32,
    pub won: i32,
    pub drawn: i32,
    pub lost: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TopScorer {
    pub player_id: Uuid,
    pub player_name: String,
    pub team_name: String,
    pub goals: i32,
}

/// The active corpus every report is computed from.
///
/// Storage adapters fill it from a single consistent read.
#[derive(Debug, Clone, Default)]
pub struct LeagueSnapshot {
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
    pub results: Vec<MatchResult>,
}
