use chrono::Utc;
use uuid::Uuid;

use crate::error::{LeagueError, LeagueResult};
use crate::league::validation::LeagueValidator;
use crate::models::fixture::{Goal, Lifecycle, MatchResult, ReportResultRequest};
use crate::utils::ids::{generate_id, parse_id};

/// Validate a reported score against its goal log and build the result.
///
/// `home_team_id` and `away_team_id` must come from the stored fixture, never
/// from the caller. Checks run in order and stop at the first failure:
///
/// 1. match and team ids are present
/// 2. scores are not negative
/// 3. the number of goals equals `home_score + away_score`
/// 4. every goal has a player, a team, a minute in `1..=150` and a team that
///    plays in this fixture
/// 5. the goals per side equal the declared score of that side
///
/// On success every goal carries a fresh id and the id of the new result.
pub fn new_match_result(
    match_id: Uuid,
    home_team_id: Uuid,
    away_team_id: Uuid,
    request: &ReportResultRequest,
) -> LeagueResult<MatchResult> {
    let validator = LeagueValidator::new();

    if match_id.is_nil() {
        return Err(LeagueError::bad_request("match ID is required"));
    }
    if home_team_id.is_nil() || away_team_id.is_nil() {
        return Err(LeagueError::bad_request("home and away team IDs are required"));
    }
    validator.validate_scores(request.home_score, request.away_score)?;

    let home_score = request.home_score;
    let away_score = request.away_score;

    let total_goals = request.goals.len() as i64;
    let expected_total = home_score as i64 + away_score as i64;
    if total_goals != expected_total {
        return Err(LeagueError::bad_request(format!(
            "total goals ({}) does not match reported score ({})",
            total_goals, expected_total
        )));
    }

    let result_id = generate_id();
    let mut home_goal_count = 0;
    let mut away_goal_count = 0;
    let mut goals = Vec::with_capacity(request.goals.len());

    for reported in &request.goals {
        let player_id = reported.player_id.trim();
        let team_id = reported.team_id.trim();

        if player_id.is_empty() {
            return Err(LeagueError::bad_request("player ID is required for each goal"));
        }
        if team_id.is_empty() {
            return Err(LeagueError::bad_request("team ID is required for each goal"));
        }
        let player_id = validator.validate_required_id(player_id, "player ID is required for each goal")?;
        validator.validate_goal_minute(reported.goal_minute)?;

        let team_id = match parse_id(team_id) {
            Some(id) if id == home_team_id => {
                home_goal_count += 1;
                id
            }
            Some(id) if id == away_team_id => {
                away_goal_count += 1;
                id
            }
            _ => {
                return Err(LeagueError::bad_request(format!(
                    "goal team ID {} does not belong to match participants",
                    team_id
                )));
            }
        };

        goals.push(Goal {
            id: generate_id(),
            result_id,
            player_id,
            team_id,
            goal_minute: reported.goal_minute,
            player_name: None,
            lifecycle: Lifecycle::Active,
        });
    }

    if home_goal_count != home_score {
        return Err(LeagueError::bad_request(format!(
            "home goals ({}) does not match home score ({})",
            home_goal_count, home_score
        )));
    }
    if away_goal_count != away_score {
        return Err(LeagueError::bad_request(format!(
            "away goals ({}) does not match away score ({})",
            away_goal_count, away_score
        )));
    }

    Ok(MatchResult {
        id: result_id,
        match_id,
        home_score,
        away_score,
        goals,
        created_at: Utc::now(),
        lifecycle: Lifecycle::Active,
    })
}
