use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::error::{LeagueError, LeagueResult};
use crate::utils::ids::parse_id;

/// Earliest minute a goal can be scored in.
pub const MIN_GOAL_MINUTE: i32 = 1;
/// Latest minute a goal can be scored in, including extra time and penalties.
pub const MAX_GOAL_MINUTE: i32 = 150;

lazy_static! {
    static ref MATCH_TIME_REGEX: Regex =
        Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("match time pattern is valid");
}

/// Centralized validation rules for fixtures and results
#[derive(Debug, Default, Clone, Copy)]
pub struct LeagueValidator;

impl LeagueValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a required identifier, returning `message` when it is blank.
    ///
    /// A non-blank value that is not a UUID is also rejected.
    pub fn validate_required_id(&self, raw: &str, message: &str) -> LeagueResult<Uuid> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LeagueError::bad_request(message));
        }
        parse_id(trimmed).ok_or_else(|| {
            LeagueError::bad_request(format!("{} is not a valid identifier", trimmed))
        })
    }

    /// Validate kick-off time (HH:MM, 00:00 - 23:59)
    pub fn validate_match_time(&self, match_time: &str) -> LeagueResult<()> {
        if match_time.is_empty() {
            return Err(LeagueError::bad_request("match time is required"));
        }
        if !MATCH_TIME_REGEX.is_match(match_time) {
            return Err(LeagueError::bad_request(
                "match time must be in HH:MM format (00:00 - 23:59)",
            ));
        }
        Ok(())
    }

    pub fn validate_venue(&self, venue: &str) -> LeagueResult<()> {
        if venue.is_empty() {
            return Err(LeagueError::bad_request("venue is required"));
        }
        Ok(())
    }

    /// Parse a YYYY-MM-DD date and reject anything before `today`.
    ///
    /// Matches may be scheduled for the current day.
    pub fn validate_match_date(&self, raw: &str, today: NaiveDate) -> LeagueResult<NaiveDate> {
        let match_date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            LeagueError::bad_request("match date must be in YYYY-MM-DD format")
        })?;
        if match_date < today {
            return Err(LeagueError::bad_request("match date cannot be in the past"));
        }
        Ok(match_date)
    }

    /// Validate game scores
    pub fn validate_scores(&self, home_score: i32, away_score: i32) -> LeagueResult<()> {
        if home_score < 0 || away_score < 0 {
            return Err(LeagueError::bad_request("score cannot be negative"));
        }
        Ok(())
    }

    pub fn validate_goal_minute(&self, minute: i32) -> LeagueResult<()> {
        if !(MIN_GOAL_MINUTE..=MAX_GOAL_MINUTE).contains(&minute) {
            return Err(LeagueError::bad_request(format!(
                "goal minute must be between {} and {}",
                MIN_GOAL_MINUTE, MAX_GOAL_MINUTE
            )));
        }
        Ok(())
    }
}
