use chrono::{NaiveDate, Utc};

use crate::error::{LeagueError, LeagueResult};
use crate::league::validation::LeagueValidator;
use crate::models::fixture::{CreateMatchRequest, Lifecycle, Match};
use crate::utils::ids::generate_id;

/// Build a new fixture from a scheduling request.
///
/// Rules are checked in order and the first failure is returned:
/// team ids present and well formed, teams distinct, kick-off time, venue,
/// then the date (which may be `today` but not earlier).
pub fn new_match(request: &CreateMatchRequest, today: NaiveDate) -> LeagueResult<Match> {
    let validator = LeagueValidator::new();

    let home_team_id = request.home_team_id.trim();
    let away_team_id = request.away_team_id.trim();
    let match_time = request.match_time.trim();
    let venue = request.venue.trim();

    if home_team_id.is_empty() {
        return Err(LeagueError::bad_request("home team ID is required"));
    }
    if away_team_id.is_empty() {
        return Err(LeagueError::bad_request("away team ID is required"));
    }
    let home_team_id = validator.validate_required_id(home_team_id, "home team ID is required")?;
    let away_team_id = validator.validate_required_id(away_team_id, "away team ID is required")?;
    // Compared after parsing: one id has several textual forms
    if home_team_id == away_team_id {
        return Err(LeagueError::bad_request("home team and away team cannot be the same"));
    }

    validator.validate_match_time(match_time)?;
    validator.validate_venue(venue)?;
    let match_date = validator.validate_match_date(&request.match_date, today)?;

    let now = Utc::now();
    Ok(Match {
        id: generate_id(),
        home_team_id,
        away_team_id,
        match_date,
        match_time: match_time.to_string(),
        venue: venue.to_string(),
        created_at: now,
        updated_at: now,
        lifecycle: Lifecycle::Active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn request(home: &str, away: &str, date: &str, time: &str, venue: &str) -> CreateMatchRequest {
        CreateMatchRequest {
            home_team_id: home.to_string(),
            away_team_id: away.to_string(),
            match_date: date.to_string(),
            match_time: time.to_string(),
            venue: venue.to_string(),
        }
    }

    #[test]
    fn schedules_a_future_match() {
        let home = Uuid::new_v4();
        let away = Uuid::new_v4();
        let fixture = new_match(
            &request(&home.to_string(), &away.to_string(), "2025-06-20", "19:30", " Stadium X "),
            today(),
        )
        .unwrap();

        assert_eq!(fixture.home_team_id, home);
        assert_eq!(fixture.away_team_id, away);
        assert_eq!(fixture.match_date, NaiveDate::from_ymd_opt(2025, 6, 20).unwrap());
        assert_eq!(fixture.match_time, "19:30");
        assert_eq!(fixture.venue, "Stadium X");
        assert!(fixture.lifecycle.is_active());
        assert_eq!(fixture.created_at, fixture.updated_at);
    }

    #[test]
    fn today_is_allowed_but_yesterday_is_not() {
        let home = Uuid::new_v4().to_string();
        let away = Uuid::new_v4().to_string();

        assert!(new_match(&request(&home, &away, "2025-06-01", "12:00", "Arena"), today()).is_ok());

        let err = new_match(&request(&home, &away, "2025-05-31", "12:00", "Arena"), today()).unwrap_err();
        assert!(err.is_bad_request());
        assert_eq!(err.to_string(), "match date cannot be in the past");
    }

    #[test]
    fn rules_are_checked_in_order() {
        let team = Uuid::new_v4().to_string();
        let other = Uuid::new_v4().to_string();

        // Everything wrong: the first rule wins
        let err = new_match(&request(" ", "", "1999-01-01", "99:99", ""), today()).unwrap_err();
        assert_eq!(err.to_string(), "home team ID is required");

        let err = new_match(&request(&team, "", "1999-01-01", "99:99", ""), today()).unwrap_err();
        assert_eq!(err.to_string(), "away team ID is required");

        let err = new_match(&request(&team, &team, "1999-01-01", "99:99", ""), today()).unwrap_err();
        assert_eq!(err.to_string(), "home team and away team cannot be the same");

        let err = new_match(&request(&team, &other, "1999-01-01", "", ""), today()).unwrap_err();
        assert_eq!(err.to_string(), "match time is required");

        let err = new_match(&request(&team, &other, "1999-01-01", "25:00", ""), today()).unwrap_err();
        assert_eq!(err.to_string(), "match time must be in HH:MM format (00:00 - 23:59)");

        let err = new_match(&request(&team, &other, "1999-01-01", "20:00", "  "), today()).unwrap_err();
        assert_eq!(err.to_string(), "venue is required");

        let err = new_match(&request(&team, &other, "1999-01-01", "20:00", "Arena"), today()).unwrap_err();
        assert_eq!(err.to_string(), "match date cannot be in the past");
    }

    #[test]
    fn same_team_in_another_textual_form_is_rejected() {
        let team = Uuid::new_v4();
        let forms = [
            team.simple().to_string(),
            team.braced().to_string(),
            team.urn().to_string(),
            team.to_string().to_uppercase(),
        ];

        for other_form in forms {
            let err = new_match(
                &request(&team.to_string(), &other_form, "2025-06-20", "19:30", "Arena"),
                today(),
            )
            .unwrap_err();
            assert!(err.is_bad_request());
            assert_eq!(err.to_string(), "home team and away team cannot be the same");
        }
    }

    #[test]
    fn malformed_team_id_is_rejected_before_comparison() {
        let err = new_match(&request("abc", "ABC", "2025-06-20", "19:30", "Arena"), today()).unwrap_err();
        assert_eq!(err.to_string(), "abc is not a valid identifier");
    }

    #[test]
    fn ids_are_unique_per_fixture() {
        let req = request(
            &Uuid::new_v4().to_string(),
            &Uuid::new_v4().to_string(),
            "2025-07-01",
            "18:00",
            "Arena",
        );
        let first = new_match(&req, today()).unwrap();
        let second = new_match(&req, today()).unwrap();
        assert_ne!(first.id, second.id);
        assert!(first.id < second.id);
    }
}
