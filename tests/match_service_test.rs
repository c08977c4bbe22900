use std::sync::Arc;
use uuid::Uuid;

mod common;
use common::utils::{days_from_today, register_clubs, TestClubs};

use football_league_backend::db::{InMemoryStore, LeagueSnapshotSource, Repositories};
use football_league_backend::models::fixture::{
    CreateMatchRequest, GoalRequest, MatchStatus, ReportResultRequest,
};
use football_league_backend::models::team::Player;
use football_league_backend::services::{MatchService, ReportingService};

struct ServiceHarness {
    store: Arc<InMemoryStore>,
    matches: MatchService,
    reports: ReportingService,
    clubs: TestClubs,
}

fn harness() -> ServiceHarness {
    let store = Arc::new(InMemoryStore::new());
    let repositories = Repositories::in_memory(store.clone());
    let clubs = register_clubs(&store);
    ServiceHarness {
        matches: MatchService::new(&repositories),
        reports: ReportingService::new(&repositories),
        store,
        clubs,
    }
}

fn match_request(clubs: &TestClubs, days_ahead: i64) -> CreateMatchRequest {
    CreateMatchRequest {
        home_team_id: clubs.home.id.to_string(),
        away_team_id: clubs.away.id.to_string(),
        match_date: days_from_today(days_ahead),
        match_time: "15:00".to_string(),
        venue: "Old Ground".to_string(),
    }
}

fn goal(player: &Player, minute: i32) -> GoalRequest {
    GoalRequest {
        player_id: player.id.to_string(),
        team_id: player.team_id.to_string(),
        goal_minute: minute,
    }
}

fn two_one(clubs: &TestClubs) -> ReportResultRequest {
    ReportResultRequest {
        home_score: 2,
        away_score: 1,
        goals: vec![
            goal(&clubs.home_striker, 12),
            goal(&clubs.away_striker, 40),
            goal(&clubs.home_striker, 77),
        ],
    }
}

#[tokio::test]
async fn matches_can_be_scheduled_for_today_and_later_but_not_the_past() {
    let h = harness();

    assert!(h.matches.create_match(&match_request(&h.clubs, 0)).await.is_ok());
    assert!(h.matches.create_match(&match_request(&h.clubs, 1)).await.is_ok());

    let err = h.matches.create_match(&match_request(&h.clubs, -1)).await.unwrap_err();
    assert!(err.is_bad_request());
    assert_eq!(err.to_string(), "match date cannot be in the past");

    assert_eq!(h.matches.get_all_matches().await.unwrap().len(), 2);
}

#[tokio::test]
async fn scheduling_against_an_unregistered_team_is_not_found() {
    let h = harness();
    let mut request = match_request(&h.clubs, 3);
    request.away_team_id = Uuid::new_v4().to_string();

    let err = h.matches.create_match(&request).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(h.matches.get_all_matches().await.unwrap().is_empty());
}

#[tokio::test]
async fn created_match_is_stored_with_trimmed_fields() {
    let h = harness();
    let mut request = match_request(&h.clubs, 2);
    request.venue = "  Old Ground  ".to_string();

    let id = h.matches.create_match(&request).await.unwrap();
    let stored = h.matches.get_match_by_id(&id.to_string()).await.unwrap();

    assert_eq!(stored.home_team_id, h.clubs.home.id);
    assert_eq!(stored.away_team_id, h.clubs.away.id);
    assert_eq!(stored.venue, "Old Ground");
    assert_eq!(stored.match_time, "15:00");
}

#[tokio::test]
async fn reported_result_is_stored_once_and_rereport_is_duplicate() {
    let h = harness();
    let match_id = h.matches.create_match(&match_request(&h.clubs, 1)).await.unwrap().to_string();

    let result_id = h.matches.report_result(&match_id, &two_one(&h.clubs)).await.unwrap();
    let stored = h.matches.get_match_result(&match_id).await.unwrap();
    assert_eq!(stored.id, result_id);
    assert_eq!(stored.status(), MatchStatus::HomeWin);
    assert_eq!(stored.goals.len(), 3);
    assert_eq!(
        stored.goals.iter().map(|g| g.goal_minute).collect::<Vec<_>>(),
        vec![12, 40, 77]
    );
    assert_eq!(stored.goals[1].player_name.as_deref(), Some("Sam Away"));

    let err = h.matches.report_result(&match_id, &two_one(&h.clubs)).await.unwrap_err();
    assert!(err.is_duplicate());

    let snapshot = h.store.load_snapshot().await.unwrap();
    assert_eq!(snapshot.results.len(), 1);
}

#[tokio::test]
async fn goalless_draw_needs_no_goal_events() {
    let h = harness();
    let match_id = h.matches.create_match(&match_request(&h.clubs, 1)).await.unwrap().to_string();

    let request = ReportResultRequest { home_score: 0, away_score: 0, goals: Vec::new() };
    h.matches.report_result(&match_id, &request).await.unwrap();

    let report = h.matches.get_match_report(&match_id).await.unwrap();
    assert_eq!(report.match_status, MatchStatus::Draw);
    assert_eq!(report.top_scorer, None);
    assert_eq!(report.top_scorer_goals, 0);
}

#[tokio::test]
async fn goal_tally_must_match_the_score() {
    let h = harness();
    let match_id = h.matches.create_match(&match_request(&h.clubs, 1)).await.unwrap().to_string();

    let mut request = two_one(&h.clubs);
    request.goals.pop();
    let err = h.matches.report_result(&match_id, &request).await.unwrap_err();

    assert!(err.is_bad_request());
    assert_eq!(err.to_string(), "total goals (2) does not match reported score (3)");
    assert!(h.matches.get_match_result(&match_id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn unregistered_scorer_is_rejected() {
    let h = harness();
    let match_id = h.matches.create_match(&match_request(&h.clubs, 1)).await.unwrap().to_string();

    let ghost = Player::new(Uuid::new_v4(), h.clubs.home.id, "Ghost");
    let request = ReportResultRequest {
        home_score: 1,
        away_score: 0,
        goals: vec![goal(&ghost, 5)],
    };
    let err = h.matches.report_result(&match_id, &request).await.unwrap_err();

    assert!(err.is_bad_request());
    assert_eq!(err.to_string(), format!("player {} not found", ghost.id));
}

#[tokio::test]
async fn reporting_for_an_unknown_match_is_not_found() {
    let h = harness();

    let err = h.matches
        .report_result(&Uuid::new_v4().to_string(), &two_one(&h.clubs))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = h.matches.report_result("not-an-id", &two_one(&h.clubs)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn match_report_distinguishes_missing_match_from_missing_result() {
    let h = harness();
    let match_id = h.matches.create_match(&match_request(&h.clubs, 1)).await.unwrap().to_string();

    let err = h.matches.get_match_report(&match_id).await.unwrap_err();
    assert_eq!(err.to_string(), "match result not found");

    let err = h.matches.get_match_report(&Uuid::new_v4().to_string()).await.unwrap_err();
    assert_eq!(err.to_string(), "match not found");
}

#[tokio::test]
async fn reports_and_tables_follow_reported_results() {
    let h = harness();
    let first = h.matches.create_match(&match_request(&h.clubs, 1)).await.unwrap().to_string();
    let second = h.matches.create_match(&match_request(&h.clubs, 2)).await.unwrap().to_string();

    h.matches.report_result(&first, &two_one(&h.clubs)).await.unwrap();
    let away_win = ReportResultRequest {
        home_score: 0,
        away_score: 1,
        goals: vec![goal(&h.clubs.away_striker, 88)],
    };
    h.matches.report_result(&second, &away_win).await.unwrap();

    let report = h.matches.get_match_report(&first).await.unwrap();
    assert_eq!(report.match_status, MatchStatus::HomeWin);
    assert_eq!(report.home_team_name, h.clubs.home.name);
    assert_eq!(report.top_scorer.as_deref(), Some("Alex Home"));
    assert_eq!(report.top_scorer_goals, 2);
    assert_eq!(report.home_team_wins, 1);
    assert_eq!(report.away_team_wins, 1);

    let reports = h.matches.get_all_match_reports().await.unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].match_id.to_string(), second);

    let standings = h.reports.get_standings().await.unwrap();
    assert_eq!(standings.len(), 2);
    for row in &standings {
        assert_eq!(row.played, 2);
        assert_eq!(row.won, 1);
        assert_eq!(row.lost, 1);
        assert_eq!(row.points, 3);
    }
    // Level on points, goal difference and goals scored, so by name
    assert_eq!(standings[0].team_id, h.clubs.away.id);
    assert_eq!(standings[1].team_id, h.clubs.home.id);
    assert!(standings.iter().all(|row| row.goal_difference == 0 && row.goals_for == 2));

    let scorers = h.reports.get_top_scorers().await.unwrap();
    assert_eq!(scorers.len(), 2);
    assert_eq!(scorers[0].player_name, "Alex Home");
    assert_eq!(scorers[0].goals, 2);
    assert_eq!(scorers[1].player_name, "Sam Away");
    assert_eq!(scorers[1].team_name, h.clubs.away.name);
}

#[tokio::test]
async fn deleted_match_disappears_with_its_result() {
    let h = harness();
    let match_id = h.matches.create_match(&match_request(&h.clubs, 1)).await.unwrap().to_string();
    h.matches.report_result(&match_id, &two_one(&h.clubs)).await.unwrap();

    h.matches.delete_match(&match_id).await.unwrap();

    assert!(h.matches.get_match_by_id(&match_id).await.unwrap_err().is_not_found());
    assert!(h.matches.get_match_result(&match_id).await.unwrap_err().is_not_found());
    assert!(h.matches.get_all_match_reports().await.unwrap().is_empty());
    assert!(h.reports.get_standings().await.unwrap().is_empty());
    assert!(h.reports.get_top_scorers().await.unwrap().is_empty());
    assert!(h.matches.delete_match(&match_id).await.unwrap_err().is_not_found());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reports_for_one_match_store_a_single_result() {
    let h = harness();
    let match_id = h.matches.create_match(&match_request(&h.clubs, 1)).await.unwrap().to_string();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = h.matches.clone();
            let match_id = match_id.clone();
            let request = two_one(&h.clubs);
            tokio::spawn(async move { service.report_result(&match_id, &request).await })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.expect("report task panicked") {
            Ok(_) => accepted += 1,
            Err(e) => assert!(e.is_duplicate(), "unexpected error: {}", e),
        }
    }
    assert_eq!(accepted, 1);

    let snapshot = h.store.load_snapshot().await.unwrap();
    assert_eq!(snapshot.results.len(), 1);
    assert_eq!(snapshot.results[0].match_id.to_string(), match_id);
}

#[tokio::test]
async fn same_team_written_differently_cannot_play_itself() {
    let h = harness();
    let mut request = match_request(&h.clubs, 1);
    request.away_team_id = h.clubs.home.id.simple().to_string();

    let err = h.matches.create_match(&request).await.unwrap_err();
    assert!(err.is_bad_request());
    assert_eq!(err.to_string(), "home team and away team cannot be the same");
    assert!(h.matches.get_all_matches().await.unwrap().is_empty());
}
