use chrono::Local;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{LeagueSnapshotSource, MatchRepository, MatchResultRepository, Repositories, TeamRegistry};
use crate::error::{LeagueError, LeagueResult};
use crate::league::fixtures::new_match;
use crate::league::results::new_match_result;
use crate::league::standings::StandingsCalculator;
use crate::models::fixture::{CreateMatchRequest, Match, MatchResult, ReportResultRequest};
use crate::models::report::MatchReportView;
use crate::utils::ids::parse_id;

/// Orchestrates fixture scheduling, result reporting and per-match reports
#[derive(Clone)]
pub struct MatchService {
    matches: Arc<dyn MatchRepository>,
    results: Arc<dyn MatchResultRepository>,
    snapshots: Arc<dyn LeagueSnapshotSource>,
    registry: Arc<dyn TeamRegistry>,
}

/// Ids that cannot be parsed cannot name a stored match.
fn match_id_from(raw: &str) -> LeagueResult<Uuid> {
    parse_id(raw).ok_or_else(|| LeagueError::not_found("match not found"))
}

impl MatchService {
    pub fn new(repositories: &Repositories) -> Self {
        Self {
            matches: repositories.matches.clone(),
            results: repositories.results.clone(),
            snapshots: repositories.snapshots.clone(),
            registry: repositories.registry.clone(),
        }
    }

    /// Schedule a fixture, returning its id.
    #[tracing::instrument(
        name = "Create match",
        skip(self, request),
        fields(
            home_team_id = %request.home_team_id,
            away_team_id = %request.away_team_id,
            match_date = %request.match_date
        )
    )]
    pub async fn create_match(&self, request: &CreateMatchRequest) -> LeagueResult<Uuid> {
        let today = Local::now().date_naive();
        let fixture = new_match(request, today).map_err(|e| {
            tracing::warn!("Rejected match: {}", e);
            e
        })?;

        for team_id in [fixture.home_team_id, fixture.away_team_id] {
            if !self.registry.team_exists(team_id).await? {
                tracing::warn!("Team {} is not registered", team_id);
                return Err(LeagueError::not_found("team not found"));
            }
        }

        self.matches.create(&fixture).await?;
        tracing::info!("Scheduled match {} at {} on {}", fixture.id, fixture.venue, fixture.match_date);
        Ok(fixture.id)
    }

    pub async fn get_match_by_id(&self, id: &str) -> LeagueResult<Match> {
        self.matches.find_by_id(match_id_from(id)?).await
    }

    pub async fn get_all_matches(&self) -> LeagueResult<Vec<Match>> {
        self.matches.find_all().await
    }

    /// Report the final score of a scheduled match.
    ///
    /// The fixture's own team ids are used for validation; team ids sent by
    /// the caller only attribute goals. A second report for the same match
    /// is rejected with `Duplicate`.
    #[tracing::instrument(
        name = "Report match result",
        skip(self, request),
        fields(
            match_id = %match_id,
            home_score = request.home_score,
            away_score = request.away_score,
            goals = request.goals.len()
        )
    )]
    pub async fn report_result(&self, match_id: &str, request: &ReportResultRequest) -> LeagueResult<Uuid> {
        let fixture = self.matches.find_by_id(match_id_from(match_id)?).await?;

        if self.results.exists_by_match_id(fixture.id).await? {
            tracing::warn!("Result for match {} was already reported", fixture.id);
            return Err(LeagueError::duplicate("match result already reported"));
        }

        let result = new_match_result(
            fixture.id,
            fixture.home_team_id,
            fixture.away_team_id,
            request,
        )
        .map_err(|e| {
            tracing::warn!("Rejected result for match {}: {}", fixture.id, e);
            e
        })?;

        for goal in &result.goals {
            if !self.registry.player_exists(goal.player_id).await? {
                tracing::warn!("Goal scorer {} is not registered", goal.player_id);
                return Err(LeagueError::bad_request(format!("player {} not found", goal.player_id)));
            }
        }

        self.results.create(&result).await?;
        tracing::info!(
            "⚽ Recorded result {} for match {}: {} - {} ({})",
            result.id,
            fixture.id,
            result.home_score,
            result.away_score,
            result.status()
        );
        Ok(result.id)
    }

    pub async fn get_match_result(&self, match_id: &str) -> LeagueResult<MatchResult> {
        let fixture = self.matches.find_by_id(match_id_from(match_id)?).await?;
        self.results.find_by_match_id(fixture.id).await
    }

    #[tracing::instrument(name = "Get match report", skip(self))]
    pub async fn get_match_report(&self, match_id: &str) -> LeagueResult<MatchReportView> {
        let match_id = match_id_from(match_id)?;
        let snapshot = self
            .snapshots
            .load_match_snapshot(match_id)
            .await?
            .ok_or_else(|| LeagueError::not_found("match not found"))?;
        StandingsCalculator::new(&snapshot)
            .match_report(match_id)
            .ok_or_else(|| LeagueError::not_found("match result not found"))
    }

    #[tracing::instrument(name = "Get all match reports", skip(self))]
    pub async fn get_all_match_reports(&self) -> LeagueResult<Vec<MatchReportView>> {
        let snapshot = self.snapshots.load_snapshot().await?;
        Ok(StandingsCalculator::new(&snapshot).all_match_reports())
    }

    /// Remove a match together with its result and goals.
    #[tracing::instrument(name = "Delete match", skip(self))]
    pub async fn delete_match(&self, id: &str) -> LeagueResult<()> {
        let match_id = match_id_from(id)?;
        self.matches.delete(match_id).await?;
        tracing::info!("Deleted match {} with its result and goals", match_id);
        Ok(())
    }
}
