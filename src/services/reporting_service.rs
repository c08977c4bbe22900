use std::sync::Arc;

use crate::db::{LeagueSnapshotSource, Repositories};
use crate::error::LeagueResult;
use crate::league::standings::{StandingsCalculator, TOP_SCORER_LIMIT};
use crate::models::report::{TeamStanding, TopScorer};

/// Serves league-wide tables
#[derive(Clone)]
pub struct ReportingService {
    snapshots: Arc<dyn LeagueSnapshotSource>,
}

impl ReportingService {
    pub fn new(repositories: &Repositories) -> Self {
        Self {
            snapshots: repositories.snapshots.clone(),
        }
    }

    #[tracing::instrument(name = "Get standings", skip(self))]
    pub async fn get_standings(&self) -> LeagueResult<Vec<TeamStanding>> {
        let snapshot = self.snapshots.load_snapshot().await?;
        let standings = StandingsCalculator::new(&snapshot).standings();
        tracing::debug!("Computed standings for {} teams", standings.len());
        Ok(standings)
    }

    /// The twenty most prolific scorers of the league.
    #[tracing::instrument(name = "Get top scorers", skip(self))]
    pub async fn get_top_scorers(&self) -> LeagueResult<Vec<TopScorer>> {
        let snapshot = self.snapshots.load_snapshot().await?;
        Ok(StandingsCalculator::new(&snapshot).top_scorers(TOP_SCORER_LIMIT))
    }
}
