use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::settings::RegistrySeed;
use crate::db::{LeagueSnapshotSource, MatchRepository, MatchResultRepository, TeamRegistry};
use crate::error::{LeagueError, LeagueResult};
use crate::models::fixture::{Lifecycle, Match, MatchResult};
use crate::models::report::LeagueSnapshot;
use crate::models::team::{Player, Team};

#[derive(Debug, Default)]
struct MemoryState {
    teams: HashMap<Uuid, Team>,
    players: HashMap<Uuid, Player>,
    matches: HashMap<Uuid, Match>,
    // Deleted results stay here, like soft-deleted rows do in Postgres
    results: Vec<MatchResult>,
}

impl MemoryState {
    fn active_result_for(&self, match_id: Uuid) -> Option<&MatchResult> {
        self.results
            .iter()
            .find(|r| r.match_id == match_id && r.lifecycle.is_active())
    }
}

/// Process-local storage backend.
///
/// Every operation takes the lock once, so the duplicate check and the insert
/// of a result happen as one step and the delete cascade is atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose registry holds the configured clubs.
    pub fn with_registry(seed: &RegistrySeed) -> Self {
        let store = Self::new();
        for team in &seed.teams {
            store.add_team(Team::new(team.id, team.name.clone()));
            for player in &team.players {
                store.add_player(Player::new(player.id, team.id, player.name.clone()));
            }
        }
        store
    }

    /// Registers a team, standing in for the club registry.
    pub fn add_team(&self, team: Team) {
        self.state.write().teams.insert(team.id, team);
    }

    /// Registers a player, standing in for the club registry.
    pub fn add_player(&self, player: Player) {
        self.state.write().players.insert(player.id, player);
    }
}

#[async_trait]
impl MatchRepository for InMemoryStore {
    async fn create(&self, fixture: &Match) -> LeagueResult<()> {
        let mut state = self.state.write();
        if state.matches.contains_key(&fixture.id) {
            return Err(LeagueError::duplicate("match already exists"));
        }
        state.matches.insert(fixture.id, fixture.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> LeagueResult<Match> {
        self.state
            .read()
            .matches
            .get(&id)
            .filter(|m| m.lifecycle.is_active())
            .cloned()
            .ok_or_else(|| LeagueError::not_found("match not found"))
    }

    async fn find_all(&self) -> LeagueResult<Vec<Match>> {
        let mut matches: Vec<Match> = self
            .state
            .read()
            .matches
            .values()
            .filter(|m| m.lifecycle.is_active())
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.match_date
                .cmp(&a.match_date)
                .then_with(|| b.match_time.cmp(&a.match_time))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(matches)
    }

    async fn delete(&self, id: Uuid) -> LeagueResult<()> {
        let mut state = self.state.write();
        let is_active = state
            .matches
            .get(&id)
            .map(|m| m.lifecycle.is_active())
            .unwrap_or(false);
        if !is_active {
            return Err(LeagueError::not_found("match not found"));
        }

        let deleted = Lifecycle::Deleted { at: Utc::now() };
        for result in state
            .results
            .iter_mut()
            .filter(|r| r.match_id == id && r.lifecycle.is_active())
        {
            for goal in result.goals.iter_mut().filter(|g| g.lifecycle.is_active()) {
                goal.lifecycle = deleted;
            }
            result.lifecycle = deleted;
        }
        if let Some(fixture) = state.matches.get_mut(&id) {
            fixture.lifecycle = deleted;
            fixture.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl MatchResultRepository for InMemoryStore {
    async fn create(&self, result: &MatchResult) -> LeagueResult<()> {
        let mut state = self.state.write();
        if state.active_result_for(result.match_id).is_some() {
            return Err(LeagueError::duplicate("match result already reported"));
        }
        state.results.push(result.clone());
        Ok(())
    }

    async fn find_by_match_id(&self, match_id: Uuid) -> LeagueResult<MatchResult> {
        let state = self.state.read();
        let mut result = state
            .active_result_for(match_id)
            .cloned()
            .ok_or_else(|| LeagueError::not_found("match result not found"))?;

        result.goals.retain(|g| g.lifecycle.is_active());
        for goal in result.goals.iter_mut() {
            goal.player_name = state
                .players
                .get(&goal.player_id)
                .filter(|p| p.lifecycle.is_active())
                .map(|p| p.name.clone());
        }
        result.goals.sort_by_key(|g| (g.goal_minute, g.id));
        Ok(result)
    }

    async fn exists_by_match_id(&self, match_id: Uuid) -> LeagueResult<bool> {
        Ok(self.state.read().active_result_for(match_id).is_some())
    }
}

#[async_trait]
impl LeagueSnapshotSource for InMemoryStore {
    async fn load_snapshot(&self) -> LeagueResult<LeagueSnapshot> {
        let state = self.state.read();
        Ok(LeagueSnapshot {
            teams: state.teams.values().filter(|t| t.lifecycle.is_active()).cloned().collect(),
            players: state.players.values().filter(|p| p.lifecycle.is_active()).cloned().collect(),
            matches: state.matches.values().filter(|m| m.lifecycle.is_active()).cloned().collect(),
            results: state
                .results
                .iter()
                .filter(|r| r.lifecycle.is_active())
                .cloned()
                .collect(),
        })
    }

    async fn load_match_snapshot(&self, match_id: Uuid) -> LeagueResult<Option<LeagueSnapshot>> {
        let state = self.state.read();
        let Some(fixture) = state.matches.get(&match_id).filter(|m| m.lifecycle.is_active()) else {
            return Ok(None);
        };
        let sides = [fixture.home_team_id, fixture.away_team_id];
        let involves_sides =
            |m: &Match| sides.contains(&m.home_team_id) || sides.contains(&m.away_team_id);

        let matches: Vec<Match> = state
            .matches
            .values()
            .filter(|m| m.lifecycle.is_active() && involves_sides(*m))
            .cloned()
            .collect();
        let results: Vec<MatchResult> = state
            .results
            .iter()
            .filter(|r| r.lifecycle.is_active() && matches.iter().any(|m| m.id == r.match_id))
            .map(|r| {
                let mut result = r.clone();
                if result.match_id != match_id {
                    result.goals.clear();
                }
                result
            })
            .collect();
        let scorer_ids: Vec<Uuid> = results
            .iter()
            .flat_map(|r| r.goals.iter())
            .filter(|g| g.lifecycle.is_active())
            .map(|g| g.player_id)
            .collect();

        Ok(Some(LeagueSnapshot {
            teams: sides
                .iter()
                .filter_map(|id| state.teams.get(id))
                .filter(|t| t.lifecycle.is_active())
                .cloned()
                .collect(),
            players: state
                .players
                .values()
                .filter(|p| p.lifecycle.is_active() && scorer_ids.contains(&p.id))
                .cloned()
                .collect(),
            matches,
            results,
        }))
    }
}

#[async_trait]
impl TeamRegistry for InMemoryStore {
    async fn team_exists(&self, id: Uuid) -> LeagueResult<bool> {
        Ok(self
            .state
            .read()
            .teams
            .get(&id)
            .map(|t| t.lifecycle.is_active())
            .unwrap_or(false))
    }

    async fn player_exists(&self, id: Uuid) -> LeagueResult<bool> {
        Ok(self
            .state
            .read()
            .players
            .get(&id)
            .map(|p| p.lifecycle.is_active())
            .unwrap_or(false))
    }
}
