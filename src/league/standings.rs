use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::fixture::{Match, MatchResult, MatchStatus};
use crate::models::report::{LeagueSnapshot, MatchReportView, TeamStanding, TopScorer};
use crate::models::team::{Player, Team};

/// Number of rows returned by the league top scorer table.
pub const TOP_SCORER_LIMIT: usize = 20;

pub const POINTS_PER_WIN: i32 = 3;
pub const POINTS_PER_DRAW: i32 = 1;

/// Read-side aggregation over an active league snapshot.
///
/// Every derivation is recomputed from scratch on each call; nothing here is
/// cached or persisted. Rows that are not active, results whose fixture is
/// not active, and fixtures whose teams left the registry are ignored.
#[derive(Debug)]
pub struct StandingsCalculator<'a> {
    teams: HashMap<Uuid, &'a Team>,
    players: HashMap<Uuid, &'a Player>,
    matches: HashMap<Uuid, &'a Match>,
    results: Vec<&'a MatchResult>,
}

impl<'a> StandingsCalculator<'a> {
    pub fn new(snapshot: &'a LeagueSnapshot) -> Self {
        let teams = snapshot
            .teams
            .iter()
            .filter(|t| t.lifecycle.is_active())
            .map(|t| (t.id, t))
            .collect();
        let players = snapshot
            .players
            .iter()
            .filter(|p| p.lifecycle.is_active())
            .map(|p| (p.id, p))
            .collect::<HashMap<_, _>>();
        let matches = snapshot
            .matches
            .iter()
            .filter(|m| m.lifecycle.is_active())
            .map(|m| (m.id, m))
            .collect::<HashMap<_, _>>();
        let results = snapshot
            .results
            .iter()
            .filter(|r| r.lifecycle.is_active() && matches.contains_key(&r.match_id))
            .collect();

        Self { teams, players, matches, results }
    }

    /// Active results paired with their fixtures
    fn resulted_matches(&self) -> impl Iterator<Item = (&'a Match, &'a MatchResult)> + '_ {
        self.results
            .iter()
            .filter_map(|result| self.matches.get(&result.match_id).map(|m| (*m, *result)))
    }

    /// Wins of `team_id` over every active result, home or away.
    pub fn team_wins(&self, team_id: Uuid) -> i32 {
        self.resulted_matches()
            .filter(|(fixture, result)| result.is_won_by(fixture, team_id))
            .count() as i32
    }

    /// Player with the most goals in one result.
    ///
    /// Ties go to the alphabetically first player name, then the lower id.
    fn match_top_scorer(&self, result: &MatchResult) -> Option<(&'a Player, i32)> {
        let mut tally: HashMap<Uuid, i32> = HashMap::new();
        for goal in result.goals.iter().filter(|g| g.lifecycle.is_active()) {
            *tally.entry(goal.player_id).or_default() += 1;
        }

        tally
            .into_iter()
            .filter_map(|(player_id, goals)| self.players.get(&player_id).map(|p| (*p, goals)))
            .min_by(|(a, a_goals), (b, b_goals)| {
                b_goals
                    .cmp(a_goals)
                    .then_with(|| a.name.cmp(&b.name))
                    .then_with(|| a.id.cmp(&b.id))
            })
    }

    fn build_report(&self, fixture: &Match, result: &MatchResult) -> Option<MatchReportView> {
        let home_team = self.teams.get(&fixture.home_team_id)?;
        let away_team = self.teams.get(&fixture.away_team_id)?;
        let top_scorer = self.match_top_scorer(result);

        Some(MatchReportView {
            match_id: fixture.id,
            match_date: fixture.match_date,
            match_time: fixture.match_time.clone(),
            venue: fixture.venue.clone(),
            home_team_name: home_team.name.clone(),
            away_team_name: away_team.name.clone(),
            home_score: result.home_score,
            away_score: result.away_score,
            match_status: MatchStatus::from_scores(result.home_score, result.away_score),
            top_scorer: top_scorer.map(|(player, _)| player.name.clone()),
            top_scorer_goals: top_scorer.map(|(_, goals)| goals).unwrap_or(0),
            home_team_wins: self.team_wins(fixture.home_team_id),
            away_team_wins: self.team_wins(fixture.away_team_id),
        })
    }

    /// Report for one fixture, `None` when the fixture has no active result.
    pub fn match_report(&self, match_id: Uuid) -> Option<MatchReportView> {
        let fixture = self.matches.get(&match_id)?;
        let result = self.results.iter().find(|r| r.match_id == match_id)?;
        self.build_report(fixture, result)
    }

    /// Reports for every resulted fixture, most recent match date first.
    pub fn all_match_reports(&self) -> Vec<MatchReportView> {
        let mut reports: Vec<MatchReportView> = self
            .resulted_matches()
            .filter_map(|(fixture, result)| self.build_report(fixture, result))
            .collect();
        reports.sort_by(|a, b| {
            b.match_date
                .cmp(&a.match_date)
                .then_with(|| b.match_time.cmp(&a.match_time))
                .then_with(|| b.match_id.cmp(&a.match_id))
        });
        reports
    }

    /// League table over every active result.
    ///
    /// Ordered by points, goal difference and goals scored (all descending),
    /// then by team name.
    pub fn standings(&self) -> Vec<TeamStanding> {
        let mut table: HashMap<Uuid, TeamStanding> = HashMap::new();

        for (fixture, result) in self.resulted_matches() {
            let sides = [
                (fixture.home_team_id, result.home_score, result.away_score),
                (fixture.away_team_id, result.away_score, result.home_score),
            ];
            for (team_id, scored, conceded) in sides {
                let Some(team) = self.teams.get(&team_id) else {
                    continue;
                };
                let row = table.entry(team_id).or_insert_with(|| TeamStanding {
                    team_id,
                    team_name: team.name.clone(),
                    played: 0,
                    won: 0,
                    drawn: 0,
                    lost: 0,
                    goals_for: 0,
                    goals_against: 0,
                    goal_difference: 0,
                    points: 0,
                });
                row.played += 1;
                row.goals_for += scored;
                row.goals_against += conceded;
                match scored.cmp(&conceded) {
                    Ordering::Greater => row.won += 1,
                    Ordering::Equal => row.drawn += 1,
                    Ordering::Less => row.lost += 1,
                }
            }
        }

        let mut standings: Vec<TeamStanding> = table
            .into_values()
            .map(|mut row| {
                row.goal_difference = row.goals_for - row.goals_against;
                row.points = calculate_points(row.won, row.drawn);
                row
            })
            .collect();
        standings.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| b.goal_difference.cmp(&a.goal_difference))
                .then_with(|| b.goals_for.cmp(&a.goals_for))
                .then_with(|| a.team_name.cmp(&b.team_name))
                .then_with(|| a.team_id.cmp(&b.team_id))
        });
        standings
    }

    /// Players ranked by goals across every active result, labelled with
    /// their current team. Limited to `limit` rows.
    pub fn top_scorers(&self, limit: usize) -> Vec<TopScorer> {
        let mut tally: HashMap<Uuid, i32> = HashMap::new();
        for (_, result) in self.resulted_matches() {
            for goal in result.goals.iter().filter(|g| g.lifecycle.is_active()) {
                *tally.entry(goal.player_id).or_default() += 1;
            }
        }

        let mut scorers: Vec<TopScorer> = tally
            .into_iter()
            .filter_map(|(player_id, goals)| {
                let player = self.players.get(&player_id)?;
                let team = self.teams.get(&player.team_id)?;
                Some(TopScorer {
                    player_id,
                    player_name: player.name.clone(),
                    team_name: team.name.clone(),
                    goals,
                })
            })
            .collect();
        scorers.sort_by_key(|s| (Reverse(s.goals), s.player_name.clone(), s.player_id));
        scorers.truncate(limit);
        scorers
    }
}

/// Three points for a win, one for a draw.
pub fn calculate_points(won: i32, drawn: i32) -> i32 {
    won * POINTS_PER_WIN + drawn * POINTS_PER_DRAW
}
