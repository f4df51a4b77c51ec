use crate::domain::{Location, MatchRow, Team, TeamResult};
use serde::Serialize;
use std::collections::HashMap;

use super::form::{FormEntry, FormHistory, SeasonCarryover};
use super::head_to_head::HeadToHeadLedger;

/// Running totals for one team in one season.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSeasonStats {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    /// None before the team's first game of the season.
    pub previous_result: Option<TeamResult>,
    pub previous_location: Option<Location>,
}

impl TeamSeasonStats {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_scored) - i64::from(self.goals_conceded)
    }

    fn apply(&mut self, result: TeamResult, location: Location, scored: u32, conceded: u32) {
        self.played += 1;
        match result {
            TeamResult::Win => self.wins += 1,
            TeamResult::Draw => self.draws += 1,
            TeamResult::Loss => self.losses += 1,
        }
        self.points += result.points();
        self.goals_scored += scored;
        self.goals_conceded += conceded;
        self.previous_result = Some(result);
        self.previous_location = Some(location);
    }
}

/// Read-only view of the tracker taken before a match is applied.
#[derive(Debug, Clone, Copy)]
pub struct StandingsSnapshot<'a> {
    pub stats: &'a HashMap<Team, TeamSeasonStats>,
    pub head_to_head: &'a HeadToHeadLedger,
}

impl<'a> StandingsSnapshot<'a> {
    pub fn stats_for(&self, team: &Team) -> TeamSeasonStats {
        self.stats.get(team).cloned().unwrap_or_default()
    }
}

/// Season standings, mutated match by match in processing order.
///
/// Owns the season's form history and head-to-head ledger so that one value
/// holds every piece of running state for a season pass.
#[derive(Debug, Clone, Default)]
pub struct StandingsTracker {
    order: Vec<Team>,
    stats: HashMap<Team, TeamSeasonStats>,
    form: FormHistory,
    head_to_head: HeadToHeadLedger,
}

impl StandingsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_carryover(carryover: SeasonCarryover) -> Self {
        Self {
            form: FormHistory::with_carryover(carryover),
            ..Self::default()
        }
    }

    /// Ensure `team` has a standings entry. Registration order is the input
    /// order handed to the ranker.
    pub fn register_team(&mut self, team: &Team) {
        if !self.stats.contains_key(team) {
            self.order.push(team.clone());
            self.stats.insert(team.clone(), TeamSeasonStats::default());
        }
    }

    /// Teams in registration order.
    pub fn teams(&self) -> &[Team] {
        &self.order
    }

    pub fn snapshot(&self) -> StandingsSnapshot<'_> {
        StandingsSnapshot {
            stats: &self.stats,
            head_to_head: &self.head_to_head,
        }
    }

    /// Count a match: points, goal tallies, form history and head-to-head.
    ///
    /// A match without a usable scoreline still awards points; both goal
    /// tallies grow by zero and the head-to-head ledger is left alone.
    pub fn apply_match(&mut self, row: &MatchRow) {
        let (home_goals, away_goals) = row.score.map(|s| (s.home, s.away)).unwrap_or((0, 0));

        for (location, scored, conceded) in [
            (Location::Home, home_goals, away_goals),
            (Location::Away, away_goals, home_goals),
        ] {
            let team = row.team_at(location);
            let result = row.result_for(location);
            self.register_team(team);
            if let Some(stats) = self.stats.get_mut(team) {
                stats.apply(result, location, scored, conceded);
            }
            self.form.record(
                team,
                FormEntry {
                    matchday: row.matchday,
                    result,
                    location,
                },
            );
        }

        if !self.head_to_head.record_match(row) {
            tracing::debug!(
                fixture = %row.fixture_key,
                home = %row.home,
                away = %row.away,
                "No usable scoreline; head-to-head update skipped"
            );
        }
    }

    pub fn stats(&self, team: &Team) -> Option<&TeamSeasonStats> {
        self.stats.get(team)
    }

    pub fn form(&self) -> &FormHistory {
        &self.form
    }

    pub fn head_to_head(&self) -> &HeadToHeadLedger {
        &self.head_to_head
    }
}
