//! Per-team chronological ledger of past results.

use crate::domain::{Decimal, Location, MatchRow, Team, TeamResult};
use serde::Serialize;
use std::collections::HashMap;

/// Number of prior-season games kept per team for carry-over.
pub const CARRYOVER_GAMES: usize = 7;

/// One game in a team's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormEntry {
    pub matchday: u32,
    pub result: TeamResult,
    pub location: Location,
}

/// Result and venue of a team's most recent game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreviousGame {
    pub result: TeamResult,
    pub location: Location,
}

/// Outcome labels of the games inside a window plus the window's weight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormLine {
    /// Most recent first. Only games actually played; padding is implicit.
    pub results: Vec<TeamResult>,
    /// Integer percentage, 0..=100.
    pub weight: u32,
}

/// A fixed-size look-back window.
///
/// A win is worth `100 / size`, a draw half of that, a loss nothing, so a
/// window of straight wins weighs 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormWindow {
    size: usize,
}

impl FormWindow {
    pub const SHORT: FormWindow = FormWindow { size: 5 };
    pub const LONG: FormWindow = FormWindow { size: 7 };

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn win_value(&self) -> Decimal {
        Decimal::hundred() / Decimal::from_u32(self.size as u32)
    }

    pub fn contribution(&self, result: TeamResult) -> Decimal {
        match result {
            TeamResult::Win => self.win_value(),
            TeamResult::Draw => self.win_value() / Decimal::from_u32(2),
            TeamResult::Loss => Decimal::zero(),
        }
    }
}

/// The tail of the preceding season, preloaded before a season pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonCarryover {
    last_matchday: Option<u32>,
    games: HashMap<Team, Vec<FormEntry>>,
}

impl SeasonCarryover {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a season's validated rows in processing order.
    pub fn from_rows(rows: &[MatchRow]) -> Self {
        let mut games: HashMap<Team, Vec<FormEntry>> = HashMap::new();
        for row in rows {
            for location in [Location::Home, Location::Away] {
                games
                    .entry(row.team_at(location).clone())
                    .or_default()
                    .push(FormEntry {
                        matchday: row.matchday,
                        result: row.result_for(location),
                        location,
                    });
            }
        }
        for entries in games.values_mut() {
            let excess = entries.len().saturating_sub(CARRYOVER_GAMES);
            entries.drain(..excess);
        }

        Self {
            last_matchday: rows.iter().map(|r| r.matchday).max(),
            games,
        }
    }

    pub fn last_matchday(&self) -> Option<u32> {
        self.last_matchday
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

/// Chronological results per team for one season, plus the carried-over tail
/// of the season before it.
#[derive(Debug, Clone, Default)]
pub struct FormHistory {
    current: HashMap<Team, Vec<FormEntry>>,
    carryover: SeasonCarryover,
}

impl FormHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_carryover(carryover: SeasonCarryover) -> Self {
        Self {
            current: HashMap::new(),
            carryover,
        }
    }

    /// Append a game. Callers record games in processing order.
    pub fn record(&mut self, team: &Team, entry: FormEntry) {
        self.current.entry(team.clone()).or_default().push(entry);
    }

    /// Games of the current season played before `matchday`, most recent first.
    fn season_games_before<'a>(
        &'a self,
        team: &Team,
        matchday: u32,
    ) -> impl Iterator<Item = &'a FormEntry> + 'a {
        self.current
            .get(team)
            .map(|entries| entries.as_slice())
            .unwrap_or(&[])
            .iter()
            .rev()
            .filter(move |e| e.matchday < matchday)
    }

    fn carried_games<'a>(&'a self, team: &Team) -> impl Iterator<Item = &'a FormEntry> + 'a {
        self.carryover
            .games
            .get(team)
            .map(|entries| entries.as_slice())
            .unwrap_or(&[])
            .iter()
            .rev()
    }

    /// Most recent game before `matchday`.
    ///
    /// At matchday 1 a team with no game yet this season falls back to its game
    /// on the final matchday of the preceding season, if it played one.
    pub fn previous_game(&self, team: &Team, matchday: u32) -> Option<PreviousGame> {
        if let Some(entry) = self.season_games_before(team, matchday).next() {
            return Some(PreviousGame {
                result: entry.result,
                location: entry.location,
            });
        }
        if matchday != 1 {
            return None;
        }

        let last_matchday = self.carryover.last_matchday?;
        self.carried_games(team)
            .next()
            .filter(|entry| entry.matchday == last_matchday)
            .map(|entry| PreviousGame {
                result: entry.result,
                location: entry.location,
            })
    }

    /// Rolling form over up to `window.size()` games before `matchday`.
    pub fn form(&self, team: &Team, matchday: u32, window: FormWindow) -> FormLine {
        let results: Vec<TeamResult> = self
            .season_games_before(team, matchday)
            .chain(self.carried_games(team))
            .take(window.size())
            .map(|entry| entry.result)
            .collect();

        let total: Decimal = results.iter().map(|r| window.contribution(*r)).sum();

        FormLine {
            weight: total.round_to_u32(),
            results,
        }
    }

    /// Number of games recorded this season.
    pub fn games_played(&self, team: &Team) -> usize {
        self.current.get(team).map(Vec::len).unwrap_or(0)
    }
}
