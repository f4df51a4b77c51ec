//! Head-to-head points and away goals between pairs of teams.

use crate::domain::{Location, MatchRow, Team};
use std::collections::HashMap;

/// One team's side of a pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadToHeadSide {
    /// 3 per win, 1 per draw in meetings with the opponent.
    pub points: u32,
    /// Goals scored while playing away against the opponent.
    pub away_goals: u32,
}

/// Directional record for an unordered pair. `first` belongs to the team whose
/// name sorts first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadToHeadEntry {
    pub first: HeadToHeadSide,
    pub second: HeadToHeadSide,
}

/// Accumulates head-to-head tallies. Only consulted for tiebreaking.
#[derive(Debug, Clone, Default)]
pub struct HeadToHeadLedger {
    entries: HashMap<(Team, Team), HeadToHeadEntry>,
}

impl HeadToHeadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn pair_key(a: &Team, b: &Team) -> (Team, Team) {
        if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        }
    }

    fn side_mut<'a>(
        entry: &'a mut HeadToHeadEntry,
        key: &(Team, Team),
        team: &Team,
    ) -> &'a mut HeadToHeadSide {
        if &key.0 == team {
            &mut entry.first
        } else {
            &mut entry.second
        }
    }

    /// Record a finished match.
    ///
    /// Returns false, leaving the ledger untouched, when the match has no
    /// usable scoreline.
    pub fn record_match(&mut self, row: &MatchRow) -> bool {
        let Some(score) = row.score else {
            return false;
        };

        let key = Self::pair_key(&row.home, &row.away);
        let entry = self.entries.entry(key.clone()).or_default();

        let home_points = row.result_for(Location::Home).points();
        let away_points = row.result_for(Location::Away).points();

        Self::side_mut(entry, &key, &row.home).points += home_points;
        let away_side = Self::side_mut(entry, &key, &row.away);
        away_side.points += away_points;
        away_side.away_goals += score.away;

        true
    }

    /// Side of `team` in its meetings with `opponent`.
    pub fn side(&self, team: &Team, opponent: &Team) -> HeadToHeadSide {
        let key = Self::pair_key(team, opponent);
        match self.entries.get(&key) {
            Some(entry) if &key.0 == team => entry.first,
            Some(entry) => entry.second,
            None => HeadToHeadSide::default(),
        }
    }

    pub fn points_against(&self, team: &Team, opponent: &Team) -> u32 {
        self.side(team, opponent).points
    }

    pub fn away_goals_against(&self, team: &Team, opponent: &Team) -> u32 {
        self.side(team, opponent).away_goals
    }

    /// Sum of `team`'s sides against every other member of `peers`.
    pub fn totals_among<'a>(
        &self,
        team: &Team,
        peers: impl IntoIterator<Item = &'a Team>,
    ) -> HeadToHeadSide {
        peers
            .into_iter()
            .filter(|peer| *peer != team)
            .map(|peer| self.side(team, peer))
            .fold(HeadToHeadSide::default(), |acc, side| HeadToHeadSide {
                points: acc.points + side.points,
                away_goals: acc.away_goals + side.away_goals,
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
