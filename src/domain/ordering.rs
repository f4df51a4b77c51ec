//! Stable fixture ordering for deterministic processing.

use crate::domain::MatchRow;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Direction of the home-team tie-break inside `(matchday, date)`.
///
/// Fixed once per process; every season is ordered the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreakOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for TieBreakOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(TieBreakOrder::Asc),
            "desc" | "descending" => Ok(TieBreakOrder::Desc),
            _ => Err(()),
        }
    }
}

/// Ordering key for fixtures within a season.
///
/// Ordering: matchday -> date -> home team (per `TieBreakOrder`).
/// Remaining ties keep input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureOrderingKey<'a> {
    pub matchday: u32,
    pub date: NaiveDateTime,
    pub home: &'a str,
}

impl<'a> FixtureOrderingKey<'a> {
    pub fn from_row(row: &'a MatchRow) -> Self {
        FixtureOrderingKey {
            matchday: row.matchday,
            date: row.date,
            home: row.home.as_str(),
        }
    }

    pub fn compare(&self, other: &Self, tie_break: TieBreakOrder) -> Ordering {
        let home = match tie_break {
            TieBreakOrder::Asc => self.home.cmp(other.home),
            TieBreakOrder::Desc => other.home.cmp(self.home),
        };
        self.matchday
            .cmp(&other.matchday)
            .then_with(|| self.date.cmp(&other.date))
            .then(home)
    }
}

/// Sort fixtures deterministically. The sort is stable.
pub fn sort_rows_deterministic(rows: &mut [MatchRow], tie_break: TieBreakOrder) {
    rows.sort_by(|a, b| {
        FixtureOrderingKey::from_row(a).compare(&FixtureOrderingKey::from_row(b), tie_break)
    });
}
