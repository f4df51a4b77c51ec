//! Per-matchday assembly of enriched fixtures for display.
//!
//! This module provides:
//! - Season partitioning, validation and carry-over construction
//! - The per-season pass driving the engine fixture by fixture
//! - Output records consumed by the presentation layer

use crate::domain::{MatchRow, OddsTriple, Outcome, Scoreline, Season, Team};
use crate::engine::{FormLine, PreviousGame, SeasonCarryover};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

pub mod assembler;

pub use assembler::MatchdayAssembler;

/// Contract violations between the caller and the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("row references undeclared season {0}")]
    UndeclaredSeason(String),
    #[error("season {0} declared more than once")]
    DuplicateSeason(String),
}

/// One side of a fixture as it stood before kick-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideContext {
    pub team: Team,
    /// Table position entering the fixture (1-based).
    pub position: u32,
    pub points: u32,
    pub previous: Option<PreviousGame>,
    pub form_short: FormLine,
    pub form_long: FormLine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedFixture {
    pub fixture_key: String,
    pub date: NaiveDateTime,
    pub home: SideContext,
    pub away: SideContext,
    pub outcome: Outcome,
    pub score: Option<Scoreline>,
    pub odds: OddsTriple,
    pub round_tag: i64,
    pub odds_tag: Option<u8>,
    pub form_tag: Option<u8>,
    /// Display line, e.g. `<H W> Arsenal vs <A L> Chelsea => H [1.80, 3.40, 4.20]`.
    pub label: String,
}

impl EnrichedFixture {
    pub fn render_label(
        home: &SideContext,
        away: &SideContext,
        outcome: Outcome,
        odds: &OddsTriple,
    ) -> String {
        format!(
            "{} vs {} => {} [{}, {}, {}]",
            side_label(home),
            side_label(away),
            outcome.letter(),
            odds.home.to_fixed(2),
            odds.draw.to_fixed(2),
            odds.away.to_fixed(2),
        )
    }
}

fn side_label(side: &SideContext) -> String {
    match &side.previous {
        Some(prev) => format!("<{} {}> {}", prev.location, prev.result, side.team),
        None => side.team.to_string(),
    }
}

/// Outcome counts, `[home wins, away wins, draws]`.
pub type OutcomeCounts = [u32; 3];

pub(crate) fn count_outcome(counts: &mut OutcomeCounts, outcome: Outcome) {
    match outcome {
        Outcome::HomeWin => counts[0] += 1,
        Outcome::AwayWin => counts[1] += 1,
        Outcome::Draw => counts[2] += 1,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchdaySummary {
    /// Fixtures per calendar date, dates ascending.
    pub timing: Vec<usize>,
    /// Recomputed from scorelines. Fixtures without a score are not counted.
    #[serde(rename = "question")]
    pub score_outcomes: OutcomeCounts,
    /// From the outcome code.
    #[serde(rename = "out")]
    pub code_outcomes: OutcomeCounts,
    /// Distinct round tags, ascending.
    pub round_tags: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledMatchday {
    pub matchday: u32,
    pub fixtures: Vec<EnrichedFixture>,
    pub summary: MatchdaySummary,
    /// Fixture index -> palette tag.
    pub odds_groups: BTreeMap<usize, u8>,
    pub form_groups: BTreeMap<usize, u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonReport {
    pub season: Season,
    /// Only matchdays with at least one valid fixture.
    pub matchdays: BTreeMap<u32, AssembledMatchday>,
    pub skipped_rows: usize,
}

impl SeasonReport {
    pub fn is_empty(&self) -> bool {
        self.matchdays.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueReport {
    /// In declaration order, earliest season first.
    pub seasons: Vec<SeasonReport>,
}

impl LeagueReport {
    pub fn season(&self, season: &Season) -> Option<&SeasonReport> {
        self.seasons.iter().find(|s| &s.season == season)
    }
}

/// Everything one season pass needs; independent of other seasons.
#[derive(Debug, Clone)]
pub struct SeasonInput {
    pub season: Season,
    /// Validated, deduplicated, in processing order.
    pub rows: Vec<MatchRow>,
    pub carryover: SeasonCarryover,
    pub skipped_rows: usize,
}
