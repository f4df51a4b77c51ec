//! Match rows: the raw record handed over by the loading layer and the
//! validated row the engine consumes.

use crate::domain::{Decimal, Location, Outcome, Season, Team, TeamResult};
use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A type-coerced but not yet validated fixture row.
///
/// Outcome code and scoreline stay raw text; the engine decides whether the
/// row is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: NaiveDateTime,
    pub season: Season,
    pub matchday: u32,
    pub home: Option<String>,
    pub away: Option<String>,
    pub outcome_code: Option<String>,
    pub scoreline: Option<String>,
    pub home_odds: Option<Decimal>,
    pub draw_odds: Option<Decimal>,
    pub away_odds: Option<Decimal>,
    pub round_tag: Option<i64>,
}

/// Reason a record was rejected. Rejected rows never touch running state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowDefect {
    #[error("missing {0} team")]
    MissingTeam(Location),
    #[error("team {0} cannot play itself")]
    SameTeam(String),
    #[error("invalid outcome code: {0:?}")]
    InvalidOutcome(Option<String>),
    #[error("matchday must be positive")]
    InvalidMatchday,
    #[error("duplicate fixture {0}")]
    Duplicate(String),
}

/// Final score, home goals first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
}

impl Scoreline {
    /// Parse "H-A". Each side may be written as an integral float ("2.0").
    pub fn parse(raw: &str) -> Option<Self> {
        let (home, away) = raw.trim().split_once('-')?;
        Some(Scoreline {
            home: parse_goals(home)?,
            away: parse_goals(away)?,
        })
    }

    /// Outcome implied by the score alone.
    pub fn outcome(&self) -> Outcome {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Less => Outcome::AwayWin,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }
}

fn parse_goals(raw: &str) -> Option<u32> {
    let value = Decimal::from_str_canonical(raw).ok()?;
    if value.is_negative() || !value.inner().fract().is_zero() {
        return None;
    }
    value.inner().to_u32()
}

/// Three-way odds. A zero component means the price is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsTriple {
    pub home: Decimal,
    pub draw: Decimal,
    pub away: Decimal,
}

impl OddsTriple {
    pub fn new(home: Decimal, draw: Decimal, away: Decimal) -> Self {
        Self { home, draw, away }
    }

    pub fn is_complete(&self) -> bool {
        !self.home.is_zero() && !self.draw.is_zero() && !self.away.is_zero()
    }

    /// Components sorted ascending, independent of which side they price.
    pub fn sorted(&self) -> [Decimal; 3] {
        let mut prices = [self.home, self.draw, self.away];
        prices.sort();
        prices
    }
}

/// A validated fixture row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRow {
    pub fixture_key: String,
    pub date: NaiveDateTime,
    pub season: Season,
    pub matchday: u32,
    pub home: Team,
    pub away: Team,
    pub outcome: Outcome,
    pub score: Option<Scoreline>,
    pub odds: OddsTriple,
    pub round_tag: i64,
}

impl MatchRow {
    /// Validate a raw record.
    ///
    /// Missing odds and round tags degrade to zero; a missing or malformed
    /// scoreline degrades to `None`. Team and outcome defects reject the row.
    pub fn from_record(record: &MatchRecord) -> Result<Self, RowDefect> {
        if record.matchday == 0 {
            return Err(RowDefect::InvalidMatchday);
        }
        let home = team_name(record.home.as_deref()).ok_or(RowDefect::MissingTeam(Location::Home))?;
        let away = team_name(record.away.as_deref()).ok_or(RowDefect::MissingTeam(Location::Away))?;
        if home == away {
            return Err(RowDefect::SameTeam(home.to_string()));
        }

        let outcome = record
            .outcome_code
            .as_deref()
            .and_then(Outcome::from_code)
            .ok_or_else(|| RowDefect::InvalidOutcome(record.outcome_code.clone()))?;

        let score = record.scoreline.as_deref().and_then(Scoreline::parse);
        let odds = OddsTriple::new(
            price(record.home_odds),
            price(record.draw_odds),
            price(record.away_odds),
        );

        let home = Team::new(home.to_string());
        let away = Team::new(away.to_string());
        let fixture_key = Self::compute_fixture_key(
            &record.season,
            record.matchday,
            &home,
            &away,
            record.date,
        );

        Ok(MatchRow {
            fixture_key,
            date: record.date,
            season: record.season.clone(),
            matchday: record.matchday,
            home,
            away,
            outcome,
            score,
            odds,
            round_tag: record.round_tag.unwrap_or(0),
        })
    }

    /// Stable identifier for a fixture, derived from its identifying fields.
    pub fn compute_fixture_key(
        season: &Season,
        matchday: u32,
        home: &Team,
        away: &Team,
        date: NaiveDateTime,
    ) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(season.as_str());
        hasher.update(b"|");
        hasher.update(matchday.to_le_bytes());
        hasher.update(b"|");
        hasher.update(home.as_str());
        hasher.update(b"|");
        hasher.update(away.as_str());
        hasher.update(b"|");
        hasher.update(date.and_utc().timestamp().to_le_bytes());
        let hash = hasher.finalize();
        format!("fx:{}", hex::encode(&hash[..16]))
    }

    pub fn team_at(&self, location: Location) -> &Team {
        match location {
            Location::Home => &self.home,
            Location::Away => &self.away,
        }
    }

    pub fn result_for(&self, location: Location) -> TeamResult {
        self.outcome.result_for(location)
    }
}

fn team_name(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn price(raw: Option<Decimal>) -> Decimal {
    match raw {
        Some(p) if !p.is_negative() => p,
        _ => Decimal::zero(),
    }
}
