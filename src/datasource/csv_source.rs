//! League CSV files on local disk.

use super::{DataSourceError, MatchSource};
use crate::config::Config;
use crate::domain::{Decimal, MatchRecord, Season};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const REQUIRED_COLUMNS: [&str; 8] = ["MD", "Date", "Home", "Away", "FTR", "HmOd", "DrOd", "AwOd"];

/// Season key for files without a `Season` column.
pub const SINGLE_SEASON_KEY: &str = "all";

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Reads `<data_dir>/<file>` for each configured league.
#[derive(Debug, Clone)]
pub struct CsvMatchSource {
    data_dir: PathBuf,
    leagues: BTreeMap<String, String>,
}

/// Column positions resolved from the header row.
struct Columns {
    season: Option<usize>,
    matchday: usize,
    date: usize,
    home: usize,
    away: usize,
    outcome: usize,
    home_odds: usize,
    draw_odds: usize,
    away_odds: usize,
    scoreline: Option<usize>,
    round: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DataSourceError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| find(**name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DataSourceError::MissingColumns(missing));
        }

        let required = |name: &str| {
            find(name).ok_or_else(|| DataSourceError::MissingColumns(vec![name.to_string()]))
        };
        Ok(Self {
            season: find("Season"),
            matchday: required("MD")?,
            date: required("Date")?,
            home: required("Home")?,
            away: required("Away")?,
            outcome: required("FTR")?,
            home_odds: required("HmOd")?,
            draw_odds: required("DrOd")?,
            away_odds: required("AwOd")?,
            scoreline: find("hScre"),
            round: find("Round"),
        })
    }
}

impl CsvMatchSource {
    pub fn new(data_dir: impl Into<PathBuf>, leagues: BTreeMap<String, String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            leagues,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_dir.clone(), config.leagues.clone())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, league: &str) -> Result<PathBuf, DataSourceError> {
        self.leagues
            .get(league)
            .map(|file| self.data_dir.join(file))
            .ok_or_else(|| DataSourceError::UnknownLeague(league.to_string()))
    }

    /// Parse a league file. Structural problems fail the whole file; rows with
    /// an unusable matchday, date or season are dropped with a warning.
    pub fn parse_csv(csv_bytes: &[u8]) -> Result<Vec<MatchRecord>, DataSourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_bytes);

        let headers = reader
            .headers()
            .map_err(|e| DataSourceError::Csv(e.to_string()))?
            .clone();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(DataSourceError::Empty);
        }
        let columns = Columns::resolve(&headers)?;
        if columns.season.is_none() {
            tracing::debug!(
                season = SINGLE_SEASON_KEY,
                "No Season column; loading every row as one season"
            );
        }

        let mut records = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let row = row.map_err(|e| DataSourceError::Csv(e.to_string()))?;
            // Header is line 1.
            let line = idx + 2;
            let cell = |pos: usize| row.get(pos).map(str::trim).filter(|s| !s.is_empty());

            let Some(matchday) = cell(columns.matchday).and_then(parse_matchday) else {
                tracing::warn!(
                    line,
                    value = ?cell(columns.matchday),
                    "Skipping row with invalid matchday"
                );
                continue;
            };
            let Some(date) = cell(columns.date).and_then(parse_date) else {
                tracing::warn!(line, value = ?cell(columns.date), "Skipping row with invalid date");
                continue;
            };
            let season = match columns.season {
                None => SINGLE_SEASON_KEY,
                Some(pos) => match cell(pos) {
                    Some(season) => season,
                    None => {
                        tracing::warn!(line, "Skipping row without season");
                        continue;
                    }
                },
            };

            records.push(MatchRecord {
                date,
                season: Season::new(season.to_string()),
                matchday,
                home: cell(columns.home).map(str::to_string),
                away: cell(columns.away).map(str::to_string),
                outcome_code: cell(columns.outcome).map(str::to_string),
                scoreline: columns.scoreline.and_then(cell).map(str::to_string),
                home_odds: cell(columns.home_odds).and_then(parse_price),
                draw_odds: cell(columns.draw_odds).and_then(parse_price),
                away_odds: cell(columns.away_odds).and_then(parse_price),
                round_tag: columns.round.and_then(cell).and_then(parse_integral),
            });
        }

        tracing::debug!(records = records.len(), "Parsed league file");
        Ok(records)
    }
}

#[async_trait]
impl MatchSource for CsvMatchSource {
    fn leagues(&self) -> Vec<String> {
        self.leagues.keys().cloned().collect()
    }

    async fn fetch_records(&self, league: &str) -> Result<Vec<MatchRecord>, DataSourceError> {
        let path = self.path_for(league)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DataSourceError::NotFound(path.display().to_string()))
            }
            Err(e) => return Err(DataSourceError::Io(e.to_string())),
        };
        tracing::info!(league, path = %path.display(), bytes = bytes.len(), "Loading league file");
        Self::parse_csv(&bytes)
    }
}

/// Integer cell, allowing integral float spellings such as `3.0`.
fn parse_integral(raw: &str) -> Option<i64> {
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    let d = Decimal::from_str_canonical(raw).ok()?;
    let inner = d.inner();
    if inner.fract().is_zero() {
        inner.to_i64()
    } else {
        None
    }
}

fn parse_matchday(raw: &str) -> Option<u32> {
    parse_integral(raw)
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Non-numeric and negative prices count as missing.
fn parse_price(raw: &str) -> Option<Decimal> {
    Decimal::from_str_canonical(raw)
        .ok()
        .filter(|d| !d.is_negative())
}
