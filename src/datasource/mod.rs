//! Where fixture rows come from.

use crate::domain::MatchRecord;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod csv_source;
pub mod mock;

pub use csv_source::{CsvMatchSource, SINGLE_SEASON_KEY};
pub use mock::MockMatchSource;

/// Source of raw, type-coerced fixture records for a league.
#[async_trait]
pub trait MatchSource: Send + Sync + fmt::Debug {
    /// League names this source can serve, sorted.
    fn leagues(&self) -> Vec<String>;

    /// Fetch every record for `league`, all seasons, in file order.
    ///
    /// Rows whose matchday or date cannot be coerced are dropped here; all
    /// other validation is left to the assembler.
    async fn fetch_records(&self, league: &str) -> Result<Vec<MatchRecord>, DataSourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSourceError {
    #[error("unknown league: {0}")]
    UnknownLeague(String),
    #[error("data file not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("csv parse error: {0}")]
    Csv(String),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("data file is empty")]
    Empty,
}
