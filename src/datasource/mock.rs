//! In-memory match source for tests.

use super::{DataSourceError, MatchSource};
use crate::domain::MatchRecord;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Mock source that serves predefined records per league.
#[derive(Debug, Clone, Default)]
pub struct MockMatchSource {
    leagues: BTreeMap<String, Result<Vec<MatchRecord>, DataSourceError>>,
}

impl MockMatchSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` for `league`.
    pub fn with_league(mut self, league: &str, records: Vec<MatchRecord>) -> Self {
        self.leagues.insert(league.to_string(), Ok(records));
        self
    }

    /// Make every fetch of `league` fail with `error`.
    pub fn with_failure(mut self, league: &str, error: DataSourceError) -> Self {
        self.leagues.insert(league.to_string(), Err(error));
        self
    }
}

#[async_trait]
impl MatchSource for MockMatchSource {
    fn leagues(&self) -> Vec<String> {
        self.leagues.keys().cloned().collect()
    }

    async fn fetch_records(&self, league: &str) -> Result<Vec<MatchRecord>, DataSourceError> {
        self.leagues
            .get(league)
            .cloned()
            .unwrap_or_else(|| Err(DataSourceError::UnknownLeague(league.to_string())))
    }
}
