use crate::assemble::{AssembleError, LeagueReport, MatchdayAssembler, SeasonReport};
use crate::config::EngineConfig;
use crate::datasource::{DataSourceError, MatchSource};
use crate::domain::Season;
use futures::future::try_join_all;
use std::sync::Arc;
use thiserror::Error;

/// Loads a league and runs its season passes, one blocking task per season.
#[derive(Debug, Clone)]
pub struct LeagueService {
    source: Arc<dyn MatchSource>,
    assembler: Arc<MatchdayAssembler>,
}

impl LeagueService {
    pub fn new(source: Arc<dyn MatchSource>, config: EngineConfig) -> Self {
        Self {
            source,
            assembler: Arc::new(MatchdayAssembler::new(config)),
        }
    }

    pub fn leagues(&self) -> Vec<String> {
        self.source.leagues()
    }

    pub fn assembler(&self) -> &MatchdayAssembler {
        &self.assembler
    }

    /// Every season of `league`, earliest first.
    ///
    /// Seasons only depend on each other through carry-over, which is built
    /// up front, so the passes run concurrently.
    pub async fn league_report(&self, league: &str) -> Result<LeagueReport, OrchestrationError> {
        let records = self.source.fetch_records(league).await?;
        let declared = MatchdayAssembler::discover_seasons(&records);
        let inputs = self.assembler.prepare(&declared, &records)?;

        let passes = inputs.into_iter().map(|input| {
            let assembler = Arc::clone(&self.assembler);
            tokio::task::spawn_blocking(move || assembler.assemble_season(input))
        });
        let seasons = try_join_all(passes).await?;

        tracing::info!(
            league,
            seasons = seasons.len(),
            records = records.len(),
            "League report ready"
        );
        Ok(LeagueReport { seasons })
    }

    /// One season of `league`. Earlier seasons are still read for carry-over.
    pub async fn season_report(
        &self,
        league: &str,
        season: &Season,
    ) -> Result<SeasonReport, OrchestrationError> {
        let report = self.league_report(league).await?;
        report
            .seasons
            .into_iter()
            .find(|s| &s.season == season)
            .ok_or_else(|| OrchestrationError::UnknownSeason {
                league: league.to_string(),
                season: season.to_string(),
            })
    }
}

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Source(#[from] DataSourceError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    #[error("season pass failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("league {league} has no season {season}")]
    UnknownSeason { league: String, season: String },
}
