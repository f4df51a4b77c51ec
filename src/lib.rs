pub mod api;
pub mod assemble;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use assemble::{
    AssembleError, AssembledMatchday, EnrichedFixture, LeagueReport, MatchdayAssembler,
    MatchdaySummary, SeasonReport,
};
pub use config::{Config, EngineConfig};
pub use datasource::{CsvMatchSource, DataSourceError, MatchSource, MockMatchSource};
pub use domain::{
    Decimal, Location, MatchRecord, MatchRow, Outcome, RowDefect, Season, Team, TeamResult,
    TieBreakOrder,
};
pub use engine::{
    FormHistory, FormWindow, GroupingMode, HeadToHeadLedger, PositionRanker, SimilarityGrouper,
    StandingsTracker,
};
pub use error::AppError;
pub use orchestration::{LeagueService, OrchestrationError};
