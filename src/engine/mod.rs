//! Pure computation engine for season standings and matchday analytics.
//!
//! Everything here is synchronous and owns its state; one season pass builds
//! one `StandingsTracker` and drops it when the season is assembled.

pub mod form;
pub mod head_to_head;
pub mod ranking;
pub mod similarity;
pub mod standings;

pub use form::{
    FormEntry, FormHistory, FormLine, FormWindow, PreviousGame, SeasonCarryover, CARRYOVER_GAMES,
};
pub use head_to_head::{HeadToHeadEntry, HeadToHeadLedger, HeadToHeadSide};
pub use ranking::{PositionRanker, Ranking, Standing};
pub use similarity::{
    default_odds_threshold, FixtureTraits, FormSignature, GroupingMode, SimilarityGrouper,
    SimilarityTags, PALETTE,
};
pub use standings::{StandingsSnapshot, StandingsTracker, TeamSeasonStats};
