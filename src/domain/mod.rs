//! Domain types for match results.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: Team, Season, Outcome, TeamResult, Location
//! - Raw and validated match rows
//! - Stable fixture ordering for deterministic processing

pub mod decimal;
pub mod match_row;
pub mod ordering;
pub mod primitives;

pub use decimal::Decimal;
pub use match_row::{MatchRecord, MatchRow, OddsTriple, RowDefect, Scoreline};
pub use ordering::{sort_rows_deterministic, FixtureOrderingKey, TieBreakOrder};
pub use primitives::{Location, Outcome, Season, Team, TeamResult};
