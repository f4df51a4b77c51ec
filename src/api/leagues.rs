use axum::extract::{Path, Query, State};
use axum::Json;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::api::AppState;
use crate::assemble::{AssembledMatchday, LeagueReport, SeasonReport};
use crate::domain::Season;
use crate::error::AppError;

const MIN_COMPARE: usize = 2;
const MAX_COMPARE: usize = 5;

pub fn matchday_key(matchday: u32) -> String {
    format!("Matchday {}", matchday)
}

fn serialize_matchdays<S: Serializer>(
    matchdays: &BTreeMap<u32, AssembledMatchday>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(matchdays.len()))?;
    for (matchday, assembled) in matchdays {
        map.serialize_entry(&matchday_key(*matchday), assembled)?;
    }
    map.end()
}

/// `{"Matchday N": {...}}` in matchday order.
#[derive(Debug)]
pub struct SeasonBody(pub SeasonReport);

impl Serialize for SeasonBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_matchdays(&self.0.matchdays, serializer)
    }
}

/// `{"<season>": {"Matchday N": {...}}}`, earliest season first.
#[derive(Debug)]
pub struct LeagueBody(pub LeagueReport);

impl Serialize for LeagueBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Matchdays<'a>(&'a BTreeMap<u32, AssembledMatchday>);

        impl Serialize for Matchdays<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serialize_matchdays(self.0, serializer)
            }
        }

        let mut map = serializer.serialize_map(Some(self.0.seasons.len()))?;
        for season in &self.0.seasons {
            map.serialize_entry(season.season.as_str(), &Matchdays(&season.matchdays))?;
        }
        map.end()
    }
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    /// Comma-separated matchday numbers, e.g. `1,3,7`.
    pub matchdays: Option<String>,
}

fn parse_matchday_list(raw: Option<&str>) -> Result<BTreeSet<u32>, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("matchdays is required".to_string()))?;

    let mut selected = BTreeSet::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let matchday = part
            .parse::<u32>()
            .ok()
            .filter(|md| *md > 0)
            .ok_or_else(|| AppError::BadRequest(format!("invalid matchday: {}", part)))?;
        selected.insert(matchday);
    }

    if !(MIN_COMPARE..=MAX_COMPARE).contains(&selected.len()) {
        return Err(AppError::BadRequest(format!(
            "select between {} and {} distinct matchdays",
            MIN_COMPARE, MAX_COMPARE
        )));
    }
    Ok(selected)
}

pub async fn list_leagues(State(state): State<AppState>) -> Json<Vec<String>> {
    let mut leagues = state.service.leagues();
    leagues.sort();
    Json(leagues)
}

pub async fn get_league(
    Path(league): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LeagueBody>, AppError> {
    let report = state.service.league_report(&league).await?;
    Ok(Json(LeagueBody(report)))
}

pub async fn get_season(
    Path((league, season)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<SeasonBody>, AppError> {
    let report = state
        .service
        .season_report(&league, &Season::new(season))
        .await?;
    Ok(Json(SeasonBody(report)))
}

/// Side-by-side view of a few matchdays of one season.
pub async fn compare_matchdays(
    Path((league, season)): Path<(String, String)>,
    Query(params): Query<CompareQuery>,
    State(state): State<AppState>,
) -> Result<Json<SeasonBody>, AppError> {
    let selected = parse_matchday_list(params.matchdays.as_deref())?;

    let mut report = state
        .service
        .season_report(&league, &Season::new(season))
        .await?;

    if let Some(missing) = selected.iter().find(|md| !report.matchdays.contains_key(*md)) {
        return Err(AppError::NotFound(format!(
            "season {} has no {}",
            report.season,
            matchday_key(*missing)
        )));
    }
    report.matchdays.retain(|md, _| selected.contains(md));
    Ok(Json(SeasonBody(report)))
}
