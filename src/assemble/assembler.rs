//! Season passes: validate, order, and enrich fixtures matchday by matchday.

use super::{
    count_outcome, AssembleError, AssembledMatchday, EnrichedFixture, LeagueReport,
    MatchdaySummary, SeasonInput, SeasonReport, SideContext,
};
use crate::config::EngineConfig;
use crate::domain::{sort_rows_deterministic, MatchRecord, MatchRow, RowDefect, Season, Team};
use crate::engine::{
    FixtureTraits, FormSignature, FormWindow, PositionRanker, Ranking, SeasonCarryover,
    SimilarityGrouper, StandingsTracker,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Drives the engine over a league's rows.
#[derive(Debug, Clone)]
pub struct MatchdayAssembler {
    config: EngineConfig,
    grouper: SimilarityGrouper,
}

impl Default for MatchdayAssembler {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl MatchdayAssembler {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            grouper: SimilarityGrouper::new(config.grouping_mode, config.odds_threshold),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seasons present in `records`, ordered by their earliest fixture date
    /// (season key breaks ties).
    pub fn discover_seasons(records: &[MatchRecord]) -> Vec<Season> {
        let mut earliest: HashMap<&Season, NaiveDateTime> = HashMap::new();
        for record in records {
            earliest
                .entry(&record.season)
                .and_modify(|d| *d = (*d).min(record.date))
                .or_insert(record.date);
        }

        let mut seasons: Vec<(&Season, NaiveDateTime)> = earliest.into_iter().collect();
        seasons.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        seasons.into_iter().map(|(s, _)| s.clone()).collect()
    }

    /// Split `records` into independent per-season inputs.
    ///
    /// `declared` lists the seasons in chronological order. Defective rows are
    /// logged and counted; a row naming a season outside `declared` is a caller
    /// bug and fails the whole call.
    pub fn prepare(
        &self,
        declared: &[Season],
        records: &[MatchRecord],
    ) -> Result<Vec<SeasonInput>, AssembleError> {
        let mut index: HashMap<&Season, usize> = HashMap::new();
        for (idx, season) in declared.iter().enumerate() {
            if index.insert(season, idx).is_some() {
                return Err(AssembleError::DuplicateSeason(season.to_string()));
            }
        }

        let mut inputs: Vec<SeasonInput> = declared
            .iter()
            .map(|season| SeasonInput {
                season: season.clone(),
                rows: Vec::new(),
                carryover: SeasonCarryover::empty(),
                skipped_rows: 0,
            })
            .collect();
        let mut seen_keys: Vec<HashSet<String>> = vec![HashSet::new(); declared.len()];

        for record in records {
            let idx = *index
                .get(&record.season)
                .ok_or_else(|| AssembleError::UndeclaredSeason(record.season.to_string()))?;

            let validated = MatchRow::from_record(record).and_then(|row| {
                if seen_keys[idx].insert(row.fixture_key.clone()) {
                    Ok(row)
                } else {
                    Err(RowDefect::Duplicate(row.fixture_key))
                }
            });

            match validated {
                Ok(row) => inputs[idx].rows.push(row),
                Err(defect) => {
                    tracing::warn!(
                        season = %record.season,
                        matchday = record.matchday,
                        home = ?record.home,
                        away = ?record.away,
                        error = %defect,
                        "Skipping row"
                    );
                    inputs[idx].skipped_rows += 1;
                }
            }
        }

        for input in inputs.iter_mut() {
            sort_rows_deterministic(&mut input.rows, self.config.tie_break);
        }

        for idx in 1..inputs.len() {
            let carryover = SeasonCarryover::from_rows(&inputs[idx - 1].rows);
            tracing::debug!(
                season = %inputs[idx].season,
                from = %inputs[idx - 1].season,
                last_matchday = ?carryover.last_matchday(),
                "Preloaded previous season tail"
            );
            inputs[idx].carryover = carryover;
        }

        Ok(inputs)
    }

    /// Run one season pass. The tracker lives only for this call.
    pub fn assemble_season(&self, input: SeasonInput) -> SeasonReport {
        let SeasonInput {
            season,
            rows,
            carryover,
            skipped_rows,
        } = input;

        let mut tracker = StandingsTracker::with_carryover(carryover);
        for row in &rows {
            tracker.register_team(&row.home);
            tracker.register_team(&row.away);
        }

        let mut matchdays = BTreeMap::new();
        let mut start = 0;
        while start < rows.len() {
            let matchday = rows[start].matchday;
            let len = rows[start..]
                .iter()
                .take_while(|r| r.matchday == matchday)
                .count();
            let slice = &rows[start..start + len];
            matchdays.insert(matchday, self.assemble_matchday(&mut tracker, matchday, slice));
            start += len;
        }

        tracing::info!(
            season = %season,
            matchdays = matchdays.len(),
            fixtures = rows.len(),
            skipped = skipped_rows,
            "Assembled season"
        );

        SeasonReport {
            season,
            matchdays,
            skipped_rows,
        }
    }

    fn assemble_matchday(
        &self,
        tracker: &mut StandingsTracker,
        matchday: u32,
        rows: &[MatchRow],
    ) -> AssembledMatchday {
        let mut fixtures = Vec::with_capacity(rows.len());
        let mut traits = Vec::with_capacity(rows.len());

        for row in rows {
            // Rank before applying: a fixture never sees its own result.
            let ranking = PositionRanker::rank(tracker.teams(), &tracker.snapshot());
            let home = side_context(tracker, &ranking, &row.home, matchday);
            let away = side_context(tracker, &ranking, &row.away, matchday);
            tracker.apply_match(row);

            traits.push(FixtureTraits {
                odds: row.odds,
                home_form: form_signature(&home),
                away_form: form_signature(&away),
            });

            let label = EnrichedFixture::render_label(&home, &away, row.outcome, &row.odds);
            fixtures.push(EnrichedFixture {
                fixture_key: row.fixture_key.clone(),
                date: row.date,
                home,
                away,
                outcome: row.outcome,
                score: row.score,
                odds: row.odds,
                round_tag: row.round_tag,
                odds_tag: None,
                form_tag: None,
                label,
            });
        }

        let tags = self.grouper.group(&traits);
        for (idx, fixture) in fixtures.iter_mut().enumerate() {
            fixture.odds_tag = tags.odds.get(&idx).copied();
            fixture.form_tag = tags.form.get(&idx).copied();
        }

        AssembledMatchday {
            matchday,
            fixtures,
            summary: summarize(rows),
            odds_groups: tags.odds,
            form_groups: tags.form,
        }
    }

    pub fn assemble_league(
        &self,
        declared: &[Season],
        records: &[MatchRecord],
    ) -> Result<LeagueReport, AssembleError> {
        let inputs = self.prepare(declared, records)?;
        Ok(LeagueReport {
            seasons: inputs
                .into_iter()
                .map(|input| self.assemble_season(input))
                .collect(),
        })
    }

    /// `assemble_league` over the seasons found in `records`.
    pub fn assemble_all(&self, records: &[MatchRecord]) -> Result<LeagueReport, AssembleError> {
        let seasons = Self::discover_seasons(records);
        self.assemble_league(&seasons, records)
    }
}

fn side_context(
    tracker: &StandingsTracker,
    ranking: &Ranking,
    team: &Team,
    matchday: u32,
) -> SideContext {
    let standing = ranking.get(team);
    let form = tracker.form();
    SideContext {
        team: team.clone(),
        position: standing.map(|s| s.position).unwrap_or(0),
        points: standing.map(|s| s.points).unwrap_or(0),
        previous: form.previous_game(team, matchday),
        form_short: form.form(team, matchday, FormWindow::SHORT),
        form_long: form.form(team, matchday, FormWindow::LONG),
    }
}

fn form_signature(side: &SideContext) -> Option<FormSignature> {
    if side.form_short.results.is_empty() {
        return None;
    }
    Some(FormSignature::new(
        side.form_short.weight,
        side.form_short.results.iter().copied(),
    ))
}

fn summarize(rows: &[MatchRow]) -> MatchdaySummary {
    let mut per_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut round_tags = BTreeSet::new();
    let mut summary = MatchdaySummary::default();

    for row in rows {
        *per_date.entry(row.date.date()).or_default() += 1;
        round_tags.insert(row.round_tag);
        count_outcome(&mut summary.code_outcomes, row.outcome);
        if let Some(score) = row.score {
            count_outcome(&mut summary.score_outcomes, score.outcome());
        }
    }

    summary.timing = per_date.into_values().collect();
    summary.round_tags = round_tags.into_iter().collect();
    summary
}
