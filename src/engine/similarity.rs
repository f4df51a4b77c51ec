//! Groups fixtures of one matchday that look alike, for highlighting.
//!
//! Two independent axes: near-equal odds and equal form signatures. Each
//! surviving group (two or more members) gets a tag cycling through a fixed
//! 7-colour palette.

use crate::domain::{Decimal, OddsTriple, TeamResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Display colours, indexed by tag.
pub const PALETTE: [&str; 7] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6",
];

/// Default per-component odds tolerance (0.05).
pub fn default_odds_threshold() -> Decimal {
    Decimal::new(rust_decimal::Decimal::new(5, 2))
}

/// How pairwise matches become groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingMode {
    /// A fixture joins the first existing group whose first member it matches.
    /// Groups are never merged afterwards.
    #[default]
    FirstMatch,
    /// Any chain of pairwise matches ends up in one group.
    Transitive,
}

impl FromStr for GroupingMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_match" | "first-match" => Ok(GroupingMode::FirstMatch),
            "transitive" => Ok(GroupingMode::Transitive),
            _ => Err(()),
        }
    }
}

/// Form summary compared between fixtures: weight plus the set of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSignature {
    pub weight: u32,
    pub results: BTreeSet<TeamResult>,
}

impl FormSignature {
    pub fn new(weight: u32, results: impl IntoIterator<Item = TeamResult>) -> Self {
        Self {
            weight,
            results: results.into_iter().collect(),
        }
    }
}

/// What the grouper needs to know about one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureTraits {
    pub odds: OddsTriple,
    /// None when the side has no prior games.
    pub home_form: Option<FormSignature>,
    pub away_form: Option<FormSignature>,
}

/// Fixture index -> tag, per axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityTags {
    pub odds: BTreeMap<usize, u8>,
    pub form: BTreeMap<usize, u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityGrouper {
    mode: GroupingMode,
    odds_threshold: Decimal,
}

impl Default for SimilarityGrouper {
    fn default() -> Self {
        Self::new(GroupingMode::default(), default_odds_threshold())
    }
}

impl SimilarityGrouper {
    pub fn new(mode: GroupingMode, odds_threshold: Decimal) -> Self {
        Self {
            mode,
            odds_threshold,
        }
    }

    /// Tag the fixtures of one matchday, given in display order.
    pub fn group(&self, fixtures: &[FixtureTraits]) -> SimilarityTags {
        let odds: Vec<Option<[Decimal; 3]>> = fixtures
            .iter()
            .map(|f| f.odds.is_complete().then(|| f.odds.sorted()))
            .collect();
        let odds_groups = cluster(&odds, self.mode, |a, b| self.odds_match(a, b));

        let forms: Vec<Option<(&FormSignature, &FormSignature)>> = fixtures
            .iter()
            .map(|f| f.home_form.as_ref().zip(f.away_form.as_ref()))
            .collect();
        let form_groups = cluster(&forms, self.mode, |a, b| form_match(*a, *b));

        tracing::debug!(
            odds_groups = odds_groups.len(),
            form_groups = form_groups.len(),
            "Grouped matchday fixtures"
        );

        SimilarityTags {
            odds: assign_tags(&odds_groups),
            form: assign_tags(&form_groups),
        }
    }

    /// Sorted triples are equivalent when every component is within the threshold.
    pub fn odds_match(&self, a: &[Decimal; 3], b: &[Decimal; 3]) -> bool {
        a.iter()
            .zip(b.iter())
            .all(|(x, y)| (*x - *y).abs() <= self.odds_threshold)
    }
}

/// Straight or swapped: a reversed fixture with the same signatures matches too.
fn form_match(
    a: (&FormSignature, &FormSignature),
    b: (&FormSignature, &FormSignature),
) -> bool {
    let straight = a.0 == b.0 && a.1 == b.1;
    let swapped = a.0 == b.1 && a.1 == b.0;
    straight || swapped
}

/// Groups of two or more candidate indices, in emission order. `None` entries
/// never join a group.
fn cluster<T>(
    items: &[Option<T>],
    mode: GroupingMode,
    matches: impl Fn(&T, &T) -> bool,
) -> Vec<Vec<usize>> {
    let groups = match mode {
        GroupingMode::FirstMatch => first_match_groups(items, &matches),
        GroupingMode::Transitive => transitive_groups(items, &matches),
    };
    groups.into_iter().filter(|g| g.len() > 1).collect()
}

fn first_match_groups<T>(
    items: &[Option<T>],
    matches: &impl Fn(&T, &T) -> bool,
) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        let Some(item) = item else { continue };
        let existing = groups.iter_mut().find(|group| {
            items[group[0]]
                .as_ref()
                .is_some_and(|representative| matches(representative, item))
        });
        match existing {
            Some(group) => group.push(idx),
            None => groups.push(vec![idx]),
        }
    }
    groups
}

fn transitive_groups<T>(
    items: &[Option<T>],
    matches: &impl Fn(&T, &T) -> bool,
) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..items.len()).collect();

    fn find(parent: &mut [usize], mut idx: usize) -> usize {
        while parent[idx] != idx {
            parent[idx] = parent[parent[idx]];
            idx = parent[idx];
        }
        idx
    }

    for i in 0..items.len() {
        let Some(a) = &items[i] else { continue };
        for j in (i + 1)..items.len() {
            let Some(b) = &items[j] else { continue };
            if matches(a, b) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    // Keep the lowest index as root so groups order by first member.
                    let (lo, hi) = if ri < rj { (ri, rj) } else { (rj, ri) };
                    parent[hi] = lo;
                }
            }
        }
    }

    let mut by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for idx in 0..items.len() {
        if items[idx].is_some() {
            let root = find(&mut parent, idx);
            by_root.entry(root).or_default().push(idx);
        }
    }
    by_root.into_values().collect()
}

fn assign_tags(groups: &[Vec<usize>]) -> BTreeMap<usize, u8> {
    let mut tags = BTreeMap::new();
    for (emission, group) in groups.iter().enumerate() {
        let tag = (emission % PALETTE.len()) as u8;
        for &idx in group {
            tags.insert(idx, tag);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use TeamResult::{Draw, Loss, Win};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn odds(h: &str, dr: &str, a: &str) -> FixtureTraits {
        FixtureTraits {
            odds: OddsTriple::new(d(h), d(dr), d(a)),
            home_form: None,
            away_form: None,
        }
    }

    fn form(home: FormSignature, away: FormSignature) -> FixtureTraits {
        FixtureTraits {
            odds: OddsTriple::default(),
            home_form: Some(home),
            away_form: Some(away),
        }
    }

    #[test]
    fn test_close_odds_group_together() {
        let grouper = SimilarityGrouper::default();
        let tags = grouper.group(&[odds("2.00", "3.10", "3.80"), odds("2.02", "3.08", "3.82")]);
        assert_eq!(tags.odds.get(&0), Some(&0));
        assert_eq!(tags.odds.get(&1), Some(&0));
    }

    #[test]
    fn test_odds_beyond_threshold_do_not_group() {
        let grouper = SimilarityGrouper::default();
        let tags = grouper.group(&[odds("2.00", "3.10", "3.80"), odds("2.10", "3.10", "3.80")]);
        assert!(tags.odds.is_empty());
    }

    #[test]
    fn test_odds_compared_after_sorting() {
        let grouper = SimilarityGrouper::default();
        // Same prices, home and away swapped.
        let tags = grouper.group(&[odds("1.80", "3.40", "4.20"), odds("4.20", "3.40", "1.80")]);
        assert_eq!(tags.odds.len(), 2);
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let grouper = SimilarityGrouper::default();
        let tags = grouper.group(&[odds("2.00", "3.10", "3.80"), odds("2.05", "3.15", "3.85")]);
        assert_eq!(tags.odds.len(), 2);
    }

    #[test]
    fn test_missing_odds_never_group() {
        let grouper = SimilarityGrouper::default();
        let tags = grouper.group(&[odds("0", "3.10", "3.80"), odds("0", "3.10", "3.80")]);
        assert!(tags.odds.is_empty());
    }

    #[test]
    fn test_first_match_is_not_transitive() {
        // 0 ~ 1 and 1 ~ 2, but 0 !~ 2: first-match leaves 2 on its own.
        let fixtures = [
            odds("2.00", "3.00", "4.00"),
            odds("2.04", "3.04", "4.04"),
            odds("2.08", "3.08", "4.08"),
        ];
        let first = SimilarityGrouper::new(GroupingMode::FirstMatch, default_odds_threshold())
            .group(&fixtures);
        assert_eq!(first.odds.keys().copied().collect::<Vec<_>>(), vec![0, 1]);

        let transitive = SimilarityGrouper::new(GroupingMode::Transitive, default_odds_threshold())
            .group(&fixtures);
        assert_eq!(transitive.odds.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(transitive.odds.values().all(|t| *t == 0));
    }

    #[test]
    fn test_first_match_uses_first_qualifying_group() {
        // 2 matches both group representatives 0 and 1; it joins the first.
        let fixtures = [
            odds("2.00", "3.00", "4.00"),
            odds("2.10", "3.00", "4.00"),
            odds("2.05", "3.00", "4.00"),
            odds("2.10", "3.01", "4.00"),
        ];
        let tags = SimilarityGrouper::default().group(&fixtures);
        assert_eq!(tags.odds.get(&0), Some(&0));
        assert_eq!(tags.odds.get(&2), Some(&0));
        assert_eq!(tags.odds.get(&1), Some(&1));
        assert_eq!(tags.odds.get(&3), Some(&1));
    }

    #[test]
    fn test_tags_cycle_through_palette() {
        let mut fixtures = Vec::new();
        for i in 0..8 {
            let price = format!("{}.00", i + 2);
            fixtures.push(odds(&price, "9.00", "9.50"));
            fixtures.push(odds(&price, "9.00", "9.50"));
        }
        let tags = SimilarityGrouper::default().group(&fixtures);
        assert_eq!(tags.odds.get(&0), Some(&0));
        assert_eq!(tags.odds.get(&12), Some(&6));
        assert_eq!(tags.odds.get(&14), Some(&0));
    }

    #[test]
    fn test_form_signature_matches_straight_and_swapped() {
        let strong = FormSignature::new(80, [Win, Win, Draw]);
        let weak = FormSignature::new(20, [Loss, Win]);
        let fixtures = [
            form(strong.clone(), weak.clone()),
            form(weak.clone(), strong.clone()),
            form(strong.clone(), weak.clone()),
        ];
        let tags = SimilarityGrouper::default().group(&fixtures);
        assert_eq!(tags.form.len(), 3);
    }

    #[test]
    fn test_form_signature_requires_weight_and_results() {
        let a = FormSignature::new(40, [Win, Loss]);
        let same_weight = FormSignature::new(40, [Draw]);
        let fixtures = [
            form(a.clone(), a.clone()),
            form(same_weight.clone(), same_weight.clone()),
        ];
        let tags = SimilarityGrouper::default().group(&fixtures);
        assert!(tags.form.is_empty());
    }

    #[test]
    fn test_form_results_compared_as_set() {
        let a = FormSignature::new(40, [Win, Loss, Loss]);
        let b = FormSignature::new(40, [Loss, Win]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_grouping_mode_parse() {
        assert_eq!(GroupingMode::from_str("first_match"), Ok(GroupingMode::FirstMatch));
        assert_eq!(GroupingMode::from_str("Transitive"), Ok(GroupingMode::Transitive));
        assert!(GroupingMode::from_str("fuzzy").is_err());
    }
}
