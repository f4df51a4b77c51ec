use chrono::NaiveDate;
use formguide::domain::{Decimal, Location, MatchRecord, MatchRow, OddsTriple, Season, Team, TeamResult};
use formguide::engine::{
    FixtureTraits, FormWindow, PositionRanker, SimilarityGrouper, StandingsTracker,
};
use std::collections::HashMap;

fn odds(home: &str, draw: &str, away: &str) -> OddsTriple {
    OddsTriple::new(
        Decimal::from_str_canonical(home).unwrap(),
        Decimal::from_str_canonical(draw).unwrap(),
        Decimal::from_str_canonical(away).unwrap(),
    )
}

fn row(matchday: u32, day: u32, home: &str, away: &str, code: &str, score: Option<&str>) -> MatchRow {
    let record = MatchRecord {
        date: NaiveDate::from_ymd_opt(2023, 8, day)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap(),
        season: Season::new("2023-24".to_string()),
        matchday,
        home: Some(home.to_string()),
        away: Some(away.to_string()),
        outcome_code: Some(code.to_string()),
        scoreline: score.map(str::to_string),
        home_odds: Some(Decimal::from_str_canonical("1.80").unwrap()),
        draw_odds: Some(Decimal::from_str_canonical("3.40").unwrap()),
        away_odds: Some(Decimal::from_str_canonical("4.20").unwrap()),
        round_tag: None,
    };
    MatchRow::from_record(&record).unwrap()
}

fn team(name: &str) -> Team {
    Team::new(name.to_string())
}

fn tracker_for(rows: &[MatchRow]) -> StandingsTracker {
    let mut tracker = StandingsTracker::new();
    for r in rows {
        tracker.register_team(&r.home);
        tracker.register_team(&r.away);
    }
    tracker
}

#[test]
fn points_match_independent_tally() {
    let rows = vec![
        row(1, 1, "A", "B", "1", Some("2-0")),
        row(1, 1, "C", "D", "0", Some("1-1")),
        row(2, 8, "B", "C", "2", Some("0-3")),
        row(2, 8, "D", "A", "0", None),
        row(3, 15, "A", "C", "2", Some("1-2")),
        row(3, 15, "B", "D", "1", Some("1-0")),
    ];
    let mut tracker = tracker_for(&rows);
    for r in &rows {
        tracker.apply_match(r);
    }

    let mut expected: HashMap<Team, (u32, u32)> = HashMap::new();
    for r in &rows {
        for location in [Location::Home, Location::Away] {
            let tally = expected.entry(r.team_at(location).clone()).or_default();
            match r.result_for(location) {
                TeamResult::Win => tally.0 += 1,
                TeamResult::Draw => tally.1 += 1,
                TeamResult::Loss => {}
            }
        }
    }

    for (t, (wins, draws)) in expected {
        let stats = tracker.stats(&t).unwrap();
        assert_eq!(stats.points, 3 * wins + draws, "points for {}", t);
        assert_eq!(stats.wins, wins);
        assert_eq!(stats.draws, draws);
    }
}

#[test]
fn snapshot_excludes_the_match_being_applied() {
    // Two fixtures on the same matchday; the second depends on the first.
    let first = row(1, 1, "A", "B", "1", Some("1-0"));
    let second = row(1, 1, "B", "C", "0", Some("0-0"));
    let mut tracker = tracker_for(&[first.clone(), second.clone()]);

    let before_first = PositionRanker::rank(tracker.teams(), &tracker.snapshot());
    assert_eq!(before_first.get(&team("A")).unwrap().points, 0);
    tracker.apply_match(&first);

    let before_second = PositionRanker::rank(tracker.teams(), &tracker.snapshot());
    assert_eq!(before_second.get(&team("A")).unwrap().points, 3);
    assert_eq!(before_second.get(&team("B")).unwrap().points, 0);
    assert_eq!(before_second.get(&team("C")).unwrap().points, 0);
    tracker.apply_match(&second);

    assert_eq!(tracker.stats(&team("B")).unwrap().points, 1);
}

#[test]
fn ranking_is_idempotent() {
    let rows = vec![
        row(1, 1, "A", "B", "0", Some("1-1")),
        row(1, 1, "C", "D", "0", Some("1-1")),
        row(2, 8, "A", "C", "1", Some("2-1")),
    ];
    let mut tracker = tracker_for(&rows);
    for r in &rows {
        tracker.apply_match(r);
    }

    let first = PositionRanker::rank(tracker.teams(), &tracker.snapshot());
    let second = PositionRanker::rank(tracker.teams(), &tracker.snapshot());
    assert_eq!(first, second);
    assert_eq!(first.position_of(&team("A")), Some(1));
    assert_eq!(first.len(), 4);
}

#[test]
fn short_form_pads_missing_games_with_zero() {
    let rows = vec![
        row(1, 1, "A", "B", "1", Some("1-0")),
        row(2, 8, "C", "A", "0", Some("2-2")),
    ];
    let mut tracker = tracker_for(&rows);

    let empty = tracker.form().form(&team("A"), 1, FormWindow::SHORT);
    assert_eq!(empty.weight, 0);
    assert!(empty.results.is_empty());

    for r in &rows {
        tracker.apply_match(r);
    }

    // Win (20) + draw (10); three empty slots.
    let line = tracker.form().form(&team("A"), 3, FormWindow::SHORT);
    assert_eq!(line.results, vec![TeamResult::Draw, TeamResult::Win]);
    assert_eq!(line.weight, 30);
}

#[test]
fn odds_threshold_boundaries() {
    let grouper = SimilarityGrouper::default();
    let base = odds("2.00", "3.10", "3.80");
    let close = odds("2.02", "3.08", "3.82");
    let far = odds("2.10", "3.10", "3.80");

    assert!(grouper.odds_match(&base.sorted(), &close.sorted()));
    assert!(!grouper.odds_match(&base.sorted(), &far.sorted()));

    let traits = |o: OddsTriple| FixtureTraits {
        odds: o,
        home_form: None,
        away_form: None,
    };
    let tags = grouper.group(&[traits(base), traits(far), traits(close)]);
    assert_eq!(tags.odds.get(&0), Some(&0));
    assert_eq!(tags.odds.get(&2), Some(&0));
    assert_eq!(tags.odds.get(&1), None);
}

#[test]
fn round_trip_two_matchdays() {
    let rows = vec![
        row(1, 1, "A", "B", "1", Some("2-0")),
        row(2, 8, "C", "A", "0", Some("1-1")),
    ];
    let mut tracker = tracker_for(&rows);
    for r in &rows {
        tracker.apply_match(r);
    }

    let a = tracker.stats(&team("A")).unwrap();
    assert_eq!(a.points, 4);
    assert_eq!(a.goal_difference(), 2);
    assert_eq!(a.previous_result, Some(TeamResult::Draw));
    assert_eq!(a.previous_location, Some(Location::Away));
    assert_eq!(tracker.head_to_head().len(), 2);
}
