//! League table ordering.

use crate::domain::Team;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::standings::StandingsSnapshot;

/// One row of a ranked table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    /// 1-based.
    pub position: u32,
    pub team: Team,
    pub points: u32,
    pub goal_difference: i64,
    pub goals_scored: u32,
    pub head_to_head_points: u32,
    pub head_to_head_away_goals: u32,
}

impl Standing {
    fn cmp_desc(&self, other: &Self) -> Ordering {
        other
            .points
            .cmp(&self.points)
            .then_with(|| other.goal_difference.cmp(&self.goal_difference))
            .then_with(|| other.goals_scored.cmp(&self.goals_scored))
            .then_with(|| other.head_to_head_points.cmp(&self.head_to_head_points))
            .then_with(|| other.head_to_head_away_goals.cmp(&self.head_to_head_away_goals))
    }
}

/// A ranked table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ranking {
    pub standings: Vec<Standing>,
}

impl Ranking {
    pub fn get(&self, team: &Team) -> Option<&Standing> {
        self.standings.iter().find(|s| &s.team == team)
    }

    pub fn position_of(&self, team: &Team) -> Option<u32> {
        self.get(team).map(|s| s.position)
    }

    pub fn len(&self) -> usize {
        self.standings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }
}

/// Orders teams by points, goal difference, goals scored, then head-to-head
/// points and away goals among teams level on the first three keys.
pub struct PositionRanker;

impl PositionRanker {
    /// Rank `teams` against `snapshot`. Pure: the snapshot is never mutated and
    /// teams still level after every key keep their input order.
    pub fn rank(teams: &[Team], snapshot: &StandingsSnapshot<'_>) -> Ranking {
        let mut standings: Vec<Standing> = teams
            .iter()
            .map(|team| {
                let stats = snapshot.stats_for(team);
                Standing {
                    position: 0,
                    team: team.clone(),
                    points: stats.points,
                    goal_difference: stats.goal_difference(),
                    goals_scored: stats.goals_scored,
                    head_to_head_points: 0,
                    head_to_head_away_goals: 0,
                }
            })
            .collect();

        // Head-to-head only separates teams level on the primary keys.
        let mut level: HashMap<(u32, i64, u32), Vec<Team>> = HashMap::new();
        for s in &standings {
            level
                .entry((s.points, s.goal_difference, s.goals_scored))
                .or_default()
                .push(s.team.clone());
        }
        for s in standings.iter_mut() {
            let Some(peers) = level.get(&(s.points, s.goal_difference, s.goals_scored)) else {
                continue;
            };
            if peers.len() < 2 {
                continue;
            }
            let totals = snapshot.head_to_head.totals_among(&s.team, peers.iter());
            s.head_to_head_points = totals.points;
            s.head_to_head_away_goals = totals.away_goals;
        }

        standings.sort_by(Standing::cmp_desc);
        for (idx, s) in standings.iter_mut().enumerate() {
            s.position = (idx + 1) as u32;
        }

        Ranking { standings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchRecord, MatchRow, Season};
    use crate::engine::StandingsTracker;
    use chrono::NaiveDate;

    fn team(name: &str) -> Team {
        Team::new(name.to_string())
    }

    fn row(matchday: u32, home: &str, away: &str, code: &str, score: &str) -> MatchRow {
        MatchRow::from_record(&MatchRecord {
            date: NaiveDate::from_ymd_opt(2023, 9, matchday)
                .unwrap()
                .and_hms_opt(15, 0, 0)
                .unwrap(),
            season: Season::new("2023-24".to_string()),
            matchday,
            home: Some(home.to_string()),
            away: Some(away.to_string()),
            outcome_code: Some(code.to_string()),
            scoreline: Some(score.to_string()),
            home_odds: None,
            draw_odds: None,
            away_odds: None,
            round_tag: None,
        })
        .unwrap()
    }

    fn order(ranking: &Ranking) -> Vec<&str> {
        ranking.standings.iter().map(|s| s.team.as_str()).collect()
    }

    #[test]
    fn test_points_then_goal_difference_then_goals() {
        let mut tracker = StandingsTracker::new();
        tracker.apply_match(&row(1, "A", "B", "1", "1-0"));
        tracker.apply_match(&row(1, "C", "D", "1", "3-0"));
        tracker.apply_match(&row(1, "E", "F", "1", "4-1"));

        let ranking = PositionRanker::rank(tracker.teams(), &tracker.snapshot());
        // C and E both +3, E scored more.
        assert_eq!(order(&ranking), vec!["E", "C", "A", "B", "F", "D"]);
        assert_eq!(ranking.position_of(&team("E")), Some(1));
        assert_eq!(ranking.position_of(&team("D")), Some(6));
    }

    #[test]
    fn test_head_to_head_breaks_level_teams() {
        let mut tracker = StandingsTracker::new();
        tracker.register_team(&team("A"));
        tracker.register_team(&team("B"));
        // B beats A, then A beats B by the same margin: level on every primary key.
        tracker.apply_match(&row(1, "A", "B", "2", "0-1"));
        tracker.apply_match(&row(2, "B", "A", "2", "1-2"));

        let ranking = PositionRanker::rank(tracker.teams(), &tracker.snapshot());
        let a = ranking.get(&team("A")).unwrap();
        let b = ranking.get(&team("B")).unwrap();
        assert_eq!((a.points, a.goal_difference, a.goals_scored), (3, 0, 2));
        assert_eq!((b.points, b.goal_difference, b.goals_scored), (3, 0, 2));
        assert_eq!(a.head_to_head_points, 3);
        assert_eq!(b.head_to_head_points, 3);
        // Away goals: A scored 2 at B, B scored 1 at A.
        assert_eq!(a.head_to_head_away_goals, 2);
        assert_eq!(b.head_to_head_away_goals, 1);
        assert_eq!(order(&ranking), vec!["A", "B"]);
    }

    #[test]
    fn test_full_ties_keep_input_order() {
        let mut tracker = StandingsTracker::new();
        for name in ["Wolves", "Arsenal", "Luton"] {
            tracker.register_team(&team(name));
        }
        let ranking = PositionRanker::rank(tracker.teams(), &tracker.snapshot());
        assert_eq!(order(&ranking), vec!["Wolves", "Arsenal", "Luton"]);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let mut tracker = StandingsTracker::new();
        tracker.apply_match(&row(1, "A", "B", "0", "2-2"));
        tracker.apply_match(&row(1, "C", "D", "2", "0-1"));

        let snapshot = tracker.snapshot();
        let first = PositionRanker::rank(tracker.teams(), &snapshot);
        let second = PositionRanker::rank(tracker.teams(), &snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_team_ranks_with_zero_totals() {
        let tracker = StandingsTracker::new();
        let ranking = PositionRanker::rank(&[team("Ghost")], &tracker.snapshot());
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking.standings[0].points, 0);
    }
}
