//! Domain primitives: Team, Season, Outcome, TeamResult, Location.

use serde::{Deserialize, Serialize};

/// Team identifier as it appears in the source table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Team(pub String);

impl Team {
    /// Create a Team from a string.
    pub fn new(name: String) -> Self {
        Team(name)
    }

    /// Get the team name as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Season key (e.g. "2023-24").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Season(pub String);

impl Season {
    pub fn new(key: String) -> Self {
        Season(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Full-time result of a fixture from the home side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

impl Outcome {
    /// Parse a raw outcome code.
    ///
    /// Accepts the numeric `FTR` encoding (0 = draw, 1 = home, 2 = away), its
    /// float spelling ("1.0"), and the letters D/H/A.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        match code.to_ascii_uppercase().as_str() {
            "H" => return Some(Outcome::HomeWin),
            "A" => return Some(Outcome::AwayWin),
            "D" => return Some(Outcome::Draw),
            _ => {}
        }

        let value = code.parse::<f64>().ok()?;
        if value.fract() != 0.0 {
            return None;
        }
        match value as i64 {
            0 => Some(Outcome::Draw),
            1 => Some(Outcome::HomeWin),
            2 => Some(Outcome::AwayWin),
            _ => None,
        }
    }

    /// Result for the team playing at `location`.
    pub fn result_for(&self, location: Location) -> TeamResult {
        match (self, location) {
            (Outcome::Draw, _) => TeamResult::Draw,
            (Outcome::HomeWin, Location::Home) | (Outcome::AwayWin, Location::Away) => {
                TeamResult::Win
            }
            _ => TeamResult::Loss,
        }
    }

    /// Single-letter display code (H/A/D).
    pub fn letter(&self) -> &'static str {
        match self {
            Outcome::HomeWin => "H",
            Outcome::AwayWin => "A",
            Outcome::Draw => "D",
        }
    }
}

/// Result of a fixture from one team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TeamResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl TeamResult {
    /// League points earned for this result (3/1/0).
    pub fn points(&self) -> u32 {
        match self {
            TeamResult::Win => 3,
            TeamResult::Draw => 1,
            TeamResult::Loss => 0,
        }
    }
}

impl std::fmt::Display for TeamResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamResult::Win => write!(f, "W"),
            TeamResult::Draw => write!(f, "D"),
            TeamResult::Loss => write!(f, "L"),
        }
    }
}

/// Where a team played a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "H")]
    Home,
    #[serde(rename = "A")]
    Away,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Home => write!(f, "H"),
            Location::Away => write!(f, "A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_numeric_codes() {
        assert_eq!(Outcome::from_code("0"), Some(Outcome::Draw));
        assert_eq!(Outcome::from_code("1"), Some(Outcome::HomeWin));
        assert_eq!(Outcome::from_code(" 2 "), Some(Outcome::AwayWin));
        assert_eq!(Outcome::from_code("1.0"), Some(Outcome::HomeWin));
    }

    #[test]
    fn test_outcome_from_letters() {
        assert_eq!(Outcome::from_code("h"), Some(Outcome::HomeWin));
        assert_eq!(Outcome::from_code("A"), Some(Outcome::AwayWin));
        assert_eq!(Outcome::from_code("D"), Some(Outcome::Draw));
    }

    #[test]
    fn test_outcome_rejects_garbage() {
        assert_eq!(Outcome::from_code("3"), None);
        assert_eq!(Outcome::from_code("1.5"), None);
        assert_eq!(Outcome::from_code(""), None);
        assert_eq!(Outcome::from_code("home"), None);
    }

    #[test]
    fn test_result_for_location() {
        assert_eq!(Outcome::HomeWin.result_for(Location::Home), TeamResult::Win);
        assert_eq!(Outcome::HomeWin.result_for(Location::Away), TeamResult::Loss);
        assert_eq!(Outcome::AwayWin.result_for(Location::Away), TeamResult::Win);
        assert_eq!(Outcome::Draw.result_for(Location::Away), TeamResult::Draw);
    }

    #[test]
    fn test_team_result_serialization() {
        let json = serde_json::to_string(&TeamResult::Win).unwrap();
        assert_eq!(json, "\"W\"");
        let json = serde_json::to_string(&Location::Away).unwrap();
        assert_eq!(json, "\"A\"");
    }

    #[test]
    fn test_team_display() {
        let team = Team::new("Arsenal".to_string());
        assert_eq!(team.to_string(), "Arsenal");
    }
}
