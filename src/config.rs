use crate::domain::{Decimal, TieBreakOrder};
use crate::engine::{default_odds_threshold, GroupingMode};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_LEAGUES: &str = "English Premier League=GoodPrem.csv;\
Italian Serie A=GoodItaly.csv;\
Portugal Primeira League=GoodPortugal.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    /// League display name -> CSV file name inside `data_dir`.
    pub leagues: BTreeMap<String, String>,
    pub engine: EngineConfig,
}

/// Knobs that change analytics output. Fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub tie_break: TieBreakOrder,
    pub grouping_mode: GroupingMode,
    pub odds_threshold: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreakOrder::default(),
            grouping_mode: GroupingMode::default(),
            odds_threshold: default_odds_threshold(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let data_dir = PathBuf::from(
            env_map
                .get("DATA_DIR")
                .map(|s| s.as_str())
                .unwrap_or("data"),
        );

        let leagues = parse_leagues(
            env_map
                .get("LEAGUES")
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_LEAGUES),
        )?;

        let tie_break = match env_map.get("TIE_BREAK_ORDER") {
            None => TieBreakOrder::default(),
            Some(raw) => TieBreakOrder::from_str(raw).map_err(|_| {
                ConfigError::InvalidValue(
                    "TIE_BREAK_ORDER".to_string(),
                    format!("must be asc or desc, got {}", raw),
                )
            })?,
        };

        let grouping_mode = match env_map.get("GROUPING_MODE") {
            None => GroupingMode::default(),
            Some(raw) => GroupingMode::from_str(raw).map_err(|_| {
                ConfigError::InvalidValue(
                    "GROUPING_MODE".to_string(),
                    format!("must be first_match or transitive, got {}", raw),
                )
            })?,
        };

        let odds_threshold = match env_map.get("ODDS_THRESHOLD") {
            None => default_odds_threshold(),
            Some(raw) => Decimal::from_str_canonical(raw)
                .ok()
                .filter(|d| !d.is_negative())
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "ODDS_THRESHOLD".to_string(),
                        "must be a non-negative decimal".to_string(),
                    )
                })?,
        };

        Ok(Config {
            port,
            data_dir,
            leagues,
            engine: EngineConfig {
                tie_break,
                grouping_mode,
                odds_threshold,
            },
        })
    }
}

fn parse_leagues(raw: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut leagues = BTreeMap::new();
    for pair in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let (name, file) = pair
            .split_once('=')
            .map(|(n, f)| (n.trim(), f.trim()))
            .filter(|(n, f)| !n.is_empty() && !f.is_empty())
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "LEAGUES".to_string(),
                    format!("expected name=file, got {}", pair),
                )
            })?;
        leagues.insert(name.to_string(), file.to_string());
    }
    if leagues.is_empty() {
        return Err(ConfigError::MissingEnv("LEAGUES".to_string()));
    }
    Ok(leagues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.leagues.len(), 3);
        assert_eq!(
            config.leagues.get("Italian Serie A").map(String::as_str),
            Some("GoodItaly.csv")
        );
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = HashMap::new();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_custom_leagues() {
        let mut env_map = HashMap::new();
        env_map.insert(
            "LEAGUES".to_string(),
            " La Liga = spain.csv ; Ligue 1=france.csv;".to_string(),
        );
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.leagues.len(), 2);
        assert_eq!(config.leagues.get("La Liga").map(String::as_str), Some("spain.csv"));
    }

    #[test]
    fn test_malformed_leagues() {
        let mut env_map = HashMap::new();
        env_map.insert("LEAGUES".to_string(), "La Liga".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "LEAGUES"),
            _ => panic!("Expected InvalidValue error"),
        }

        let mut env_map = HashMap::new();
        env_map.insert("LEAGUES".to_string(), " ; ".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::MissingEnv(k)) => assert_eq!(k, "LEAGUES"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_engine_knobs() {
        let mut env_map = HashMap::new();
        env_map.insert("TIE_BREAK_ORDER".to_string(), "desc".to_string());
        env_map.insert("GROUPING_MODE".to_string(), "transitive".to_string());
        env_map.insert("ODDS_THRESHOLD".to_string(), "0.1".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.engine.tie_break, TieBreakOrder::Desc);
        assert_eq!(config.engine.grouping_mode, GroupingMode::Transitive);
        assert_eq!(
            config.engine.odds_threshold,
            Decimal::from_str_canonical("0.1").unwrap()
        );
    }

    #[test]
    fn test_invalid_engine_knobs() {
        for (key, value) in [
            ("TIE_BREAK_ORDER", "sideways"),
            ("GROUPING_MODE", "fuzzy"),
            ("ODDS_THRESHOLD", "-0.05"),
            ("ODDS_THRESHOLD", "abc"),
        ] {
            let mut env_map = HashMap::new();
            env_map.insert(key.to_string(), value.to_string());
            match Config::from_env_map(env_map) {
                Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, key),
                _ => panic!("Expected InvalidValue error for {}", key),
            }
        }
    }
}
