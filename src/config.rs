use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::entities::{ExtractOptions, PlayerIdentity, TeamScope};

const DEFAULT_SOURCE_DIR: &str = "CSV";
const DEFAULT_OUTPUT_DIR: &str = ".";

#[derive(Debug, Clone)]
pub struct Config {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub db_path: Option<PathBuf>,
    pub extract: ExtractOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            db_path: None,
            extract: ExtractOptions::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Config::default();
        if let Some(dir) = var("MATCHS_SOURCE_DIR") {
            config.source_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("MATCHS_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        config.db_path = var("MATCHS_DB_PATH").map(PathBuf::from);
        if let Some(raw) = var("MATCHS_PLAYER_IDENTITY") {
            config.extract.player_identity = raw
                .parse::<PlayerIdentity>()
                .context("invalid MATCHS_PLAYER_IDENTITY")?;
        }
        if let Some(raw) = var("MATCHS_TEAM_SCOPE") {
            config.extract.team_scope = raw
                .parse::<TeamScope>()
                .context("invalid MATCHS_TEAM_SCOPE")?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset_or_blank() {
        let config = config_from(&[("MATCHS_SOURCE_DIR", "  "), ("MATCHS_DB_PATH", "")]).unwrap();
        assert_eq!(config.source_dir, PathBuf::from("CSV"));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(config.db_path.is_none());
        assert_eq!(config.extract, ExtractOptions::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("MATCHS_SOURCE_DIR", "/data/seasons"),
            ("MATCHS_OUTPUT_DIR", "/data/out"),
            ("MATCHS_DB_PATH", "/data/out/matchs.sqlite"),
            ("MATCHS_PLAYER_IDENTITY", "name_team"),
            ("MATCHS_TEAM_SCOPE", "home_away"),
        ])
        .unwrap();
        assert_eq!(config.source_dir, PathBuf::from("/data/seasons"));
        assert_eq!(config.db_path, Some(PathBuf::from("/data/out/matchs.sqlite")));
        assert_eq!(config.extract.player_identity, PlayerIdentity::ByNameAndTeam);
        assert_eq!(config.extract.team_scope, TeamScope::HomeAndAway);
    }

    #[test]
    fn rejects_unknown_modes() {
        let err = config_from(&[("MATCHS_TEAM_SCOPE", "away")]).unwrap_err();
        assert!(format!("{err:#}").contains("MATCHS_TEAM_SCOPE"));
    }
}
