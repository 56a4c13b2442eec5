use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::select::{DEFAULT_GROUP_LIMIT, FIRST_MATCH};

pub const DATA_DIR_VAR: &str = "CAMPUS_DATA_DIR";
pub const BUNDLE_VAR: &str = "CAMPUS_BUNDLE";
pub const GROUP_STORE_VAR: &str = "GROUP_STORE_PATH";
pub const GROUP_LIMIT_VAR: &str = "GROUP_RESULT_LIMIT";
pub const MEETING_SPOT_LIMIT_VAR: &str = "MEETING_SPOT_LIMIT";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidLimit { var: &'static str, value: String },
}

/// Runtime settings, read from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Directory holding the JSON fixtures.
    pub data_dir: PathBuf,
    /// Compressed campus bundle; preferred over `data_dir` when set.
    pub bundle: Option<PathBuf>,
    pub group_store: PathBuf,
    pub group_limit: usize,
    pub meeting_spot_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            data_dir: PathBuf::from("buildings"),
            bundle: None,
            group_store: PathBuf::from("groups.json"),
            group_limit: DEFAULT_GROUP_LIMIT,
            meeting_spot_limit: FIRST_MATCH,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        Ok(EngineConfig {
            data_dir: non_empty(DATA_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            bundle: non_empty(BUNDLE_VAR).map(PathBuf::from),
            group_store: non_empty(GROUP_STORE_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.group_store),
            group_limit: parse_limit(GROUP_LIMIT_VAR, non_empty(GROUP_LIMIT_VAR))?
                .unwrap_or(defaults.group_limit),
            meeting_spot_limit: parse_limit(MEETING_SPOT_LIMIT_VAR, non_empty(MEETING_SPOT_LIMIT_VAR))?
                .unwrap_or(defaults.meeting_spot_limit),
        })
    }
}

fn parse_limit(var: &'static str, value: Option<String>) -> Result<Option<usize>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(Some(limit)),
        _ => Err(ConfigError::InvalidLimit { var, value }),
    }
}
