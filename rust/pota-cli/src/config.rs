//! Configuration file parsing for `pota.toml`.
//!
//! Searches the current directory then its ancestors. Every setting is a
//! default that the command line can override.

use std::path::{Path, PathBuf};

use pota_vm::DebugFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE: &str = "pota.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid toml in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid debug setting {0:?}: expected \"all\", \"off\" or a list of pointer ids")]
    InvalidDebug(String),
    #[error("invalid tick {0}: expected a finite number of seconds that fits a duration")]
    InvalidTick(f64),
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct PotaConfig {
    #[serde(default)]
    pub run: RunSection,
}

/// The `[run]` table.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct RunSection {
    /// Seconds between paced rounds; negative waits for Enter.
    pub tick: Option<f64>,
    pub debug: Option<DebugSetting>,
    pub stack: Option<Vec<String>>,
    /// Seed for the random mirror.
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum DebugSetting {
    /// `debug = "all"` or `debug = "off"`
    Keyword(String),
    /// `debug = [0, 2]`
    Pointers(Vec<u64>),
}

impl DebugSetting {
    pub fn to_filter(&self) -> Result<DebugFilter, ConfigError> {
        match self {
            DebugSetting::Keyword(word) => match word.as_str() {
                "all" => Ok(DebugFilter::All),
                "off" | "none" => Ok(DebugFilter::Off),
                other => Err(ConfigError::InvalidDebug(other.to_string())),
            },
            DebugSetting::Pointers(ids) => Ok(DebugFilter::Only(ids.iter().copied().collect())),
        }
    }
}

impl PotaConfig {
    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find `pota.toml` in the current directory or one of its parents.
    pub fn discover() -> Result<Option<(PathBuf, Self)>, ConfigError> {
        match std::env::current_dir() {
            Ok(dir) => Self::discover_from(&dir),
            Err(_) => Ok(None),
        }
    }

    pub fn discover_from(start: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.is_file() {
                let cfg = Self::load_from(&config_path)?;
                return Ok(Some((config_path, cfg)));
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }
}
