//! Configuration - environment variable parsing

use std::env;
use std::path::PathBuf;

use crate::entities::Rules;

const MAX_ROWS: usize = 8;
const MAX_COLS: usize = 12;
const MAX_LIVES: u32 = 9;

/// Runtime configuration loaded from environment variables
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// tracing filter directive (trace, debug, info, warn, error)
    pub log_level: String,
    /// Where log lines go; logging is off when unset
    pub log_file: Option<PathBuf>,
    /// Tick period in milliseconds
    pub frame_ms: u64,
    pub enemy_rows: usize,
    pub enemy_cols: usize,
    pub starting_lives: u32,
    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let rules = Rules::default();
        Self {
            log_level: "info".to_string(),
            log_file: None,
            frame_ms: 16,
            enemy_rows: rules.enemy_rows,
            enemy_cols: rules.enemy_cols,
            starting_lives: rules.starting_lives,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// anything it doesn't provide
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            log_level: lookup("INVADERS_LOG").unwrap_or(defaults.log_level),
            log_file: lookup("INVADERS_LOG_FILE").map(PathBuf::from),
            frame_ms: parse_or(&lookup, "INVADERS_FRAME_MS", defaults.frame_ms)?,
            enemy_rows: parse_or(&lookup, "INVADERS_ROWS", defaults.enemy_rows)?,
            enemy_cols: parse_or(&lookup, "INVADERS_COLS", defaults.enemy_cols)?,
            starting_lives: parse_or(&lookup, "INVADERS_LIVES", defaults.starting_lives)?,
            seed: lookup("INVADERS_SEED")
                .map(|raw| parse("INVADERS_SEED", &raw))
                .transpose()?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1000).contains(&self.frame_ms) {
            return Err(ConfigError::OutOfRange {
                key: "INVADERS_FRAME_MS",
                reason: "must be between 1 and 1000",
            });
        }
        if !(1..=MAX_ROWS).contains(&self.enemy_rows) {
            return Err(ConfigError::OutOfRange {
                key: "INVADERS_ROWS",
                reason: "must be between 1 and 8",
            });
        }
        if !(1..=MAX_COLS).contains(&self.enemy_cols) {
            return Err(ConfigError::OutOfRange {
                key: "INVADERS_COLS",
                reason: "must be between 1 and 12",
            });
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::OutOfRange {
                key: "INVADERS_LIVES",
                reason: "must be at least 1",
            });
        }
        if self.starting_lives > MAX_LIVES {
            return Err(ConfigError::OutOfRange {
                key: "INVADERS_LIVES",
                reason: "must be at most 9",
            });
        }
        Ok(())
    }

    /// Base simulation rules (before difficulty scaling)
    pub fn rules(&self) -> Rules {
        Rules {
            enemy_rows: self.enemy_rows,
            enemy_cols: self.enemy_cols,
            starting_lives: self.starting_lives,
            ..Rules::default()
        }
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => parse(key, &raw),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{key} {reason}")]
    OutOfRange {
        key: &'static str,
        reason: &'static str,
    },
}
