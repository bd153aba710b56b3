//! Game configuration.
//!
//! Defaults reproduce the reference game exactly. A YAML file can override any
//! subset of fields:
//!
//! ```yaml
//! grid_size: 8
//! initial_score_limit: 8
//! score_limit_step: 8
//! initial_inventory: { bear: 1, fish: 0, fox: 0 }
//! history_capacity: 200
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::names::{MAX_PLAYER_NAME_LEN, MIN_PLAYER_NAME_LEN};
use crate::Inventory;

/// Side length of the reference grid.
pub const GRID_SIZE: usize = 8;

/// Largest accepted `grid_size`.
pub const MAX_GRID_SIZE: usize = 64;
/// Largest accepted `score_limit_step` and `initial_score_limit`.
///
/// A placement scores at most 174 (a bear surrounded by fish), so a full
/// `MAX_GRID_SIZE` grid stays under 750_000 points and fewer than 1_300 turns.
/// With these caps the score limit stays well inside `u32`.
pub const MAX_SCORE_LIMIT: u32 = 1_000_000;
/// Largest accepted starting count per animal.
pub const MAX_INITIAL_INVENTORY: u32 = 1_000_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_size: usize,
    /// Score needed to leave turn 1.
    pub initial_score_limit: u32,
    /// Each turn advance adds `score_limit_step * new_turn` to the limit.
    pub score_limit_step: u32,
    pub initial_inventory: Inventory,
    pub min_player_name_len: usize,
    pub max_player_name_len: usize,
    /// Undo window; `None` keeps every placement.
    pub history_capacity: Option<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            initial_score_limit: 8,
            score_limit_step: 8,
            initial_inventory: Inventory::new(1, 0, 0),
            min_player_name_len: MIN_PLAYER_NAME_LEN,
            max_player_name_len: MAX_PLAYER_NAME_LEN,
            history_capacity: None,
        }
    }
}

impl GameConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::Invalid(format!(
                "grid_size must be between 1 and {MAX_GRID_SIZE}"
            )));
        }
        // a zero step would never lift the limit above the score
        if self.score_limit_step == 0 || self.score_limit_step > MAX_SCORE_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "score_limit_step must be between 1 and {MAX_SCORE_LIMIT}"
            )));
        }
        if self.initial_score_limit > MAX_SCORE_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "initial_score_limit must be at most {MAX_SCORE_LIMIT}"
            )));
        }
        if let Some((animal, count)) = self
            .initial_inventory
            .iter()
            .find(|&(_, count)| count > MAX_INITIAL_INVENTORY)
        {
            return Err(ConfigError::Invalid(format!(
                "initial_inventory.{animal} is {count}, at most {MAX_INITIAL_INVENTORY} allowed"
            )));
        }
        if self.min_player_name_len > self.max_player_name_len {
            return Err(ConfigError::Invalid(format!(
                "min_player_name_len ({}) exceeds max_player_name_len ({})",
                self.min_player_name_len, self.max_player_name_len
            )));
        }
        if self.history_capacity == Some(0) {
            return Err(ConfigError::Invalid("history_capacity must be at least 1".into()));
        }
        Ok(())
    }
}
