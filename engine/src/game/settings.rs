use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::types::{DEFAULT_COLS, DEFAULT_ROWS, MIN_TILE_TYPES, TileType};
use crate::config::Validate;

pub const MAX_GRID_DIMENSION: usize = 64;
pub const DEFAULT_MAX_CASCADE_ITERATIONS: u32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub rows: usize,
    pub cols: usize,
    pub tile_types: Vec<TileType>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            tile_types: TileType::ALL.to_vec(),
        }
    }
}

impl Validate for GridSettings {
    fn validate(&self) -> Result<(), String> {
        if self.rows == 0 || self.rows > MAX_GRID_DIMENSION {
            return Err(format!(
                "Grid rows must be between 1 and {}, got {}",
                MAX_GRID_DIMENSION, self.rows
            ));
        }
        if self.cols == 0 || self.cols > MAX_GRID_DIMENSION {
            return Err(format!(
                "Grid cols must be between 1 and {}, got {}",
                MAX_GRID_DIMENSION, self.cols
            ));
        }
        let distinct: HashSet<TileType> = self.tile_types.iter().copied().collect();
        if distinct.len() != self.tile_types.len() {
            return Err("Tile types must not contain duplicates".to_string());
        }
        if distinct.len() < MIN_TILE_TYPES {
            return Err(format!(
                "At least {} tile types are required, got {}",
                MIN_TILE_TYPES,
                distinct.len()
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub base_per_tile: u32,
    pub four_match_bonus: u32,
    pub five_match_bonus: u32,
    pub combo_bonus: u32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            base_per_tile: 10,
            four_match_bonus: 20,
            five_match_bonus: 50,
            combo_bonus: 5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    pub max_cascade_iterations: u32,
    /// Hold the controller busy after a resolved swap until `finish_playback`.
    pub single_flight: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            max_cascade_iterations: DEFAULT_MAX_CASCADE_ITERATIONS,
            single_flight: false,
        }
    }
}

impl Validate for ControllerSettings {
    fn validate(&self) -> Result<(), String> {
        if self.max_cascade_iterations == 0 {
            return Err("max_cascade_iterations must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid: GridSettings,
    pub scoring: ScoringSettings,
    pub controller: ControllerSettings,
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<(), String> {
        self.grid.validate()?;
        self.controller.validate()
    }
}
