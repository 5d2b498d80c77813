pub mod actions;
pub mod controller;
pub mod error;
pub mod game_state;
pub mod grid;
pub mod match_detector;
pub mod score_calculator;
pub mod settings;
pub mod types;

pub use actions::{ActionObserver, GameAction, SwapOutcome, SwapResult};
pub use controller::{CascadeStep, GameController};
pub use error::EngineError;
pub use game_state::{GameState, GameStateData, GameStatus};
pub use grid::Grid;
pub use match_detector::{Match, find_matches, has_matches, is_match, would_create_match};
pub use score_calculator::ScoreCalculator;
pub use settings::{ControllerSettings, EngineConfig, GridSettings, ScoringSettings};
pub use types::{
    Cell, FilledTile, GamePhase, GridCells, MIN_MATCH_LENGTH, MIN_TILE_TYPES, Movement,
    Orientation, Position, TileType,
};
