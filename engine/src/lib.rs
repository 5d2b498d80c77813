pub mod config;
pub mod game;
pub mod logger;
pub mod session_rng;
pub mod storage;

pub use game::{
    EngineConfig, EngineError, GameAction, GameController, GamePhase, GameStateData, GameStatus,
    Position, SwapOutcome, SwapResult, TileType,
};
pub use session_rng::SessionRng;
