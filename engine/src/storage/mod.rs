pub mod file_io;

pub use file_io::{
    SaveError, clear_save, generate_save_filename, has_save, load_game, load_game_from_bytes,
    load_game_or_none, save_game, save_game_to_bytes,
};

pub const SAVE_FILE_EXTENSION: &str = "match3save";
pub const SAVE_VERSION: u8 = 1;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::game::{EngineConfig, GameController, GamePhase, Position};
    use crate::session_rng::SessionRng;

    #[test]
    fn test_controller_survives_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "match3_session_{}.{}",
            std::process::id(),
            SAVE_FILE_EXTENSION
        ));

        let config = EngineConfig::default();
        let mut played = GameController::new(&config, SessionRng::new(4242)).unwrap();
        played.start();
        for row in 0..8 {
            for col in 0..7 {
                played
                    .try_swap(Position::new(row, col), Position::new(row, col + 1))
                    .unwrap();
            }
        }
        played.pause();

        save_game(&path, &played.snapshot_data()).unwrap();
        assert!(has_save(&path));

        let loaded = load_game_or_none(&path).unwrap();
        let mut resumed = GameController::new(&config, SessionRng::new(1)).unwrap();
        assert!(resumed.restore_snapshot_data(&loaded));

        assert_eq!(resumed.grid_state(), played.grid_state());
        assert_eq!(resumed.status().score, played.status().score);
        assert_eq!(resumed.status().moves, played.status().moves);
        assert_eq!(resumed.status().phase, GamePhase::Paused);

        clear_save(&path).unwrap();
        assert!(!has_save(&path));
        assert!(load_game_or_none(&path).is_none());
    }
}
