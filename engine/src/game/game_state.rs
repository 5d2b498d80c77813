use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::types::{GamePhase, GridCells};
use crate::{log, log_debug};

/// Serialized session: phase, counters, grid contents and capture time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateData {
    pub phase: GamePhase,
    pub score: u32,
    pub moves: u32,
    pub grid: GridCells,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl GameStateData {
    /// Non-empty and rectangular.
    pub fn is_well_formed(&self) -> bool {
        let Some(first) = self.grid.first() else {
            return false;
        };
        !first.is_empty() && self.grid.iter().all(|row| row.len() == first.len())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameStatus {
    pub phase: GamePhase,
    pub score: u32,
    pub moves: u32,
    pub combo_count: u32,
}

#[derive(Debug, Default)]
pub struct GameState {
    phase: GamePhase,
    score: u32,
    moves: u32,
    combo_count: u32,
    grid: GridCells,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn combo_count(&self) -> u32 {
        self.combo_count
    }

    pub fn status(&self) -> GameStatus {
        GameStatus {
            phase: self.phase,
            score: self.score,
            moves: self.moves,
            combo_count: self.combo_count,
        }
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        let old = self.phase;
        self.phase = phase;
        log!("Game phase changed: {} -> {}", old, phase);
    }

    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.moves = 0;
        self.combo_count = 0;
        log!("Game started");
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.set_phase(GamePhase::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.set_phase(GamePhase::Playing);
        }
    }

    pub fn game_over(&mut self) {
        self.set_phase(GamePhase::GameOver);
        log!("Game over, final score {}, moves {}", self.score, self.moves);
    }

    pub fn add_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points);
        log_debug!("Score updated: +{} -> {}", points, self.score);
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    pub fn increment_moves(&mut self) {
        self.moves += 1;
        log_debug!("Moves: {}", self.moves);
    }

    pub fn reset_moves(&mut self) {
        self.moves = 0;
    }

    pub fn increment_combo(&mut self) {
        self.combo_count += 1;
        log_debug!("Combo: {}x", self.combo_count);
    }

    pub fn reset_combo(&mut self) {
        if self.combo_count > 0 {
            log_debug!("Combo ended at {}x", self.combo_count);
        }
        self.combo_count = 0;
    }

    pub fn set_grid_state(&mut self, grid: &GridCells) {
        self.grid = grid.clone();
    }

    pub fn grid_state(&self) -> GridCells {
        self.grid.clone()
    }

    pub fn to_snapshot_data(&self) -> GameStateData {
        GameStateData {
            phase: self.phase,
            score: self.score,
            moves: self.moves,
            grid: self.grid.clone(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Combo count is not part of a snapshot and is cleared.
    pub fn restore_from_snapshot_data(&mut self, data: &GameStateData) {
        self.phase = data.phase;
        self.score = data.score;
        self.moves = data.moves;
        self.combo_count = 0;
        self.grid = data.grid.clone();
        log!(
            "Game state restored: phase {}, score {}, moves {}",
            data.phase,
            data.score,
            data.moves
        );
    }

    pub fn reset(&mut self) {
        *self = Self::default();
        log!("Game state reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::TileType;

    #[test]
    fn test_phase_transitions() {
        let mut state = GameState::new();
        assert_eq!(state.phase(), GamePhase::Idle);

        state.pause();
        assert_eq!(state.phase(), GamePhase::Idle);
        state.resume();
        assert_eq!(state.phase(), GamePhase::Idle);

        state.start();
        assert_eq!(state.phase(), GamePhase::Playing);
        state.resume();
        assert_eq!(state.phase(), GamePhase::Playing);
        state.pause();
        assert_eq!(state.phase(), GamePhase::Paused);
        state.resume();
        assert_eq!(state.phase(), GamePhase::Playing);

        state.game_over();
        assert_eq!(state.phase(), GamePhase::GameOver);
        state.resume();
        assert_eq!(state.phase(), GamePhase::GameOver);

        state.reset();
        assert_eq!(state.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_start_clears_counters() {
        let mut state = GameState::new();
        state.add_score(50);
        state.increment_moves();
        state.increment_combo();
        state.start();
        assert_eq!(state.status(), GameStatus { phase: GamePhase::Playing, score: 0, moves: 0, combo_count: 0 });
    }

    #[test]
    fn test_add_score_ignores_zero() {
        let mut state = GameState::new();
        state.add_score(0);
        assert_eq!(state.score(), 0);
        state.add_score(30);
        state.add_score(15);
        assert_eq!(state.score(), 45);
        state.reset_score();
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_game_over_from_any_phase() {
        let mut state = GameState::new();
        state.game_over();
        assert_eq!(state.phase(), GamePhase::GameOver);

        let mut paused = GameState::new();
        paused.start();
        paused.pause();
        paused.game_over();
        assert_eq!(paused.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut state = GameState::new();
        state.start();
        state.add_score(120);
        state.increment_moves();
        state.increment_moves();
        state.set_grid_state(&vec![vec![Some(TileType::Red), None], vec![Some(TileType::Blue), Some(TileType::Pink)]]);
        state.pause();

        let data = state.to_snapshot_data();
        assert!(data.timestamp > 0);

        let mut restored = GameState::new();
        restored.restore_from_snapshot_data(&data);
        assert_eq!(restored.phase(), GamePhase::Paused);
        assert_eq!(restored.score(), 120);
        assert_eq!(restored.moves(), 2);
        assert_eq!(restored.grid_state(), state.grid_state());
    }

    #[test]
    fn test_well_formed_snapshot() {
        let mut data = GameState::new().to_snapshot_data();
        assert!(!data.is_well_formed());

        data.grid = vec![vec![Some(TileType::Red); 3]; 2];
        assert!(data.is_well_formed());

        data.grid[1].pop();
        assert!(!data.is_well_formed());

        data.grid = vec![vec![]];
        assert!(!data.is_well_formed());
    }
}
