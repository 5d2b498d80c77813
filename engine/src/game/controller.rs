use super::actions::{ActionObserver, GameAction, SwapOutcome, SwapResult};
use super::error::EngineError;
use super::game_state::{GameState, GameStateData, GameStatus};
use super::grid::Grid;
use super::match_detector::{find_matches, has_matches};
use super::score_calculator::ScoreCalculator;
use super::settings::{ControllerSettings, EngineConfig};
use super::types::{FilledTile, GridCells, Position, TileType};
use crate::config::Validate;
use crate::session_rng::SessionRng;
use crate::{log, log_debug, log_error, log_warn};

/// Actions produced by one iteration of the cascade loop. `matched` is false
/// when the grid had nothing to clear, in which case `actions` is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CascadeStep {
    pub actions: Vec<GameAction>,
    pub matched: bool,
}

pub struct GameController {
    grid: Grid,
    state: GameState,
    score_calculator: ScoreCalculator,
    settings: ControllerSettings,
    observers: Vec<Box<dyn ActionObserver>>,
    busy: bool,
    /// Set when a cascade aborts; swaps keep failing until `reset` or a restore.
    failure: Option<EngineError>,
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("grid", &self.grid)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .field("busy", &self.busy)
            .field("failure", &self.failure)
            .finish()
    }
}

impl GameController {
    pub fn new(config: &EngineConfig, rng: SessionRng) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::InvalidConfig)?;
        let grid = Grid::new(&config.grid, rng)?;
        log!("Game controller created");
        Ok(Self::with_grid(grid, config))
    }

    pub(crate) fn with_grid(grid: Grid, config: &EngineConfig) -> Self {
        Self {
            grid,
            state: GameState::new(),
            score_calculator: ScoreCalculator::new(config.scoring),
            settings: config.controller,
            observers: Vec::new(),
            busy: false,
            failure: None,
        }
    }

    pub fn start(&mut self) {
        self.state.start();
    }

    pub fn pause(&mut self) {
        self.state.pause();
    }

    pub fn resume(&mut self) {
        self.state.resume();
    }

    pub fn game_over(&mut self) {
        self.state.game_over();
    }

    /// New board, counters cleared, phase back to idle.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.state.reset();
        self.busy = false;
        self.failure = None;
    }

    pub fn grid_state(&self) -> GridCells {
        self.grid.snapshot()
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    /// `(rows, cols)`
    pub fn grid_size(&self) -> (usize, usize) {
        (self.grid.rows(), self.grid.cols())
    }

    pub fn tile_types(&self) -> &[TileType] {
        self.grid.tile_types()
    }

    pub fn render_grid(&self) -> String {
        self.grid.render_text()
    }

    pub fn add_observer(&mut self, observer: Box<dyn ActionObserver>) {
        self.observers.push(observer);
    }

    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn failure(&self) -> Option<&EngineError> {
        self.failure.as_ref()
    }

    /// Marks the last resolved swap as played back, accepting swaps again.
    pub fn finish_playback(&mut self) {
        self.busy = false;
    }

    pub fn try_swap(&mut self, from: Position, to: Position) -> Result<SwapResult, EngineError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if self.busy {
            log_warn!("Swap {} <-> {} rejected, previous resolution still playing", from, to);
            return Ok(SwapResult::rejected(SwapOutcome::Busy));
        }

        if !self.grid.swap(from, to) {
            return Ok(SwapResult::rejected(SwapOutcome::Invalid));
        }

        let mut actions = vec![GameAction::Swap { from, to }];

        if !has_matches(self.grid.cells()) {
            self.grid.swap(from, to);
            actions.push(GameAction::RevertSwap { from, to });
            log_debug!("No match for {} <-> {}, reverted", from, to);
            self.notify_observers(&actions);
            return Ok(SwapResult {
                outcome: SwapOutcome::NoMatch,
                actions,
            });
        }

        self.state.increment_moves();
        actions.push(GameAction::UpdateMoves {
            moves: self.state.moves(),
        });
        self.state.reset_combo();

        let cascade_steps = match self.run_cascade(&mut actions) {
            Ok(steps) => steps,
            Err(err) => {
                // Observers still get what was applied before the abort.
                self.failure = Some(err.clone());
                self.notify_observers(&actions);
                return Err(err);
            }
        };

        if self.settings.single_flight {
            self.busy = true;
        }
        self.notify_observers(&actions);

        Ok(SwapResult {
            outcome: SwapOutcome::Matched { cascade_steps },
            actions,
        })
    }

    fn run_cascade(&mut self, actions: &mut Vec<GameAction>) -> Result<u32, EngineError> {
        let mut step = 0;

        loop {
            let cascade_step = self.resolve_cascade_step(step);
            if !cascade_step.matched {
                break;
            }
            actions.extend(cascade_step.actions);
            step += 1;

            if step >= self.settings.max_cascade_iterations && has_matches(self.grid.cells()) {
                log_error!("Cascade did not settle after {} iterations", step);
                return Err(EngineError::CascadeLimitExceeded { iterations: step });
            }
        }

        if step > 0 {
            self.state.reset_combo();
        }
        log_debug!("Cascade settled after {} steps, score {}", step, self.state.score());
        Ok(step)
    }

    /// Clears every current match once: score, combo, removal, gravity, refill.
    /// `step` is the zero-based index within the current cascade; any step
    /// after the first counts as a combo.
    pub fn resolve_cascade_step(&mut self, step: u32) -> CascadeStep {
        let matches = find_matches(self.grid.cells());
        if matches.is_empty() {
            return CascadeStep {
                actions: Vec::new(),
                matched: false,
            };
        }

        let mut actions = Vec::new();
        let is_combo = step > 0;

        let points = self
            .score_calculator
            .calculate_total_score(&matches, is_combo, step);
        self.state.add_score(points);
        actions.push(GameAction::UpdateScore {
            score: self.state.score(),
        });

        if is_combo {
            self.state.increment_combo();
            actions.push(GameAction::Combo {
                count: self.state.combo_count(),
            });
        }

        let positions: Vec<Position> = matches
            .into_iter()
            .flat_map(|m| m.positions)
            .collect();
        self.grid.remove_all(&positions);
        actions.push(GameAction::RemoveBlocks { positions });

        // Landing rows come from the gravity write cursor; re-scanning the
        // settled column misplaces tiles when several fall together.
        let movements = self.grid.apply_gravity();
        if !movements.is_empty() {
            actions.push(GameAction::ApplyGravity { movements });
        }

        let new_blocks: Vec<FilledTile> = self
            .grid
            .fill_empty()
            .into_iter()
            .filter_map(|position| {
                self.grid
                    .get_cell(position)
                    .flatten()
                    .map(|tile| FilledTile { position, tile })
            })
            .collect();
        if !new_blocks.is_empty() {
            actions.push(GameAction::FillEmpty { new_blocks });
        }

        CascadeStep {
            actions,
            matched: true,
        }
    }

    fn notify_observers(&mut self, actions: &[GameAction]) {
        for observer in self.observers.iter_mut() {
            for action in actions {
                observer.on_action(action);
            }
        }
    }

    /// Copies the live grid into the game state and returns the snapshot.
    pub fn snapshot_data(&mut self) -> GameStateData {
        self.state.set_grid_state(&self.grid.snapshot());
        self.state.to_snapshot_data()
    }

    /// Returns false and changes nothing when the snapshot is malformed, its
    /// grid does not fit this board, or the grid is not a settled board.
    pub fn restore_snapshot_data(&mut self, data: &GameStateData) -> bool {
        if !data.is_well_formed() {
            log_warn!("Snapshot grid is malformed, ignoring");
            return false;
        }
        if let Err(reason) = self.check_settled(&data.grid) {
            log_warn!("Snapshot grid rejected: {}", reason);
            return false;
        }
        if !self.grid.restore(&data.grid) {
            return false;
        }
        self.state.restore_from_snapshot_data(data);
        self.busy = false;
        self.failure = None;
        true
    }

    fn check_settled(&self, cells: &GridCells) -> Result<(), String> {
        for (row, row_cells) in cells.iter().enumerate() {
            for (col, cell) in row_cells.iter().enumerate() {
                match cell {
                    None => return Err(format!("empty cell at {}", Position::new(row, col))),
                    Some(tile) if !self.grid.tile_types().contains(tile) => {
                        return Err(format!(
                            "tile {} at {} is not in play",
                            tile,
                            Position::new(row, col)
                        ));
                    }
                    Some(_) => {}
                }
            }
        }
        if has_matches(cells) {
            return Err("grid already holds a match".to_string());
        }
        Ok(())
    }
}
