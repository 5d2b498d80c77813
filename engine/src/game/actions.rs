use serde::{Deserialize, Serialize};

use super::types::{FilledTile, Movement, Position};

/// One renderer-facing step of a swap's resolution, in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameAction {
    Swap { from: Position, to: Position },
    RevertSwap { from: Position, to: Position },
    RemoveBlocks { positions: Vec<Position> },
    ApplyGravity { movements: Vec<Movement> },
    FillEmpty { new_blocks: Vec<FilledTile> },
    /// Cumulative score after the step.
    UpdateScore { score: u32 },
    UpdateMoves { moves: u32 },
    Combo { count: u32 },
}

impl GameAction {
    pub fn kind(&self) -> &'static str {
        match self {
            GameAction::Swap { .. } => "swap",
            GameAction::RevertSwap { .. } => "revertSwap",
            GameAction::RemoveBlocks { .. } => "removeBlocks",
            GameAction::ApplyGravity { .. } => "applyGravity",
            GameAction::FillEmpty { .. } => "fillEmpty",
            GameAction::UpdateScore { .. } => "updateScore",
            GameAction::UpdateMoves { .. } => "updateMoves",
            GameAction::Combo { .. } => "combo",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Out of bounds or not adjacent; nothing changed.
    Invalid,
    /// A previous resolution has not been acknowledged with `finish_playback`.
    Busy,
    /// Swapped and reverted; score and moves unchanged.
    NoMatch,
    Matched { cascade_steps: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapResult {
    pub outcome: SwapOutcome,
    pub actions: Vec<GameAction>,
}

impl SwapResult {
    pub fn rejected(outcome: SwapOutcome) -> Self {
        Self {
            outcome,
            actions: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SwapOutcome::Matched { .. })
    }

    pub fn revert_needed(&self) -> bool {
        self.outcome == SwapOutcome::NoMatch
    }
}

/// Receives every action of a resolved swap, in order, after resolution ends.
pub trait ActionObserver {
    fn on_action(&mut self, action: &GameAction);
}
