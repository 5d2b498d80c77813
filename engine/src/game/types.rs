use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ROWS: usize = 8;
pub const DEFAULT_COLS: usize = 8;
pub const MIN_TILE_TYPES: usize = 4;
pub const MIN_MATCH_LENGTH: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileType {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
}

impl TileType {
    pub const ALL: [TileType; 7] = [
        TileType::Red,
        TileType::Blue,
        TileType::Green,
        TileType::Yellow,
        TileType::Purple,
        TileType::Orange,
        TileType::Pink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TileType::Red => "red",
            TileType::Blue => "blue",
            TileType::Green => "green",
            TileType::Yellow => "yellow",
            TileType::Purple => "purple",
            TileType::Orange => "orange",
            TileType::Pink => "pink",
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            TileType::Red => 'R',
            TileType::Blue => 'B',
            TileType::Green => 'G',
            TileType::Yellow => 'Y',
            TileType::Purple => 'P',
            TileType::Orange => 'O',
            TileType::Pink => 'K',
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `None` is an empty cell; only valid between removal and refill.
pub type Cell = Option<TileType>;

/// Row-major cell array, `cells[row][col]`.
pub type GridCells = Vec<Vec<Cell>>;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Four-directional adjacency; diagonals are not adjacent.
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Movement {
    pub from: Position,
    pub to: Position,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FilledTile {
    pub position: Position,
    pub tile: TileType,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[default]
    Idle,
    Playing,
    Paused,
    GameOver,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::Idle => "idle",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameover",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_is_manhattan_one() {
        let center = Position::new(3, 3);
        assert!(center.is_adjacent(Position::new(2, 3)));
        assert!(center.is_adjacent(Position::new(4, 3)));
        assert!(center.is_adjacent(Position::new(3, 2)));
        assert!(center.is_adjacent(Position::new(3, 4)));
        assert!(!center.is_adjacent(Position::new(4, 4)));
        assert!(!center.is_adjacent(Position::new(3, 5)));
        assert!(!center.is_adjacent(center));
    }

    #[test]
    fn test_tile_type_serde_names() {
        let yaml = serde_yaml_ng::to_string(&TileType::Purple).unwrap();
        assert_eq!(yaml.trim(), "purple");
        let parsed: TileType = serde_yaml_ng::from_str("pink").unwrap();
        assert_eq!(parsed, TileType::Pink);
    }

    #[test]
    fn test_game_phase_serde_names() {
        let yaml = serde_yaml_ng::to_string(&GamePhase::GameOver).unwrap();
        assert_eq!(yaml.trim(), "gameover");
    }
}
