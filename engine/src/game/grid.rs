use super::error::EngineError;
use super::settings::GridSettings;
use super::types::{Cell, GridCells, Movement, Position, TileType};
use crate::config::Validate;
use crate::session_rng::SessionRng;
use crate::{log, log_debug, log_warn};

/// Rectangular tile array. Outside a resolution step every cell is filled and
/// no three same-typed cells line up horizontally or vertically.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: GridCells,
    rows: usize,
    cols: usize,
    tile_types: Vec<TileType>,
    rng: SessionRng,
}

impl Grid {
    pub fn new(settings: &GridSettings, rng: SessionRng) -> Result<Self, EngineError> {
        settings.validate().map_err(EngineError::InvalidConfig)?;

        let mut grid = Self {
            cells: vec![vec![None; settings.cols]; settings.rows],
            rows: settings.rows,
            cols: settings.cols,
            tile_types: settings.tile_types.clone(),
            rng,
        };
        grid.seed();

        log!(
            "Grid initialized: {}x{}, {} tile types, seed {}",
            grid.rows,
            grid.cols,
            grid.tile_types.len(),
            grid.rng.seed()
        );
        Ok(grid)
    }

    #[cfg(test)]
    pub fn from_cells(cells: GridCells, seed: u64) -> Self {
        let rows = cells.len();
        let cols = cells.first().map_or(0, |row| row.len());
        assert!(cells.iter().all(|row| row.len() == cols));
        Self {
            cells,
            rows,
            cols,
            tile_types: TileType::ALL.to_vec(),
            rng: SessionRng::new(seed),
        }
    }

    /// Fills every cell row by row so that the left and upper neighbours are
    /// already final when a cell is drawn.
    pub fn seed(&mut self) {
        for row in self.cells.iter_mut() {
            row.fill(None);
        }
        for row in 0..self.rows {
            for col in 0..self.cols {
                let tile = self.random_tile_avoiding_matches(row, col);
                self.cells[row][col] = Some(tile);
            }
        }
    }

    pub fn reset(&mut self) {
        self.seed();
        log!("Grid reset");
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tile_types(&self) -> &[TileType] {
        &self.tile_types
    }

    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// `None` when out of bounds, `Some(None)` for an empty cell.
    pub fn get_cell(&self, pos: Position) -> Option<Cell> {
        if !self.is_valid_position(pos) {
            return None;
        }
        Some(self.cells[pos.row][pos.col])
    }

    pub fn swap(&mut self, pos1: Position, pos2: Position) -> bool {
        if !self.is_valid_position(pos1) || !self.is_valid_position(pos2) {
            log_warn!("Invalid positions for swap: {} <-> {}", pos1, pos2);
            return false;
        }
        if !pos1.is_adjacent(pos2) {
            log_warn!("Tiles are not adjacent: {} <-> {}", pos1, pos2);
            return false;
        }

        let first = self.cells[pos1.row][pos1.col];
        self.cells[pos1.row][pos1.col] = self.cells[pos2.row][pos2.col];
        self.cells[pos2.row][pos2.col] = first;

        log_debug!("Swapped tiles: {} <-> {}", pos1, pos2);
        true
    }

    pub fn remove_all(&mut self, positions: &[Position]) {
        if positions.is_empty() {
            return;
        }
        for &pos in positions {
            if self.is_valid_position(pos) {
                self.cells[pos.row][pos.col] = None;
            }
        }
        log_debug!("Removed {} tiles", positions.len());
    }

    /// Compacts each column towards the bottom, keeping the order of tiles.
    /// Returns one movement per tile that changed row.
    pub fn apply_gravity(&mut self) -> Vec<Movement> {
        let mut movements = Vec::new();

        for col in 0..self.cols {
            let mut write_row = self.rows;
            for read_row in (0..self.rows).rev() {
                let Some(tile) = self.cells[read_row][col] else {
                    continue;
                };
                write_row -= 1;
                if write_row != read_row {
                    self.cells[write_row][col] = Some(tile);
                    self.cells[read_row][col] = None;
                    movements.push(Movement {
                        from: Position::new(read_row, col),
                        to: Position::new(write_row, col),
                    });
                }
            }
        }

        if !movements.is_empty() {
            log_debug!("Gravity applied: {} tiles moved", movements.len());
        }
        movements
    }

    /// Fills empty cells column by column, top to bottom.
    pub fn fill_empty(&mut self) -> Vec<Position> {
        let mut filled = Vec::new();

        for col in 0..self.cols {
            for row in 0..self.rows {
                if self.cells[row][col].is_none() {
                    let tile = self.random_tile_avoiding_matches(row, col);
                    self.cells[row][col] = Some(tile);
                    filled.push(Position::new(row, col));
                }
            }
        }

        if !filled.is_empty() {
            log_debug!("Filled {} empty cells", filled.len());
        }
        filled
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|row| row.iter().all(Option::is_some))
    }

    pub(crate) fn cells(&self) -> &GridCells {
        &self.cells
    }

    pub fn snapshot(&self) -> GridCells {
        self.cells.clone()
    }

    pub fn restore(&mut self, cells: &GridCells) -> bool {
        let shape_matches =
            cells.len() == self.rows && cells.iter().all(|row| row.len() == self.cols);
        if !shape_matches {
            log_warn!(
                "Grid size mismatch, cannot restore state (expected {}x{})",
                self.rows,
                self.cols
            );
            return false;
        }

        self.cells = cells.clone();
        log!("Grid state restored");
        true
    }

    pub fn render_text(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or('·', |tile| tile.symbol()).to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn tile_at(&self, row: isize, col: isize) -> Option<TileType> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row][col]
    }

    /// Types that would complete a run of three through `(row, col)` given the
    /// tiles currently present around it. During row-major seeding only the
    /// left and upper pairs can be present.
    fn forbidden_types(&self, row: usize, col: usize) -> Vec<TileType> {
        let (r, c) = (row as isize, col as isize);
        let pairs = [
            ((r, c - 2), (r, c - 1)),
            ((r, c - 1), (r, c + 1)),
            ((r, c + 1), (r, c + 2)),
            ((r - 2, c), (r - 1, c)),
            ((r - 1, c), (r + 1, c)),
            ((r + 1, c), (r + 2, c)),
        ];

        let mut forbidden = Vec::new();
        for ((r1, c1), (r2, c2)) in pairs {
            if let (Some(a), Some(b)) = (self.tile_at(r1, c1), self.tile_at(r2, c2))
                && a == b
                && !forbidden.contains(&a)
            {
                forbidden.push(a);
            }
        }
        forbidden
    }

    fn random_tile_avoiding_matches(&mut self, row: usize, col: usize) -> TileType {
        let forbidden = self.forbidden_types(row, col);
        let allowed: Vec<TileType> = self
            .tile_types
            .iter()
            .copied()
            .filter(|tile| !forbidden.contains(tile))
            .collect();

        let candidates = if allowed.is_empty() {
            &self.tile_types
        } else {
            &allowed
        };
        let index = self.rng.random_index(candidates.len());
        candidates[index]
    }
}
