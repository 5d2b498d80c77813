use super::types::{Cell, MIN_MATCH_LENGTH, Orientation, Position, TileType};
use crate::log_debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub positions: Vec<Position>,
    pub tile: TileType,
    pub orientation: Orientation,
}

impl Match {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// All horizontal runs first (row by row, left to right), then vertical runs
/// (column by column, top to bottom). Cells already claimed by a horizontal
/// match are left out of vertical ones, and a vertical match is kept only if
/// at least three unclaimed cells remain.
pub fn find_matches(cells: &[Vec<Cell>]) -> Vec<Match> {
    let rows = cells.len();
    let cols = cells.first().map_or(0, |row| row.len());
    let mut matches = Vec::new();
    if rows == 0 || cols == 0 {
        return matches;
    }

    let mut claimed = vec![vec![false; cols]; rows];

    for (row, row_cells) in cells.iter().enumerate() {
        for (start, end, tile) in runs(row_cells.iter().copied()) {
            let positions: Vec<Position> = (start..end).map(|col| Position::new(row, col)).collect();
            for pos in &positions {
                claimed[pos.row][pos.col] = true;
            }
            matches.push(Match {
                positions,
                tile,
                orientation: Orientation::Horizontal,
            });
        }
    }

    for col in 0..cols {
        for (start, end, tile) in runs(cells.iter().map(|row| row[col])) {
            let positions: Vec<Position> = (start..end)
                .filter(|&row| !claimed[row][col])
                .map(|row| Position::new(row, col))
                .collect();
            if positions.len() >= MIN_MATCH_LENGTH {
                matches.push(Match {
                    positions,
                    tile,
                    orientation: Orientation::Vertical,
                });
            }
        }
    }

    if !matches.is_empty() {
        let total: usize = matches.iter().map(Match::len).sum();
        log_debug!("Found {} matches covering {} tiles", matches.len(), total);
    }
    matches
}

pub fn has_matches(cells: &[Vec<Cell>]) -> bool {
    !find_matches(cells).is_empty()
}

/// True when there are at least three positions, all in bounds and holding the
/// same non-empty tile. Contiguity is not checked.
pub fn is_match(cells: &[Vec<Cell>], positions: &[Position]) -> bool {
    if positions.len() < MIN_MATCH_LENGTH {
        return false;
    }
    let tile_at = |pos: &Position| cells.get(pos.row).and_then(|row| row.get(pos.col)).copied().flatten();

    let Some(first) = tile_at(&positions[0]) else {
        return false;
    };
    positions.iter().all(|pos| tile_at(pos) == Some(first))
}

/// Evaluates the swap on a copy; `cells` is never modified. Adjacency is the
/// caller's concern.
pub fn would_create_match(cells: &[Vec<Cell>], pos1: Position, pos2: Position) -> bool {
    let in_bounds = |pos: Position| pos.row < cells.len() && pos.col < cells[pos.row].len();
    if !in_bounds(pos1) || !in_bounds(pos2) {
        return false;
    }

    let mut swapped = cells.to_vec();
    let first = swapped[pos1.row][pos1.col];
    swapped[pos1.row][pos1.col] = swapped[pos2.row][pos2.col];
    swapped[pos2.row][pos2.col] = first;
    has_matches(&swapped)
}

/// Maximal runs of one non-empty tile with length >= 3, as `(start, end, tile)`
/// with `end` exclusive.
fn runs(line: impl Iterator<Item = Cell>) -> Vec<(usize, usize, TileType)> {
    let mut result = Vec::new();
    let mut current: Option<(usize, TileType)> = None;
    let mut len = 0;

    for (index, cell) in line.enumerate() {
        len = index + 1;
        match (current, cell) {
            (Some((_, tile)), Some(next)) if tile == next => {}
            _ => {
                if let Some((start, tile)) = current
                    && index - start >= MIN_MATCH_LENGTH
                {
                    result.push((start, index, tile));
                }
                current = cell.map(|tile| (index, tile));
            }
        }
    }

    if let Some((start, tile)) = current
        && len - start >= MIN_MATCH_LENGTH
    {
        result.push((start, len, tile));
    }
    result
}
