use super::{Board, Cell, Grid, Mark};
use crate::error::IllegalMove;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Column ordering: center-first for better alpha-beta pruning.
const MOVE_ORDER: [usize; COLS] = [3, 2, 4, 1, 5, 0, 6];

/// Gravity-drop board. Row 0 is the bottom row; a move names a column and the
/// mark lands in the lowest empty row of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectFour {
    grid: Grid<ROWS, COLS>,
}

impl ConnectFour {
    /// Create a new empty board
    pub fn new() -> Self {
        ConnectFour { grid: Grid::new() }
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        !self.grid.get(ROWS - 1, col).is_empty()
    }

    /// Row a mark dropped into `col` would land on
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).find(|&row| self.grid.get(row, col).is_empty())
    }
}

impl Board for ConnectFour {
    type Move = usize;

    const NAME: &'static str = "Connect Four";
    const ROWS: usize = ROWS;
    const COLS: usize = COLS;
    const RUN: usize = 4;
    const SEARCH_DEPTH: Option<usize> = Some(4);
    const DEPTH_SCALED: bool = false;
    const WIN_SCORE: i32 = 1_000_000;

    fn cell(&self, row: usize, col: usize) -> Cell {
        self.grid.get(row, col)
    }

    fn check(&self, col: usize) -> Result<(), IllegalMove> {
        if col >= COLS {
            return Err(IllegalMove::OutOfBounds);
        }
        if self.is_column_full(col) {
            return Err(IllegalMove::ColumnFull(col));
        }
        Ok(())
    }

    fn place(&mut self, col: usize, mark: Mark) -> (usize, usize) {
        let row = self
            .landing_row(col)
            .unwrap_or_else(|| panic!("drop into unavailable column {col}"));
        self.grid.set(row, col, mark.to_cell());
        (row, col)
    }

    fn legal_moves(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    fn search_order(&self) -> Vec<usize> {
        MOVE_ORDER
            .into_iter()
            .filter(|&col| !self.is_column_full(col))
            .collect()
    }

    fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    fn empty_cells(&self) -> usize {
        self.grid.empty_count()
    }
}
