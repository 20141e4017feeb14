use std::fmt;

use super::{Cell, Mark};
use crate::error::IllegalMove;

/// A board variant: its dimensions, its placement rule and how the automated
/// opponent should search it.
pub trait Board: Clone + Default + fmt::Debug + Send + 'static {
    /// What a participant submits: a cell or a column.
    type Move: Copy + Eq + fmt::Debug + fmt::Display + serde::Serialize + Send;

    const NAME: &'static str;
    const ROWS: usize;
    const COLS: usize;
    /// Length of a winning run.
    const RUN: usize;
    /// Search horizon in plies, `None` for exhaustive search.
    const SEARCH_DEPTH: Option<usize>;
    /// Whether terminal scores are scaled by how early the game ended.
    const DEPTH_SCALED: bool;
    const WIN_SCORE: i32;

    fn cell(&self, row: usize, col: usize) -> Cell;

    /// Explain why `mv` cannot be played, if it cannot.
    fn check(&self, mv: Self::Move) -> Result<(), IllegalMove>;

    fn is_legal(&self, mv: Self::Move) -> bool {
        self.check(mv).is_ok()
    }

    /// Place `mark` and return the (row, col) it landed on.
    ///
    /// Panics if the move is illegal; callers must check first.
    fn place(&mut self, mv: Self::Move, mark: Mark) -> (usize, usize);

    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Legal moves in the order the search should try them.
    fn search_order(&self) -> Vec<Self::Move> {
        self.legal_moves()
    }

    fn is_full(&self) -> bool {
        self.legal_moves().is_empty()
    }

    fn empty_cells(&self) -> usize {
        (0..Self::ROWS)
            .flat_map(|row| (0..Self::COLS).map(move |col| (row, col)))
            .filter(|&(row, col)| self.cell(row, col).is_empty())
            .count()
    }

    /// Signed-coordinate lookup, `None` off the board.
    fn cell_at(&self, row: isize, col: isize) -> Option<Cell> {
        if row < 0 || col < 0 || row as usize >= Self::ROWS || col as usize >= Self::COLS {
            return None;
        }
        Some(self.cell(row as usize, col as usize))
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        (0..Self::ROWS)
            .map(|row| (0..Self::COLS).map(|col| self.cell(row, col)).collect())
            .collect()
    }
}
