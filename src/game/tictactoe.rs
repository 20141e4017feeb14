use std::fmt;

use super::{Board, Cell, Grid, Mark};
use crate::error::IllegalMove;

pub const SIZE: usize = 3;

/// A cell on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Pos { row, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Free-cell 3x3 board: any empty cell may be marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TicTacToe {
    grid: Grid<SIZE, SIZE>,
}

impl TicTacToe {
    pub fn new() -> Self {
        TicTacToe { grid: Grid::new() }
    }

    /// Build a board from rows of `X`, `O` and `.` characters, top row first
    /// in reading order (row 0 is the first string).
    ///
    /// Panics on malformed input; meant for tests and fixtures.
    pub fn from_rows(rows: [&str; SIZE]) -> Self {
        let mut board = TicTacToe::new();
        for (row, line) in rows.iter().enumerate() {
            assert_eq!(line.len(), SIZE, "row {row} must have {SIZE} cells");
            for (col, ch) in line.chars().enumerate() {
                let cell = match ch {
                    'X' => Cell::X,
                    'O' => Cell::O,
                    '.' => Cell::Empty,
                    other => panic!("unexpected cell character {other:?}"),
                };
                board.grid.set(row, col, cell);
            }
        }
        board
    }
}

impl Board for TicTacToe {
    type Move = Pos;

    const NAME: &'static str = "Tic-Tac-Toe";
    const ROWS: usize = SIZE;
    const COLS: usize = SIZE;
    const RUN: usize = 3;
    const SEARCH_DEPTH: Option<usize> = None;
    const DEPTH_SCALED: bool = true;
    const WIN_SCORE: i32 = 10;

    fn cell(&self, row: usize, col: usize) -> Cell {
        self.grid.get(row, col)
    }

    fn check(&self, pos: Pos) -> Result<(), IllegalMove> {
        if pos.row >= SIZE || pos.col >= SIZE {
            return Err(IllegalMove::OutOfBounds);
        }
        if !self.grid.get(pos.row, pos.col).is_empty() {
            return Err(IllegalMove::Occupied {
                row: pos.row,
                col: pos.col,
            });
        }
        Ok(())
    }

    fn place(&mut self, pos: Pos, mark: Mark) -> (usize, usize) {
        assert!(
            self.grid.get(pos.row, pos.col).is_empty(),
            "cell {pos} is already taken"
        );
        self.grid.set(pos.row, pos.col, mark.to_cell());
        (pos.row, pos.col)
    }

    fn legal_moves(&self) -> Vec<Pos> {
        (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| Pos::new(row, col)))
            .filter(|pos| self.grid.get(pos.row, pos.col).is_empty())
            .collect()
    }

    fn is_full(&self) -> bool {
        self.grid.empty_count() == 0
    }

    fn empty_cells(&self) -> usize {
        self.grid.empty_count()
    }
}
