//! Terminal UI: plays either variant against the automated opponent or
//! hot-seat, standing in for a chat gateway.

mod app;
mod game_view;

pub use app::App;

use crate::game::{Board, ConnectFour, Pos, TicTacToe};

/// A board the terminal can drive with a cursor.
pub trait Playable: Board {
    /// Marks fall to the bottom; the cursor only moves between columns and
    /// row 0 is drawn at the bottom.
    const GRAVITY: bool;

    fn target(row: usize, col: usize) -> Self::Move;

    /// Row and column a move landed on; a drop only names its column.
    fn locate(mv: Self::Move) -> (Option<usize>, usize);
}

impl Playable for TicTacToe {
    const GRAVITY: bool = false;

    fn target(row: usize, col: usize) -> Pos {
        Pos::new(row, col)
    }

    fn locate(pos: Pos) -> (Option<usize>, usize) {
        (Some(pos.row), pos.col)
    }
}

impl Playable for ConnectFour {
    const GRAVITY: bool = true;

    fn target(_row: usize, col: usize) -> usize {
        col
    }

    fn locate(col: usize) -> (Option<usize>, usize) {
        (None, col)
    }
}
