//! Board representation for both games: cell storage, the two placement
//! rules, and win/draw detection.

mod board;
pub mod connect_four;
mod grid;
mod mark;
mod outcome;
pub mod tictactoe;

pub use board::Board;
pub use connect_four::ConnectFour;
pub use grid::{Cell, Grid};
pub use mark::Mark;
pub use outcome::{evaluate, find_run, Outcome};
pub use tictactoe::{Pos, TicTacToe};
