//! Full-board win/draw detection.
//!
//! The scan is recomputed from scratch on every call; no state is cached
//! between moves.

use super::{Board, Mark};

/// Directions a run may extend in: horizontal, vertical and both diagonals.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Outcome {
    Ongoing,
    Winner(Mark),
    Draw,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Ongoing
    }
}

/// Classify a board. X is scanned before O.
pub fn evaluate<B: Board>(board: &B) -> Outcome {
    for mark in Mark::ALL {
        if find_run(board, mark).is_some() {
            return Outcome::Winner(mark);
        }
    }
    if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    }
}

/// Cells of the first run of `B::RUN` marks found, scanning row-major.
pub fn find_run<B: Board>(board: &B, mark: Mark) -> Option<Vec<(usize, usize)>> {
    let target = mark.to_cell();
    for row in 0..B::ROWS {
        for col in 0..B::COLS {
            if board.cell(row, col) != target {
                continue;
            }
            for (dr, dc) in DIRECTIONS {
                if let Some(run) = run_from(board, target, row, col, dr, dc) {
                    return Some(run);
                }
            }
        }
    }
    None
}

fn run_from<B: Board>(
    board: &B,
    target: super::Cell,
    row: usize,
    col: usize,
    dr: isize,
    dc: isize,
) -> Option<Vec<(usize, usize)>> {
    let mut run = Vec::with_capacity(B::RUN);
    for step in 0..B::RUN as isize {
        let r = row as isize + step * dr;
        let c = col as isize + step * dc;
        if board.cell_at(r, c)? != target {
            return None;
        }
        run.push((r as usize, c as usize));
    }
    Some(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, ConnectFour, TicTacToe};

    #[test]
    fn test_empty_boards_are_ongoing() {
        assert_eq!(evaluate(&TicTacToe::new()), Outcome::Ongoing);
        assert_eq!(evaluate(&ConnectFour::new()), Outcome::Ongoing);
    }

    #[test]
    fn test_tictactoe_rows_columns_diagonals() {
        let cases = [
            (["XXX", "OO.", "..."], Mark::X),
            (["O..", "OX.", "OXX"], Mark::O),
            (["X.O", ".XO", "..X"], Mark::X),
            (["X.O", ".OX", "O.X"], Mark::O),
        ];
        for (rows, mark) in cases {
            let board = TicTacToe::from_rows(rows);
            assert_eq!(evaluate(&board), Outcome::Winner(mark), "board {rows:?}");
        }
    }

    #[test]
    fn test_full_board_without_run_is_draw() {
        let board = TicTacToe::from_rows(["XOX", "XOO", "OXX"]);
        assert_eq!(evaluate(&board), Outcome::Draw);
    }

    #[test]
    fn test_win_on_last_cell_is_not_draw() {
        let board = TicTacToe::from_rows(["XOX", "OXO", "OXX"]);
        assert!(board.is_full());
        assert_eq!(evaluate(&board), Outcome::Winner(Mark::X));
    }

    #[test]
    fn test_evaluate_is_repeatable() {
        let board = TicTacToe::from_rows(["XO.", ".X.", "O.."]);
        let first = evaluate(&board);
        assert_eq!(first, evaluate(&board));
        assert_eq!(first, Outcome::Ongoing);
    }

    #[test]
    fn test_connect_four_horizontal() {
        let mut board = ConnectFour::new();
        for col in 0..4 {
            board.place(col, Mark::X);
        }
        assert_eq!(evaluate(&board), Outcome::Winner(Mark::X));
        assert_eq!(
            find_run(&board, Mark::X),
            Some(vec![(0, 0), (0, 1), (0, 2), (0, 3)])
        );
    }

    #[test]
    fn test_connect_four_vertical() {
        let mut board = ConnectFour::new();
        for _ in 0..4 {
            board.place(3, Mark::O);
        }
        assert_eq!(evaluate(&board), Outcome::Winner(Mark::O));
    }

    #[test]
    fn test_connect_four_diagonal_up() {
        let mut board = ConnectFour::new();
        // Create diagonal / pattern
        board.place(0, Mark::X);

        board.place(1, Mark::O);
        board.place(1, Mark::X);

        board.place(2, Mark::O);
        board.place(2, Mark::O);
        board.place(2, Mark::X);

        board.place(3, Mark::O);
        board.place(3, Mark::O);
        board.place(3, Mark::O);
        assert_eq!(evaluate(&board), Outcome::Ongoing);
        board.place(3, Mark::X);

        assert_eq!(evaluate(&board), Outcome::Winner(Mark::X));
    }

    #[test]
    fn test_connect_four_diagonal_down() {
        let mut board = ConnectFour::new();
        // Create diagonal \ pattern
        board.place(6, Mark::X);

        board.place(5, Mark::O);
        board.place(5, Mark::X);

        board.place(4, Mark::O);
        board.place(4, Mark::O);
        board.place(4, Mark::X);

        board.place(3, Mark::O);
        board.place(3, Mark::O);
        board.place(3, Mark::O);
        board.place(3, Mark::X);

        assert_eq!(evaluate(&board), Outcome::Winner(Mark::X));
        assert_eq!(
            find_run(&board, Mark::X),
            Some(vec![(3, 3), (2, 4), (1, 5), (0, 6)])
        );
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = ConnectFour::new();
        for col in 0..3 {
            board.place(col, Mark::X);
        }
        assert_eq!(evaluate(&board), Outcome::Ongoing);
        assert_eq!(find_run(&board, Mark::X), None);
    }

    #[test]
    fn test_connect_four_full_board_draw() {
        let mut board = ConnectFour::new();
        // Alternating columns, with the middle column inverted to break the
        // horizontal runs.
        for col in 0..7 {
            let mut mark = if col == 3 { Mark::O } else { Mark::X };
            for _ in 0..6 {
                board.place(col, mark);
                mark = mark.other();
            }
        }
        assert!(board.is_full());
        assert_eq!(evaluate(&board), Outcome::Draw);
    }

    #[test]
    fn test_every_reachable_tictactoe_state() {
        use std::collections::HashSet;

        fn visit(board: TicTacToe, to_move: Mark, seen: &mut HashSet<Vec<Vec<Cell>>>) {
            if !seen.insert(board.rows()) {
                return;
            }
            let outcome = evaluate(&board);
            assert_eq!(outcome, evaluate(&board), "evaluate must be repeatable");

            let x_run = find_run(&board, Mark::X).is_some();
            let o_run = find_run(&board, Mark::O).is_some();
            assert!(!(x_run && o_run), "both marks have a run: {:?}", board.rows());
            let expected = match (x_run, o_run) {
                (true, _) => Outcome::Winner(Mark::X),
                (_, true) => Outcome::Winner(Mark::O),
                _ if board.is_full() => Outcome::Draw,
                _ => Outcome::Ongoing,
            };
            assert_eq!(outcome, expected);

            if outcome.is_terminal() {
                return;
            }
            for mv in board.legal_moves() {
                let mut next = board;
                next.place(mv, to_move);
                visit(next, to_move.other(), seen);
            }
        }

        let mut seen = HashSet::new();
        visit(TicTacToe::new(), Mark::X, &mut seen);
        // Distinct positions of legal play, the empty board included
        assert_eq!(seen.len(), 5478);
    }
}
