//! Minimax with alpha-beta pruning over either board variant.
//!
//! Every node works on a cloned scratch board, so the authoritative board
//! passed to [`Searcher::best_move`] is never touched.

use std::fmt;

use tracing::{debug, instrument};

use super::tie_break::TieBreak;
use crate::game::{evaluate, Board, Mark, Outcome};

const INF: i32 = i32::MAX;

/// How decided positions are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoring {
    /// Win constant times (empty cells left + 1): quicker wins and slower
    /// losses are preferred.
    DepthScaled,
    /// Win constant as is.
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Plies to look ahead including the root move, `None` for exhaustive.
    pub depth: Option<usize>,
    pub scoring: Scoring,
    pub win_score: i32,
}

impl SearchPolicy {
    /// The default policy a board variant declares for itself.
    pub fn for_board<B: Board>() -> Self {
        SearchPolicy {
            depth: B::SEARCH_DEPTH,
            scoring: if B::DEPTH_SCALED {
                Scoring::DepthScaled
            } else {
                Scoring::Flat
            },
            win_score: B::WIN_SCORE,
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Score of a won or lost position from the searching side's view.
    pub fn terminal_score(&self, searcher_won: bool, empty_cells: usize) -> i32 {
        let magnitude = match self.scoring {
            Scoring::DepthScaled => self.win_score * (empty_cells as i32 + 1),
            Scoring::Flat => self.win_score,
        };
        if searcher_won {
            magnitude
        } else {
            -magnitude
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<M> {
    pub best_move: M,
    /// Positive favours the searching mark, negative its opponent.
    pub score: i32,
    /// How many moves shared the best score.
    pub candidates: usize,
    pub nodes: u64,
}

/// Alpha-beta searcher with a pluggable tie-break.
pub struct Searcher {
    policy: SearchPolicy,
    tie_break: Box<dyn TieBreak>,
    nodes: u64,
}

impl Searcher {
    pub fn new(policy: SearchPolicy, tie_break: Box<dyn TieBreak>) -> Self {
        Searcher {
            policy,
            tie_break,
            nodes: 0,
        }
    }

    /// Searcher using the variant's own policy.
    pub fn for_board<B: Board>(tie_break: Box<dyn TieBreak>) -> Self {
        Self::new(SearchPolicy::for_board::<B>(), tie_break)
    }

    pub fn policy(&self) -> SearchPolicy {
        self.policy
    }

    /// Best move for `mark` on `board`, which must still be in play.
    ///
    /// Panics if the board has no legal move or is already decided; search
    /// on a finished game is a sequencing bug in the caller.
    #[instrument(skip_all, fields(variant = B::NAME, mark = mark.name()))]
    pub fn best_move<B: Board>(&mut self, board: &B, mark: Mark) -> SearchResult<B::Move> {
        let moves = board.search_order();
        assert!(!moves.is_empty(), "No legal moves available");
        assert!(
            !evaluate(board).is_terminal(),
            "Search invoked on a finished board"
        );

        self.nodes = 0;
        let child_depth = self.policy.depth.map(|d| d.saturating_sub(1));
        let mut best_score = -INF;
        let mut best_moves = Vec::new();

        for mv in moves {
            let mut scratch = board.clone();
            scratch.place(mv, mark);
            // Search just below the best so far: a move that ties comes back
            // with its exact score, a worse one with a bound below the best.
            let alpha = if best_moves.is_empty() {
                -INF
            } else {
                best_score - 1
            };
            let score = self.minimax(&scratch, child_depth, alpha, INF, false, mark);
            if score > best_score {
                best_score = score;
                best_moves.clear();
                best_moves.push(mv);
            } else if score == best_score {
                best_moves.push(mv);
            }
        }

        let pick = self.tie_break.choose(best_moves.len());
        let best_move = best_moves[pick];
        debug!(
            %best_move,
            score = best_score,
            candidates = best_moves.len(),
            nodes = self.nodes,
            "search finished"
        );

        SearchResult {
            best_move,
            score: best_score,
            candidates: best_moves.len(),
            nodes: self.nodes,
        }
    }

    fn minimax<B: Board>(
        &mut self,
        board: &B,
        depth: Option<usize>,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        mark: Mark,
    ) -> i32 {
        self.nodes += 1;

        match evaluate(board) {
            Outcome::Winner(winner) => {
                return self
                    .policy
                    .terminal_score(winner == mark, board.empty_cells())
            }
            Outcome::Draw => return 0,
            Outcome::Ongoing => {}
        }
        // Horizon reached: unresolved positions are treated as neutral.
        if depth == Some(0) {
            return 0;
        }

        let next_depth = depth.map(|d| d - 1);
        if maximizing {
            let mut best = -INF;
            for mv in board.search_order() {
                let mut scratch = board.clone();
                scratch.place(mv, mark);
                let score = self.minimax(&scratch, next_depth, alpha, beta, false, mark);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = INF;
            for mv in board.search_order() {
                let mut scratch = board.clone();
                scratch.place(mv, mark.other());
                let score = self.minimax(&scratch, next_depth, alpha, beta, true, mark);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

impl fmt::Debug for Searcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searcher")
            .field("policy", &self.policy)
            .field("tie_break", &self.tie_break.name())
            .finish()
    }
}
