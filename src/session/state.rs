use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use super::{Opponent, ParticipantId};
use crate::error::MatchError;
use crate::game::{evaluate, find_run, Board, Cell, Mark, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MatchStatus {
    InProgress,
    Won { winner: ParticipantId },
    Draw,
    Forfeited { winner: ParticipantId },
    /// No interaction within the idle window.
    Abandoned,
}

impl MatchStatus {
    pub fn is_terminal(self) -> bool {
        self != MatchStatus::InProgress
    }

    pub fn winner(self) -> Option<ParticipantId> {
        match self {
            MatchStatus::Won { winner } | MatchStatus::Forfeited { winner } => Some(winner),
            _ => None,
        }
    }
}

/// The automated opponent's answer to a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply<M> {
    pub mv: M,
    pub score: i32,
}

/// What an accepted move led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport<M> {
    pub placed: M,
    pub reply: Option<Reply<M>>,
    pub status: MatchStatus,
}

/// Read-only view handed to whatever renders the match.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Snapshot<M> {
    pub variant: &'static str,
    /// Rows of cells, row 0 first.
    pub cells: Vec<Vec<Cell>>,
    pub last_move: Option<M>,
    pub status: MatchStatus,
    pub current_turn: ParticipantId,
    pub first: ParticipantId,
    pub second: ParticipantId,
    pub automated: bool,
    /// Cells of the winning run, for highlighting.
    pub winning_run: Option<Vec<(usize, usize)>>,
}

impl<M: serde::Serialize> Snapshot<M> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// One game between two participants.
///
/// All mutation goes through [`Match::apply_move`], [`Match::forfeit`] and
/// the idle checks. Once the status is terminal it never changes again and
/// every further move or forfeit is rejected.
#[derive(Debug)]
pub struct Match<B: Board> {
    board: B,
    first: ParticipantId,
    opponent: Opponent,
    current_turn: ParticipantId,
    last_move: Option<B::Move>,
    status: MatchStatus,
    idle_timeout: Duration,
    last_activity: Instant,
    moves_played: usize,
}

impl<B: Board> Match<B> {
    /// Start a match on an empty board; `first` moves first.
    ///
    /// Both seats must hold different participants.
    pub fn new(
        first: ParticipantId,
        opponent: Opponent,
        idle_timeout: Duration,
        now: Instant,
    ) -> Result<Self, MatchError> {
        if first == opponent.id() {
            return Err(MatchError::SelfPlay(first));
        }
        info!(
            variant = B::NAME,
            %first,
            second = %opponent.id(),
            automated = opponent.is_automated(),
            "match started"
        );
        Ok(Match {
            board: B::default(),
            first,
            opponent,
            current_turn: first,
            last_move: None,
            status: MatchStatus::InProgress,
            idle_timeout,
            last_activity: now,
            moves_played: 0,
        })
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn current_turn(&self) -> ParticipantId {
        self.current_turn
    }

    pub fn first(&self) -> ParticipantId {
        self.first
    }

    pub fn second(&self) -> ParticipantId {
        self.opponent.id()
    }

    pub fn is_automated(&self) -> bool {
        self.opponent.is_automated()
    }

    pub fn last_move(&self) -> Option<B::Move> {
        self.last_move
    }

    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn is_participant(&self, id: ParticipantId) -> bool {
        id == self.first || id == self.second()
    }

    /// Mark placed by `id`: X for the first seat, O for the second.
    pub fn mark_of(&self, id: ParticipantId) -> Option<Mark> {
        if id == self.first {
            Some(Mark::X)
        } else if id == self.second() {
            Some(Mark::O)
        } else {
            None
        }
    }

    fn other(&self, id: ParticipantId) -> ParticipantId {
        if id == self.first {
            self.second()
        } else {
            self.first
        }
    }

    /// Place `actor`'s mark, then let the automated opponent answer if it is
    /// its turn. A rejected move leaves the match exactly as it was.
    #[instrument(skip(self, now), fields(variant = B::NAME))]
    pub fn apply_move(
        &mut self,
        actor: ParticipantId,
        mv: B::Move,
        now: Instant,
    ) -> Result<MoveReport<B::Move>, MatchError> {
        self.expire_if_idle(now);
        if self.status.is_terminal() {
            return Err(MatchError::MatchTerminal);
        }
        if !self.is_participant(actor) {
            return Err(MatchError::NotAParticipant(actor));
        }
        if actor != self.current_turn {
            return Err(MatchError::TurnViolation {
                actor,
                expected: self.current_turn,
            });
        }
        self.board.check(mv)?;

        self.last_activity = now;
        self.play(mv);

        let mut reply = None;
        if !self.status.is_terminal() {
            if let Opponent::Automated { id, searcher } = &mut self.opponent {
                if *id == self.current_turn {
                    let result = searcher.best_move(&self.board, Mark::O);
                    reply = Some(Reply {
                        mv: result.best_move,
                        score: result.score,
                    });
                }
            }
        }
        if let Some(reply) = reply {
            self.play(reply.mv);
        }

        Ok(MoveReport {
            placed: mv,
            reply,
            status: self.status,
        })
    }

    fn play(&mut self, mv: B::Move) {
        let mover = self.current_turn;
        let mark = if mover == self.first { Mark::X } else { Mark::O };
        let (row, col) = self.board.place(mv, mark);
        self.last_move = Some(mv);
        self.moves_played += 1;
        debug!(%mover, %mv, row, col, "mark placed");

        match evaluate(&self.board) {
            Outcome::Winner(winner) => {
                debug_assert_eq!(winner, mark, "only the mover can complete a run");
                self.status = MatchStatus::Won { winner: mover };
                info!(variant = B::NAME, winner = %mover, moves = self.moves_played, "match won");
            }
            Outcome::Draw => {
                self.status = MatchStatus::Draw;
                info!(variant = B::NAME, moves = self.moves_played, "match drawn");
            }
            Outcome::Ongoing => self.current_turn = self.other(mover),
        }
    }

    /// Concede the match; the other participant wins whoever's turn it is.
    #[instrument(skip(self, now), fields(variant = B::NAME))]
    pub fn forfeit(&mut self, actor: ParticipantId, now: Instant) -> Result<MatchStatus, MatchError> {
        self.expire_if_idle(now);
        if self.status.is_terminal() {
            return Err(MatchError::MatchTerminal);
        }
        if !self.is_participant(actor) {
            return Err(MatchError::NotAParticipant(actor));
        }
        self.last_activity = now;
        self.status = MatchStatus::Forfeited {
            winner: self.other(actor),
        };
        info!(variant = B::NAME, %actor, "match forfeited");
        Ok(self.status)
    }

    /// End an in-progress match with no winner. Returns whether it changed.
    pub fn abandon(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = MatchStatus::Abandoned;
        info!(variant = B::NAME, moves = self.moves_played, "match abandoned");
        true
    }

    pub fn is_idle(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_activity) >= self.idle_timeout
    }

    /// Abandon the match if nothing happened within the idle window.
    pub fn expire_if_idle(&mut self, now: Instant) -> bool {
        !self.status.is_terminal() && self.is_idle(now) && self.abandon()
    }

    pub fn snapshot(&self) -> Snapshot<B::Move> {
        let winning_run = match self.status {
            MatchStatus::Won { winner } => self
                .mark_of(winner)
                .and_then(|mark| find_run(&self.board, mark)),
            _ => None,
        };
        Snapshot {
            variant: B::NAME,
            cells: self.board.rows(),
            last_move: self.last_move,
            status: self.status,
            current_turn: self.current_turn,
            first: self.first,
            second: self.second(),
            automated: self.is_automated(),
            winning_run,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_board(board: B, first: ParticipantId, opponent: Opponent, now: Instant) -> Self {
        let mut game = Self::new(first, opponent, Duration::from_secs(300), now)
            .expect("fixture seats differ");
        let count = |mark: Mark| {
            board
                .rows()
                .iter()
                .flatten()
                .filter(|&&cell| cell == mark.to_cell())
                .count()
        };
        if count(Mark::X) > count(Mark::O) {
            game.current_turn = game.second();
        }
        game.board = board;
        game
    }
}
