use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::{debug, info, instrument};

use super::{Match, MoveReport, Opponent, ParticipantId, Snapshot};
use crate::config::{AppConfig, SearchConfig, SessionConfig};
use crate::error::RegistryError;
use crate::game::Board;

/// Conversation or channel a match is bound to.
pub type SessionId = u64;

type Entry<B> = Arc<Mutex<Match<B>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Live matches of one variant, keyed by session.
///
/// Each match sits behind its own mutex, so operations on one session are
/// serialized while different sessions proceed independently. No path waits
/// for the map lock while holding a match lock.
pub struct MatchRegistry<B: Board> {
    matches: Mutex<HashMap<SessionId, Entry<B>>>,
    search: SearchConfig,
    session: SessionConfig,
}

impl<B: Board> MatchRegistry<B> {
    pub fn new(config: &AppConfig) -> Self {
        MatchRegistry {
            matches: Mutex::new(HashMap::new()),
            search: config.search.clone(),
            session: config.session.clone(),
        }
    }

    pub fn bot(&self) -> ParticipantId {
        self.session.bot()
    }

    pub fn len(&self) -> usize {
        lock(&self.matches).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.matches).is_empty()
    }

    pub fn contains(&self, session: SessionId) -> bool {
        lock(&self.matches).contains_key(&session)
    }

    /// Start a match in `session` with `challenger` moving first.
    ///
    /// No opponent, the challenger themself, or the bot's id all mean a game
    /// against the automated opponent. A finished or idle match left in the
    /// session is replaced.
    #[instrument(skip(self, now), fields(variant = B::NAME))]
    pub fn start(
        &self,
        session: SessionId,
        challenger: ParticipantId,
        opponent: Option<ParticipantId>,
        now: Instant,
    ) -> Result<Snapshot<B::Move>, RegistryError> {
        let bot = self.bot();
        if challenger == bot {
            return Err(RegistryError::BotChallenger(challenger));
        }
        let opponent = match opponent {
            Some(id) if id != challenger && id != bot => Opponent::Human(id),
            _ => Opponent::Automated {
                id: bot,
                searcher: self.search.searcher_for::<B>(),
            },
        };

        let mut matches = lock(&self.matches);
        if let Some(existing) = matches.get(&session) {
            let mut game = lock(existing);
            game.expire_if_idle(now);
            if !game.status().is_terminal() {
                return Err(RegistryError::SessionExists(session));
            }
            debug!(session, "replacing finished match");
        }

        let game = Match::new(challenger, opponent, self.session.idle_timeout(), now)?;
        let snapshot = game.snapshot();
        matches.insert(session, Arc::new(Mutex::new(game)));
        Ok(snapshot)
    }

    fn entry(&self, session: SessionId) -> Result<Entry<B>, RegistryError> {
        lock(&self.matches)
            .get(&session)
            .cloned()
            .ok_or(RegistryError::UnknownSession(session))
    }

    fn retire(&self, session: SessionId, entry: &Entry<B>) {
        let mut matches = lock(&self.matches);
        if matches.get(&session).is_some_and(|e| Arc::ptr_eq(e, entry)) {
            matches.remove(&session);
            debug!(session, "match removed");
        }
    }

    /// Apply a move and return the report along with the resulting view.
    pub fn apply_move(
        &self,
        session: SessionId,
        actor: ParticipantId,
        mv: B::Move,
        now: Instant,
    ) -> Result<(MoveReport<B::Move>, Snapshot<B::Move>), RegistryError> {
        let entry = self.entry(session)?;
        let mut game = lock(&entry);
        let result = game.apply_move(actor, mv, now);
        let snapshot = game.snapshot();
        let terminal = game.status().is_terminal();
        drop(game);

        if terminal {
            self.retire(session, &entry);
        }
        Ok((result?, snapshot))
    }

    pub fn forfeit(
        &self,
        session: SessionId,
        actor: ParticipantId,
        now: Instant,
    ) -> Result<Snapshot<B::Move>, RegistryError> {
        let entry = self.entry(session)?;
        let mut game = lock(&entry);
        let result = game.forfeit(actor, now);
        let snapshot = game.snapshot();
        let terminal = game.status().is_terminal();
        drop(game);

        if terminal {
            self.retire(session, &entry);
        }
        result?;
        Ok(snapshot)
    }

    pub fn snapshot(&self, session: SessionId) -> Result<Snapshot<B::Move>, RegistryError> {
        let entry = self.entry(session)?;
        let game = lock(&entry);
        Ok(game.snapshot())
    }

    /// Abandon and drop every match idle at `now`; returns their sessions.
    pub fn sweep_idle(&self, now: Instant) -> Vec<SessionId> {
        let entries: Vec<(SessionId, Entry<B>)> = lock(&self.matches)
            .iter()
            .map(|(&session, entry)| (session, Arc::clone(entry)))
            .collect();

        let mut expired = Vec::new();
        for (session, entry) in entries {
            if lock(&entry).expire_if_idle(now) {
                self.retire(session, &entry);
                expired.push(session);
            }
        }
        if !expired.is_empty() {
            info!(variant = B::NAME, count = expired.len(), "idle matches abandoned");
        }
        expired.sort_unstable();
        expired
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::config::TieBreakKind;
    use crate::error::MatchError;
    use crate::game::{ConnectFour, Pos, TicTacToe};
    use crate::session::MatchStatus;

    const P: ParticipantId = ParticipantId(1);
    const Q: ParticipantId = ParticipantId(2);
    const BOT: ParticipantId = ParticipantId(0);

    fn registry<B: Board>() -> MatchRegistry<B> {
        let mut config = AppConfig::default();
        config.search.tie_break = TieBreakKind::First;
        MatchRegistry::new(&config)
    }

    #[test]
    fn test_opponent_resolution() {
        let now = Instant::now();
        let reg: MatchRegistry<TicTacToe> = registry();

        let human = reg.start(1, P, Some(Q), now).unwrap();
        assert_eq!(human.second, Q);
        assert!(!human.automated);

        for (session, opponent) in [(2, None), (3, Some(P)), (4, Some(BOT))] {
            let snapshot = reg.start(session, P, opponent, now).unwrap();
            assert_eq!(snapshot.second, BOT);
            assert!(snapshot.automated);
            assert_eq!(snapshot.current_turn, P);
        }
        assert_eq!(reg.len(), 4);
    }

    #[test]
    fn test_bot_cannot_challenge() {
        let reg: MatchRegistry<TicTacToe> = registry();
        assert_eq!(
            reg.start(1, BOT, Some(P), Instant::now()),
            Err(RegistryError::BotChallenger(BOT))
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn test_live_session_cannot_be_restarted() {
        let now = Instant::now();
        let reg: MatchRegistry<ConnectFour> = registry();
        reg.start(7, P, Some(Q), now).unwrap();
        assert_eq!(
            reg.start(7, Q, None, now),
            Err(RegistryError::SessionExists(7))
        );

        // Once idle, the session is free again
        let later = now + Duration::from_secs(300);
        let snapshot = reg.start(7, Q, None, later).unwrap();
        assert_eq!(snapshot.first, Q);
    }

    #[test]
    fn test_unknown_session() {
        let now = Instant::now();
        let reg: MatchRegistry<ConnectFour> = registry();
        assert_eq!(reg.snapshot(3), Err(RegistryError::UnknownSession(3)));
        assert_eq!(
            reg.apply_move(3, P, 0, now),
            Err(RegistryError::UnknownSession(3))
        );
        assert_eq!(reg.forfeit(3, P, now), Err(RegistryError::UnknownSession(3)));
    }

    #[test]
    fn test_move_against_bot() {
        let now = Instant::now();
        let reg: MatchRegistry<ConnectFour> = registry();
        reg.start(1, P, None, now).unwrap();

        let (report, snapshot) = reg.apply_move(1, P, 0, now).unwrap();
        let reply = report.reply.expect("bot answers");
        assert_eq!(snapshot.last_move, Some(reply.mv));
        assert_eq!(snapshot.current_turn, P);
        assert_eq!(reg.snapshot(1).unwrap(), snapshot);
    }

    #[test]
    fn test_rejection_keeps_match() {
        let now = Instant::now();
        let reg: MatchRegistry<TicTacToe> = registry();
        reg.start(1, P, Some(Q), now).unwrap();
        assert_eq!(
            reg.apply_move(1, Q, Pos::new(0, 0), now),
            Err(RegistryError::Match(MatchError::TurnViolation {
                actor: Q,
                expected: P
            }))
        );
        assert!(reg.contains(1));
    }

    #[test]
    fn test_finished_match_is_removed() {
        let now = Instant::now();
        let reg: MatchRegistry<TicTacToe> = registry();
        reg.start(1, P, Some(Q), now).unwrap();
        let moves = [
            (P, Pos::new(0, 0)),
            (Q, Pos::new(1, 0)),
            (P, Pos::new(0, 1)),
            (Q, Pos::new(1, 1)),
        ];
        for (actor, pos) in moves {
            reg.apply_move(1, actor, pos, now).unwrap();
        }
        let (report, snapshot) = reg.apply_move(1, P, Pos::new(0, 2), now).unwrap();
        assert_eq!(report.status, MatchStatus::Won { winner: P });
        assert_eq!(snapshot.winning_run, Some(vec![(0, 0), (0, 1), (0, 2)]));
        assert!(!reg.contains(1));
    }

    #[test]
    fn test_forfeit_removes_match() {
        let now = Instant::now();
        let reg: MatchRegistry<ConnectFour> = registry();
        reg.start(1, P, Some(Q), now).unwrap();
        let snapshot = reg.forfeit(1, Q, now).unwrap();
        assert_eq!(snapshot.status, MatchStatus::Forfeited { winner: P });
        assert!(reg.is_empty());
    }

    #[test]
    fn test_stale_move_reports_terminal() {
        let now = Instant::now();
        let reg: MatchRegistry<TicTacToe> = registry();
        reg.start(1, P, None, now).unwrap();
        let stale = now + Duration::from_secs(301);
        assert_eq!(
            reg.apply_move(1, P, Pos::new(1, 1), stale),
            Err(RegistryError::Match(MatchError::MatchTerminal))
        );
        assert!(!reg.contains(1));
    }

    #[test]
    fn test_sweep_idle() {
        let start = Instant::now();
        let reg: MatchRegistry<ConnectFour> = registry();
        reg.start(1, P, Some(Q), start).unwrap();
        reg.start(2, P, None, start).unwrap();
        reg.start(3, Q, None, start).unwrap();

        let later = start + Duration::from_secs(250);
        reg.apply_move(2, P, 3, later).unwrap();

        assert!(reg.sweep_idle(start + Duration::from_secs(299)).is_empty());
        assert_eq!(reg.sweep_idle(start + Duration::from_secs(300)), vec![1, 3]);
        assert_eq!(reg.len(), 1);
        assert!(reg.contains(2));
    }

    #[test]
    fn test_sessions_run_in_parallel() {
        let now = Instant::now();
        let reg: MatchRegistry<TicTacToe> = registry();
        for session in 0..8 {
            reg.start(session, ParticipantId(session + 10), None, now).unwrap();
        }

        thread::scope(|s| {
            for session in 0..8 {
                let reg = &reg;
                s.spawn(move || {
                    let player = ParticipantId(session + 10);
                    while let Ok(snapshot) = reg.snapshot(session) {
                        let free = (0..9)
                            .map(|i| Pos::new(i / 3, i % 3))
                            .find(|p| snapshot.cells[p.row][p.col].is_empty())
                            .expect("live match has a free cell");
                        let (report, _) = reg.apply_move(session, player, free, now).unwrap();
                        assert_ne!(report.status, MatchStatus::Won { winner: player });
                    }
                });
            }
        });
        assert!(reg.is_empty());
    }

    #[test]
    fn test_contended_session_stays_consistent() {
        let now = Instant::now();
        let reg: MatchRegistry<ConnectFour> = registry();
        reg.start(1, P, Some(Q), now).unwrap();

        let results: Vec<(usize, usize)> = thread::scope(|s| {
            let handles: Vec<_> = [P, Q]
                .into_iter()
                .map(|player| {
                    let reg = &reg;
                    s.spawn(move || {
                        let mut accepted = 0;
                        let mut finished = 0;
                        let mut col = player.0 as usize;
                        loop {
                            match reg.apply_move(1, player, col % 7, now) {
                                Ok((report, _)) => {
                                    accepted += 1;
                                    if report.status.is_terminal() {
                                        finished += 1;
                                    }
                                }
                                Err(RegistryError::UnknownSession(_)) => break,
                                Err(RegistryError::Match(MatchError::IllegalMove(_))) => col += 1,
                                Err(_) => thread::yield_now(),
                            }
                        }
                        (accepted, finished)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        let (p_moves, q_moves) = (results[0].0, results[1].0);

        // Strict alternation: P made the same number of moves as Q, or one more
        assert!(p_moves == q_moves || p_moves == q_moves + 1);
        assert!(p_moves + q_moves <= 42);
        assert_eq!(results[0].1 + results[1].1, 1);
    }
}
