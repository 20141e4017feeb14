use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing::debug;

use super::Playable;
use crate::config::AppConfig;
use crate::error::{MatchError, RegistryError};
use crate::session::{MatchRegistry, MatchStatus, ParticipantId, SessionId, Snapshot};

/// The terminal is a single conversation.
const SESSION: SessionId = 1;

pub struct App<B: Playable> {
    registry: MatchRegistry<B>,
    hotseat: bool,
    player: ParticipantId,
    guest: ParticipantId,
    snapshot: Snapshot<B::Move>,
    cursor: (usize, usize),
    should_quit: bool,
    message: Option<String>,
}

impl<B: Playable> App<B> {
    pub fn new(config: &AppConfig, hotseat: bool) -> Result<Self, RegistryError> {
        let registry = MatchRegistry::new(config);
        let bot = registry.bot();
        let player = ParticipantId(bot.0.wrapping_add(1));
        let guest = ParticipantId(bot.0.wrapping_add(2));
        let opponent = hotseat.then_some(guest);
        let snapshot = registry.start(SESSION, player, opponent, Instant::now())?;
        Ok(App {
            registry,
            hotseat,
            player,
            guest,
            snapshot,
            cursor: (B::ROWS / 2, B::COLS / 2),
            should_quit: false,
            message: None,
        })
    }

    /// Main application loop
    pub fn run<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
            self.check_idle(Instant::now());
        }
        Ok(())
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;
        let (row, col) = self.cursor;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => self.cursor.1 = col.saturating_sub(1),
            KeyCode::Right => self.cursor.1 = (col + 1).min(B::COLS - 1),
            KeyCode::Up if !B::GRAVITY => self.cursor.0 = row.saturating_sub(1),
            KeyCode::Down if !B::GRAVITY => self.cursor.0 = (row + 1).min(B::ROWS - 1),
            KeyCode::Enter | KeyCode::Char(' ') => self.place(),
            KeyCode::Char('f') => self.forfeit(),
            KeyCode::Char('r') => self.restart(),
            _ => {}
        }
    }

    /// Whoever is at the keyboard: the player on move in hot-seat mode.
    fn actor(&self) -> ParticipantId {
        if self.hotseat {
            self.snapshot.current_turn
        } else {
            self.player
        }
    }

    fn place(&mut self) {
        if self.snapshot.status.is_terminal() {
            self.message = Some("Game over! Press 'r' to restart.".to_string());
            return;
        }

        let target = B::target(self.cursor.0, self.cursor.1);
        match self
            .registry
            .apply_move(SESSION, self.actor(), target, Instant::now())
        {
            Ok((report, snapshot)) => {
                self.snapshot = snapshot;
                self.message = match (report.status, report.reply) {
                    (MatchStatus::InProgress, Some(reply)) => {
                        Some(format!("Bot played {} (score {})", reply.mv, reply.score))
                    }
                    (MatchStatus::InProgress, None) => None,
                    (status, _) => Some(self.describe(status)),
                };
            }
            Err(RegistryError::Match(MatchError::MatchTerminal)) => self.refresh_finished(),
            Err(err) => self.message = Some(capitalize(&err.to_string())),
        }
    }

    fn forfeit(&mut self) {
        if self.snapshot.status.is_terminal() {
            return;
        }
        match self.registry.forfeit(SESSION, self.actor(), Instant::now()) {
            Ok(snapshot) => {
                self.message = Some(self.describe(snapshot.status));
                self.snapshot = snapshot;
            }
            Err(err) => self.message = Some(capitalize(&err.to_string())),
        }
    }

    fn restart(&mut self) {
        if !self.snapshot.status.is_terminal() {
            self.forfeit();
        }
        let opponent = self.hotseat.then_some(self.guest);
        match self.registry.start(SESSION, self.player, opponent, Instant::now()) {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.cursor = (B::ROWS / 2, B::COLS / 2);
                self.message = Some("New game started!".to_string());
            }
            Err(err) => self.message = Some(capitalize(&err.to_string())),
        }
    }

    fn check_idle(&mut self, now: Instant) {
        if self.registry.sweep_idle(now).contains(&SESSION) {
            self.refresh_finished();
        }
    }

    /// The registry dropped the match after it went idle.
    fn refresh_finished(&mut self) {
        if !self.snapshot.status.is_terminal() {
            debug!("match expired while idle");
            self.snapshot.status = MatchStatus::Abandoned;
        }
        self.message = Some(self.describe(self.snapshot.status));
    }

    fn name_of(&self, id: ParticipantId) -> String {
        if id == self.snapshot.second && self.snapshot.automated {
            "Bot".to_string()
        } else if id == self.snapshot.first {
            "Player 1".to_string()
        } else {
            "Player 2".to_string()
        }
    }

    fn describe(&self, status: MatchStatus) -> String {
        match status {
            MatchStatus::InProgress => format!("{} to move", self.name_of(self.snapshot.current_turn)),
            MatchStatus::Won { winner } => format!("{} wins!", self.name_of(winner)),
            MatchStatus::Draw => "It's a draw!".to_string(),
            MatchStatus::Forfeited { winner } => {
                format!("Forfeited, {} wins. Press 'r' to restart.", self.name_of(winner))
            }
            MatchStatus::Abandoned => "Match abandoned after inactivity. Press 'r' to restart.".to_string(),
        }
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        let mode = if self.hotseat { "Hot-seat" } else { "vs Bot" };
        let turn = self.name_of(self.snapshot.current_turn);
        super::game_view::render::<B>(
            frame,
            &self.snapshot,
            self.cursor,
            &self.message,
            &format!("{turn}  |  {mode}"),
        );
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
