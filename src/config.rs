use std::path::Path;
use std::time::Duration;

use tracing::warn;

use crate::ai::{FirstTieBreak, RandomTieBreak, SearchPolicy, Searcher, TieBreak};
use crate::error::ConfigError;
use crate::game::Board;
use crate::session::ParticipantId;

/// Deepest Connect Four lookahead accepted from config.
pub const MAX_CONNECT_FOUR_DEPTH: usize = 8;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub session: SessionConfig,
}

/// How equally scored moves are settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreakKind {
    Random,
    First,
}

/// Automated opponent settings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies of lookahead for Connect Four, root move included. Tic-tac-toe
    /// is always searched to the end.
    pub connect_four_depth: usize,
    pub tie_break: TieBreakKind,
    /// Fixes the random tie-break sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            connect_four_depth: 4,
            tie_break: TieBreakKind::Random,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn tie_break(&self) -> Box<dyn TieBreak> {
        match (self.tie_break, self.seed) {
            (TieBreakKind::First, _) => Box::new(FirstTieBreak),
            (TieBreakKind::Random, Some(seed)) => Box::new(RandomTieBreak::seeded(seed)),
            (TieBreakKind::Random, None) => Box::new(RandomTieBreak::new()),
        }
    }

    /// Searcher for `B`; depth-limited variants take the configured depth.
    pub fn searcher_for<B: Board>(&self) -> Searcher {
        let mut policy = SearchPolicy::for_board::<B>();
        if policy.depth.is_some() {
            policy = policy.with_depth(self.connect_four_depth);
        }
        Searcher::new(policy, self.tie_break())
    }
}

/// Match lifecycle settings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds without a move or forfeit before a match is abandoned.
    pub idle_timeout_secs: u64,
    /// Participant id of the automated opponent.
    pub bot_id: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            idle_timeout_secs: 300,
            bot_id: 0,
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn bot(&self) -> ParticipantId {
        ParticipantId(self.bot_id)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.connect_four_depth == 0 {
            return Err(ConfigError::Validation(
                "search.connect_four_depth must be >= 1".into(),
            ));
        }
        if self.search.connect_four_depth > MAX_CONNECT_FOUR_DEPTH {
            return Err(ConfigError::Validation(format!(
                "search.connect_four_depth must be <= {MAX_CONNECT_FOUR_DEPTH}"
            )));
        }
        if self.session.idle_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "session.idle_timeout_secs must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
