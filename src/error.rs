use std::path::PathBuf;

use crate::session::{ParticipantId, SessionId};

/// Why a target cell or column cannot take a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("cell ({row}, {col}) is already taken")]
    Occupied { row: usize, col: usize },

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("target is outside the board")]
    OutOfBounds,
}

/// Rejections from a match. None of them change the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("it is {expected}'s turn, not {actor}'s")]
    TurnViolation {
        actor: ParticipantId,
        expected: ParticipantId,
    },

    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),

    #[error("the match is already over")]
    MatchTerminal,

    #[error("{0} is not playing in this match")]
    NotAParticipant(ParticipantId),

    #[error("{0} cannot take both seats of a match")]
    SelfPlay(ParticipantId),
}

/// Errors from the session registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("no match in session {0}")]
    UnknownSession(SessionId),

    #[error("session {0} already has a match in progress")]
    SessionExists(SessionId),

    #[error("{0} is the automated opponent and cannot start a match")]
    BotChallenger(ParticipantId),

    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
