use std::fmt;

use crate::ai::Searcher;

/// Identity of a user on the messaging surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// Who takes the second seat of a match.
#[derive(Debug)]
pub enum Opponent {
    Human(ParticipantId),
    /// The bot account, replying through its searcher.
    Automated {
        id: ParticipantId,
        searcher: Searcher,
    },
}

impl Opponent {
    pub fn id(&self) -> ParticipantId {
        match self {
            Opponent::Human(id) => *id,
            Opponent::Automated { id, .. } => *id,
        }
    }

    pub fn is_automated(&self) -> bool {
        matches!(self, Opponent::Automated { .. })
    }
}
