//! Match lifecycle: who plays, whose turn it is, and how a game ends.

mod participant;
mod registry;
mod state;

pub use participant::{Opponent, ParticipantId};
pub use registry::{MatchRegistry, SessionId};
pub use state::{Match, MatchStatus, MoveReport, Reply, Snapshot};
