//! The automated opponent: alpha-beta search and tie-breaking among equally
//! good moves.

mod search;
mod tie_break;

pub use search::{Scoring, SearchPolicy, SearchResult, Searcher};
pub use tie_break::{FirstTieBreak, RandomTieBreak, TieBreak};
