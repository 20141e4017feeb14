//! # Mini Games
//!
//! Turn-based tic-tac-toe and Connect Four with a minimax opponent, built
//! to sit behind a chat or terminal front end.
//!
//! ## Modules
//!
//! - [`game`]: Grids, the two board variants, and win/draw detection
//! - [`ai`]: Alpha-beta minimax and tie-break strategies
//! - [`session`]: Match state machine and the per-session registry
//! - [`ui`]: Terminal front end
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod ui;
