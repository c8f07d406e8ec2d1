//! Settlement ledger for Bi-a Helper
//!
//! Wager accounting for informal Vietnamese billiards games ("kèo"):
//! the player registry, per-game configuration, round validation and
//! the pure settlement folds, plus a JSON snapshot of a whole session.
//! This crate is compiled to:
//! - Native (for tests and server-side use)
//! - WASM (for the frontend session flow)

pub mod catalog;
mod config;
mod countdown;
mod player;
mod round;
mod session;
mod settle;
mod validate;

#[cfg(feature = "wasm")]
mod wasm;

pub use config::{ConfigError, GameConfig, Progression, RULE_99_TARGET};
pub use countdown::{run_countdown, CountdownReport};
pub use player::{Player, PlayerId, Roster, RosterError, MAX_PLAYERS, MIN_PLAYERS};
pub use round::{Round, RoundInput, RoundKind};
pub use session::{Session, SessionError};
pub use settle::{
    settle, settle_streak, settle_tally, settle_timed, settle_units, LedgerReport, RoundNet,
    SessionReport, StreakReport, StreakRound, TallyReport, TimedReport,
};
pub use validate::{validate_round, verify_round, RoundError};
