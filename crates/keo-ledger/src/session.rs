//! Session controller
//!
//! Owns the registry, the game configuration and the committed round
//! history, and is the only place any of them change. Settlement stays
//! pure: `report` recomputes from the full history every time, so
//! removing a round is exactly "settle as if it was never recorded".
//!
//! Registry edits are allowed only while the history is empty. Once a
//! round is recorded the indices inside it refer to fixed seats, so the
//! registry freezes until the history is cleared.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GameConfig};
use crate::player::{Player, PlayerId, Roster, RosterError, MAX_PLAYERS};
use crate::round::{Round, RoundInput, RoundKind};
use crate::settle::{settle, SessionReport};
use crate::validate::{validate_round, verify_round, RoundError};

/// Errors surfaced by session editing and persistence.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    Roster(RosterError),
    Config(ConfigError),
    Round(RoundError),
    /// Round index out of range for the recorded history.
    RoundIndex { index: usize, rounds: usize },
    /// Registry edit attempted while rounds are recorded.
    HistoryNotEmpty { rounds: usize },
    /// Config replacement would switch round kind under a live history.
    ModeChange { from: RoundKind, to: RoundKind },
    /// Persisted snapshot failed to parse.
    Snapshot { detail: String },
}

impl From<RosterError> for SessionError {
    fn from(err: RosterError) -> Self {
        SessionError::Roster(err)
    }
}

impl From<ConfigError> for SessionError {
    fn from(err: ConfigError) -> Self {
        SessionError::Config(err)
    }
}

impl From<RoundError> for SessionError {
    fn from(err: RoundError) -> Self {
        SessionError::Round(err)
    }
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionError::Roster(err) => write!(f, "{}", err),
            SessionError::Config(err) => write!(f, "{}", err),
            SessionError::Round(err) => write!(f, "{}", err),
            SessionError::RoundIndex { index, rounds } =>
                write!(f, "round index {} out of range for {} recorded rounds", index, rounds),
            SessionError::HistoryNotEmpty { rounds } =>
                write!(f, "registry is frozen while {} rounds are recorded", rounds),
            SessionError::ModeChange { from, to } =>
                write!(f, "cannot switch rounds from {} to {} with a live history", from, to),
            SessionError::Snapshot { detail } =>
                write!(f, "snapshot rejected: {}", detail),
        }
    }
}

/// One running game: who plays, under which rule, and what happened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    roster: Roster,
    config: GameConfig,
    rounds: Vec<Round>,
}

impl Session {
    /// Start a session with the default player limit.
    pub fn new<S: AsRef<str>>(names: &[S], config: GameConfig) -> Result<Self, SessionError> {
        Self::with_limit(names, MAX_PLAYERS, config)
    }

    /// Start a session with a per-game player limit.
    pub fn with_limit<S: AsRef<str>>(
        names: &[S],
        limit: usize,
        config: GameConfig,
    ) -> Result<Self, SessionError> {
        let roster = Roster::with_limit(names, limit)?;
        config.validate(roster.len())?;
        Ok(Session { roster, config, rounds: Vec::new() })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn player_count(&self) -> usize {
        self.roster.len()
    }

    // ── Round history ────────────────────────────────────────────────

    /// Validate a raw input and append it as a committed round.
    ///
    /// Returns the new round's 0-based index.
    pub fn record_round(&mut self, input: &RoundInput) -> Result<usize, SessionError> {
        let round = validate_round(&self.config, self.roster.len(), input)?;
        self.rounds.push(round);
        Ok(self.rounds.len() - 1)
    }

    /// Delete one recorded round. Every later report is recomputed from
    /// the remaining history, so downstream balances adjust on their own.
    pub fn remove_round(&mut self, index: usize) -> Result<Round, SessionError> {
        if index >= self.rounds.len() {
            return Err(SessionError::RoundIndex { index, rounds: self.rounds.len() });
        }
        Ok(self.rounds.remove(index))
    }

    /// Clear the history, keeping players and configuration for a rematch.
    pub fn clear_rounds(&mut self) {
        self.rounds.clear();
    }

    // ── Setup edits ──────────────────────────────────────────────────

    /// Swap in a new configuration.
    ///
    /// With a live history the new config must still accept every
    /// recorded round, value checks included; changing the stakes
    /// mid-game is fine, changing the game is not.
    pub fn replace_config(&mut self, config: GameConfig) -> Result<(), SessionError> {
        config.validate(self.roster.len())?;
        for round in &self.rounds {
            if !config.accepts(round.kind()) {
                return Err(SessionError::ModeChange {
                    from: self.config.round_kind(),
                    to: config.round_kind(),
                });
            }
        }
        for round in &self.rounds {
            verify_round(&config, self.roster.len(), round)?;
        }
        self.config = config;
        Ok(())
    }

    /// Register one more player. Only while the history is empty.
    ///
    /// Under countdown rules the new player joins with handicap 0 and
    /// the full baseline to pot.
    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, SessionError> {
        self.require_empty_history()?;
        let mut roster = self.roster.clone();
        let id = roster.add(name)?;
        let mut config = self.config.clone();
        if let GameConfig::Countdown { handicaps, .. } = &mut config {
            handicaps.push(0);
        }
        config.validate(roster.len())?;
        self.roster = roster;
        self.config = config;
        Ok(id)
    }

    /// Rename a player. Only while the history is empty.
    pub fn rename_player(&mut self, index: usize, name: &str) -> Result<(), SessionError> {
        self.require_empty_history()?;
        self.roster.rename(index, name)?;
        Ok(())
    }

    /// Drop a player (and their countdown handicap entry). Only while
    /// the history is empty.
    pub fn remove_player(&mut self, index: usize) -> Result<Player, SessionError> {
        self.require_empty_history()?;
        let mut roster = self.roster.clone();
        let removed = roster.remove(index)?;
        let mut config = self.config.clone();
        if let GameConfig::Countdown { handicaps, .. } = &mut config {
            if index < handicaps.len() {
                handicaps.remove(index);
            }
        }
        config.validate(roster.len())?;
        self.roster = roster;
        self.config = config;
        Ok(removed)
    }

    fn require_empty_history(&self) -> Result<(), SessionError> {
        if self.rounds.is_empty() {
            Ok(())
        } else {
            Err(SessionError::HistoryNotEmpty { rounds: self.rounds.len() })
        }
    }

    // ── Settlement and persistence ───────────────────────────────────

    /// Recompute the settlement report from the full history.
    pub fn report(&self) -> SessionReport {
        settle(&self.config, &self.rounds, self.roster.len())
    }

    /// Serialize the whole session for storage.
    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string(self).map_err(|e| SessionError::Snapshot { detail: e.to_string() })
    }

    /// Re-hydrate a persisted session, re-running every structural and
    /// value check. Tampered or stale snapshots come back as errors,
    /// never as a half-valid session.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let session: Session = serde_json::from_str(json)
            .map_err(|e| SessionError::Snapshot { detail: e.to_string() })?;
        session.check()?;
        Ok(session)
    }

    fn check(&self) -> Result<(), SessionError> {
        self.roster.check()?;
        self.config.validate(self.roster.len())?;
        for round in &self.rounds {
            verify_round(&self.config, self.roster.len(), round)?;
        }
        Ok(())
    }
}
