//! Player registry
//!
//! An ordered list of named participants. Names are trimmed and must be
//! unique; identity is a session-scoped id that is never reused, so a
//! player can be renamed without disturbing recorded rounds.

use serde::{Deserialize, Serialize};

/// Minimum players required to record rounds.
pub const MIN_PLAYERS: usize = 2;

/// Hard upper limit on simultaneous players (some games allow fewer).
pub const MAX_PLAYERS: usize = 5;

/// Session-scoped player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// A registered participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// Errors that can occur when building or editing the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RosterError {
    /// Name is empty after trimming.
    EmptyName,
    /// Another player already has this name.
    DuplicateName { name: String },
    /// Fewer than MIN_PLAYERS names supplied.
    TooFew { found: usize },
    /// Registry is at its player limit.
    Full { limit: usize },
    /// Removing would drop the registry below MIN_PLAYERS.
    AtMinimum,
    /// Player index out of range.
    BadIndex { index: usize, len: usize },
    /// Limit outside MIN_PLAYERS..=MAX_PLAYERS.
    BadLimit { limit: usize },
}

impl core::fmt::Display for RosterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RosterError::EmptyName => write!(f, "player name is empty"),
            RosterError::DuplicateName { name } =>
                write!(f, "duplicate player name \"{}\"", name),
            RosterError::TooFew { found } =>
                write!(f, "at least {} players required, found {}", MIN_PLAYERS, found),
            RosterError::Full { limit } =>
                write!(f, "registry is full ({} players max)", limit),
            RosterError::AtMinimum =>
                write!(f, "cannot remove below {} players", MIN_PLAYERS),
            RosterError::BadIndex { index, len } =>
                write!(f, "player index {} out of range for {} players", index, len),
            RosterError::BadLimit { limit } =>
                write!(f, "player limit {} outside {}..={}", limit, MIN_PLAYERS, MAX_PLAYERS),
        }
    }
}

/// Ordered, deduplicated player registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
    limit: usize,
    next_id: u32,
}

impl Roster {
    /// Build a registry from raw names with the default player limit.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self, RosterError> {
        Self::with_limit(names, MAX_PLAYERS)
    }

    /// Build a registry from raw names with a per-game player limit.
    ///
    /// Names are trimmed; empty or duplicate names are rejected.
    pub fn with_limit<S: AsRef<str>>(names: &[S], limit: usize) -> Result<Self, RosterError> {
        if limit < MIN_PLAYERS || limit > MAX_PLAYERS {
            return Err(RosterError::BadLimit { limit });
        }
        let mut roster = Roster { players: Vec::new(), limit, next_id: 0 };
        for name in names {
            roster.add(name.as_ref())?;
        }
        if roster.players.len() < MIN_PLAYERS {
            return Err(RosterError::TooFew { found: roster.players.len() });
        }
        Ok(roster)
    }

    /// Register one more player at the end of the list.
    pub fn add(&mut self, name: &str) -> Result<PlayerId, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.players.len() >= self.limit {
            return Err(RosterError::Full { limit: self.limit });
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(RosterError::DuplicateName { name: name.to_string() });
        }
        let id = PlayerId(self.next_id);
        self.next_id += 1;
        self.players.push(Player { id, name: name.to_string() });
        Ok(id)
    }

    /// Rename the player at `index`, keeping names unique.
    pub fn rename(&mut self, index: usize, name: &str) -> Result<(), RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if index >= self.players.len() {
            return Err(RosterError::BadIndex { index, len: self.players.len() });
        }
        if self.players.iter().enumerate().any(|(i, p)| i != index && p.name == name) {
            return Err(RosterError::DuplicateName { name: name.to_string() });
        }
        self.players[index].name = name.to_string();
        Ok(())
    }

    /// Remove the player at `index`. The registry never shrinks below
    /// MIN_PLAYERS.
    pub fn remove(&mut self, index: usize) -> Result<Player, RosterError> {
        if index >= self.players.len() {
            return Err(RosterError::BadIndex { index, len: self.players.len() });
        }
        if self.players.len() <= MIN_PLAYERS {
            return Err(RosterError::AtMinimum);
        }
        Ok(self.players.remove(index))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn get(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Player> {
        self.players.iter()
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.name.as_str()).collect()
    }

    /// Structural check used when re-hydrating a persisted registry.
    pub(crate) fn check(&self) -> Result<(), RosterError> {
        if self.limit < MIN_PLAYERS || self.limit > MAX_PLAYERS {
            return Err(RosterError::BadLimit { limit: self.limit });
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(RosterError::TooFew { found: self.players.len() });
        }
        if self.players.len() > self.limit {
            return Err(RosterError::Full { limit: self.limit });
        }
        for (i, p) in self.players.iter().enumerate() {
            if p.name.trim().is_empty() || p.name.trim() != p.name {
                return Err(RosterError::EmptyName);
            }
            if p.id.0 >= self.next_id {
                return Err(RosterError::BadIndex { index: i, len: self.players.len() });
            }
            if self.players[..i].iter().any(|q| q.name == p.name || q.id == p.id) {
                return Err(RosterError::DuplicateName { name: p.name.clone() });
            }
        }
        Ok(())
    }
}
