//! Round records
//!
//! `RoundInput` is the raw shape collected by the UI, with blanks as
//! `None`. Validation is the only path that turns an input into a
//! committed `Round`; settlement only ever sees committed rounds.

use serde::{Deserialize, Serialize};

/// Discriminant shared by rounds and inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundKind {
    Single,
    Matrix,
    Streak,
    Timed,
    Countdown,
    Tally,
}

impl RoundKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RoundKind::Single => "single",
            RoundKind::Matrix => "matrix",
            RoundKind::Streak => "streak",
            RoundKind::Timed => "timed",
            RoundKind::Countdown => "countdown",
            RoundKind::Tally => "tally",
        }
    }
}

impl core::fmt::Display for RoundKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One committed round, tagged by kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Round {
    /// Winner-takes-all: `values[winner]` holds the derived sum of the
    /// losers' entries.
    Single { winner: usize, values: Vec<i64> },
    /// `matrix[i][j]` = units player i owes player j; diagonal is 0.
    Matrix { matrix: Vec<Vec<i64>> },
    Streak { winner: usize },
    Timed { winner: usize },
    /// Signed per-player ball deltas (negative = balls potted).
    Countdown { deltas: Vec<i64> },
    Tally {
        winner: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
}

impl Round {
    pub fn kind(&self) -> RoundKind {
        match self {
            Round::Single { .. } => RoundKind::Single,
            Round::Matrix { .. } => RoundKind::Matrix,
            Round::Streak { .. } => RoundKind::Streak,
            Round::Timed { .. } => RoundKind::Timed,
            Round::Countdown { .. } => RoundKind::Countdown,
            Round::Tally { .. } => RoundKind::Tally,
        }
    }
}

/// Raw round input straight from the form; `None` cells are blanks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundInput {
    /// The single blank cell marks the winner.
    Single { cells: Vec<Option<i64>> },
    /// Blank cells coerce to 0; diagonal cells are ignored.
    Matrix { cells: Vec<Vec<Option<i64>>> },
    Streak { winner: Option<usize> },
    Timed { winner: Option<usize> },
    /// Blank cells coerce to 0.
    Countdown { deltas: Vec<Option<i64>> },
    Tally {
        winner: Option<usize>,
        #[serde(default)]
        note: Option<String>,
    },
}

impl RoundInput {
    pub fn kind(&self) -> RoundKind {
        match self {
            RoundInput::Single { .. } => RoundKind::Single,
            RoundInput::Matrix { .. } => RoundKind::Matrix,
            RoundInput::Streak { .. } => RoundKind::Streak,
            RoundInput::Timed { .. } => RoundKind::Timed,
            RoundInput::Countdown { .. } => RoundKind::Countdown,
            RoundInput::Tally { .. } => RoundKind::Tally,
        }
    }
}
