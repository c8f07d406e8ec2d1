//! Round validation
//!
//! `validate_round` turns raw input into a committed `Round` or a
//! rejection with a user-facing reason. It never mutates anything:
//! rejected input leaves the history exactly as it was.

use crate::config::GameConfig;
use crate::round::{Round, RoundInput, RoundKind};

/// Why a candidate round was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundError {
    /// Input kind is not accepted by the configured mode.
    KindMismatch { expected: RoundKind, found: RoundKind },
    /// Wrong number of per-player entries.
    PlayerCount { expected: usize, found: usize },
    /// A negative value where a non-negative amount is required.
    NegativeValue { player: usize, value: i64 },
    /// A negative off-diagonal debt cell.
    NegativeCell { from: usize, to: usize, value: i64 },
    /// Not exactly one blank winner slot.
    WinnerSlots { found: usize },
    /// Losers' sum differs from the configured fixed target.
    TargetSum { required: u32, actual: i64 },
    /// Every contribution is zero.
    EmptyRound,
    /// No winner selected.
    NoWinner,
    /// Winner index out of range.
    WinnerIndex { index: usize, player_count: usize },
}

impl core::fmt::Display for RoundError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RoundError::KindMismatch { expected, found } =>
                write!(f, "round kind \"{}\" cannot be recorded in \"{}\" mode", found, expected),
            RoundError::PlayerCount { expected, found } =>
                write!(f, "expected {} player entries, found {}", expected, found),
            RoundError::NegativeValue { player, value } =>
                write!(f, "value for player {} must be a non-negative number, got {}", player, value),
            RoundError::NegativeCell { from, to, value } =>
                write!(f, "debt from player {} to player {} must be non-negative, got {}", from, to, value),
            RoundError::WinnerSlots { found } =>
                write!(f, "leave exactly one slot blank for the winner, found {} blank", found),
            RoundError::TargetSum { required, actual } =>
                write!(f, "losers' total must be exactly {}, got {}", required, actual),
            RoundError::EmptyRound =>
                write!(f, "empty round: every contribution is zero"),
            RoundError::NoWinner =>
                write!(f, "no winner selected for this round"),
            RoundError::WinnerIndex { index, player_count } =>
                write!(f, "winner index {} out of range for {} players", index, player_count),
        }
    }
}

/// Validate raw input against the configured mode.
///
/// Checks, in order: the input kind is accepted by the mode, the entry
/// count matches the player count, every amount is in range, and the
/// round is not degenerate. On success the committed `Round` carries
/// any derived values (the winner's sum, the zeroed diagonal).
pub fn validate_round(
    config: &GameConfig,
    player_count: usize,
    input: &RoundInput,
) -> Result<Round, RoundError> {
    if !config.accepts(input.kind()) {
        return Err(RoundError::KindMismatch {
            expected: config.round_kind(),
            found: input.kind(),
        });
    }

    match input {
        RoundInput::Single { cells } => {
            let target = match config {
                GameConfig::Single { target, .. } => *target,
                _ => None,
            };
            validate_single(cells, player_count, target)
        }
        RoundInput::Matrix { cells } => validate_matrix(cells, player_count),
        RoundInput::Streak { winner } => {
            Ok(Round::Streak { winner: require_winner(*winner, player_count)? })
        }
        RoundInput::Timed { winner } => {
            Ok(Round::Timed { winner: require_winner(*winner, player_count)? })
        }
        RoundInput::Countdown { deltas } => validate_countdown(deltas, player_count),
        RoundInput::Tally { winner, note } => {
            let winner = require_winner(*winner, player_count)?;
            let note = note
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from);
            Ok(Round::Tally { winner, note })
        }
    }
}

fn validate_single(
    cells: &[Option<i64>],
    player_count: usize,
    target: Option<u32>,
) -> Result<Round, RoundError> {
    if cells.len() != player_count {
        return Err(RoundError::PlayerCount { expected: player_count, found: cells.len() });
    }

    for (player, cell) in cells.iter().enumerate() {
        if let Some(value) = *cell {
            if value < 0 {
                return Err(RoundError::NegativeValue { player, value });
            }
        }
    }

    let blanks: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_none())
        .map(|(i, _)| i)
        .collect();
    if blanks.len() != 1 {
        return Err(RoundError::WinnerSlots { found: blanks.len() });
    }
    let winner = blanks[0];

    let sum_losers: i64 = cells
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != winner)
        .map(|(_, c)| c.unwrap_or(0))
        .sum();

    if let Some(required) = target {
        if sum_losers != required as i64 {
            return Err(RoundError::TargetSum { required, actual: sum_losers });
        }
    }
    if sum_losers == 0 {
        return Err(RoundError::EmptyRound);
    }

    let values: Vec<i64> = cells
        .iter()
        .enumerate()
        .map(|(i, c)| if i == winner { sum_losers } else { c.unwrap_or(0) })
        .collect();

    Ok(Round::Single { winner, values })
}

fn validate_matrix(
    cells: &[Vec<Option<i64>>],
    player_count: usize,
) -> Result<Round, RoundError> {
    if cells.len() != player_count {
        return Err(RoundError::PlayerCount { expected: player_count, found: cells.len() });
    }

    let mut matrix = vec![vec![0i64; player_count]; player_count];
    for (i, row) in cells.iter().enumerate() {
        if row.len() != player_count {
            return Err(RoundError::PlayerCount { expected: player_count, found: row.len() });
        }
        for (j, cell) in row.iter().enumerate() {
            if i == j {
                // Self-debt is meaningless; the diagonal is forced to 0
                continue;
            }
            let value = cell.unwrap_or(0);
            if value < 0 {
                return Err(RoundError::NegativeCell { from: i, to: j, value });
            }
            matrix[i][j] = value;
        }
    }

    if matrix.iter().all(|row| row.iter().all(|&v| v == 0)) {
        return Err(RoundError::EmptyRound);
    }

    Ok(Round::Matrix { matrix })
}

fn validate_countdown(
    deltas: &[Option<i64>],
    player_count: usize,
) -> Result<Round, RoundError> {
    if deltas.len() != player_count {
        return Err(RoundError::PlayerCount { expected: player_count, found: deltas.len() });
    }
    let deltas: Vec<i64> = deltas.iter().map(|d| d.unwrap_or(0)).collect();
    if deltas.iter().all(|&d| d == 0) {
        return Err(RoundError::EmptyRound);
    }
    Ok(Round::Countdown { deltas })
}

fn require_winner(winner: Option<usize>, player_count: usize) -> Result<usize, RoundError> {
    let index = winner.ok_or(RoundError::NoWinner)?;
    if index >= player_count {
        return Err(RoundError::WinnerIndex { index, player_count });
    }
    Ok(index)
}

/// Re-check a committed round, used when re-hydrating persisted state.
///
/// A round that passed `validate_round` always passes this; a snapshot
/// edited by hand (or produced by an older build) may not.
pub fn verify_round(
    config: &GameConfig,
    player_count: usize,
    round: &Round,
) -> Result<(), RoundError> {
    if !config.accepts(round.kind()) {
        return Err(RoundError::KindMismatch {
            expected: config.round_kind(),
            found: round.kind(),
        });
    }

    match round {
        Round::Single { winner, values } => {
            if values.len() != player_count {
                return Err(RoundError::PlayerCount {
                    expected: player_count,
                    found: values.len(),
                });
            }
            let winner = *winner;
            if winner >= player_count {
                return Err(RoundError::WinnerIndex { index: winner, player_count });
            }
            let mut sum_losers = 0i64;
            for (player, &value) in values.iter().enumerate() {
                if player == winner {
                    continue;
                }
                if value < 0 {
                    return Err(RoundError::NegativeValue { player, value });
                }
                sum_losers += value;
            }
            if values[winner] != sum_losers {
                // The stored winner value must equal the losers' sum
                return Err(RoundError::TargetSum {
                    required: sum_losers.max(0) as u32,
                    actual: values[winner],
                });
            }
            if let GameConfig::Single { target: Some(required), .. } = config {
                if sum_losers != *required as i64 {
                    return Err(RoundError::TargetSum { required: *required, actual: sum_losers });
                }
            }
            if sum_losers == 0 {
                return Err(RoundError::EmptyRound);
            }
            Ok(())
        }
        Round::Matrix { matrix } => {
            if matrix.len() != player_count {
                return Err(RoundError::PlayerCount {
                    expected: player_count,
                    found: matrix.len(),
                });
            }
            let mut all_zero = true;
            for (i, row) in matrix.iter().enumerate() {
                if row.len() != player_count {
                    return Err(RoundError::PlayerCount {
                        expected: player_count,
                        found: row.len(),
                    });
                }
                for (j, &value) in row.iter().enumerate() {
                    if i == j && value != 0 {
                        return Err(RoundError::NegativeCell { from: i, to: j, value });
                    }
                    if value < 0 {
                        return Err(RoundError::NegativeCell { from: i, to: j, value });
                    }
                    if value != 0 {
                        all_zero = false;
                    }
                }
            }
            if all_zero {
                return Err(RoundError::EmptyRound);
            }
            Ok(())
        }
        Round::Streak { winner } | Round::Timed { winner } => {
            require_winner(Some(*winner), player_count).map(|_| ())
        }
        Round::Countdown { deltas } => {
            if deltas.len() != player_count {
                return Err(RoundError::PlayerCount {
                    expected: player_count,
                    found: deltas.len(),
                });
            }
            if deltas.iter().all(|&d| d == 0) {
                return Err(RoundError::EmptyRound);
            }
            Ok(())
        }
        Round::Tally { winner, note } => {
            require_winner(Some(*winner), player_count)?;
            if let Some(note) = note {
                if note.trim().is_empty() {
                    return Err(RoundError::EmptyRound);
                }
            }
            Ok(())
        }
    }
}
