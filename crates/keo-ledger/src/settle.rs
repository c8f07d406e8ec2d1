//! Settlement rules
//!
//! One pure fold per game mode, always over the complete ordered round
//! history from a zero state. Nothing here mutates or caches: removing
//! a round and recomputing is exactly the same as never having recorded
//! it. Rounds of a kind the rule does not understand contribute nothing.
//!
//! Money conservation: every rule except the timed table fee produces
//! per-round deltas that sum to zero across players.

use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, Progression};
use crate::countdown::{run_countdown, CountdownReport};
use crate::round::Round;

// ── Reports ──────────────────────────────────────────────────────────

/// Net movement contributed by one round, in settlement units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundNet {
    /// 0-based position in the history.
    pub round: usize,
    pub deltas: Vec<i64>,
    /// Running totals after this round.
    pub cumulative: Vec<i64>,
}

/// Outcome of a unit-based history (winner-takes-all and debt-matrix).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerReport {
    pub rounds: Vec<RoundNet>,
    /// Net units (balls, leaves) per player over the whole history.
    pub unit_totals: Vec<i64>,
    /// `unit_totals` scaled by the unit price.
    pub money_totals: Vec<i64>,
}

/// One streak round's payout, for the history table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreakRound {
    pub round: usize,
    pub winner: usize,
    /// Winner's streak after this win (clamped to the cap).
    pub streak: u32,
    pub amount_per_loser: i64,
    pub deltas: Vec<i64>,
    pub cumulative: Vec<i64>,
}

/// Outcome of a streak-escalation history. Amounts are currency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreakReport {
    pub rounds: Vec<StreakRound>,
    pub totals: Vec<i64>,
    /// Live streak counters after the last round.
    pub streaks: Vec<u32>,
}

/// Outcome of a timed session: even fee split minus-ed against the
/// optional per-rack stake transfers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimedReport {
    pub fee_total: f64,
    pub fee_per_player: f64,
    /// Per-round stake transfers (all zero when no stake is configured).
    pub rounds: Vec<RoundNet>,
    /// Accumulated stake transfers per player.
    pub rack_totals: Vec<i64>,
    /// `rack_totals` minus the per-player fee. The fee deduction is the
    /// one place balances do not sum to zero.
    pub totals: Vec<f64>,
}

/// Outcome of a plain win-tally history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TallyReport {
    pub wins: Vec<u32>,
}

/// Settlement outcome for a whole session, tagged by mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SessionReport {
    Units(LedgerReport),
    Streak(StreakReport),
    Timed(TimedReport),
    Countdown(CountdownReport),
    Tally(TallyReport),
}

// ── Rules ────────────────────────────────────────────────────────────

/// Settle a whole session by dispatching on the configured mode.
pub fn settle(config: &GameConfig, rounds: &[Round], player_count: usize) -> SessionReport {
    match config {
        GameConfig::Single { unit_price, .. } | GameConfig::Matrix { unit_price } => {
            SessionReport::Units(settle_units(*unit_price, rounds, player_count))
        }
        GameConfig::Streak { base, progression, cap } => {
            SessionReport::Streak(settle_streak(*base, *progression, *cap, rounds, player_count))
        }
        GameConfig::Timed { hourly_rate, minutes, stake } => {
            SessionReport::Timed(settle_timed(*hourly_rate, *minutes, *stake, rounds, player_count))
        }
        GameConfig::Countdown { baseline, handicaps } => {
            SessionReport::Countdown(run_countdown(*baseline, handicaps, rounds))
        }
        GameConfig::Tally => SessionReport::Tally(settle_tally(rounds, player_count)),
    }
}

/// Net unit deltas for one winner-takes-all round.
fn single_net(values: &[i64], winner: usize, player_count: usize) -> Vec<i64> {
    let mut deltas = vec![0i64; player_count];
    for (i, &v) in values.iter().enumerate().take(player_count) {
        deltas[i] = if i == winner { v } else { -v };
    }
    deltas
}

/// Net unit deltas for one debt-matrix round: inflow minus outflow.
fn matrix_net(matrix: &[Vec<i64>], player_count: usize) -> Vec<i64> {
    let mut deltas = vec![0i64; player_count];
    for i in 0..player_count.min(matrix.len()) {
        let mut inflow = 0i64;
        let mut outflow = 0i64;
        for j in 0..player_count.min(matrix.len()) {
            if i == j {
                continue;
            }
            outflow += matrix[i].get(j).copied().unwrap_or(0);
            inflow += matrix[j].get(i).copied().unwrap_or(0);
        }
        deltas[i] = inflow - outflow;
    }
    deltas
}

/// Fold a unit-based history: winner-takes-all and matrix rounds both
/// contribute unit deltas, scaled to money by the unit price.
pub fn settle_units(unit_price: i64, rounds: &[Round], player_count: usize) -> LedgerReport {
    let mut unit_totals = vec![0i64; player_count];
    let mut nets = Vec::with_capacity(rounds.len());

    for (index, round) in rounds.iter().enumerate() {
        let deltas = match round {
            Round::Single { winner, values } => single_net(values, *winner, player_count),
            Round::Matrix { matrix } => matrix_net(matrix, player_count),
            _ => vec![0i64; player_count],
        };
        for (total, delta) in unit_totals.iter_mut().zip(&deltas) {
            *total += delta;
        }
        nets.push(RoundNet { round: index, deltas, cumulative: unit_totals.clone() });
    }

    let money_totals = unit_totals.iter().map(|&u| u * unit_price).collect();
    LedgerReport { rounds: nets, unit_totals, money_totals }
}

/// Amount each loser pays at streak value `s` (post-increment, >= 1).
fn stake_for_streak(base: i64, progression: Progression, s: u32) -> i64 {
    match progression {
        Progression::Arithmetic { step } => base + (s as i64 - 1) * step,
        Progression::Geometric { multiplier } => {
            (base as f64 * multiplier.powi(s as i32 - 1)).round() as i64
        }
    }
}

/// Fold a streak-escalation history.
///
/// Per round: bump the winner's streak, clamp it to the cap, pay out
/// from the clamped value, then reset every other streak to zero.
pub fn settle_streak(
    base: i64,
    progression: Progression,
    cap: u32,
    rounds: &[Round],
    player_count: usize,
) -> StreakReport {
    let mut streaks = vec![0u32; player_count];
    let mut totals = vec![0i64; player_count];
    let mut detail = Vec::with_capacity(rounds.len());

    for (index, round) in rounds.iter().enumerate() {
        let winner = match round {
            Round::Streak { winner } if *winner < player_count => *winner,
            _ => continue,
        };

        streaks[winner] += 1;
        if cap > 0 && streaks[winner] > cap {
            streaks[winner] = cap;
        }
        let s = streaks[winner];
        let amount_per_loser = stake_for_streak(base, progression, s);

        let mut deltas = vec![0i64; player_count];
        for i in 0..player_count {
            if i == winner {
                deltas[i] = amount_per_loser * (player_count as i64 - 1);
            } else {
                deltas[i] = -amount_per_loser;
                streaks[i] = 0;
            }
        }
        for (total, delta) in totals.iter_mut().zip(&deltas) {
            *total += delta;
        }

        detail.push(StreakRound {
            round: index,
            winner,
            streak: s,
            amount_per_loser,
            deltas,
            cumulative: totals.clone(),
        });
    }

    StreakReport { rounds: detail, totals, streaks }
}

/// Fold a timed session: flat fee split evenly, plus constant-stake
/// rack transfers when a positive stake is configured.
pub fn settle_timed(
    hourly_rate: i64,
    minutes: u32,
    stake: i64,
    rounds: &[Round],
    player_count: usize,
) -> TimedReport {
    let fee_total = hourly_rate as f64 * (minutes as f64 / 60.0);
    let fee_per_player = if player_count > 0 { fee_total / player_count as f64 } else { 0.0 };

    let mut rack_totals = vec![0i64; player_count];
    let mut nets = Vec::with_capacity(rounds.len());
    let transfers_active = stake > 0 && player_count > 1;

    for (index, round) in rounds.iter().enumerate() {
        let mut deltas = vec![0i64; player_count];
        if transfers_active {
            if let Round::Timed { winner } = round {
                if *winner < player_count {
                    for (i, delta) in deltas.iter_mut().enumerate() {
                        *delta = if i == *winner {
                            stake * (player_count as i64 - 1)
                        } else {
                            -stake
                        };
                    }
                }
            }
        }
        for (total, delta) in rack_totals.iter_mut().zip(&deltas) {
            *total += delta;
        }
        nets.push(RoundNet { round: index, deltas, cumulative: rack_totals.clone() });
    }

    let totals = rack_totals.iter().map(|&t| t as f64 - fee_per_player).collect();
    TimedReport { fee_total, fee_per_player, rounds: nets, rack_totals, totals }
}

/// Count wins per player.
pub fn settle_tally(rounds: &[Round], player_count: usize) -> TallyReport {
    let mut wins = vec![0u32; player_count];
    for round in rounds {
        if let Round::Tally { winner, .. } = round {
            if *winner < player_count {
                wins[*winner] += 1;
            }
        }
    }
    TallyReport { wins }
}

// ── Tests ────────────────────────────────────────────────────────────
