//! Ball-countdown race
//!
//! Not a money ledger: each player counts down from a personal quota
//! (baseline minus handicap) and the first round that takes a player to
//! zero or below fixes their finish position for good.

use serde::{Deserialize, Serialize};

use crate::round::Round;

/// Outcome of folding a countdown history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountdownReport {
    /// Starting quota per player (baseline - handicap).
    pub starts: Vec<i64>,
    /// Balls left after the last round; negative = overshot the finish.
    pub remaining: Vec<i64>,
    /// 1-based round number in which each player first reached <= 0.
    pub finish_round: Vec<Option<usize>>,
    /// Player indices, best first: finishers by ascending finish round,
    /// then everyone still on the table in registration order.
    pub ranking: Vec<usize>,
}

/// Fold the round history into remaining counters and a ranking.
///
/// A player's finish round is recorded the first time their counter
/// reaches zero or below; later penalty balls never un-finish them.
/// Players finishing in the same round rank in registration order.
pub fn run_countdown(baseline: u32, handicaps: &[u32], rounds: &[Round]) -> CountdownReport {
    let player_count = handicaps.len();
    let starts: Vec<i64> = handicaps
        .iter()
        .map(|&h| baseline as i64 - h as i64)
        .collect();

    let mut remaining = starts.clone();
    let mut finish_round: Vec<Option<usize>> = vec![None; player_count];

    for (index, round) in rounds.iter().enumerate() {
        if let Round::Countdown { deltas } = round {
            for (i, &delta) in deltas.iter().enumerate().take(player_count) {
                remaining[i] += delta;
                if remaining[i] <= 0 && finish_round[i].is_none() {
                    finish_round[i] = Some(index + 1);
                }
            }
        }
    }

    let mut ranking: Vec<usize> = (0..player_count).collect();
    ranking.sort_by_key(|&i| (finish_round[i].unwrap_or(usize::MAX), i));

    CountdownReport { starts, remaining, finish_round, ranking }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deltas(values: &[i64]) -> Round {
        Round::Countdown { deltas: values.to_vec() }
    }

    #[test]
    fn test_finish_round_is_first_crossing() {
        // Baseline 99, no handicap: A reaches 0 in round 2
        let rounds = vec![deltas(&[-20, 0]), deltas(&[-79, 0])];
        let report = run_countdown(99, &[0, 0], &rounds);
        assert_eq!(report.starts, vec![99, 99]);
        assert_eq!(report.remaining, vec![0, 99]);
        assert_eq!(report.finish_round, vec![Some(2), None]);
        assert_eq!(report.ranking, vec![0, 1]);
    }

    #[test]
    fn test_handicap_shrinks_start() {
        let report = run_countdown(99, &[0, 30], &[]);
        assert_eq!(report.starts, vec![99, 69]);
        assert_eq!(report.remaining, vec![99, 69]);
    }

    #[test]
    fn test_penalty_balls_do_not_unfinish() {
        let rounds = vec![
            deltas(&[-10, -2]),
            deltas(&[5, -3]), // penalty after finishing
        ];
        let report = run_countdown(10, &[0, 0], &rounds);
        assert_eq!(report.finish_round[0], Some(1));
        assert_eq!(report.remaining[0], 5);
        // Still ranked first: the finish stuck
        assert_eq!(report.ranking[0], 0);
    }

    #[test]
    fn test_overshoot_records_negative_remaining() {
        let rounds = vec![deltas(&[-12, 0])];
        let report = run_countdown(10, &[0, 0], &rounds);
        assert_eq!(report.remaining[0], -2);
        assert_eq!(report.finish_round[0], Some(1));
    }

    #[test]
    fn test_ranking_finishers_before_runners() {
        // C finishes round 1, A finishes round 3, B never does
        let rounds = vec![
            deltas(&[-2, -1, -5]),
            deltas(&[-1, 0, 0]),
            deltas(&[-2, -1, 0]),
        ];
        let report = run_countdown(5, &[0, 0, 0], &rounds);
        assert_eq!(report.finish_round, vec![Some(3), None, Some(1)]);
        assert_eq!(report.ranking, vec![2, 0, 1]);
    }

    #[test]
    fn test_same_round_finish_ties_break_by_registration_order() {
        let rounds = vec![deltas(&[-5, -7, 0])];
        let report = run_countdown(5, &[0, 0, 0], &rounds);
        assert_eq!(report.finish_round, vec![Some(1), Some(1), None]);
        assert_eq!(report.ranking, vec![0, 1, 2]);
    }

    #[test]
    fn test_no_rounds_ranks_by_registration_order() {
        let report = run_countdown(99, &[0, 10, 20], &[]);
        assert_eq!(report.ranking, vec![0, 1, 2]);
        assert_eq!(report.finish_round, vec![None, None, None]);
    }

    #[test]
    fn test_foreign_round_kinds_are_ignored() {
        let rounds = vec![Round::Streak { winner: 0 }, deltas(&[-99, 0])];
        let report = run_countdown(99, &[0, 0], &rounds);
        // Only the countdown round moved anything; finish is round 2
        assert_eq!(report.finish_round, vec![Some(2), None]);
    }
}
