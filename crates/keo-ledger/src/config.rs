//! Per-game configuration
//!
//! One tagged variant per settlement mode, fixed at setup. Validation
//! blocks play until every parameter is in range; there is no partially
//! accepted configuration.

use serde::{Deserialize, Serialize};

use crate::round::RoundKind;

/// Losers' sum required by the fixed-target single-winner rule.
pub const RULE_99_TARGET: u32 = 99;

/// Stake progression for consecutive wins.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Progression {
    /// amount = base + (streak - 1) * step
    Arithmetic { step: i64 },
    /// amount = round(base * multiplier^(streak - 1))
    Geometric { multiplier: f64 },
}

/// Configuration for one session, tagged by settlement mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GameConfig {
    /// Winner takes the sum of the losers' declared units.
    ///
    /// `target`, when set, forces the losers' sum to a fixed total
    /// (the 99-ball rule).
    Single {
        unit_price: i64,
        #[serde(default)]
        target: Option<u32>,
    },
    /// Leaf-count settlement: rounds are either winner-takes-all or a
    /// pairwise debt matrix, netted per player. Both round shapes may
    /// appear in one history.
    Matrix { unit_price: i64 },
    /// Consecutive-win escalation. Amounts are configured directly in
    /// currency; there is no separate unit price.
    Streak {
        base: i64,
        progression: Progression,
        /// 0 = unlimited.
        cap: u32,
    },
    /// Hourly table fee split evenly, plus an optional constant
    /// per-rack stake (0 disables the stake transfers).
    Timed {
        hourly_rate: i64,
        minutes: u32,
        stake: i64,
    },
    /// Race to pot a personal quota: start = baseline - handicap.
    Countdown {
        baseline: u32,
        handicaps: Vec<u32>,
    },
    /// Plain per-rack win tally, no money attached.
    Tally,
}

/// Errors raised by configuration validation.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Unit price must be positive.
    UnitPrice { value: i64 },
    /// Base stake must be non-negative.
    BaseStake { value: i64 },
    /// Arithmetic step must be non-negative.
    Step { value: i64 },
    /// Geometric multiplier must be a finite number >= 1.
    Multiplier { value: f64 },
    /// Hourly rate must be non-negative.
    HourlyRate { value: i64 },
    /// Per-rack stake must be non-negative.
    Stake { value: i64 },
    /// Countdown baseline must be positive.
    Baseline { value: u32 },
    /// One handicap entry per player is required.
    HandicapCount { expected: usize, found: usize },
    /// A player's effective start (baseline - handicap) must be positive.
    StartBalls { player: usize, start: i64 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::UnitPrice { value } =>
                write!(f, "unit price must be positive, got {}", value),
            ConfigError::BaseStake { value } =>
                write!(f, "base stake must be non-negative, got {}", value),
            ConfigError::Step { value } =>
                write!(f, "arithmetic step must be non-negative, got {}", value),
            ConfigError::Multiplier { value } =>
                write!(f, "geometric multiplier must be >= 1, got {}", value),
            ConfigError::HourlyRate { value } =>
                write!(f, "hourly rate must be non-negative, got {}", value),
            ConfigError::Stake { value } =>
                write!(f, "per-rack stake must be non-negative, got {}", value),
            ConfigError::Baseline { value } =>
                write!(f, "countdown baseline must be positive, got {}", value),
            ConfigError::HandicapCount { expected, found } =>
                write!(f, "expected {} handicap entries, found {}", expected, found),
            ConfigError::StartBalls { player, start } =>
                write!(f, "player {} would start at {} balls, must be positive", player, start),
        }
    }
}

impl GameConfig {
    /// Generic single-winner money game.
    pub fn single(unit_price: i64) -> Self {
        GameConfig::Single { unit_price, target: None }
    }

    /// Single-winner with the fixed 99-ball losers' sum.
    pub fn fixed_99(unit_price: i64) -> Self {
        GameConfig::Single { unit_price, target: Some(RULE_99_TARGET) }
    }

    /// Leaf-count game (tá lả).
    pub fn leaves(unit_price: i64) -> Self {
        GameConfig::Matrix { unit_price }
    }

    /// Countdown with no handicaps: everyone starts at `baseline`.
    pub fn countdown_even(baseline: u32, player_count: usize) -> Self {
        GameConfig::Countdown { baseline, handicaps: vec![0; player_count] }
    }

    /// The round kind this mode is primarily recorded with.
    pub fn round_kind(&self) -> RoundKind {
        match self {
            GameConfig::Single { .. } => RoundKind::Single,
            GameConfig::Matrix { .. } => RoundKind::Matrix,
            GameConfig::Streak { .. } => RoundKind::Streak,
            GameConfig::Timed { .. } => RoundKind::Timed,
            GameConfig::Countdown { .. } => RoundKind::Countdown,
            GameConfig::Tally => RoundKind::Tally,
        }
    }

    /// Whether a round of `kind` may be recorded under this mode.
    ///
    /// The leaf-count game accepts winner-takes-all rounds alongside
    /// debt matrices; every other mode accepts exactly its own kind.
    pub fn accepts(&self, kind: RoundKind) -> bool {
        match self {
            GameConfig::Matrix { .. } => matches!(kind, RoundKind::Matrix | RoundKind::Single),
            _ => self.round_kind() == kind,
        }
    }

    /// Validate every parameter against the player count.
    pub fn validate(&self, player_count: usize) -> Result<(), ConfigError> {
        match self {
            GameConfig::Single { unit_price, .. } | GameConfig::Matrix { unit_price } => {
                if *unit_price <= 0 {
                    return Err(ConfigError::UnitPrice { value: *unit_price });
                }
                Ok(())
            }
            GameConfig::Streak { base, progression, .. } => {
                if *base < 0 {
                    return Err(ConfigError::BaseStake { value: *base });
                }
                match progression {
                    Progression::Arithmetic { step } if *step < 0 =>
                        Err(ConfigError::Step { value: *step }),
                    Progression::Geometric { multiplier }
                        if !multiplier.is_finite() || *multiplier < 1.0 =>
                        Err(ConfigError::Multiplier { value: *multiplier }),
                    _ => Ok(()),
                }
            }
            GameConfig::Timed { hourly_rate, stake, .. } => {
                if *hourly_rate < 0 {
                    return Err(ConfigError::HourlyRate { value: *hourly_rate });
                }
                if *stake < 0 {
                    return Err(ConfigError::Stake { value: *stake });
                }
                Ok(())
            }
            GameConfig::Countdown { baseline, handicaps } => {
                if *baseline == 0 {
                    return Err(ConfigError::Baseline { value: *baseline });
                }
                if handicaps.len() != player_count {
                    return Err(ConfigError::HandicapCount {
                        expected: player_count,
                        found: handicaps.len(),
                    });
                }
                for (player, &h) in handicaps.iter().enumerate() {
                    let start = *baseline as i64 - h as i64;
                    if start <= 0 {
                        return Err(ConfigError::StartBalls { player, start });
                    }
                }
                Ok(())
            }
            GameConfig::Tally => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_price_must_be_positive() {
        assert_eq!(
            GameConfig::single(0).validate(3),
            Err(ConfigError::UnitPrice { value: 0 }),
        );
        assert_eq!(
            GameConfig::leaves(-5).validate(3),
            Err(ConfigError::UnitPrice { value: -5 }),
        );
        assert!(GameConfig::fixed_99(1000).validate(3).is_ok());
    }

    #[test]
    fn test_streak_bounds() {
        let arith = GameConfig::Streak {
            base: 10_000,
            progression: Progression::Arithmetic { step: 10_000 },
            cap: 0,
        };
        assert!(arith.validate(3).is_ok());

        let negative_base = GameConfig::Streak {
            base: -1,
            progression: Progression::Arithmetic { step: 0 },
            cap: 0,
        };
        assert_eq!(negative_base.validate(3), Err(ConfigError::BaseStake { value: -1 }));

        let bad_step = GameConfig::Streak {
            base: 0,
            progression: Progression::Arithmetic { step: -10 },
            cap: 0,
        };
        assert_eq!(bad_step.validate(3), Err(ConfigError::Step { value: -10 }));

        let bad_mul = GameConfig::Streak {
            base: 10_000,
            progression: Progression::Geometric { multiplier: 0.5 },
            cap: 2,
        };
        assert_eq!(bad_mul.validate(3), Err(ConfigError::Multiplier { value: 0.5 }));

        let nan_mul = GameConfig::Streak {
            base: 10_000,
            progression: Progression::Geometric { multiplier: f64::NAN },
            cap: 0,
        };
        assert!(matches!(nan_mul.validate(3), Err(ConfigError::Multiplier { .. })));
    }

    #[test]
    fn test_zero_base_with_positive_step_is_legal() {
        // 0, step, 2*step... is a valid escalation ladder
        let cfg = GameConfig::Streak {
            base: 0,
            progression: Progression::Arithmetic { step: 5_000 },
            cap: 0,
        };
        assert!(cfg.validate(4).is_ok());
    }

    #[test]
    fn test_timed_bounds() {
        let ok = GameConfig::Timed { hourly_rate: 120_000, minutes: 90, stake: 0 };
        assert!(ok.validate(3).is_ok());

        let bad = GameConfig::Timed { hourly_rate: -1, minutes: 90, stake: 0 };
        assert_eq!(bad.validate(3), Err(ConfigError::HourlyRate { value: -1 }));

        let bad_stake = GameConfig::Timed { hourly_rate: 0, minutes: 0, stake: -500 };
        assert_eq!(bad_stake.validate(3), Err(ConfigError::Stake { value: -500 }));
    }

    #[test]
    fn test_countdown_start_must_be_positive() {
        let ok = GameConfig::Countdown { baseline: 99, handicaps: vec![0, 30] };
        assert!(ok.validate(2).is_ok());

        let dead_even = GameConfig::Countdown { baseline: 99, handicaps: vec![0, 99] };
        assert_eq!(
            dead_even.validate(2),
            Err(ConfigError::StartBalls { player: 1, start: 0 }),
        );

        let overshoot = GameConfig::Countdown { baseline: 50, handicaps: vec![60, 0] };
        assert_eq!(
            overshoot.validate(2),
            Err(ConfigError::StartBalls { player: 0, start: -10 }),
        );

        let wrong_len = GameConfig::Countdown { baseline: 99, handicaps: vec![0, 0] };
        assert_eq!(
            wrong_len.validate(3),
            Err(ConfigError::HandicapCount { expected: 3, found: 2 }),
        );

        let zero_base = GameConfig::countdown_even(0, 2);
        assert_eq!(zero_base.validate(2), Err(ConfigError::Baseline { value: 0 }));
    }

    #[test]
    fn test_accepts_round_kinds() {
        use crate::round::RoundKind;

        let leaves = GameConfig::leaves(5_000);
        assert!(leaves.accepts(RoundKind::Matrix));
        assert!(leaves.accepts(RoundKind::Single));
        assert!(!leaves.accepts(RoundKind::Streak));

        let single = GameConfig::single(1_000);
        assert!(single.accepts(RoundKind::Single));
        assert!(!single.accepts(RoundKind::Matrix));

        assert!(GameConfig::Tally.accepts(RoundKind::Tally));
    }

    #[test]
    fn test_config_json_round_trip() {
        let cfg = GameConfig::Streak {
            base: 10_000,
            progression: Progression::Geometric { multiplier: 2.0 },
            cap: 3,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"mode\":\"streak\""));
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_single_target_defaults_to_none() {
        let cfg: GameConfig =
            serde_json::from_str(r#"{"mode":"single","unit_price":1000}"#).unwrap();
        assert_eq!(cfg, GameConfig::single(1000));
    }
}
