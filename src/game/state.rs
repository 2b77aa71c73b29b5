//! Round State Definitions
//!
//! Phase machine, per-round configuration and the end-of-round summary
//! handed to persistence.

use std::collections::BTreeMap;
use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

use crate::core::rng::derive_daily_seed;
use crate::game::color::{NodeColor, BASIC_COLORS};
use crate::{COMBO_TIMEOUT_MS, DEFAULT_GRID_SIZE, ROUND_DURATION_SECS};

// =============================================================================
// ROUND PHASE
// =============================================================================

/// Current phase of the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum RoundPhase {
    /// Accepting taps and ticks
    #[default]
    Playing,
    /// Resolving a match (transient)
    Matching,
    /// Timer expired (terminal)
    GameOver,
    /// Host-driven pause
    Paused,
}

// =============================================================================
// ROUND CONFIG
// =============================================================================

/// Configuration for a single round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Hexes across the board (odd)
    pub grid_size: u32,
    /// Countdown length
    pub duration_secs: i32,
    /// Gap after which the combo resets
    pub combo_timeout_ms: u64,
    /// Flat multiplier on every match score
    pub score_multiplier: f32,
    /// Wildcards sprinkled on the board at start
    pub initial_wildcards: usize,
    /// Remove and refill matched nodes immediately
    pub refill_on_match: bool,
    /// Daily challenge round
    pub daily: bool,
    /// RNG seed for the board
    pub seed: u64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            duration_secs: ROUND_DURATION_SECS,
            combo_timeout_ms: COMBO_TIMEOUT_MS,
            score_multiplier: 1.0,
            initial_wildcards: 0,
            refill_on_match: true,
            daily: false,
            seed: 0,
        }
    }
}

impl RoundConfig {
    /// Daily challenge timer.
    pub const DAILY_DURATION_SECS: i32 = 90;

    /// Daily challenge score multiplier.
    pub const DAILY_SCORE_MULTIPLIER: f32 = 2.0;

    /// Extra wildcards on a daily board.
    pub const DAILY_WILDCARDS: usize = 4;

    /// Standard round with a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }

    /// The daily challenge for `date`: shared board, longer timer, double
    /// score and extra wildcards.
    pub fn daily(date: NaiveDate) -> Self {
        Self {
            duration_secs: Self::DAILY_DURATION_SECS,
            score_multiplier: Self::DAILY_SCORE_MULTIPLIER,
            initial_wildcards: Self::DAILY_WILDCARDS,
            daily: true,
            seed: derive_daily_seed(date),
            ..Self::default()
        }
    }
}

// =============================================================================
// ROUND STATE
// =============================================================================

/// Mutable bookkeeping for the round in progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    /// Phase machine
    pub phase: RoundPhase,
    /// Accumulated score
    pub score: u32,
    /// Seconds left; may dip below zero for one tick before game over
    pub time_remaining: i32,
    /// 1.0..=10.0
    pub combo: f32,
    /// Round clock
    pub clock_ms: u64,
    /// Countdown ticks taken
    pub ticks: u32,
    /// Clock value of the last executed match
    pub last_match_ms: Option<u64>,
    /// Energy gathered this round per basic colour
    pub energy_collected: BTreeMap<NodeColor, u32>,
    /// Matches executed
    pub matches: u32,
    /// Nodes cleared by matches
    pub nodes_cleared: u32,
    /// Best combo reached
    pub highest_combo: f32,
    /// Star patterns matched
    pub star_matches: u32,
    /// Line patterns matched
    pub line_matches: u32,
}

impl RoundState {
    /// Fresh state for a round of `duration_secs`.
    pub fn new(duration_secs: i32) -> Self {
        Self {
            phase: RoundPhase::Playing,
            score: 0,
            time_remaining: duration_secs,
            combo: 1.0,
            clock_ms: 0,
            ticks: 0,
            last_match_ms: None,
            energy_collected: zero_energy_map(),
            matches: 0,
            nodes_cleared: 0,
            highest_combo: 1.0,
            star_matches: 0,
            line_matches: 0,
        }
    }

    /// Seconds of game time elapsed.
    pub fn elapsed_secs(&self) -> u64 {
        self.clock_ms / 1000
    }
}

/// A map with every basic colour at zero.
pub fn zero_energy_map() -> BTreeMap<NodeColor, u32> {
    BASIC_COLORS.iter().map(|&c| (c, 0)).collect()
}

// =============================================================================
// ROUND SUMMARY
// =============================================================================

/// What a finished round hands to progression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Final score
    pub final_score: u32,
    /// Energy gathered per colour
    pub energy_by_color: BTreeMap<NodeColor, u32>,
    /// Matches executed
    pub matches: u32,
    /// Nodes cleared
    pub nodes_cleared: u32,
    /// Best combo reached
    pub highest_combo: f32,
    /// Star patterns matched
    pub star_matches: u32,
    /// Line patterns matched
    pub line_matches: u32,
    /// Game time played
    pub play_time_secs: u64,
    /// Was this the daily challenge
    pub daily: bool,
}

impl RoundSummary {
    /// Snapshot a round.
    pub fn from_round(round: &RoundState, daily: bool) -> Self {
        Self {
            final_score: round.score,
            energy_by_color: round.energy_collected.clone(),
            matches: round.matches,
            nodes_cleared: round.nodes_cleared,
            highest_combo: round.highest_combo,
            star_matches: round.star_matches,
            line_matches: round.line_matches,
            play_time_secs: round.elapsed_secs(),
            daily,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RoundConfig::default();
        assert_eq!(config.grid_size, 7);
        assert_eq!(config.duration_secs, 60);
        assert_eq!(config.combo_timeout_ms, 2000);
        assert_eq!(config.score_multiplier, 1.0);
        assert!(!config.daily);
    }

    #[test]
    fn test_daily_config() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let daily = RoundConfig::daily(date);

        assert!(daily.daily);
        assert_eq!(daily.duration_secs, 90);
        assert_eq!(daily.score_multiplier, 2.0);
        assert_eq!(daily.initial_wildcards, 4);
        assert_eq!(daily.seed, RoundConfig::daily(date).seed);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RoundConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.duration_secs, 60);
    }

    #[test]
    fn test_new_round_state() {
        let round = RoundState::new(60);
        assert_eq!(round.phase, RoundPhase::Playing);
        assert_eq!(round.combo, 1.0);
        assert_eq!(round.energy_collected.len(), 5);
        assert!(round.energy_collected.values().all(|v| *v == 0));
    }
}
