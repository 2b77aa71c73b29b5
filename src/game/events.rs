//! Game Events
//!
//! Notifications emitted by the engine for rendering, sound and
//! persistence. The engine queues them; hosts drain the queue with
//! `SelectionEngine::take_events` once per frame or tick.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::game::ability::AbilityType;
use crate::game::color::NodeColor;
use crate::game::grid::Node;
use crate::game::pattern::MatchPattern;

/// Event payloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Score total changed
    ScoreChanged {
        score: u32,
    },

    /// Countdown changed
    TimeChanged {
        seconds_remaining: i32,
    },

    /// Combo multiplier changed
    ComboChanged {
        multiplier: f32,
    },

    /// A match fed energy into a colour
    EnergyCollected {
        color: NodeColor,
        amount: u32,
    },

    /// A group was matched (snapshot taken before removal)
    MatchFound {
        nodes: Vec<Node>,
        pattern: MatchPattern,
    },

    /// A charged core was discharged
    AbilityUsed {
        color: NodeColor,
        ability: AbilityType,
    },

    /// The round ended
    GameOver {
        final_score: u32,
        energy_by_color: BTreeMap<NodeColor, u32>,
    },
}

/// A game event stamped with the round clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Round clock when the event occurred
    pub clock_ms: u64,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(clock_ms: u64, data: GameEventData) -> Self {
        Self { clock_ms, data }
    }

    /// Create score changed event.
    pub fn score_changed(clock_ms: u64, score: u32) -> Self {
        Self::new(clock_ms, GameEventData::ScoreChanged { score })
    }

    /// Create time changed event.
    pub fn time_changed(clock_ms: u64, seconds_remaining: i32) -> Self {
        Self::new(clock_ms, GameEventData::TimeChanged { seconds_remaining })
    }

    /// Create combo changed event.
    pub fn combo_changed(clock_ms: u64, multiplier: f32) -> Self {
        Self::new(clock_ms, GameEventData::ComboChanged { multiplier })
    }

    /// Create energy collected event.
    pub fn energy_collected(clock_ms: u64, color: NodeColor, amount: u32) -> Self {
        Self::new(clock_ms, GameEventData::EnergyCollected { color, amount })
    }

    /// Create match found event.
    pub fn match_found(clock_ms: u64, nodes: Vec<Node>, pattern: MatchPattern) -> Self {
        Self::new(clock_ms, GameEventData::MatchFound { nodes, pattern })
    }

    /// Create ability used event.
    pub fn ability_used(clock_ms: u64, color: NodeColor, ability: AbilityType) -> Self {
        Self::new(clock_ms, GameEventData::AbilityUsed { color, ability })
    }

    /// Create game over event.
    pub fn game_over(clock_ms: u64, final_score: u32, energy_by_color: BTreeMap<NodeColor, u32>) -> Self {
        Self::new(clock_ms, GameEventData::GameOver { final_score, energy_by_color })
    }

    /// True for the terminal event.
    pub fn is_game_over(&self) -> bool {
        matches!(self.data, GameEventData::GameOver { .. })
    }
}
