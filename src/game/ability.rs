//! Core Abilities
//!
//! Each Nexus Core carries one ability, fired when the core is fully
//! charged. The set is closed, so dispatch is a plain `match`.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::game::color::NodeColor;
use crate::game::engine::SelectionEngine;
use crate::game::events::GameEvent;
use crate::game::state::RoundPhase;

/// Wildcards created at level 0; one more per core level.
const BASE_WILDCARDS: usize = 3;

/// Seconds added at level 0.
const BASE_TIME_BONUS: i32 = 10;

/// Extra seconds per core level.
const TIME_BONUS_PER_LEVEL: i32 = 5;

/// Ceiling for a boosted combo.
pub const MAX_BOOSTED_COMBO: f32 = 10.0;

/// Ability carried by a core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum AbilityType {
    /// Permute every colour on the board
    ShuffleBoard = 0,
    /// Match every node of the core's colour
    DestroyColor = 1,
    /// Turn random nodes into wildcards
    CreateWildcards = 2,
    /// Add seconds to the countdown
    TimeExtension = 3,
    /// Double the combo
    ScoreMultiplier = 4,
}

impl AbilityType {
    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            AbilityType::ShuffleBoard => "Shuffle Board",
            AbilityType::DestroyColor => "Destroy Color",
            AbilityType::CreateWildcards => "Create Wildcards",
            AbilityType::TimeExtension => "Time Extension",
            AbilityType::ScoreMultiplier => "Score Multiplier",
        }
    }

    /// One-line effect description.
    pub fn description(&self) -> &'static str {
        match self {
            AbilityType::ShuffleBoard => "Shuffles all nodes on the board",
            AbilityType::DestroyColor => "Destroys all nodes of this color",
            AbilityType::CreateWildcards => "Turns random nodes into wildcards",
            AbilityType::TimeExtension => "Adds time to the round",
            AbilityType::ScoreMultiplier => "Doubles the combo multiplier",
        }
    }
}

/// Nodes converted by `CreateWildcards` at `level`.
pub fn wildcard_count(level: u8) -> usize {
    BASE_WILDCARDS + level as usize
}

/// Seconds added by `TimeExtension` at `level`.
pub fn time_bonus(level: u8) -> i32 {
    BASE_TIME_BONUS + level as i32 * TIME_BONUS_PER_LEVEL
}

/// Combo after `ScoreMultiplier`.
pub fn boosted_combo(combo: f32) -> f32 {
    (combo * 2.0).min(MAX_BOOSTED_COMBO)
}

/// Fire the ability of the core for `color`.
///
/// Rejected (returns false, nothing changes) unless the round is playing
/// and the core exists and is charged. On success the core is discharged.
pub fn activate_ability(engine: &mut SelectionEngine, color: NodeColor) -> bool {
    if engine.round.phase != RoundPhase::Playing {
        return false;
    }

    let (ability, level) = match engine.cores.get(color) {
        Some(core) if core.is_charged() => (core.ability, core.level),
        _ => return false,
    };

    match ability {
        AbilityType::ShuffleBoard => activate_shuffle(engine),
        AbilityType::DestroyColor => activate_destroy_color(engine, color),
        AbilityType::CreateWildcards => activate_create_wildcards(engine, level),
        AbilityType::TimeExtension => activate_time_extension(engine, level),
        AbilityType::ScoreMultiplier => activate_score_multiplier(engine),
    }

    if let Some(core) = engine.cores.get_mut(color) {
        core.discharge();
    }

    debug!(?color, ?ability, level, "ability used");
    let clock_ms = engine.round.clock_ms;
    engine.push_event(GameEvent::ability_used(clock_ms, color, ability));
    true
}

fn activate_shuffle(engine: &mut SelectionEngine) {
    engine.grid.shuffle();
    // Shuffle resets every node flag, so the chain is gone too.
    engine.selection.clear();
}

fn activate_destroy_color(engine: &mut SelectionEngine, color: NodeColor) {
    let targets = engine.grid.clear_color(color);
    if targets.is_empty() {
        return;
    }
    engine.clear_selection();
    engine.execute_match(targets, color);
}

fn activate_create_wildcards(engine: &mut SelectionEngine, level: u8) {
    let converted = engine.grid.create_wildcards(wildcard_count(level));
    debug!(count = converted.len(), "wildcards created");
}

fn activate_time_extension(engine: &mut SelectionEngine, level: u8) {
    engine.round.time_remaining += time_bonus(level);
    let (clock_ms, remaining) = (engine.round.clock_ms, engine.round.time_remaining);
    engine.push_event(GameEvent::time_changed(clock_ms, remaining));
}

fn activate_score_multiplier(engine: &mut SelectionEngine) {
    engine.round.combo = boosted_combo(engine.round.combo);
    engine.round.highest_combo = engine.round.highest_combo.max(engine.round.combo);
    let (clock_ms, combo) = (engine.round.clock_ms, engine.round.combo);
    engine.push_event(GameEvent::combo_changed(clock_ms, combo));
}
