//! Selection Engine
//!
//! The round state machine. Taps build a chain anchored on the first
//! selected node; a chain that can no longer grow is resolved against the
//! full connected group around the anchor. Timer ticks drive the countdown
//! and combo decay; charged cores fire abilities.
//!
//! # Determinism
//!
//! The engine never reads the wall clock. Time only moves through
//! [`SelectionEngine::advance_clock`] and [`SelectionEngine::update_timer`],
//! and all randomness comes from the board's seeded RNG, so the same
//! config, cores and input sequence always yield the same state hash.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::hex::HexCoord;
use crate::game::ability::activate_ability;
use crate::game::color::NodeColor;
use crate::game::events::GameEvent;
use crate::game::grid::{HexGrid, Node};
use crate::game::pattern::{analyze_pattern, MatchPattern, MIN_MATCH_SIZE};
use crate::game::state::{RoundConfig, RoundPhase, RoundState, RoundSummary};
use crate::progression::cores::CoreManager;

/// Combo gained per match.
pub const COMBO_STEP: f32 = 0.5;

/// Combo ceiling reachable through matches.
pub const MAX_MATCH_COMBO: f32 = 5.0;

/// Base points per matched node.
pub const POINTS_PER_NODE: f32 = 10.0;

/// Points for a match of `count` nodes.
pub fn match_score(count: usize, pattern: MatchPattern, combo: f32, score_multiplier: f32) -> u32 {
    (count as f32 * POINTS_PER_NODE * pattern.multiplier() * combo * score_multiplier).round() as u32
}

/// Chain-selection state machine for one round.
#[derive(Clone, Debug)]
pub struct SelectionEngine {
    pub(crate) config: RoundConfig,
    pub(crate) grid: HexGrid,
    pub(crate) cores: CoreManager,
    pub(crate) round: RoundState,
    pub(crate) selection: Vec<HexCoord>,
    pending_events: Vec<GameEvent>,
}

impl SelectionEngine {
    /// Build an engine with a fresh board. Call [`start_game`] to begin.
    ///
    /// [`start_game`]: SelectionEngine::start_game
    pub fn new(config: RoundConfig, cores: CoreManager) -> Self {
        let grid = build_grid(&config);
        let round = RoundState::new(config.duration_secs);
        Self {
            config,
            grid,
            cores,
            round,
            selection: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    /// Engine around a prepared board, for hosts that lay out their own.
    pub fn with_grid(config: RoundConfig, cores: CoreManager, grid: HexGrid) -> Self {
        let round = RoundState::new(config.duration_secs);
        Self {
            config,
            grid,
            cores,
            round,
            selection: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    /// Start (or restart) the round.
    ///
    /// Regenerates the board from the config seed, resets score, timer,
    /// combo and core energy, then announces score and time.
    pub fn start_game(&mut self) {
        self.grid = build_grid(&self.config);
        self.reset_round();
    }

    /// Start the round on the current board without regenerating it.
    pub fn start_on_current_board(&mut self) {
        self.reset_round();
    }

    fn reset_round(&mut self) {
        self.round = RoundState::new(self.config.duration_secs);
        self.selection.clear();
        self.cores.reset_energy();

        info!(
            seed = self.config.seed,
            nodes = self.grid.len(),
            duration = self.config.duration_secs,
            daily = self.config.daily,
            "round started"
        );

        self.push_event(GameEvent::score_changed(0, 0));
        self.push_event(GameEvent::time_changed(0, self.round.time_remaining));
    }

    // -------------------------------------------------------------------------
    // Selection protocol
    // -------------------------------------------------------------------------

    /// Handle a tap on `coord`. Returns true if the selection changed.
    ///
    /// - empty chain: the node becomes the anchor
    /// - tapped node already selected: the whole chain is dropped
    /// - adjacent to the anchor with the anchor's colour (or wildcard): it
    ///   is appended, and the chain resolves if it cannot grow further
    /// - anything else: the chain restarts from the tapped node
    pub fn select_node(&mut self, coord: HexCoord) -> bool {
        if self.round.phase != RoundPhase::Playing {
            return false;
        }
        let Some(color) = self.grid.get(coord).filter(|n| n.is_live()).map(|n| n.color) else {
            return false;
        };

        let Some(&anchor) = self.selection.first() else {
            self.append_to_chain(coord);
            return true;
        };

        if self.selection.contains(&coord) {
            self.clear_selection();
            return true;
        }

        let anchor_color = self.anchor_color(anchor);
        if coord.is_adjacent_to(anchor) && color.connects_to(anchor_color) {
            self.append_to_chain(coord);
            if !self.can_extend(coord, anchor_color) {
                self.process_selection();
            }
            return true;
        }

        self.clear_selection();
        self.append_to_chain(coord);
        true
    }

    /// Resolve the current chain as a match attempt.
    ///
    /// Chains under three nodes are dropped. Otherwise the connected group
    /// around the anchor (which may be larger than the chain) is matched if
    /// it reaches three nodes. Ignored unless the round is playing.
    pub fn process_selection(&mut self) {
        if self.round.phase != RoundPhase::Playing {
            return;
        }
        if self.selection.len() < MIN_MATCH_SIZE {
            self.clear_selection();
            return;
        }
        let anchor = self.selection[0];
        let color = self.anchor_color(anchor);

        let group = self.grid.find_matches(anchor);
        if group.is_empty() {
            self.clear_selection();
            return;
        }
        self.execute_match(group, color);
    }

    fn append_to_chain(&mut self, coord: HexCoord) {
        if let Some(node) = self.grid.get_mut(coord) {
            node.selected = true;
        }
        self.selection.push(coord);
    }

    pub(crate) fn clear_selection(&mut self) {
        for coord in self.selection.drain(..) {
            if let Some(node) = self.grid.get_mut(coord) {
                node.selected = false;
            }
        }
    }

    fn anchor_color(&self, anchor: HexCoord) -> NodeColor {
        self.grid
            .get(anchor)
            .map(|n| n.color)
            .unwrap_or(NodeColor::Wildcard)
    }

    /// Any live, unselected neighbour of `coord` that could join the chain.
    fn can_extend(&self, coord: HexCoord, anchor_color: NodeColor) -> bool {
        coord.neighbors().into_iter().any(|neighbor| {
            self.grid.get(neighbor).is_some_and(|n| {
                n.is_live() && !n.selected && n.color.connects_to(anchor_color)
            })
        })
    }

    // -------------------------------------------------------------------------
    // Match execution
    // -------------------------------------------------------------------------

    /// Score, charge and mark a resolved group of `color`.
    pub(crate) fn execute_match(&mut self, coords: BTreeSet<HexCoord>, color: NodeColor) {
        self.round.phase = RoundPhase::Matching;
        let clock_ms = self.round.clock_ms;
        let count = coords.len();
        let pattern = analyze_pattern(&coords);

        self.round.combo = (self.round.combo + COMBO_STEP).min(MAX_MATCH_COMBO);
        self.round.highest_combo = self.round.highest_combo.max(self.round.combo);
        self.push_event(GameEvent::combo_changed(clock_ms, self.round.combo));

        let gained = match_score(count, pattern, self.round.combo, self.config.score_multiplier);
        self.round.score = self.round.score.saturating_add(gained);
        self.push_event(GameEvent::score_changed(clock_ms, self.round.score));

        if !color.is_wildcard() {
            let amount = count as u32;
            self.cores.add_energy(color, amount);
            *self.round.energy_collected.entry(color).or_insert(0) += amount;
            self.push_event(GameEvent::energy_collected(clock_ms, color, amount));
        }

        let snapshot: Vec<Node> = coords.iter().filter_map(|c| self.grid.get(*c)).cloned().collect();
        self.push_event(GameEvent::match_found(clock_ms, snapshot, pattern));

        self.clear_selection();
        self.grid.mark_matched(&coords);

        self.round.matches += 1;
        self.round.nodes_cleared += count as u32;
        self.round.last_match_ms = Some(clock_ms);
        match pattern {
            MatchPattern::Star => self.round.star_matches += 1,
            MatchPattern::Line => self.round.line_matches += 1,
            _ => {}
        }

        debug!(
            ?color,
            count,
            pattern = pattern.display_name(),
            combo = self.round.combo,
            gained,
            score = self.round.score,
            "match executed"
        );

        self.round.phase = RoundPhase::Playing;

        if self.config.refill_on_match {
            self.settle();
        }

        #[cfg(feature = "debug-tracing")]
        tracing::trace!(grid_hash = %hex::encode(self.grid.compute_hash()), "board after match");
    }

    /// Remove matched nodes and refill the gaps. Returns the new nodes.
    ///
    /// Does nothing unless the round is playing.
    pub fn settle(&mut self) -> Vec<Node> {
        if self.round.phase != RoundPhase::Playing {
            return Vec::new();
        }
        let matched = self.grid.matched_coords();
        if matched.is_empty() {
            return Vec::new();
        }
        self.grid.remove_nodes(&matched);
        let created = self.grid.fill_empty();
        debug!(refilled = created.len(), "board settled");
        created
    }

    // -------------------------------------------------------------------------
    // Time
    // -------------------------------------------------------------------------

    /// Move the round clock forward without ticking the countdown.
    ///
    /// Ignored unless the round is playing.
    pub fn advance_clock(&mut self, ms: u64) {
        if self.round.phase == RoundPhase::Playing {
            self.round.clock_ms = self.round.clock_ms.saturating_add(ms);
        }
    }

    /// One countdown tick.
    ///
    /// Decrements the timer and brings the clock up to the elapsed whole
    /// seconds, never moving it past time the host already supplied via
    /// [`advance_clock`](SelectionEngine::advance_clock). Then resets a stale
    /// combo and ends the round when time runs out. Only runs while playing.
    pub fn update_timer(&mut self) {
        if self.round.phase != RoundPhase::Playing {
            return;
        }
        self.round.ticks += 1;
        self.round.clock_ms = self.round.clock_ms.max(u64::from(self.round.ticks) * 1000);
        self.round.time_remaining -= 1;
        let clock_ms = self.round.clock_ms;

        self.push_event(GameEvent::time_changed(clock_ms, self.round.time_remaining));

        let since_match = clock_ms - self.round.last_match_ms.unwrap_or(0);
        if since_match > self.config.combo_timeout_ms && self.round.combo > 1.0 {
            self.round.combo = 1.0;
            self.push_event(GameEvent::combo_changed(clock_ms, 1.0));
        }

        if self.round.time_remaining <= 0 {
            self.end_round();
        }
    }

    fn end_round(&mut self) {
        self.clear_selection();
        self.round.phase = RoundPhase::GameOver;

        info!(
            score = self.round.score,
            matches = self.round.matches,
            nodes_cleared = self.round.nodes_cleared,
            "game over"
        );

        let event = GameEvent::game_over(
            self.round.clock_ms,
            self.round.score,
            self.round.energy_collected.clone(),
        );
        self.push_event(event);
    }

    /// Enter the paused state. Only valid while playing.
    pub fn pause(&mut self) -> bool {
        if self.round.phase != RoundPhase::Playing {
            return false;
        }
        self.round.phase = RoundPhase::Paused;
        true
    }

    /// Leave the paused state.
    pub fn resume(&mut self) -> bool {
        if self.round.phase != RoundPhase::Paused {
            return false;
        }
        self.round.phase = RoundPhase::Playing;
        true
    }

    // -------------------------------------------------------------------------
    // Abilities
    // -------------------------------------------------------------------------

    /// Fire the charged core for `color`. False if rejected.
    pub fn use_ability(&mut self, color: NodeColor) -> bool {
        activate_ability(self, color)
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Drain queued events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Round configuration.
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        self.round.phase
    }

    /// Accumulated score.
    pub fn score(&self) -> u32 {
        self.round.score
    }

    /// Seconds left.
    pub fn time_remaining(&self) -> i32 {
        self.round.time_remaining
    }

    /// Current combo multiplier.
    pub fn combo(&self) -> f32 {
        self.round.combo
    }

    /// Round clock.
    pub fn clock_ms(&self) -> u64 {
        self.round.clock_ms
    }

    /// The board.
    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    /// The player's cores.
    pub fn cores(&self) -> &CoreManager {
        &self.cores
    }

    /// Mutable cores (purchases between rounds, tests).
    pub fn cores_mut(&mut self) -> &mut CoreManager {
        &mut self.cores
    }

    /// Hand the cores back, e.g. to store them in a profile.
    pub fn into_cores(self) -> CoreManager {
        self.cores
    }

    /// Current chain, anchor first.
    pub fn selection(&self) -> &[HexCoord] {
        &self.selection
    }

    /// Energy gathered this round per colour.
    pub fn energy_collected(&self) -> &BTreeMap<NodeColor, u32> {
        &self.round.energy_collected
    }

    /// Round bookkeeping.
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    /// Whether any neighbour swap would produce a match.
    pub fn has_valid_moves(&mut self) -> bool {
        self.grid.has_valid_moves()
    }

    /// End-of-round snapshot for progression.
    pub fn summary(&self) -> RoundSummary {
        RoundSummary::from_round(&self.round, self.config.daily)
    }

    /// Hash of the board, round counters, chain and core energy.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.round.clock_ms, self.grid.rng_seed(), |hasher| {
            self.grid.hash_into(hasher);

            hasher.update_u8(self.round.phase as u8);
            hasher.update_u32(self.round.score);
            hasher.update_i32(self.round.time_remaining);
            hasher.update_u32(self.round.ticks);
            hasher.update_f32(self.round.combo);
            hasher.update_u64(self.round.last_match_ms.unwrap_or(u64::MAX));
            for (color, energy) in &self.round.energy_collected {
                hasher.update_u8(*color as u8);
                hasher.update_u32(*energy);
            }

            hasher.update_u32(self.selection.len() as u32);
            for coord in &self.selection {
                hasher.update_coord(*coord);
            }

            for core in self.cores.cores() {
                hasher.update_u8(core.color as u8);
                hasher.update_u8(core.level);
                hasher.update_bool(core.unlocked);
                hasher.update_u32(core.current_energy);
            }
        })
    }
}

/// Fresh board for `config`, with its starting wildcards applied.
fn build_grid(config: &RoundConfig) -> HexGrid {
    let mut grid = HexGrid::new(config.grid_size, config.seed);
    if config.initial_wildcards > 0 {
        grid.create_wildcards(config.initial_wildcards);
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::color::BASIC_COLORS;
    use crate::game::events::GameEventData;

    /// Every hex in column q gets the same colour, so each column is a
    /// same-colour line and neighbouring columns always differ.
    fn striped(coord: HexCoord) -> NodeColor {
        BASIC_COLORS[coord.q().rem_euclid(5) as usize]
    }

    fn striped_engine(config: RoundConfig) -> SelectionEngine {
        let grid = HexGrid::from_fn(config.grid_size, config.seed, striped);
        let mut engine = SelectionEngine::with_grid(config, CoreManager::new(), grid);
        engine.start_on_current_board();
        engine.take_events();
        engine
    }

    fn no_refill() -> RoundConfig {
        RoundConfig { refill_on_match: false, ..RoundConfig::seeded(3) }
    }

    #[test]
    fn test_match_score() {
        assert_eq!(match_score(6, MatchPattern::Line, 2.0, 1.0), 240);
        assert_eq!(match_score(3, MatchPattern::Regular, 1.5, 1.0), 45);
        assert_eq!(match_score(3, MatchPattern::Regular, 1.5, 2.0), 90);
    }

    #[test]
    fn test_start_game_announces() {
        let mut engine = SelectionEngine::new(RoundConfig::seeded(1), CoreManager::new());
        engine.start_game();

        let events = engine.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, GameEventData::ScoreChanged { score: 0 });
        assert_eq!(events[1].data, GameEventData::TimeChanged { seconds_remaining: 60 });
        assert_eq!(engine.phase(), RoundPhase::Playing);
    }

    #[test]
    fn test_first_tap_anchors() {
        let mut engine = striped_engine(no_refill());
        assert!(engine.select_node(HexCoord::ORIGIN));
        assert_eq!(engine.selection(), &[HexCoord::ORIGIN]);
        assert!(engine.grid().get(HexCoord::ORIGIN).is_some_and(|n| n.selected));
    }

    #[test]
    fn test_retap_clears_chain() {
        let mut engine = striped_engine(no_refill());
        engine.select_node(HexCoord::ORIGIN);
        assert!(engine.select_node(HexCoord::ORIGIN));
        assert!(engine.selection().is_empty());
        assert!(engine.grid().get(HexCoord::ORIGIN).is_some_and(|n| !n.selected));
    }

    #[test]
    fn test_non_adjacent_tap_restarts_chain() {
        let mut engine = striped_engine(no_refill());
        engine.select_node(HexCoord::ORIGIN);

        let far = HexCoord::new(0, 3);
        assert!(engine.select_node(far));
        assert_eq!(engine.selection(), &[far]);
    }

    #[test]
    fn test_wrong_colour_neighbour_restarts_chain() {
        let mut engine = striped_engine(no_refill());
        engine.select_node(HexCoord::ORIGIN);

        // Column q = 1 is a different colour
        let other = HexCoord::new(1, 0);
        assert!(engine.select_node(other));
        assert_eq!(engine.selection(), &[other]);
    }

    #[test]
    fn test_column_chain_resolves_whole_line() {
        let mut engine = striped_engine(no_refill());

        // Column q = 0 on a radius-3 board has seven hexes
        assert!(engine.select_node(HexCoord::ORIGIN));
        assert!(engine.select_node(HexCoord::new(0, 1)));
        assert_eq!(engine.selection().len(), 2);

        // (0, -1) can still extend the chain via (0, -2)
        assert!(engine.select_node(HexCoord::new(0, -1)));
        assert_eq!(engine.selection().len(), 3);

        engine.process_selection();
        assert!(engine.selection().is_empty());
        assert_eq!(engine.grid().matched_coords().len(), 7);

        // LINE x2.0, combo 1.5 after the first match
        assert_eq!(engine.score(), match_score(7, MatchPattern::Line, 1.5, 1.0));
        assert_eq!(engine.score(), 210);
        assert_eq!(engine.energy_collected()[&NodeColor::Red], 7);
    }

    #[test]
    fn test_short_chain_dropped() {
        let mut engine = striped_engine(no_refill());
        engine.select_node(HexCoord::ORIGIN);
        engine.select_node(HexCoord::new(0, 1));
        engine.process_selection();

        assert!(engine.selection().is_empty());
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_matched_nodes_are_vacant() {
        let mut engine = striped_engine(no_refill());
        let group = engine.grid().find_matches(HexCoord::ORIGIN);
        engine.execute_match(group, NodeColor::Red);

        assert!(!engine.select_node(HexCoord::ORIGIN));

        let created = engine.settle();
        assert_eq!(created.len(), 7);
        assert!(engine.grid().matched_coords().is_empty());
        assert!(engine.select_node(HexCoord::ORIGIN));
    }

    #[test]
    fn test_refill_on_match_settles() {
        let config = RoundConfig { refill_on_match: true, ..RoundConfig::seeded(3) };
        let mut engine = striped_engine(config);
        let group = engine.grid().find_matches(HexCoord::ORIGIN);
        engine.execute_match(group, NodeColor::Red);

        assert!(engine.grid().matched_coords().is_empty());
        assert_eq!(engine.grid().len(), 37);
    }

    #[test]
    fn test_combo_grows_and_caps() {
        let mut engine = striped_engine(RoundConfig::seeded(3));
        for _ in 0..10 {
            let group = engine.grid().find_connected_group(HexCoord::ORIGIN);
            let color = engine.grid().get(HexCoord::ORIGIN).map(|n| n.color).unwrap();
            engine.execute_match(group, color);
        }
        assert_eq!(engine.combo(), MAX_MATCH_COMBO);
        assert_eq!(engine.round().highest_combo, MAX_MATCH_COMBO);
    }

    #[test]
    fn test_combo_resets_after_timeout() {
        let mut engine = striped_engine(no_refill());
        let group = engine.grid().find_matches(HexCoord::ORIGIN);
        engine.execute_match(group, NodeColor::Red);
        assert_eq!(engine.combo(), 1.5);
        engine.take_events();

        // Gap of 1000 and then 2000 ms: not yet stale
        engine.update_timer();
        engine.update_timer();
        assert_eq!(engine.combo(), 1.5);

        // 3000 ms since the match
        engine.update_timer();
        assert_eq!(engine.combo(), 1.0);

        let resets = engine
            .take_events()
            .into_iter()
            .filter(|e| matches!(e.data, GameEventData::ComboChanged { .. }))
            .count();
        assert_eq!(resets, 1);
    }

    #[test]
    fn test_quick_matches_keep_combo() {
        let mut engine = striped_engine(no_refill());
        let first = engine.grid().find_matches(HexCoord::ORIGIN);
        engine.execute_match(first, NodeColor::Red);

        engine.advance_clock(1500);
        let second = engine.grid().find_matches(HexCoord::new(1, 0));
        engine.execute_match(second, NodeColor::Blue);
        assert_eq!(engine.combo(), 2.0);

        // 500 ms after the second match
        engine.update_timer();
        assert_eq!(engine.combo(), 2.0);
    }

    #[test]
    fn test_timer_runs_out_once() {
        let mut engine = SelectionEngine::new(RoundConfig::seeded(5), CoreManager::new());
        engine.start_game();
        engine.take_events();

        for _ in 0..70 {
            engine.update_timer();
        }

        let events = engine.take_events();
        let overs: Vec<_> = events.iter().filter(|e| e.is_game_over()).collect();
        assert_eq!(overs.len(), 1);
        assert_eq!(engine.phase(), RoundPhase::GameOver);
        assert_eq!(engine.time_remaining(), 0);
        assert_eq!(engine.clock_ms(), 60_000);
    }

    #[test]
    fn test_paused_chain_does_not_resolve() {
        let mut engine = striped_engine(no_refill());
        engine.select_node(HexCoord::ORIGIN);
        engine.select_node(HexCoord::new(0, 1));
        engine.select_node(HexCoord::new(0, -1));
        assert_eq!(engine.selection().len(), 3);

        assert!(engine.pause());
        engine.process_selection();
        assert!(engine.settle().is_empty());

        assert_eq!(engine.phase(), RoundPhase::Paused);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.selection().len(), 3);
        assert!(engine.grid().matched_coords().is_empty());
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_host_clock_and_ticks_stay_in_step() {
        let mut engine = striped_engine(no_refill());
        for _ in 0..10 {
            engine.advance_clock(1000);
            engine.update_timer();
        }
        assert_eq!(engine.time_remaining(), 50);
        assert_eq!(engine.clock_ms(), 10_000);
        assert_eq!(engine.summary().play_time_secs, 10);

        // Partial host time is topped up to the tick boundary
        engine.advance_clock(300);
        engine.update_timer();
        assert_eq!(engine.clock_ms(), 11_000);

        // Host running ahead keeps its time
        engine.advance_clock(2500);
        engine.update_timer();
        assert_eq!(engine.clock_ms(), 13_500);
        assert_eq!(engine.time_remaining(), 48);

        // Extra countdown time does not stall the clock
        engine.round.time_remaining += 15;
        engine.update_timer();
        assert_eq!(engine.clock_ms(), 13_500);
        engine.update_timer();
        assert_eq!(engine.clock_ms(), 14_000);
        assert_eq!(engine.time_remaining(), 61);
    }

    #[test]
    fn test_no_selection_after_game_over() {
        let config = RoundConfig { duration_secs: 1, ..RoundConfig::seeded(5) };
        let mut engine = SelectionEngine::new(config, CoreManager::new());
        engine.start_game();
        engine.update_timer();

        assert_eq!(engine.phase(), RoundPhase::GameOver);
        assert!(!engine.select_node(HexCoord::ORIGIN));
    }

    #[test]
    fn test_pause_blocks_input_and_timer() {
        let mut engine = striped_engine(no_refill());
        assert!(engine.pause());
        assert!(!engine.pause());

        assert!(!engine.select_node(HexCoord::ORIGIN));
        engine.update_timer();
        engine.advance_clock(5000);
        assert_eq!(engine.time_remaining(), 60);
        assert_eq!(engine.clock_ms(), 0);

        assert!(engine.resume());
        assert!(engine.select_node(HexCoord::ORIGIN));
    }

    #[test]
    fn test_wildcard_match_collects_no_energy() {
        let config = no_refill();
        let grid = HexGrid::from_fn(config.grid_size, config.seed, |c| {
            if c.q() == 0 { NodeColor::Wildcard } else { striped(c) }
        });
        let mut engine = SelectionEngine::with_grid(config, CoreManager::new(), grid);
        engine.start_on_current_board();

        let group = engine.grid().find_matches(HexCoord::ORIGIN);
        assert_eq!(group.len(), 7);
        engine.execute_match(group, NodeColor::Wildcard);

        assert!(engine.energy_collected().values().all(|v| *v == 0));
        assert!(!engine
            .take_events()
            .iter()
            .any(|e| matches!(e.data, GameEventData::EnergyCollected { .. })));
    }

    #[test]
    fn test_hash_is_reproducible() {
        let run = || {
            let mut engine = SelectionEngine::new(RoundConfig::seeded(77), CoreManager::new());
            engine.start_game();
            engine.select_node(HexCoord::ORIGIN);
            engine.update_timer();
            engine.compute_hash()
        };
        assert_eq!(run(), run());

        let mut other = SelectionEngine::new(RoundConfig::seeded(78), CoreManager::new());
        other.start_game();
        other.select_node(HexCoord::ORIGIN);
        other.update_timer();
        assert_ne!(run(), other.compute_hash());
    }
}
