//! End-to-end round tests.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use nexus_paths::game::ability::AbilityType;
use nexus_paths::game::input::{replay_round, InputAction};
use nexus_paths::game::pattern::MatchPattern;
use nexus_paths::{
    CoreManager, GameEventData, HexCoord, HexGrid, NodeColor, Profile, RoundConfig,
    RoundPhase, SaveData, SelectionEngine,
};

/// Proper 3-colouring of the hex lattice, never red.
fn lattice(coord: HexCoord) -> NodeColor {
    [NodeColor::Blue, NodeColor::Purple, NodeColor::Green][(coord.q() - coord.r()).rem_euclid(3) as usize]
}

fn triangle() -> [HexCoord; 3] {
    [HexCoord::new(0, 0), HexCoord::new(1, 0), HexCoord::new(1, -1)]
}

fn engine_on(config: RoundConfig, color_at: impl FnMut(HexCoord) -> NodeColor) -> SelectionEngine {
    let grid = HexGrid::from_fn(config.grid_size, config.seed, color_at);
    let mut engine = SelectionEngine::with_grid(config, CoreManager::new(), grid);
    engine.start_on_current_board();
    engine.take_events();
    engine
}

#[test]
fn test_three_node_chain_matches() {
    let red: BTreeSet<HexCoord> = triangle().into_iter().collect();
    let mut engine = engine_on(RoundConfig::seeded(11), |c| {
        if red.contains(&c) { NodeColor::Red } else { lattice(c) }
    });

    let [a, b, c] = triangle();
    assert!(engine.select_node(a));
    assert!(engine.select_node(b));
    assert_eq!(engine.selection().len(), 2);

    // Nothing red left to extend with: resolves on the third tap
    assert!(engine.select_node(c));
    assert!(engine.selection().is_empty());

    let events = engine.take_events();
    let matches: Vec<_> = events
        .iter()
        .filter_map(|e| match &e.data {
            GameEventData::MatchFound { nodes, pattern } => Some((nodes.len(), *pattern)),
            _ => None,
        })
        .collect();
    assert_eq!(matches, vec![(3, MatchPattern::Regular)]);

    let energy: Vec<_> = events
        .iter()
        .filter_map(|e| match &e.data {
            GameEventData::EnergyCollected { color, amount } => Some((*color, *amount)),
            _ => None,
        })
        .collect();
    assert_eq!(energy, vec![(NodeColor::Red, 3)]);

    // round(3 x 10 x 1.0 x 1.5)
    assert_eq!(engine.score(), 45);
    assert_eq!(engine.cores().get(NodeColor::Red).map(|c| c.current_energy), Some(3));
}

#[test]
fn test_sixty_idle_ticks_end_round() {
    let mut engine = SelectionEngine::new(RoundConfig::seeded(2), CoreManager::new());
    engine.start_game();
    engine.take_events();

    for _ in 0..60 {
        engine.update_timer();
    }
    assert_eq!(engine.phase(), RoundPhase::GameOver);

    // Further ticks change nothing
    engine.update_timer();

    let events = engine.take_events();
    let overs: Vec<_> = events
        .iter()
        .filter_map(|e| match &e.data {
            GameEventData::GameOver { final_score, energy_by_color } => Some((*final_score, energy_by_color.clone())),
            _ => None,
        })
        .collect();

    assert_eq!(overs.len(), 1);
    let (score, energy) = &overs[0];
    assert_eq!(*score, 0);
    assert_eq!(energy.len(), 5);
    assert!(energy.values().all(|v| *v == 0));

    let ticks = events
        .iter()
        .filter(|e| matches!(e.data, GameEventData::TimeChanged { .. }))
        .count();
    assert_eq!(ticks, 60);
}

#[test]
fn test_destroy_color_clears_and_discharges() {
    let config = RoundConfig { refill_on_match: false, ..RoundConfig::seeded(4) };
    let red: BTreeSet<HexCoord> = HexCoord::hexagon(3).into_iter().filter(|c| c.q() == 0).collect();
    let mut engine = engine_on(config, |c| {
        if red.contains(&c) { NodeColor::Red } else { lattice(c) }
    });

    engine.cores_mut().add_energy(NodeColor::Red, 100);
    assert!(engine.use_ability(NodeColor::Red));

    assert!(engine.grid().clear_color(NodeColor::Red).is_empty());
    assert_eq!(engine.grid().matched_coords(), red);

    // Seven-node column: LINE x2.0 at combo 1.5
    assert_eq!(engine.score(), 210);
    assert_eq!(engine.energy_collected()[&NodeColor::Red], 7);
    assert_eq!(engine.cores().get(NodeColor::Red).map(|c| c.current_energy), Some(0));

    let events = engine.take_events();
    assert!(events.iter().any(|e| e.data
        == GameEventData::AbilityUsed { color: NodeColor::Red, ability: AbilityType::DestroyColor }));
}

#[test]
fn test_uncharged_ability_rejected() {
    let mut engine = SelectionEngine::new(RoundConfig::seeded(4), CoreManager::new());
    engine.start_game();
    engine.cores_mut().add_energy(NodeColor::Red, 99);

    let before = engine.compute_hash();
    assert!(!engine.use_ability(NodeColor::Red));
    assert_eq!(engine.compute_hash(), before);
}

#[test]
fn test_daily_board_has_wildcards() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let mut engine = SelectionEngine::new(RoundConfig::daily(date), CoreManager::new());
    engine.start_game();

    let wildcards = engine.grid().nodes().filter(|n| n.color.is_wildcard()).count();
    assert_eq!(wildcards, 4);
    assert_eq!(engine.time_remaining(), 90);

    let other = SelectionEngine::new(RoundConfig::daily(date), CoreManager::new());
    assert_eq!(other.grid().compute_hash(), engine.grid().compute_hash());
}

#[test]
fn test_replay_matches_live_round() {
    let config = RoundConfig::seeded(31);
    let mut live = SelectionEngine::new(config.clone(), CoreManager::new());
    live.start_game();

    let mut actions = Vec::new();
    for (i, coord) in HexCoord::hexagon(3).into_iter().enumerate() {
        actions.push(InputAction::Select { coord });
        if i % 4 == 3 {
            actions.push(InputAction::Resolve);
            actions.push(InputAction::Tick);
        }
    }
    for action in &actions {
        action.apply(&mut live);
    }

    let (replayed, events) = replay_round(config, CoreManager::new(), &actions);
    assert_eq!(replayed.compute_hash(), live.compute_hash());
    assert_eq!(replayed.score(), live.score());
    assert!(!events.is_empty());
}

#[test]
fn test_round_into_save_and_back() {
    let red: BTreeSet<HexCoord> = triangle().into_iter().collect();
    let mut engine = engine_on(RoundConfig::seeded(11), |c| {
        if red.contains(&c) { NodeColor::Red } else { lattice(c) }
    });
    for coord in triangle() {
        engine.select_node(coord);
    }
    for _ in 0..60 {
        engine.update_timer();
    }

    let mut profile = Profile::new();
    let rewards = profile.record_game(&engine.summary());
    assert_eq!(rewards.shards_earned, 4);
    assert_eq!(profile.high_score, 45);

    let json = SaveData::from_profile(&profile).to_json().unwrap();
    let restored = SaveData::from_json(&json).into_profile();
    assert_eq!(restored, profile);
}
