//! Nexus Paths Demo
//!
//! Plays a seeded round with a greedy bot, records it into a profile,
//! prints the save document and verifies the round by replaying its
//! input log.
//!
//! Usage: `nexus-paths [seed] [--daily]`

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use nexus_paths::{
    HexCoord, HexGrid, RoundConfig, RoundPhase, SelectionEngine, VERSION,
    game::{
        events::GameEventData,
        input::{replay_round, InputAction, InputLog},
    },
    progression::{Profile, SaveData},
};

/// Moves attempted per second of game time.
const MOVES_PER_SECOND: u64 = 2;

/// Think time between moves (ms).
const MOVE_DELAY_MS: u64 = 400;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Nexus Paths v{}", VERSION);

    let mut seed = 12345u64;
    let mut daily = false;
    for arg in std::env::args().skip(1) {
        if arg == "--daily" {
            daily = true;
        } else {
            seed = arg.parse().with_context(|| format!("invalid seed: {arg}"))?;
        }
    }

    let today = chrono::Local::now().date_naive();
    let config = if daily { RoundConfig::daily(today) } else { RoundConfig::seeded(seed) };

    demo_round(config, today)
}

/// Play, record and verify one round.
fn demo_round(config: RoundConfig, today: chrono::NaiveDate) -> Result<()> {
    info!("=== Starting Demo Round ===");
    info!("Seed: {}", config.seed);

    let mut profile = Profile::new();
    let starting_cores = profile.cores.clone();

    let mut engine = SelectionEngine::new(config.clone(), starting_cores.clone());
    engine.start_game();
    info!("Board: {} nodes, hash {}", engine.grid().len(), hex::encode(engine.grid().compute_hash()));

    let mut log = InputLog::new();
    let mut total_events = engine.take_events().len();

    while engine.phase() != RoundPhase::GameOver {
        for _ in 0..MOVES_PER_SECOND {
            if let Some(taps) = plan_move(engine.grid()) {
                play_move(&mut engine, &mut log, &taps);
            }
            log.apply(&mut engine, InputAction::AdvanceClock { ms: MOVE_DELAY_MS });
        }

        let charged: Vec<_> = engine
            .cores()
            .unlocked()
            .filter(|c| c.is_charged())
            .map(|c| c.color)
            .collect();
        for color in charged {
            log.apply(&mut engine, InputAction::UseAbility { color });
        }

        log.apply(&mut engine, InputAction::Tick);

        for event in engine.take_events() {
            total_events += 1;
            match &event.data {
                GameEventData::MatchFound { nodes, pattern } => {
                    info!("{:>6} ms: {} x{} ({})", event.clock_ms, nodes.len(), pattern.multiplier(), pattern.display_name());
                }
                GameEventData::AbilityUsed { color, ability } => {
                    info!("{:>6} ms: {} core fired {}", event.clock_ms, color.name(), ability.display_name());
                }
                GameEventData::GameOver { final_score, energy_by_color } => {
                    info!("Round over! Score: {}, energy: {:?}", final_score, energy_by_color);
                }
                _ => {}
            }
        }
    }

    // Final results
    info!("=== Round Results ===");
    let hash = engine.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Actions: {}, events: {}", log.len(), total_events);

    for core in engine.cores().unlocked() {
        info!("{} core: {:.0}% charged", core.color.name(), core.energy_fraction() * 100.0);
    }

    let summary = engine.summary();
    let rewards = profile.record_game(&summary);
    info!(
        "Shards earned: {} (+{} from achievements), unlocked: {:?}",
        rewards.shards_earned, rewards.achievement_shards, rewards.unlocked
    );
    if summary.daily && profile.complete_daily(today) {
        info!("Daily challenge complete");
    }

    let json = SaveData::from_profile(&profile).to_json()?;
    println!("{json}");

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay_round(config, starting_cores, log.actions());
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    anyhow::ensure!(hash == replay_hash, "DETERMINISM FAILURE: hashes differ");
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}

/// First matchable group on the board, as taps: the anchor followed by
/// its neighbours inside the group.
fn plan_move(grid: &HexGrid) -> Option<Vec<HexCoord>> {
    grid.coords().iter().find_map(|&anchor| {
        let group = grid.find_matches(anchor);
        let taps: Vec<HexCoord> = std::iter::once(anchor)
            .chain(anchor.neighbors().into_iter().filter(|n| group.contains(n)))
            .collect();
        (taps.len() >= 3).then_some(taps)
    })
}

fn play_move(engine: &mut SelectionEngine, log: &mut InputLog, taps: &[HexCoord]) {
    for &coord in taps {
        log.apply(engine, InputAction::Select { coord });
        if engine.selection().is_empty() {
            return;
        }
    }
    log.apply(engine, InputAction::Resolve);
}
