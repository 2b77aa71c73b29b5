//! # Nexus Paths
//!
//! Deterministic hex-grid match puzzle engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        NEXUS PATHS                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── hex.rs      - Axial hex coordinates                     │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Round logic (deterministic)               │
//! │  ├── grid.rs     - Board, flood fill, refill                 │
//! │  ├── pattern.rs  - Line / cluster / star detection           │
//! │  ├── engine.rs   - Selection protocol, scoring, timer        │
//! │  ├── ability.rs  - Core abilities                            │
//! │  ├── events.rs   - Notifications for the host                │
//! │  └── input.rs    - Action log and replay                     │
//! │                                                              │
//! │  progression/    - Persistent player state                   │
//! │  ├── core.rs     - Nexus Cores (energy, levels)              │
//! │  ├── profile.rs  - Shards, statistics, purchases             │
//! │  ├── achievement.rs - Achievement catalogue                  │
//! │  └── save.rs     - Lenient JSON save format                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are deterministic:
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time dependencies; the round clock is fed by the host
//! - All randomness from seeded Xorshift128+
//!
//! Given an identical config, cores and input log, a round produces the
//! same events and the same state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod progression;

// Re-export commonly used types
pub use self::core::hex::HexCoord;
pub use self::core::rng::DeterministicRng;
pub use game::color::NodeColor;
pub use game::engine::SelectionEngine;
pub use game::events::{GameEvent, GameEventData};
pub use game::grid::{HexGrid, Node};
pub use game::state::{RoundConfig, RoundPhase, RoundSummary};
pub use progression::{CoreManager, NexusCore, Profile, SaveData};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Round length in seconds
pub const ROUND_DURATION_SECS: i32 = 60;

/// Gap between matches after which the combo resets (ms)
pub const COMBO_TIMEOUT_MS: u64 = 2000;

/// Hexes across a standard board
pub const DEFAULT_GRID_SIZE: u32 = 7;
