//! Game Logic Module
//!
//! All round simulation code. Deterministic for a given seed and input log.
//!
//! ## Module Structure
//!
//! - `color`: Node colours and the wildcard
//! - `grid`: Board storage, flood fill, refill, ability mutations
//! - `pattern`: Line / cluster / star classification
//! - `state`: Round phase, config and summary
//! - `engine`: Selection protocol, scoring, timer
//! - `ability`: Core abilities
//! - `events`: Notifications for rendering, sound and persistence
//! - `input`: Action log and replay

pub mod color;
pub mod grid;
pub mod pattern;
pub mod state;
pub mod engine;
pub mod ability;
pub mod events;
pub mod input;

// Re-export key types
pub use color::{NodeColor, BASIC_COLORS};
pub use grid::{HexGrid, Node};
pub use pattern::{MatchPattern, analyze_pattern};
pub use state::{RoundConfig, RoundPhase, RoundSummary};
pub use engine::SelectionEngine;
pub use ability::AbilityType;
pub use events::{GameEvent, GameEventData};
pub use input::{InputAction, InputLog, replay_round};
