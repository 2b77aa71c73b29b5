//! Core deterministic primitives.
//!
//! Hex coordinate math, the seeded RNG and state hashing. Nothing in here
//! knows about colours, scoring or rounds.

pub mod hex;
pub mod rng;
pub mod hash;

// Re-export core types
pub use self::hex::HexCoord;
pub use rng::DeterministicRng;
pub use hash::{StateHash, StateHasher, compute_state_hash};
