//! Progression Module
//!
//! State that outlives a round: the Nexus Cores, achievements, the player
//! profile and its save format.

pub mod core;
pub mod cores;
pub mod achievement;
pub mod profile;
pub mod save;

pub use self::core::NexusCore;
pub use cores::CoreManager;
pub use achievement::Achievement;
pub use profile::{Profile, Statistics, GameRewards, PurchaseError};
pub use save::{SaveData, SaveError};
