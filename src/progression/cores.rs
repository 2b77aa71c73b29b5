//! Core Manager
//!
//! Owns the five Nexus Cores and routes energy to them by colour.

use serde::{Serialize, Deserialize};

use crate::game::color::NodeColor;
use crate::progression::core::NexusCore;

/// The player's set of cores, in fixed colour order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoreManager {
    cores: Vec<NexusCore>,
}

impl Default for CoreManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreManager {
    /// Stock cores.
    pub fn new() -> Self {
        Self { cores: NexusCore::defaults() }
    }

    /// Wrap an explicit core list.
    pub fn from_cores(cores: Vec<NexusCore>) -> Self {
        Self { cores }
    }

    /// Core for `color`.
    pub fn get(&self, color: NodeColor) -> Option<&NexusCore> {
        self.cores.iter().find(|c| c.color == color)
    }

    /// Mutable core for `color`.
    pub fn get_mut(&mut self, color: NodeColor) -> Option<&mut NexusCore> {
        self.cores.iter_mut().find(|c| c.color == color)
    }

    /// Position of the core in unlock order.
    pub fn index_of(&self, color: NodeColor) -> Option<usize> {
        self.cores.iter().position(|c| c.color == color)
    }

    /// All cores.
    pub fn cores(&self) -> &[NexusCore] {
        &self.cores
    }

    /// Unlocked cores only.
    pub fn unlocked(&self) -> impl Iterator<Item = &NexusCore> {
        self.cores.iter().filter(|c| c.unlocked)
    }

    /// Number of unlocked cores.
    pub fn unlocked_count(&self) -> usize {
        self.unlocked().count()
    }

    /// Route energy to the matching core. Returns whether it is now charged.
    pub fn add_energy(&mut self, color: NodeColor, amount: u32) -> bool {
        self.get_mut(color).is_some_and(|c| c.add_energy(amount))
    }

    /// Unlock a core. False if missing or already unlocked.
    pub fn unlock(&mut self, color: NodeColor) -> bool {
        match self.get_mut(color) {
            Some(core) if !core.unlocked => {
                core.unlocked = true;
                true
            }
            _ => false,
        }
    }

    /// Upgrade a core. False if missing or maxed.
    pub fn upgrade(&mut self, color: NodeColor) -> bool {
        self.get_mut(color).is_some_and(|c| c.upgrade())
    }

    /// Empty every core (new round).
    pub fn reset_energy(&mut self) {
        for core in &mut self.cores {
            core.discharge();
        }
    }

    /// Any core ready to fire.
    pub fn has_charged_core(&self) -> bool {
        self.cores.iter().any(|c| c.is_charged())
    }
}
