//! Nexus Cores
//!
//! One core per basic colour. Matches of that colour charge it; a fully
//! charged core can be discharged for its ability.

use serde::{Serialize, Deserialize};

use crate::game::ability::AbilityType;
use crate::game::color::{NodeColor, BASIC_COLORS};

/// Highest level a core can reach.
pub const MAX_CORE_LEVEL: u8 = 3;

/// Energy needed to charge a level-1 core.
pub const BASE_MAX_ENERGY: u32 = 100;

/// Shard price to unlock each core, indexed by core order.
pub const UNLOCK_COSTS: [u32; 5] = [0, 1000, 2000, 3000, 5000];

/// Charge threshold after `level - 1` upgrades.
pub fn max_energy_for_level(level: u8) -> u32 {
    (1..level.min(MAX_CORE_LEVEL)).fold(BASE_MAX_ENERGY, |energy, _| energy * 3 / 2)
}

/// A per-colour ability unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NexusCore {
    /// Colour this core collects
    pub color: NodeColor,
    /// Display name
    pub name: String,
    /// Ability fired on discharge
    pub ability: AbilityType,
    /// 1..=3
    pub level: u8,
    /// Locked cores ignore energy
    pub unlocked: bool,
    /// 0..=max_energy
    pub current_energy: u32,
    /// Charge threshold
    pub max_energy: u32,
}

impl NexusCore {
    /// Create a level-1, empty core.
    pub fn new(color: NodeColor, name: &str, ability: AbilityType, unlocked: bool) -> Self {
        Self {
            color,
            name: name.to_string(),
            ability,
            level: 1,
            unlocked,
            current_energy: 0,
            max_energy: BASE_MAX_ENERGY,
        }
    }

    /// The five stock cores in order. Only the first starts unlocked.
    pub fn defaults() -> Vec<NexusCore> {
        BASIC_COLORS
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                let (name, ability) = Self::stock(color);
                NexusCore::new(color, name, ability, i == 0)
            })
            .collect()
    }

    fn stock(color: NodeColor) -> (&'static str, AbilityType) {
        match color {
            NodeColor::Red => ("Warrior Core", AbilityType::DestroyColor),
            NodeColor::Blue => ("Mage Core", AbilityType::ShuffleBoard),
            NodeColor::Purple => ("Rogue Core", AbilityType::CreateWildcards),
            NodeColor::Green => ("Healer Core", AbilityType::TimeExtension),
            NodeColor::Yellow | NodeColor::Wildcard => ("Artificer Core", AbilityType::ScoreMultiplier),
        }
    }

    /// Full and ready to discharge.
    #[inline]
    pub fn is_charged(&self) -> bool {
        self.current_energy == self.max_energy
    }

    /// Charge fraction in `[0, 1]`.
    pub fn energy_fraction(&self) -> f32 {
        if self.max_energy == 0 {
            return 0.0;
        }
        self.current_energy as f32 / self.max_energy as f32
    }

    /// Add energy, clamped to `max_energy`.
    ///
    /// Locked cores ignore it and return false. Otherwise returns whether
    /// the core is now charged.
    pub fn add_energy(&mut self, amount: u32) -> bool {
        if !self.unlocked {
            return false;
        }
        self.current_energy = self.current_energy.saturating_add(amount).min(self.max_energy);
        self.is_charged()
    }

    /// Empty the core.
    pub fn discharge(&mut self) {
        self.current_energy = 0;
    }

    /// Raise the level by one, growing `max_energy` by 1.5x (floored).
    ///
    /// Returns false at [`MAX_CORE_LEVEL`].
    pub fn upgrade(&mut self) -> bool {
        if self.level >= MAX_CORE_LEVEL {
            return false;
        }
        self.level += 1;
        self.max_energy = self.max_energy * 3 / 2;
        true
    }

    /// Restore a persisted level (clamped to 1..=3) with its matching
    /// charge threshold. Energy is emptied.
    pub fn set_level(&mut self, level: u8) {
        self.level = level.clamp(1, MAX_CORE_LEVEL);
        self.max_energy = max_energy_for_level(self.level);
        self.current_energy = 0;
    }

    /// Price of the next level, or `None` once no further upgrade exists.
    pub fn upgrade_cost(&self) -> Option<u32> {
        match self.level {
            1 => Some(500),
            2 => Some(1000),
            _ => None,
        }
    }

    /// Price to unlock the core at position `index`.
    pub fn unlock_cost(index: usize) -> Option<u32> {
        UNLOCK_COSTS.get(index).copied()
    }
}
