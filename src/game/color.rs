//! Node colours.

use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;

/// Energy colour of a node.
///
/// Each basic colour feeds exactly one Nexus Core. `Wildcard` joins any
/// connected group but carries no energy of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum NodeColor {
    /// Warrior
    Red = 0,
    /// Mage
    Blue = 1,
    /// Rogue
    Purple = 2,
    /// Healer
    Green = 3,
    /// Artificer
    Yellow = 4,
    /// Universal
    Wildcard = 5,
}

/// The five basic colours in core order.
pub const BASIC_COLORS: [NodeColor; 5] = [
    NodeColor::Red,
    NodeColor::Blue,
    NodeColor::Purple,
    NodeColor::Green,
    NodeColor::Yellow,
];

impl NodeColor {
    /// Draw a uniformly random basic colour.
    pub fn random_basic(rng: &mut DeterministicRng) -> NodeColor {
        BASIC_COLORS[rng.next_int(BASIC_COLORS.len() as u32) as usize]
    }

    /// True for the wildcard variant.
    #[inline]
    pub fn is_wildcard(self) -> bool {
        self == NodeColor::Wildcard
    }

    /// Connectivity rule: a node joins a group seeded with `target` iff it
    /// has the same colour or is a wildcard.
    #[inline]
    pub fn connects_to(self, target: NodeColor) -> bool {
        self == target || self.is_wildcard()
    }

    /// Persisted name (`"RED"`, `"BLUE"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            NodeColor::Red => "RED",
            NodeColor::Blue => "BLUE",
            NodeColor::Purple => "PURPLE",
            NodeColor::Green => "GREEN",
            NodeColor::Yellow => "YELLOW",
            NodeColor::Wildcard => "WILDCARD",
        }
    }

    /// Parse a persisted name.
    pub fn from_name(name: &str) -> Option<NodeColor> {
        match name {
            "RED" => Some(NodeColor::Red),
            "BLUE" => Some(NodeColor::Blue),
            "PURPLE" => Some(NodeColor::Purple),
            "GREEN" => Some(NodeColor::Green),
            "YELLOW" => Some(NodeColor::Yellow),
            "WILDCARD" => Some(NodeColor::Wildcard),
            _ => None,
        }
    }
}
