//! Match Pattern Classification
//!
//! Special shapes inside a matched group earn a score multiplier.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

use crate::core::hex::HexCoord;

/// Shape of a matched group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MatchPattern {
    /// Not a match (fewer than three nodes)
    None = 0,
    /// Plain connected group
    Regular = 1,
    /// Five or more along one axis
    Line = 2,
    /// Seven or more with no better shape
    Cluster = 3,
    /// A hub surrounded by at least five group members
    Star = 4,
}

impl MatchPattern {
    /// Score multiplier applied to the base score.
    pub fn multiplier(self) -> f32 {
        match self {
            MatchPattern::None | MatchPattern::Regular => 1.0,
            MatchPattern::Line => 2.0,
            MatchPattern::Cluster => 2.5,
            MatchPattern::Star => 3.0,
        }
    }

    /// Banner text for the presentation layer.
    pub fn display_name(self) -> &'static str {
        match self {
            MatchPattern::None => "",
            MatchPattern::Regular => "Match!",
            MatchPattern::Line => "Line Match!",
            MatchPattern::Cluster => "Cluster!",
            MatchPattern::Star => "Star Match!",
        }
    }
}

/// Minimum group size that counts as a match.
pub const MIN_MATCH_SIZE: usize = 3;

/// Classify a matched group.
///
/// Checks run in priority order STAR, LINE, CLUSTER, REGULAR; a group that
/// qualifies as both star and line is a star.
pub fn analyze_pattern(coords: &BTreeSet<HexCoord>) -> MatchPattern {
    let size = coords.len();
    if size < MIN_MATCH_SIZE {
        return MatchPattern::None;
    }

    if size >= 6 {
        let has_hub = coords.iter().any(|c| {
            c.neighbors().iter().filter(|n| coords.contains(n)).count() >= 5
        });
        if has_hub {
            return MatchPattern::Star;
        }
    }

    if size >= 5 && is_line(coords) {
        return MatchPattern::Line;
    }

    if size >= 7 {
        return MatchPattern::Cluster;
    }

    MatchPattern::Regular
}

/// All coordinates share one of the three cube axes.
fn is_line(coords: &BTreeSet<HexCoord>) -> bool {
    let Some(first) = coords.iter().next() else {
        return false;
    };
    coords.iter().all(|c| c.q() == first.q())
        || coords.iter().all(|c| c.r() == first.r())
        || coords.iter().all(|c| c.s() == first.s())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(coords: &[(i32, i32)]) -> BTreeSet<HexCoord> {
        coords.iter().map(|&(q, r)| HexCoord::new(q, r)).collect()
    }

    #[test]
    fn test_too_small_is_none() {
        assert_eq!(analyze_pattern(&set(&[(0, 0), (1, 0)])), MatchPattern::None);
    }

    #[test]
    fn test_regular() {
        let group = set(&[(0, 0), (1, 0), (0, 1)]);
        assert_eq!(analyze_pattern(&group), MatchPattern::Regular);
    }

    #[test]
    fn test_line_on_each_axis() {
        let same_q = set(&[(0, -2), (0, -1), (0, 0), (0, 1), (0, 2)]);
        let same_r = set(&[(-2, 0), (-1, 0), (0, 0), (1, 0), (2, 0)]);
        let same_s = set(&[(-2, 2), (-1, 1), (0, 0), (1, -1), (2, -2)]);

        assert_eq!(analyze_pattern(&same_q), MatchPattern::Line);
        assert_eq!(analyze_pattern(&same_r), MatchPattern::Line);
        assert_eq!(analyze_pattern(&same_s), MatchPattern::Line);
    }

    #[test]
    fn test_four_in_a_row_is_regular() {
        let group = set(&[(0, 0), (0, 1), (0, 2), (0, 3)]);
        assert_eq!(analyze_pattern(&group), MatchPattern::Regular);
    }

    #[test]
    fn test_star_needs_hub_with_five_neighbors() {
        // Origin plus five of its six neighbours
        let group = set(&[(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1), (1, -1)]);
        assert_eq!(analyze_pattern(&group), MatchPattern::Star);
    }

    #[test]
    fn test_cluster() {
        // Seven nodes, no hub with five neighbours, not a line
        let group = set(&[(0, 0), (1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(analyze_pattern(&group), MatchPattern::Cluster);
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(MatchPattern::None.multiplier(), 1.0);
        assert_eq!(MatchPattern::Regular.multiplier(), 1.0);
        assert_eq!(MatchPattern::Line.multiplier(), 2.0);
        assert_eq!(MatchPattern::Cluster.multiplier(), 2.5);
        assert_eq!(MatchPattern::Star.multiplier(), 3.0);
    }
}
