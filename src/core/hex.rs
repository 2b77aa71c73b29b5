//! Axial Hex Coordinates
//!
//! Pointy-top hexagons addressed by `(q, r)` with the redundant cube
//! component `s = -q - r` kept alongside for symmetric distance math.

use serde::{Serialize, Deserialize};

/// Square root of three, used by the pixel projection.
const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// The six axial neighbour offsets, in canonical order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 6] = [
    (1, 0),   // Right
    (-1, 0),  // Left
    (0, 1),   // Bottom-right
    (0, -1),  // Top-left
    (1, -1),  // Top-right
    (-1, 1),  // Bottom-left
];

/// Axial hex coordinate.
///
/// The `s` component is derived at construction and never stored
/// independently, so `s == -q - r` holds for every value of this type.
/// Ordering is by `(q, r)` which gives BTreeMap-backed grids a stable
/// iteration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Axial", into = "Axial")]
pub struct HexCoord {
    q: i32,
    r: i32,
    s: i32,
}

/// Wire form: only the two independent axes are persisted.
#[derive(Clone, Copy, Serialize, Deserialize)]
struct Axial {
    q: i32,
    r: i32,
}

impl From<Axial> for HexCoord {
    fn from(a: Axial) -> Self {
        HexCoord::new(a.q, a.r)
    }
}

impl From<HexCoord> for Axial {
    fn from(c: HexCoord) -> Self {
        Axial { q: c.q, r: c.r }
    }
}

impl HexCoord {
    /// The origin hex.
    pub const ORIGIN: HexCoord = HexCoord { q: 0, r: 0, s: 0 };

    /// Create from axial components.
    #[inline]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Column axis.
    #[inline]
    pub const fn q(self) -> i32 {
        self.q
    }

    /// Row axis.
    #[inline]
    pub const fn r(self) -> i32 {
        self.r
    }

    /// Derived cube axis.
    #[inline]
    pub const fn s(self) -> i32 {
        self.s
    }

    /// All six neighbours, in [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors(self) -> [HexCoord; 6] {
        NEIGHBOR_OFFSETS.map(|(dq, dr)| HexCoord::new(self.q + dq, self.r + dr))
    }

    /// Hex distance.
    ///
    /// The sum of axis deltas is always even because of the `s` invariant,
    /// so the halving is exact.
    #[inline]
    pub fn distance(self, other: HexCoord) -> i32 {
        ((self.q - other.q).abs() + (self.r - other.r).abs() + (self.s - other.s).abs()) / 2
    }

    /// True iff `other` is one step away.
    #[inline]
    pub fn is_adjacent_to(self, other: HexCoord) -> bool {
        self.distance(other) == 1
    }

    /// Every hex within `range` steps of this one (including itself).
    pub fn range(self, range: i32) -> Vec<HexCoord> {
        let mut out = Vec::new();
        for dq in -range..=range {
            for dr in (-range).max(-dq - range)..=range.min(-dq + range) {
                out.push(HexCoord::new(self.q + dq, self.r + dr));
            }
        }
        out
    }

    /// Pointy-top axial-to-pixel projection for hexes of radius `size`.
    ///
    /// Any visual layer must use the same transform or hit-testing drifts.
    pub fn to_pixel(self, size: f32) -> (f32, f32) {
        let q = self.q as f64;
        let r = self.r as f64;
        let x = size * (SQRT_3 * q + SQRT_3 / 2.0 * r) as f32;
        let y = size * (3.0 / 2.0 * r) as f32;
        (x, y)
    }

    /// Hexagonal region of the given radius centred on the origin.
    ///
    /// Produces exactly `3R² + 3R + 1` coordinates.
    pub fn hexagon(radius: i32) -> Vec<HexCoord> {
        HexCoord::ORIGIN.range(radius)
    }

    /// Rectangular region using an odd-r row offset.
    pub fn rectangle(width: i32, height: i32) -> Vec<HexCoord> {
        let mut out = Vec::new();
        for r in 0..height {
            let offset = r / 2;
            for q in -offset..width - offset {
                out.push(HexCoord::new(q, r));
            }
        }
        out
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.s)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_neighbors_are_adjacent() {
        let c = HexCoord::new(2, -1);
        for n in c.neighbors() {
            assert!(c.is_adjacent_to(n));
            assert_eq!(c.distance(n), 1);
        }
    }

    #[test]
    fn test_distance_examples() {
        assert_eq!(HexCoord::new(0, 0).distance(HexCoord::new(3, -3)), 3);
        assert_eq!(HexCoord::new(-2, 1).distance(HexCoord::new(2, -1)), 4);
        assert_eq!(HexCoord::new(1, 1).distance(HexCoord::new(1, 1)), 0);
    }

    #[test]
    fn test_hexagon_sizes() {
        for radius in 0..6 {
            let coords = HexCoord::hexagon(radius);
            assert_eq!(coords.len() as i32, 3 * radius * radius + 3 * radius + 1);
            assert!(coords.iter().all(|c| c.distance(HexCoord::ORIGIN) <= radius));
        }
    }

    #[test]
    fn test_rectangle_size() {
        assert_eq!(HexCoord::rectangle(5, 4).len(), 20);
    }

    #[test]
    fn test_pixel_projection() {
        let (x, y) = HexCoord::new(0, 0).to_pixel(10.0);
        assert_eq!((x, y), (0.0, 0.0));

        let (x, y) = HexCoord::new(1, 0).to_pixel(10.0);
        assert!((x - 17.320_509).abs() < 1e-4);
        assert_eq!(y, 0.0);

        let (x, y) = HexCoord::new(0, 2).to_pixel(10.0);
        assert!((x - 17.320_509).abs() < 1e-4);
        assert!((y - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_serde_uses_axial_pair() {
        let json = serde_json::to_string(&HexCoord::new(2, -3)).unwrap();
        assert_eq!(json, r#"{"q":2,"r":-3}"#);

        let back: HexCoord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.s(), 1);
    }

    proptest! {
        #[test]
        fn prop_s_invariant(q in -1000i32..1000, r in -1000i32..1000) {
            let c = HexCoord::new(q, r);
            prop_assert_eq!(c.s(), -c.q() - c.r());
        }

        #[test]
        fn prop_adjacency_matches_distance(
            q1 in -50i32..50, r1 in -50i32..50,
            q2 in -50i32..50, r2 in -50i32..50,
        ) {
            let a = HexCoord::new(q1, r1);
            let b = HexCoord::new(q2, r2);
            prop_assert_eq!(a.distance(b) == 1, a.is_adjacent_to(b));
            prop_assert_eq!(a.distance(b), b.distance(a));
            prop_assert_eq!(a.distance(a), 0);
        }
    }
}
