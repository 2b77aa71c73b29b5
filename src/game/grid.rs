//! Hexagonal Node Grid
//!
//! Owns every node on the board, keyed by coordinate. The coordinate set is
//! fixed at construction; only colours and occupancy change afterwards.
//! Uses BTreeMap so iteration (and therefore shuffling, wildcard picks and
//! hashing) is deterministic for a given seed.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};
use crate::core::hex::HexCoord;
use crate::core::rng::DeterministicRng;
use crate::game::color::NodeColor;
use crate::game::pattern::MIN_MATCH_SIZE;

/// Draws allowed per coordinate when looking for a colour that does not
/// complete a same-colour triangle. After that the last draw is kept.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 20;

/// A single node on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Board position (never changes)
    pub coord: HexCoord,
    /// Current colour
    pub color: NodeColor,
    /// Part of the in-progress chain
    pub selected: bool,
    /// Matched and waiting to be removed
    pub matched: bool,
}

impl Node {
    /// Create an idle node.
    pub fn new(coord: HexCoord, color: NodeColor) -> Self {
        Self {
            coord,
            color,
            selected: false,
            matched: false,
        }
    }

    /// Drop selection and match flags.
    pub fn reset(&mut self) {
        self.selected = false;
        self.matched = false;
    }

    /// Selectable and eligible for connectivity.
    #[inline]
    pub fn is_live(&self) -> bool {
        !self.matched
    }
}

/// Result of choosing a colour for an empty coordinate during setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Colour that was placed
    pub color: NodeColor,
    /// Draws used (1..=MAX_PLACEMENT_ATTEMPTS)
    pub attempts: u32,
    /// False when the attempt cap was hit and the colour may complete a match
    pub clean: bool,
}

/// The board.
#[derive(Clone, Debug)]
pub struct HexGrid {
    radius: i32,
    coords: Vec<HexCoord>,
    nodes: BTreeMap<HexCoord, Node>,
    rng_seed: u64,
    rng: DeterministicRng,
    fallback_placements: u32,
}

impl HexGrid {
    /// Build a hexagonal board `grid_size` hexes across and fill it.
    ///
    /// Each coordinate gets a random basic colour, redrawn up to
    /// [`MAX_PLACEMENT_ATTEMPTS`] times while it would complete a local
    /// same-colour triangle. The board may therefore start with a match.
    pub fn new(grid_size: u32, seed: u64) -> Self {
        let mut grid = Self::empty(grid_size, seed);
        for coord in grid.coords.clone() {
            let mut rng = std::mem::take(&mut grid.rng);
            let placement = grid.choose_color(coord, || NodeColor::random_basic(&mut rng));
            grid.rng = rng;
            if !placement.clean {
                grid.fallback_placements += 1;
            }
            grid.nodes.insert(coord, Node::new(coord, placement.color));
        }
        grid
    }

    /// Build a board with caller-chosen colours.
    ///
    /// Refills after removal still draw from the seeded RNG.
    pub fn from_fn<F>(grid_size: u32, seed: u64, mut color_at: F) -> Self
    where
        F: FnMut(HexCoord) -> NodeColor,
    {
        let mut grid = Self::empty(grid_size, seed);
        for coord in grid.coords.clone() {
            grid.nodes.insert(coord, Node::new(coord, color_at(coord)));
        }
        grid
    }

    fn empty(grid_size: u32, seed: u64) -> Self {
        let radius = (grid_size.max(1) as i32 - 1) / 2;
        Self {
            radius,
            coords: HexCoord::hexagon(radius),
            nodes: BTreeMap::new(),
            rng_seed: seed,
            rng: DeterministicRng::new(seed),
            fallback_placements: 0,
        }
    }

    /// Pick a colour for `coord` with the bounded retry policy.
    ///
    /// `draw` supplies candidates; the last candidate is accepted once the
    /// cap is reached.
    pub fn choose_color<D>(&self, coord: HexCoord, mut draw: D) -> Placement
    where
        D: FnMut() -> NodeColor,
    {
        let mut color = draw();
        let mut attempts = 1;
        while self.would_create_match(coord, color) {
            if attempts >= MAX_PLACEMENT_ATTEMPTS {
                return Placement { color, attempts, clean: false };
            }
            color = draw();
            attempts += 1;
        }
        Placement { color, attempts, clean: true }
    }

    /// Local pre-check: placing `color` at `coord` would complete a
    /// same-colour triangle with two already-placed, mutually adjacent
    /// neighbours.
    pub fn would_create_match(&self, coord: HexCoord, color: NodeColor) -> bool {
        let same: Vec<HexCoord> = coord
            .neighbors()
            .into_iter()
            .filter(|n| self.nodes.get(n).is_some_and(|node| node.color == color))
            .collect();

        for (i, a) in same.iter().enumerate() {
            for b in &same[i + 1..] {
                if a.is_adjacent_to(*b) {
                    return true;
                }
            }
        }
        false
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Hex radius of the board.
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Seed the board was built from.
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// The fixed coordinate set.
    pub fn coords(&self) -> &[HexCoord] {
        &self.coords
    }

    /// True if `coord` is part of the board shape (occupied or not).
    pub fn in_bounds(&self, coord: HexCoord) -> bool {
        coord.distance(HexCoord::ORIGIN) <= self.radius
    }

    /// Number of occupied coordinates.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing is placed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Setup placements that hit the attempt cap.
    pub fn fallback_placements(&self) -> u32 {
        self.fallback_placements
    }

    /// Node at `coord`.
    pub fn get(&self, coord: HexCoord) -> Option<&Node> {
        self.nodes.get(&coord)
    }

    /// Mutable node at `coord`.
    pub fn get_mut(&mut self, coord: HexCoord) -> Option<&mut Node> {
        self.nodes.get_mut(&coord)
    }

    /// All nodes in coordinate order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Recolour a node. Returns false if the coordinate is empty.
    pub fn set_color(&mut self, coord: HexCoord, color: NodeColor) -> bool {
        match self.nodes.get_mut(&coord) {
            Some(node) => {
                node.color = color;
                true
            }
            None => false,
        }
    }

    /// Count of nodes per colour.
    pub fn color_counts(&self) -> BTreeMap<NodeColor, usize> {
        let mut counts = BTreeMap::new();
        for node in self.nodes.values() {
            *counts.entry(node.color).or_insert(0) += 1;
        }
        counts
    }

    /// Nearest node to a pixel position, if within one hex radius.
    ///
    /// `x`/`y` are relative to the board centre.
    pub fn find_node_at(&self, x: f32, y: f32, hex_size: f32) -> Option<&Node> {
        let dist_sq = |node: &Node| {
            let (nx, ny) = node.coord.to_pixel(hex_size);
            let dx = nx - x;
            let dy = ny - y;
            dx * dx + dy * dy
        };

        self.nodes
            .values()
            .min_by(|a, b| dist_sq(*a).total_cmp(&dist_sq(*b)))
            .filter(|node| dist_sq(*node).sqrt() <= hex_size)
    }

    // -------------------------------------------------------------------------
    // Connectivity
    // -------------------------------------------------------------------------

    /// Breadth-first flood fill from `seed`.
    ///
    /// A neighbour joins iff it is live and its colour equals the seed's
    /// colour or is a wildcard. Returns the full closure (possibly just the
    /// seed); empty if `seed` is vacant or already matched.
    pub fn find_connected_group(&self, seed: HexCoord) -> BTreeSet<HexCoord> {
        let mut connected = BTreeSet::new();
        let Some(start) = self.nodes.get(&seed).filter(|n| n.is_live()) else {
            return connected;
        };
        let target = start.color;

        let mut queue = VecDeque::from([seed]);
        connected.insert(seed);

        while let Some(current) = queue.pop_front() {
            for neighbor in current.neighbors() {
                if connected.contains(&neighbor) {
                    continue;
                }
                let joins = self
                    .nodes
                    .get(&neighbor)
                    .is_some_and(|n| n.is_live() && n.color.connects_to(target));
                if joins {
                    connected.insert(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }

        connected
    }

    /// Connected group from `seed`, or empty unless it reaches three nodes.
    pub fn find_matches(&self, seed: HexCoord) -> BTreeSet<HexCoord> {
        let group = self.find_connected_group(seed);
        if group.len() >= MIN_MATCH_SIZE {
            group
        } else {
            BTreeSet::new()
        }
    }

    /// Is there any neighbour swap that produces a match?
    ///
    /// Every swap is undone before the next check, including the one that
    /// finds a match, so the board is left exactly as it was.
    pub fn has_valid_moves(&mut self) -> bool {
        let coords: Vec<HexCoord> = self.nodes.keys().copied().collect();

        for coord in coords {
            for neighbor in coord.neighbors() {
                let (Some(a), Some(b)) = (self.nodes.get(&coord), self.nodes.get(&neighbor)) else {
                    continue;
                };
                if !a.is_live() || !b.is_live() {
                    continue;
                }
                let (color_a, color_b) = (a.color, b.color);

                self.set_color(coord, color_b);
                self.set_color(neighbor, color_a);

                let has_match = !self.find_matches(coord).is_empty()
                    || !self.find_matches(neighbor).is_empty();

                self.set_color(coord, color_a);
                self.set_color(neighbor, color_b);

                if has_match {
                    return true;
                }
            }
        }
        false
    }

    // -------------------------------------------------------------------------
    // Removal and refill
    // -------------------------------------------------------------------------

    /// Flag nodes as matched.
    pub fn mark_matched(&mut self, coords: &BTreeSet<HexCoord>) {
        for coord in coords {
            if let Some(node) = self.nodes.get_mut(coord) {
                node.matched = true;
                node.selected = false;
            }
        }
    }

    /// Coordinates currently flagged as matched.
    pub fn matched_coords(&self) -> BTreeSet<HexCoord> {
        self.nodes
            .values()
            .filter(|n| n.matched)
            .map(|n| n.coord)
            .collect()
    }

    /// Delete the given entries and return what was removed.
    pub fn remove_nodes(&mut self, coords: &BTreeSet<HexCoord>) -> Vec<Node> {
        coords.iter().filter_map(|c| self.nodes.remove(c)).collect()
    }

    /// Regenerate every vacant coordinate with a random basic colour.
    ///
    /// Returns the new nodes in coordinate order.
    pub fn fill_empty(&mut self) -> Vec<Node> {
        let mut created = Vec::new();
        for coord in &self.coords {
            if self.nodes.contains_key(coord) {
                continue;
            }
            let node = Node::new(*coord, NodeColor::random_basic(&mut self.rng));
            self.nodes.insert(*coord, node.clone());
            created.push(node);
        }
        created
    }

    // -------------------------------------------------------------------------
    // Ability effects
    // -------------------------------------------------------------------------

    /// Permute the existing colours across the board.
    ///
    /// Colour counts are preserved exactly; selection and match flags reset.
    pub fn shuffle(&mut self) {
        let mut colors: Vec<NodeColor> = self.nodes.values().map(|n| n.color).collect();
        self.rng.shuffle(&mut colors);

        for (node, color) in self.nodes.values_mut().zip(colors) {
            node.color = color;
            node.reset();
        }
    }

    /// Live nodes of exactly `color`. Nothing is removed.
    pub fn clear_color(&self, color: NodeColor) -> BTreeSet<HexCoord> {
        self.nodes
            .values()
            .filter(|n| n.is_live() && n.color == color)
            .map(|n| n.coord)
            .collect()
    }

    /// Turn `count` distinct random non-wildcard nodes into wildcards.
    pub fn create_wildcards(&mut self, count: usize) -> Vec<HexCoord> {
        let eligible: Vec<HexCoord> = self
            .nodes
            .values()
            .filter(|n| n.is_live() && !n.color.is_wildcard())
            .map(|n| n.coord)
            .collect();

        let picked: Vec<HexCoord> = self
            .rng
            .sample_indices(eligible.len(), count)
            .into_iter()
            .map(|i| eligible[i])
            .collect();

        for coord in &picked {
            self.set_color(*coord, NodeColor::Wildcard);
        }
        picked
    }

    // -------------------------------------------------------------------------
    // Verification
    // -------------------------------------------------------------------------

    /// Hash every node plus the RNG state.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_grid();
        hasher.update_i32(self.radius);
        for node in self.nodes.values() {
            self.hash_node(&mut hasher, node);
        }
        let [s0, s1] = self.rng.state();
        hasher.update_u64(s0);
        hasher.update_u64(s1);
        hasher.finalize()
    }

    /// Feed this board into an outer hasher.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_bytes(&self.compute_hash());
    }

    fn hash_node(&self, hasher: &mut StateHasher, node: &Node) {
        hasher.update_coord(node.coord);
        hasher.update_u8(node.color as u8);
        hasher.update_bool(node.selected);
        hasher.update_bool(node.matched);
    }
}

// =============================================================================
// TESTS
// =============================================================================
