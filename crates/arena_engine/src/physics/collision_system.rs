//! Broad-phase collision detection between two typed grids
//!
//! For every active item `a` in grid A, the detector looks up the cell that
//! `a`'s bounds origin falls in on grid B and scans the surrounding 3×3
//! block. The first active `b` whose bounds intersect `a`'s bounds produces
//! one event and ends the search for that `a`.
//!
//! First-hit semantics are deliberate: a source item matches at most one
//! target per pass, and a target already matched in this pass is not
//! offered to later sources. One bullet overlapping two hostiles only
//! destroys one of them.
//!
//! Scan order is grid A's column-major cell order, then each cell's items
//! from newest to oldest; the neighbourhood on grid B is column-major
//! and each neighbour cell is again read newest first.

use crate::physics::collision::ColliderLookup;
use crate::spatial::SpatialGrid;
use std::collections::HashSet;
use std::hash::Hash;

/// Label attached to every event of one detection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionKind(pub &'static str);

/// Transient result of one detection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent<A, B> {
    /// Item from the source grid
    pub a: A,

    /// Item from the target grid
    pub b: B,

    /// Kind of pairing that produced the event
    pub kind: CollisionKind,
}

/// Pairwise collision resolution between a source grid and a target grid
#[derive(Debug)]
pub struct CollisionDetector<B> {
    kind: CollisionKind,
    matched: HashSet<B>,
    /// Candidate pairs tested in the last pass, for profiling
    pub last_pairs_tested: usize,
}

impl<B: Copy + Eq + Hash> CollisionDetector<B> {
    /// Create a detector producing events of `kind`
    pub fn new(kind: CollisionKind) -> Self {
        Self {
            kind,
            matched: HashSet::new(),
            last_pairs_tested: 0,
        }
    }

    /// Kind attached to produced events
    pub const fn kind(&self) -> CollisionKind {
        self.kind
    }

    /// Report every first-hit collision between items of `grid_a` and `grid_b`
    ///
    /// `cell_size` maps a source item's bounds origin into grid B's cell
    /// coordinates; it must match the size grid B was built with.
    pub fn detect<A, L>(
        &mut self,
        grid_a: &SpatialGrid<A>,
        grid_b: &SpatialGrid<B>,
        cell_size: f32,
        lookup: &L,
    ) -> Vec<CollisionEvent<A, B>>
    where
        A: Copy,
        L: ColliderLookup<A> + ColliderLookup<B>,
    {
        debug_assert!(
            (cell_size - grid_b.cell_size()).abs() <= f32::EPSILON,
            "detection cell size {cell_size} differs from target grid cell size {}",
            grid_b.cell_size()
        );

        let mut events = Vec::new();
        self.matched.clear();
        self.last_pairs_tested = 0;

        if grid_b.is_empty() {
            return events;
        }

        for (_, cell_a) in grid_a.occupied_cells() {
            for &a in cell_a.iter().rev() {
                let Some(collider_a) = lookup.collider(a) else {
                    continue;
                };
                if !collider_a.is_active() {
                    continue;
                }
                let bounds_a = collider_a.bounds();
                let center = grid_b.cell_of(bounds_a.origin());

                let hit = grid_b
                    .neighbourhood(center)
                    .flat_map(|cell_b| cell_b.iter().rev().copied())
                    .filter(|b| !self.matched.contains(b))
                    .find(|&b| {
                        self.last_pairs_tested += 1;
                        lookup
                            .collider(b)
                            .is_some_and(|collider_b| {
                                collider_b.is_active() && bounds_a.intersects(&collider_b.bounds())
                            })
                    });

                if let Some(b) = hit {
                    self.matched.insert(b);
                    events.push(CollisionEvent {
                        a,
                        b,
                        kind: self.kind,
                    });
                }
            }
        }

        log::trace!(
            "{} pass: {} events, {} pairs tested",
            self.kind.0,
            events.len(),
            self.last_pairs_tested
        );
        events
    }
}
