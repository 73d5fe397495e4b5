//! R-tree proximity index for many-agent conflict scans.
//!
//! [`scan_pairs`][crate::scan_pairs] is O(n²).  `ProximityIndex` bulk-loads
//! the known poses into an `rstar` R-tree once per update and answers each
//! agent's radius query in roughly O(log n), reporting exactly the same pairs
//! in exactly the same order.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use dc_core::{AgentId, Pose};

use crate::{ConflictPair, detect};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// A 2-D `[x, y]` point plus its position in the input slice.
#[derive(Clone)]
struct PoseEntry {
    point: [f64; 2],
    slot:  usize,
}

impl RTreeObject for PoseEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PoseEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── ProximityIndex ────────────────────────────────────────────────────────────

/// Spatial index over a snapshot of known poses.
pub struct ProximityIndex {
    known: Vec<(AgentId, Pose)>,
    tree:  RTree<PoseEntry>,
}

impl ProximityIndex {
    /// Bulk-load `known` (typically `PoseStore::all_known_poses()`).
    pub fn new(known: Vec<(AgentId, Pose)>) -> Self {
        let entries = known
            .iter()
            .enumerate()
            .map(|(slot, (_, pose))| PoseEntry { point: [pose.x, pose.y], slot })
            .collect();
        Self { known, tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Agents strictly closer than `radius` to `pose`, in input order.
    /// An agent located exactly at `pose` is included.
    pub fn within(&self, pose: &Pose, radius: f64) -> Vec<AgentId> {
        let mut slots: Vec<usize> = self
            .tree
            .locate_within_distance([pose.x, pose.y], radius * radius)
            .map(|e| e.slot)
            .filter(|&slot| detect(pose, &self.known[slot].1, radius).in_conflict)
            .collect();
        slots.sort_unstable();
        slots.into_iter().map(|slot| self.known[slot].0).collect()
    }

    /// Every pair closer than `threshold`.  Same pairs and order as
    /// [`scan_pairs`][crate::scan_pairs] on the same input.
    pub fn conflicts(&self, threshold: f64) -> Vec<ConflictPair> {
        let mut pairs = Vec::new();
        for (i, (a, pa)) in self.known.iter().enumerate() {
            // The R-tree radius test is inclusive; `detect` re-applies the
            // strict comparison on the exact distance.
            let mut hits: Vec<(usize, f64)> = self
                .tree
                .locate_within_distance([pa.x, pa.y], threshold * threshold)
                .filter(|e| e.slot > i)
                .filter_map(|e| {
                    let state = detect(pa, &self.known[e.slot].1, threshold);
                    state.in_conflict.then_some((e.slot, state.distance))
                })
                .collect();
            hits.sort_unstable_by_key(|&(slot, _)| slot);
            pairs.extend(hits.into_iter().map(|(slot, distance)| ConflictPair {
                a: *a,
                b: self.known[slot].0,
                distance,
            }));
        }
        pairs
    }
}
