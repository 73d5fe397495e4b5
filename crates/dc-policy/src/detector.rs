//! Pairwise proximity detection.

use dc_core::{AgentId, Pose};

/// Proximity snapshot for one pair of poses.  Derived, never stored.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConflictState {
    pub in_conflict: bool,
    /// Euclidean distance between the two positions.  `f64::INFINITY` when
    /// detection was skipped because a pose is unknown.
    pub distance: f64,
}

impl ConflictState {
    /// "Nothing to report": used when either pose is unknown.
    pub const SKIPPED: ConflictState = ConflictState {
        in_conflict: false,
        distance:    f64::INFINITY,
    };

    /// Like [`detect`], but skips (no conflict) when either pose is absent.
    pub fn between(a: Option<&Pose>, b: Option<&Pose>, threshold: f64) -> Self {
        match (a, b) {
            (Some(a), Some(b)) => detect(a, b, threshold),
            _ => Self::SKIPPED,
        }
    }
}

/// Two agents found in conflict, in store order (`a` reported first).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConflictPair {
    pub a:        AgentId,
    pub b:        AgentId,
    pub distance: f64,
}

impl ConflictPair {
    /// `true` if `agent` is one of the pair.
    #[inline]
    pub fn involves(&self, agent: AgentId) -> bool {
        self.a == agent || self.b == agent
    }

    /// The detector output this pair was built from.
    #[inline]
    pub fn state(&self) -> ConflictState {
        ConflictState { in_conflict: true, distance: self.distance }
    }
}

/// Distance between `a` and `b`; in conflict when strictly below `threshold`.
///
/// Symmetric in its arguments.  A distance exactly equal to the threshold is
/// not a conflict.
#[inline]
pub fn detect(a: &Pose, b: &Pose, threshold: f64) -> ConflictState {
    let distance = a.distance_to(b);
    ConflictState {
        in_conflict: distance < threshold,
        distance,
    }
}

/// All-pairs scan over the known poses.
///
/// Pairs are reported with `i < j` in the order of `known`.  O(n²): fine
/// for a handful of agents; use [`ProximityIndex`][crate::ProximityIndex]
/// for crowds.
pub fn scan_pairs(known: &[(AgentId, Pose)], threshold: f64) -> Vec<ConflictPair> {
    let mut pairs = Vec::new();
    for (i, (a, pa)) in known.iter().enumerate() {
        for (b, pb) in &known[i + 1..] {
            let state = detect(pa, pb, threshold);
            if state.in_conflict {
                pairs.push(ConflictPair { a: *a, b: *b, distance: state.distance });
            }
        }
    }
    pairs
}
