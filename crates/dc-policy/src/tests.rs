//! Unit tests for dc-policy.

use dc_agent::Priority;
use dc_core::{AgentId, Arena, Pose, SpeedProfile, VelocityCommand};

use crate::{
    BoundarySteering, ConflictResolver, ConflictState, Contender, PriorityYield,
    ProximityIndex, SteeringPolicy, detect, merge_resolutions, scan_pairs,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const CRUISE: VelocityCommand = VelocityCommand::new(2.0, 0.0);
const TURN:   VelocityCommand = VelocityCommand::new(1.0, 0.9);

fn p(x: f64, y: f64) -> Pose {
    Pose::new(x, y, 0.0)
}

/// Deterministic scatter of `n` poses over the 11 × 11 arena.
fn scatter(n: u32) -> Vec<(AgentId, Pose)> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let x = (t * 3.7).rem_euclid(11.0);
            let y = (t * 5.3 + 1.1).rem_euclid(11.0);
            (AgentId(i), p(x, y))
        })
        .collect()
}

// ── Steering ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod steering {
    use super::*;

    #[test]
    fn interior_cruises() {
        let s = BoundarySteering::default();
        let arena = Arena::default();
        for &(x, y) in &[(5.0, 5.0), (8.0, 8.0), (2.01, 8.99), (5.5, 2.5)] {
            assert_eq!(s.steer(&p(x, y), &arena), CRUISE, "at ({x}, {y})");
        }
    }

    #[test]
    fn band_and_outside_turn() {
        let s = BoundarySteering::default();
        let arena = Arena::default();
        for &(x, y) in &[(1.0, 5.0), (2.0, 5.0), (9.0, 5.0), (5.0, 10.5), (5.0, 0.0), (-3.0, 20.0)] {
            assert_eq!(s.steer(&p(x, y), &arena), TURN, "at ({x}, {y})");
        }
    }

    #[test]
    fn steering_is_idempotent() {
        let s = BoundarySteering::default();
        let arena = Arena::default();
        let pose = Pose::new(8.7, 1.3, 2.1);
        assert_eq!(s.steer(&pose, &arena), s.steer(&pose, &arena));
    }

    #[test]
    fn heading_does_not_affect_steering() {
        let s = BoundarySteering::default();
        let arena = Arena::default();
        assert_eq!(
            s.steer(&Pose::new(5.0, 5.0, 0.0), &arena),
            s.steer(&Pose::new(5.0, 5.0, 3.0), &arena)
        );
    }

    #[test]
    fn custom_speeds_and_margin() {
        let speeds = SpeedProfile { cruise_linear: 0.5, turn_linear: 0.2, turn_angular: -1.0 };
        let s = BoundarySteering::new(speeds);
        let arena = Arena::square(100.0, 10.0).unwrap();
        assert_eq!(s.steer(&p(50.0, 50.0), &arena), VelocityCommand::new(0.5, 0.0));
        assert_eq!(s.steer(&p(95.0, 50.0), &arena), VelocityCommand::new(0.2, -1.0));
    }
}

// ── Detector ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod detector {
    use super::*;

    #[test]
    fn self_is_always_in_conflict() {
        let pose = p(4.2, 7.1);
        for threshold in [1e-9, 0.5, 1.0, 100.0] {
            assert!(detect(&pose, &pose, threshold).in_conflict);
        }
    }

    #[test]
    fn symmetric() {
        let a = Pose::new(1.3, 2.9, 0.4);
        let b = Pose::new(2.1, 2.2, -1.0);
        for threshold in [0.5, 1.0, 1.2] {
            assert_eq!(detect(&a, &b, threshold), detect(&b, &a, threshold));
        }
    }

    #[test]
    fn threshold_is_strict() {
        let a = p(0.0, 0.0);
        assert!(!detect(&a, &p(1.0, 0.0), 1.0).in_conflict);
        assert!(detect(&a, &p(1.0 - 1e-9, 0.0), 1.0).in_conflict);
    }

    #[test]
    fn reference_distances() {
        let clear = detect(&p(5.0, 5.0), &p(8.0, 8.0), 1.0);
        assert!(!clear.in_conflict);
        assert!((clear.distance - 4.2426).abs() < 1e-3);

        let close = detect(&p(5.0, 5.0), &p(5.5, 5.5), 1.0);
        assert!(close.in_conflict);
        assert!((close.distance - 0.7071).abs() < 1e-3);
    }

    #[test]
    fn unknown_pose_skips_detection() {
        let a = p(5.0, 5.0);
        assert_eq!(ConflictState::between(Some(&a), None, 1.0), ConflictState::SKIPPED);
        assert_eq!(ConflictState::between(None, None, 1.0), ConflictState::SKIPPED);
        assert!(ConflictState::between(Some(&a), Some(&a), 1.0).in_conflict);
    }

    #[test]
    fn scan_pairs_reports_in_store_order() {
        let known = vec![
            (AgentId(2), p(5.0, 5.0)),
            (AgentId(0), p(5.5, 5.0)),
            (AgentId(1), p(9.0, 9.0)),
        ];
        let pairs = scan_pairs(&known, 1.0);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].a, pairs[0].b), (AgentId(2), AgentId(0)));
        assert!(pairs[0].involves(AgentId(0)));
        assert!(!pairs[0].involves(AgentId(1)));
        assert!(pairs[0].state().in_conflict);
    }

    #[test]
    fn scan_pairs_needs_two_agents() {
        assert!(scan_pairs(&[], 1.0).is_empty());
        assert!(scan_pairs(&[(AgentId(0), p(1.0, 1.0))], 1.0).is_empty());
    }
}

// ── ProximityIndex ────────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use super::*;

    #[test]
    fn matches_brute_force_scan() {
        let known = scatter(60);
        for threshold in [0.5, 1.0, 2.5] {
            let brute = scan_pairs(&known, threshold);
            let indexed = ProximityIndex::new(known.clone()).conflicts(threshold);
            assert_eq!(brute, indexed, "threshold {threshold}");
        }
    }

    #[test]
    fn boundary_distance_excluded() {
        let idx = ProximityIndex::new(vec![(AgentId(0), p(0.0, 0.0)), (AgentId(1), p(1.0, 0.0))]);
        assert!(idx.conflicts(1.0).is_empty());
        assert_eq!(idx.conflicts(1.0 + 1e-9).len(), 1);
    }

    #[test]
    fn within_radius_in_input_order() {
        let idx = ProximityIndex::new(vec![
            (AgentId(5), p(1.0, 1.0)),
            (AgentId(3), p(1.5, 1.0)),
            (AgentId(4), p(6.0, 6.0)),
        ]);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.within(&p(1.2, 1.0), 1.0), vec![AgentId(5), AgentId(3)]);
        assert!(idx.within(&p(3.0, 3.0), 1.0).is_empty());
    }

    #[test]
    fn empty_index() {
        let idx = ProximityIndex::new(vec![]);
        assert!(idx.is_empty());
        assert!(idx.conflicts(1.0).is_empty());
    }
}

// ── Resolver ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod resolver {
    use super::*;

    fn conflict() -> ConflictState {
        detect(&p(5.0, 5.0), &p(5.5, 5.5), 1.0)
    }

    #[test]
    fn lower_priority_stops_other_cruises() {
        let r = PriorityYield::default();
        let first = Contender::new(AgentId(0), Priority(0));
        let second = Contender::new(AgentId(1), Priority(1));
        let res = r.resolve(first, second, &conflict()).unwrap();
        assert_eq!(res.yielding, AgentId(0));
        assert_eq!(res.yield_command, VelocityCommand::STOP);
        assert_eq!(res.advancing, AgentId(1));
        assert_eq!(res.advance_command, CRUISE);
    }

    #[test]
    fn argument_order_does_not_matter() {
        let r = PriorityYield::default();
        let low = Contender::new(AgentId(3), Priority(1));
        let high = Contender::new(AgentId(0), Priority(7));
        assert_eq!(r.resolve(low, high, &conflict()), r.resolve(high, low, &conflict()));
        assert_eq!(r.resolve(high, low, &conflict()).unwrap().yielding, AgentId(3));
    }

    #[test]
    fn equal_priority_earlier_registration_yields() {
        let r = PriorityYield::default();
        let a = Contender::new(AgentId(4), Priority(2));
        let b = Contender::new(AgentId(1), Priority(2));
        assert_eq!(r.resolve(a, b, &conflict()).unwrap().yielding, AgentId(1));
    }

    #[test]
    fn no_override_outside_conflict() {
        let r = PriorityYield::default();
        let a = Contender::new(AgentId(0), Priority(0));
        let b = Contender::new(AgentId(1), Priority(1));
        assert_eq!(r.resolve(a, b, &ConflictState::SKIPPED), None);
        assert_eq!(r.resolve(a, b, &detect(&p(5.0, 5.0), &p(8.0, 8.0), 1.0)), None);
    }

    #[test]
    fn advance_uses_configured_cruise() {
        let speeds = SpeedProfile { cruise_linear: 0.7, ..SpeedProfile::default() };
        let r = PriorityYield::new(speeds);
        let a = Contender::new(AgentId(0), Priority(0));
        let b = Contender::new(AgentId(1), Priority(1));
        assert_eq!(r.resolve(a, b, &conflict()).unwrap().advance_command, VelocityCommand::straight(0.7));
    }

    #[test]
    fn merge_stop_dominates() {
        let r = PriorityYield::default();
        let c0 = Contender::new(AgentId(0), Priority(0));
        let c1 = Contender::new(AgentId(1), Priority(1));
        let c2 = Contender::new(AgentId(2), Priority(2));
        // Agent 1 wins against 0 but loses against 2.
        let resolutions = vec![
            r.resolve(c0, c1, &conflict()).unwrap(),
            r.resolve(c1, c2, &conflict()).unwrap(),
        ];
        let merged = merge_resolutions(&resolutions);
        assert_eq!(
            merged,
            vec![
                (AgentId(0), VelocityCommand::STOP),
                (AgentId(1), VelocityCommand::STOP),
                (AgentId(2), CRUISE),
            ]
        );
    }

    #[test]
    fn merge_single_pair_keeps_yield_first() {
        let r = PriorityYield::default();
        let res = r
            .resolve(
                Contender::new(AgentId(1), Priority(1)),
                Contender::new(AgentId(0), Priority(0)),
                &conflict(),
            )
            .unwrap();
        assert_eq!(
            merge_resolutions(&[res]),
            vec![(AgentId(0), VelocityCommand::STOP), (AgentId(1), CRUISE)]
        );
    }
}
