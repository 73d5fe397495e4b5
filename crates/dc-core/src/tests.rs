//! Unit tests for dc-core primitives.

#[cfg(test)]
mod ids {
    use crate::AgentId;

    #[test]
    fn index_roundtrip() {
        let id = AgentId(3);
        assert_eq!(id.index(), 3);
        assert_eq!(AgentId::try_from(3usize).unwrap(), id);
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(AgentId::default(), AgentId::INVALID);
        assert!(!AgentId::default().is_valid());
        assert!(AgentId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod geometry {
    use crate::{Pose, VelocityCommand};

    #[test]
    fn distance_ignores_heading() {
        let a = Pose::new(0.0, 0.0, 0.0);
        let b = Pose::new(3.0, 4.0, 1.2);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance_to(&b), b.distance_to(&a));
    }

    #[test]
    fn zero_distance_to_self() {
        let p = Pose::new(5.5, 5.5, 0.3);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn non_finite_pose_detected() {
        assert!(Pose::new(1.0, 2.0, 0.0).is_finite());
        assert!(!Pose::new(f64::NAN, 2.0, 0.0).is_finite());
        assert!(!Pose::new(1.0, f64::INFINITY, 0.0).is_finite());
    }

    #[test]
    fn command_constructors() {
        assert!(VelocityCommand::STOP.is_stop());
        assert_eq!(VelocityCommand::straight(2.0), VelocityCommand::new(2.0, 0.0));
        assert!(!VelocityCommand::straight(2.0).is_stop());
        assert_eq!(VelocityCommand::default(), VelocityCommand::STOP);
    }
}

#[cfg(test)]
mod arena {
    use crate::{Arena, DcError, Pose};

    #[test]
    fn default_is_reference_arena() {
        let a = Arena::default();
        assert_eq!((a.x_min, a.x_max, a.y_min, a.y_max, a.margin), (0.0, 11.0, 0.0, 11.0, 2.0));
        assert_eq!(a.center(), Pose::new(5.5, 5.5, 0.0));
    }

    #[test]
    fn interior_is_not_near_boundary() {
        let a = Arena::default();
        assert!(!a.is_near_boundary(&Pose::new(5.0, 5.0, 0.0)));
        assert!(!a.is_near_boundary(&Pose::new(8.99, 2.01, 0.0)));
    }

    #[test]
    fn band_is_inclusive() {
        let a = Arena::default();
        assert!(a.is_near_boundary(&Pose::new(2.0, 5.0, 0.0)));
        assert!(a.is_near_boundary(&Pose::new(9.0, 5.0, 0.0)));
        assert!(a.is_near_boundary(&Pose::new(5.0, 2.0, 0.0)));
        assert!(a.is_near_boundary(&Pose::new(5.0, 9.0, 0.0)));
    }

    #[test]
    fn outside_counts_as_near_boundary() {
        let a = Arena::default();
        let p = Pose::new(-1.0, 5.0, 0.0);
        assert!(!a.contains(&p));
        assert!(a.is_near_boundary(&p));
    }

    #[test]
    fn inverted_bounds_rejected() {
        assert!(matches!(Arena::new(5.0, 1.0, 0.0, 1.0, 0.1), Err(DcError::Config(_))));
        assert!(matches!(Arena::new(0.0, 1.0, 0.0, 0.0, 0.1), Err(DcError::Config(_))));
    }

    #[test]
    fn negative_or_nan_margin_rejected() {
        assert!(Arena::square(10.0, -0.5).is_err());
        assert!(Arena::square(10.0, f64::NAN).is_err());
        assert!(Arena::square(10.0, 0.0).is_ok());
    }
}

#[cfg(test)]
mod config {
    use crate::{DeconflictionConfig, SpeedProfile, VelocityCommand};

    #[test]
    fn default_speeds() {
        let s = SpeedProfile::default();
        assert_eq!(s.cruise(), VelocityCommand::new(2.0, 0.0));
        assert_eq!(s.turn(), VelocityCommand::new(1.0, 0.9));
    }

    #[test]
    fn default_config_validates() {
        let cfg = DeconflictionConfig::default();
        assert_eq!(cfg.conflict_threshold, 1.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn non_positive_threshold_rejected() {
        let mut cfg = DeconflictionConfig::default();
        cfg.conflict_threshold = 0.0;
        assert!(cfg.validate().is_err());
        cfg.conflict_threshold = f64::INFINITY;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_finite_speed_rejected() {
        let mut cfg = DeconflictionConfig::default();
        cfg.speeds.turn_angular = f64::NAN;
        assert!(cfg.validate().is_err());
    }
}
