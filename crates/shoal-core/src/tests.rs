//! Unit tests for shoal-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, CellId, TypeId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(CellId(100) > CellId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(CellId::INVALID.0, u32::MAX);
        assert_eq!(TypeId::INVALID.0, u8::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(TypeId(7).to_string(), "TypeId(7)");
    }
}

#[cfg(test)]
mod mask {
    use crate::{TypeId, TypeMask};

    #[test]
    fn only_and_contains() {
        let m = TypeMask::only(TypeId(3));
        assert!(m.contains(TypeId(3)));
        assert!(!m.contains(TypeId(2)));
        assert!(!m.contains(TypeId(4)));
    }

    #[test]
    fn from_types_builds_union() {
        let m = TypeMask::from_types([TypeId(0), TypeId(5), TypeId(31)]);
        assert!(m.contains(TypeId(0)));
        assert!(m.contains(TypeId(5)));
        assert!(m.contains(TypeId(31)));
        assert!(!m.contains(TypeId(1)));
    }

    #[test]
    fn set_operations() {
        let a = TypeMask::from_types([TypeId(0), TypeId(1)]);
        let b = TypeMask::from_types([TypeId(1), TypeId(2)]);
        assert_eq!(a.union(b), TypeMask::from_types([TypeId(0), TypeId(1), TypeId(2)]));
        assert_eq!(a.intersect(b), TypeMask::only(TypeId(1)));
        assert!(TypeMask::NONE.is_empty());
        assert!(!TypeMask::ALL.is_empty());
    }
}

#[cfg(test)]
mod math {
    use crate::math::{Aabb, lateral_perpendicular, saturate};
    use glam::Vec3;

    #[test]
    fn saturate_clamps() {
        assert_eq!(saturate(-0.5), 0.0);
        assert_eq!(saturate(0.5), 0.5);
        assert_eq!(saturate(1.5), 1.0);
    }

    #[test]
    fn lateral_perpendicular_is_horizontal_and_orthogonal() {
        let dir = Vec3::new(1.0, 0.3, 2.0).normalize();
        let lat = lateral_perpendicular(dir);
        assert!(lat.y.abs() < 1e-6);
        // Orthogonal to the horizontal projection of dir.
        let horiz = Vec3::new(dir.x, 0.0, dir.z);
        assert!(lat.dot(horiz).abs() < 1e-5);
        assert!((lat.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn lateral_perpendicular_vertical_fallback() {
        assert_eq!(lateral_perpendicular(Vec3::Y), Vec3::X);
    }

    #[test]
    fn aabb_contains() {
        let b = Aabb::from_sphere(Vec3::ZERO, 2.0);
        assert!(b.contains(Vec3::new(1.9, -1.9, 0.0)));
        assert!(!b.contains(Vec3::new(2.1, 0.0, 0.0)));
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng, SimRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = AgentRng::new(12345, AgentId(0));
        let mut r2 = AgentRng::new(12345, AgentId(0));
        for _ in 0..100 {
            let a: f32 = r1.random();
            let b: f32 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_agents_differ() {
        let mut r0 = AgentRng::new(1, AgentId(0));
        let mut r1 = AgentRng::new(1, AgentId(1));
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b, "seeds for adjacent agents should diverge");
    }

    #[test]
    fn wander_offset_in_unit_cube() {
        let mut rng = AgentRng::new(0, AgentId(0));
        for _ in 0..1000 {
            let v = rng.wander_offset();
            assert!(v.abs().max_element() <= 1.0);
        }
    }

    #[test]
    fn sim_rng_children_diverge() {
        let mut root = SimRng::new(7);
        let mut c0 = root.child(0);
        let mut c1 = root.child(1);
        let a: u64 = c0.random();
        let b: u64 = c1.random();
        assert_ne!(a, b);
    }
}
