//! `Volume` — the closed shape set shared by obstacles and attractors.
//!
//! The shape set is fixed and small (sphere, oriented box), so dispatch is a
//! plain enum match — no trait objects.

use glam::{Quat, Vec3};
use shoal_core::Aabb;

const MIN_EXTENT: f32 = 1.0e-4;

/// Shape of a volume, relative to its center.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    Sphere { radius: f32 },
    /// Box with arbitrary orientation; points are tested by inverse-rotating
    /// into the box's local frame.
    OrientedBox { half_extents: Vec3, rotation: Quat },
}

/// A placed shape.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Volume {
    pub center: Vec3,
    pub shape: Shape,
}

impl Volume {
    pub fn sphere(center: Vec3, radius: f32) -> Volume {
        Volume {
            center,
            shape: Shape::Sphere { radius: radius.max(MIN_EXTENT) },
        }
    }

    pub fn oriented_box(center: Vec3, half_extents: Vec3, rotation: Quat) -> Volume {
        Volume {
            center,
            shape: Shape::OrientedBox {
                half_extents: half_extents.max(Vec3::splat(MIN_EXTENT)),
                rotation: rotation.normalize(),
            },
        }
    }

    /// Broad-phase bounding box, conservative for any orientation.
    pub fn broad_aabb(&self) -> Aabb {
        let r = match self.shape {
            Shape::Sphere { radius } => radius,
            // Rotated-box extents are bounded by the diagonal.
            Shape::OrientedBox { half_extents, .. } => half_extents.length(),
        };
        Aabb::from_sphere(self.center, r)
    }

    /// `p` expressed in the volume's local (unrotated) frame.
    #[inline]
    pub fn to_local(&self, p: Vec3) -> Vec3 {
        let offset = p - self.center;
        match self.shape {
            Shape::Sphere { .. } => offset,
            Shape::OrientedBox { rotation, .. } => rotation.inverse() * offset,
        }
    }

    /// Normalized "radial" distance of `p` from the volume center:
    /// 0 at the center, 1 on the surface, >1 outside.
    ///
    /// For the box this is the Chebyshev-style maximum of the per-axis
    /// local-coordinate fractions, so 1 traces the box surface exactly.
    pub fn normalized_distance(&self, p: Vec3) -> f32 {
        let local = self.to_local(p);
        match self.shape {
            Shape::Sphere { radius } => local.length() / radius,
            Shape::OrientedBox { half_extents, .. } => {
                (local / half_extents).abs().max_element()
            }
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        self.normalized_distance(p) <= 1.0
    }

    /// Characteristic radius used to convert normalized distances back into
    /// world units (sphere radius; box: smallest half extent).
    pub fn characteristic_radius(&self) -> f32 {
        match self.shape {
            Shape::Sphere { radius } => radius,
            Shape::OrientedBox { half_extents, .. } => half_extents.min_element(),
        }
    }

    /// Unit direction from the volume center toward `p` (world space).
    /// Zero-length offsets degrade to `+Y` so the caller always has a
    /// usable push direction.
    pub fn outward_direction(&self, p: Vec3) -> Vec3 {
        (p - self.center).try_normalize().unwrap_or(Vec3::Y)
    }
}
