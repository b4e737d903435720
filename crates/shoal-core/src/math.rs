//! Small geometric helpers shared across the framework.
//!
//! All vector math uses `glam::Vec3` (single precision).  f32 gives ~1 mm
//! resolution over a kilometre-scale tank — more than sufficient for steering
//! while halving memory traffic vs. f64 on hot SoA arrays.

use glam::Vec3;

/// Clamp `x` into `[0, 1]`.
#[inline(always)]
pub fn saturate(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// A unit vector perpendicular to `dir` in the horizontal (XZ) plane.
///
/// Falls back to `+X` when `dir` has no horizontal component (pure vertical
/// motion has no preferred lateral direction).
#[inline]
pub fn lateral_perpendicular(dir: Vec3) -> Vec3 {
    let lateral = Vec3::new(-dir.z, 0.0, dir.x);
    lateral.try_normalize().unwrap_or(Vec3::X)
}

/// An axis-aligned bounding box, used for broad-phase grid stamping.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Aabb {
        Aabb {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Bounding box of a sphere.
    #[inline]
    pub fn from_sphere(center: Vec3, radius: f32) -> Aabb {
        Self::from_center_half_extents(center, Vec3::splat(radius))
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}
