//! World bounds: the wall probe and the position clamp.

use glam::Vec3;
use shoal_core::saturate;

/// Minimum extent/radius after sanitization.
const MIN_EXTENT: f32 = 1.0e-4;

/// How far inside the sphere surface the clamp projects, as a fraction of
/// the radius.  Slightly inside the surface so a clamped agent is not
/// re-detected as boundary-touching next step (avoids jitter); reclamping a
/// clamped point is a no-op.
const SPHERE_CLAMP_INSET: f32 = 0.999;

/// The simulation's world volume — a box or a sphere.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Environment {
    Box { center: Vec3, half_extents: Vec3 },
    Sphere { center: Vec3, radius: f32 },
}

/// Output of the per-agent wall probe.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoundsProbe {
    /// Inward direction away from the nearby wall(s).  Unit length when
    /// `danger > 0`, zero otherwise.
    pub direction: Vec3,
    /// Wall proximity in `[0, 1]`: 0 = outside the margin, 1 = touching.
    pub danger: f32,
}

impl Environment {
    /// Box bounds with degenerate extents clamped up.
    pub fn bounded_box(center: Vec3, half_extents: Vec3) -> Environment {
        Environment::Box {
            center,
            half_extents: half_extents.max(Vec3::splat(MIN_EXTENT)),
        }
    }

    /// Sphere bounds with a degenerate radius clamped up.
    pub fn bounded_sphere(center: Vec3, radius: f32) -> Environment {
        Environment::Sphere {
            center,
            radius: radius.max(MIN_EXTENT),
        }
    }

    /// Inward wall direction and danger for an agent at `pos`.
    ///
    /// `margin` is the look-ahead distance (the agent's separation radius).
    /// Box walls accumulate additively — an agent in a corner feels every
    /// nearby face; the sphere case is a single radial term.
    pub fn probe(&self, pos: Vec3, margin: f32) -> BoundsProbe {
        let margin = margin.max(MIN_EXTENT);
        match *self {
            Environment::Box { center, half_extents } => {
                let offset = pos - center;
                let mut direction = Vec3::ZERO;
                let mut danger = 0.0f32;
                for axis in 0..3 {
                    let he = half_extents[axis];
                    // Distance to the +face and -face along this axis.
                    let to_high = he - offset[axis];
                    let to_low = he + offset[axis];
                    if to_high < margin {
                        let d = saturate(1.0 - to_high / margin);
                        danger += d;
                        direction[axis] -= d;
                    }
                    if to_low < margin {
                        let d = saturate(1.0 - to_low / margin);
                        danger += d;
                        direction[axis] += d;
                    }
                }
                BoundsProbe {
                    direction: direction.normalize_or_zero(),
                    danger: saturate(danger),
                }
            }
            Environment::Sphere { center, radius } => {
                let offset = pos - center;
                let dist = offset.length();
                let to_surface = radius - dist;
                if to_surface >= margin {
                    return BoundsProbe::default();
                }
                let danger = saturate(1.0 - to_surface / margin);
                // At the exact center there is no radial direction; degrade
                // to no push (danger is ~0 there anyway unless margin≈radius).
                let direction = (-offset).normalize_or_zero();
                BoundsProbe { direction, danger }
            }
        }
    }

    /// Project `pos` to the inside of the bounds.  Idempotent: a position
    /// already inside is returned unchanged, and clamping a clamped position
    /// is a no-op.
    pub fn clamp_inside(&self, pos: Vec3) -> Vec3 {
        match *self {
            Environment::Box { center, half_extents } => {
                (pos - center).clamp(-half_extents, half_extents) + center
            }
            Environment::Sphere { center, radius } => {
                let offset = pos - center;
                let limit = radius * SPHERE_CLAMP_INSET;
                let dist = offset.length();
                if dist <= limit {
                    pos
                } else {
                    center + offset * (limit / dist)
                }
            }
        }
    }

    /// Vertical position of `pos` normalized to `[0, 1]` within the bounds:
    /// 0 = bottom, 1 = surface.
    pub fn normalized_depth(&self, pos: Vec3) -> f32 {
        let (bottom, top) = self.vertical_span();
        saturate((pos.y - bottom) / (top - bottom).max(MIN_EXTENT))
    }

    /// World-space y of the given normalized depth.
    pub fn depth_to_y(&self, depth: f32) -> f32 {
        let (bottom, top) = self.vertical_span();
        bottom + saturate(depth) * (top - bottom)
    }

    fn vertical_span(&self) -> (f32, f32) {
        match *self {
            Environment::Box { center, half_extents } => {
                (center.y - half_extents.y, center.y + half_extents.y)
            }
            Environment::Sphere { center, radius } => (center.y - radius, center.y + radius),
        }
    }
}
