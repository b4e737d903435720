//! Solid obstacle volumes.

use glam::Vec3;
use shoal_core::{Aabb, TypeMask, saturate};

use crate::Volume;

/// A solid volume agents are pushed out of and away from.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub volume: Volume,
    /// Behaviour types this obstacle repels.
    pub affects: TypeMask,
    /// Outer margin (world units) beyond the surface over which the
    /// repulsion fades to zero.
    pub margin: f32,
}

impl Obstacle {
    pub fn new(volume: Volume, affects: TypeMask, margin: f32) -> Obstacle {
        Obstacle {
            volume,
            affects,
            margin: margin.max(0.0),
        }
    }

    /// Broad-phase box for grid stamping, inflated by the margin.
    pub fn broad_aabb(&self) -> Aabb {
        let inner = self.volume.broad_aabb();
        Aabb {
            min: inner.min - Vec3::splat(self.margin),
            max: inner.max + Vec3::splat(self.margin),
        }
    }

    /// Repulsion at `p`: `(direction, strength)` with strength in `[0, 1]`.
    ///
    /// Full push (1) anywhere inside the volume, linear fade to 0 across the
    /// outer margin, `None` beyond it.  The direction is outward from the
    /// volume center.
    pub fn repulsion(&self, p: Vec3) -> Option<(Vec3, f32)> {
        let nd = self.volume.normalized_distance(p);
        let strength = if nd <= 1.0 {
            1.0
        } else {
            if self.margin <= 0.0 {
                return None;
            }
            // Approximate world-space distance beyond the surface.
            let beyond = (nd - 1.0) * self.volume.characteristic_radius();
            let s = 1.0 - saturate(beyond / self.margin);
            if s <= 0.0 {
                return None;
            }
            s
        };
        Some((self.volume.outward_direction(p), strength))
    }
}
