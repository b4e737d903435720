//! Attractor volumes — outer-shell pull fields.
//!
//! An attractor only acts in the *outer shell* of its volume: the inner
//! region (a configurable fraction of the radius/extent, 60 % by default) is
//! a dead zone with no pull, so agents already near the center are left
//! alone instead of being compressed into a point.  Between the inner
//! boundary and the surface the pull strength follows a power law, growing
//! toward the surface where the agent is about to escape.

use glam::Vec3;
use shoal_core::{TypeMask, saturate};

use crate::Volume;

/// Which per-cell winner table an attractor competes in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttractorUsage {
    /// Pulls each agent toward the volume center independently.
    Individual,
    /// Pulls whole groups; resolved per cell separately from Individual.
    Group,
}

/// Default dead-zone fraction of the volume radius/extent.
pub const DEFAULT_INNER_FRACTION: f32 = 0.6;

/// A pull volume.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attractor {
    pub volume: Volume,
    pub usage: AttractorUsage,
    /// Per-cell overlap tie-breaker for the grid winner tables.
    pub cell_priority: i32,
    /// Behaviour types this attractor pulls.
    pub affects: TypeMask,
    /// Vertical applicability band, normalized to environment bounds
    /// (`0` = bottom, `1` = surface).  Agents outside the band ignore
    /// this attractor.
    pub depth_band: (f32, f32),
    /// Peak pull strength, reached at the volume surface.
    pub strength: f32,
    /// Dead-zone fraction in `[0, 1)`; no pull below this normalized
    /// distance from the center.
    pub inner_fraction: f32,
    /// Power-law exponent of the falloff across the outer shell.
    pub falloff_power: f32,
}

impl Attractor {
    pub fn new(volume: Volume, usage: AttractorUsage, affects: TypeMask) -> Attractor {
        Attractor {
            volume,
            usage,
            cell_priority: 0,
            affects,
            depth_band: (0.0, 1.0),
            strength: 1.0,
            inner_fraction: DEFAULT_INNER_FRACTION,
            falloff_power: 2.0,
        }
    }

    /// Pull at `p` for an agent at normalized depth `depth`.
    ///
    /// Returns `(direction_toward_center, strength)`, or `None` when the
    /// point is outside the volume, inside the dead zone, or outside the
    /// attractor's depth band.
    pub fn pull(&self, p: Vec3, depth: f32) -> Option<(Vec3, f32)> {
        if depth < self.depth_band.0 || depth > self.depth_band.1 {
            return None;
        }
        let nd = self.volume.normalized_distance(p);
        if nd > 1.0 {
            return None;
        }
        let inner = self.inner_fraction.clamp(0.0, 0.999);
        if nd <= inner {
            return None;
        }
        let t = saturate((nd - inner) / (1.0 - inner));
        let strength = self.strength * t.powf(self.falloff_power.max(0.0));
        let direction = -self.volume.outward_direction(p);
        Some((direction, strength))
    }
}

/// Resolve overlapping attractor candidates at one point: the single highest
/// computed strength wins, never a sum.
pub fn strongest_pull<'a, I>(candidates: I, p: Vec3, depth: f32) -> Option<(Vec3, f32)>
where
    I: IntoIterator<Item = &'a Attractor>,
{
    let mut best: Option<(Vec3, f32)> = None;
    for attractor in candidates {
        if let Some((dir, strength)) = attractor.pull(p, depth) {
            if best.is_none_or(|(_, s)| strength > s) {
                best = Some((dir, strength));
            }
        }
    }
    best
}
