//! Shell patterns — thin-band volumes that softly hold agents on a surface.
//!
//! Both kinds produce a signed correction along the local surface normal:
//! inside the band a softened two-sided comfort push toward the exact
//! surface, outside either face a one-sided pull back toward the band whose
//! magnitude saturates over one thickness.

use glam::Vec3;
use shoal_core::saturate;

const MIN_EXTENT: f32 = 1.0e-4;

/// Correction magnitude for a point `delta` world units from the shell
/// surface (sign: positive = outside).
///
/// Continuous across the band edge: ramps 0→0.5 inside the band (softened
/// comfort), 0.5→1 over one further thickness outside (saturating pull).
/// The returned value is signed *toward* the surface.
fn shell_signal(delta: f32, thickness: f32) -> f32 {
    let thickness = thickness.max(MIN_EXTENT);
    let half = thickness * 0.5;
    let magnitude = if delta.abs() <= half {
        (delta.abs() / half) * 0.5
    } else {
        0.5 + saturate((delta.abs() - half) / thickness) * 0.5
    };
    -delta.signum() * magnitude
}

// ── SphereShell ───────────────────────────────────────────────────────────────

/// A thin spherical band around `radius`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SphereShell {
    pub center: Vec3,
    pub radius: f32,
    pub thickness: f32,
}

impl SphereShell {
    pub fn new(center: Vec3, radius: f32, thickness: f32) -> SphereShell {
        SphereShell {
            center,
            radius: radius.max(MIN_EXTENT),
            thickness: thickness.max(MIN_EXTENT),
        }
    }

    /// Steering correction at `p`, unit-scaled (caller applies strength).
    pub fn signal(&self, p: Vec3) -> Vec3 {
        let offset = p - self.center;
        let dist = offset.length();
        // At the exact center every outward direction is equivalent.
        let outward = offset.try_normalize().unwrap_or(Vec3::Y);
        outward * shell_signal(dist - self.radius, self.thickness)
    }
}

// ── BoxShell ──────────────────────────────────────────────────────────────────

/// A thin axis-aligned band around a box surface.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxShell {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub thickness: f32,
}

impl BoxShell {
    pub fn new(center: Vec3, half_extents: Vec3, thickness: f32) -> BoxShell {
        BoxShell {
            center,
            half_extents: half_extents.max(Vec3::splat(MIN_EXTENT)),
            thickness: thickness.max(MIN_EXTENT),
        }
    }

    /// Steering correction at `p`, unit-scaled (caller applies strength).
    pub fn signal(&self, p: Vec3) -> Vec3 {
        let offset = p - self.center;
        let q = offset.abs() - self.half_extents;

        // Signed distance to the box surface (negative inside) and the
        // outward normal at `p`.
        let (distance, outward) = if q.max_element() > 0.0 {
            let clipped = q.max(Vec3::ZERO);
            let normal = (clipped * offset.signum()).try_normalize().unwrap_or(Vec3::Y);
            (clipped.length(), normal)
        } else {
            // Inside: nearest face is along the axis with the largest q.
            let axis = if q.x >= q.y && q.x >= q.z {
                0
            } else if q.y >= q.z {
                1
            } else {
                2
            };
            let mut normal = Vec3::ZERO;
            normal[axis] = if offset[axis] >= 0.0 { 1.0 } else { -1.0 };
            (q.max_element(), normal)
        };

        outward * shell_signal(distance, self.thickness)
    }
}
