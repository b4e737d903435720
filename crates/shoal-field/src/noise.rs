//! `GroupNoise` — per-cell procedural drift fields.
//!
//! Evaluated once per occupied grid cell per step and shared by every agent
//! in that cell, giving coherent group-level motion that a per-agent wander
//! jitter cannot.  All generators are pure functions of (position, time):
//! no internal state, identical output for identical inputs.

use glam::Vec3;

const MIN_SCALE: f32 = 1.0e-4;

/// The closed set of drift-field generators.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupNoise {
    /// Independent per-axis sines with optional horizontal swirl.
    Sine {
        frequency: f32,
        amplitude: f32,
        /// 0 = straight sine field; 1 = fully rotated into the horizontal
        /// tangent direction.
        swirl: f32,
    },
    /// Horizontal drift alternating direction between vertical bands.
    VerticalBands { band_height: f32, amplitude: f32 },
    /// Tangential circulation around a vertical axis.
    Vortex {
        center: Vec3,
        amplitude: f32,
        /// Distance at which the circulation has fallen to half strength.
        radius: f32,
    },
    /// Drift toward a spherical shell surface.
    SphericalShell {
        center: Vec3,
        radius: f32,
        amplitude: f32,
    },
}

impl GroupNoise {
    /// Evaluate the field at `p` (a cell center) at simulation time `time`.
    pub fn eval(&self, p: Vec3, time: f32) -> Vec3 {
        match *self {
            GroupNoise::Sine { frequency, amplitude, swirl } => {
                let f = frequency.max(MIN_SCALE);
                let base = Vec3::new(
                    (p.x * f + time).sin(),
                    (p.y * f + time * 1.3).sin(),
                    (p.z * f + time * 0.7).sin(),
                ) * amplitude;
                if swirl <= 0.0 {
                    base
                } else {
                    // Rotate toward the horizontal tangent of the base vector.
                    let tangent = Vec3::new(-base.z, base.y, base.x);
                    base.lerp(tangent, swirl.clamp(0.0, 1.0))
                }
            }
            GroupNoise::VerticalBands { band_height, amplitude } => {
                let band = (p.y / band_height.max(MIN_SCALE)).floor() as i64;
                let dir = if band.rem_euclid(2) == 0 { 1.0 } else { -1.0 };
                Vec3::new(dir * amplitude, 0.0, 0.0)
            }
            GroupNoise::Vortex { center, amplitude, radius } => {
                let offset = Vec3::new(p.x - center.x, 0.0, p.z - center.z);
                let dist = offset.length();
                match offset.try_normalize() {
                    // On the axis there is no tangent; degrade to zero.
                    None => Vec3::ZERO,
                    Some(radial) => {
                        let tangent = Vec3::new(-radial.z, 0.0, radial.x);
                        let falloff = radius.max(MIN_SCALE)
                            / (radius.max(MIN_SCALE) + dist);
                        tangent * amplitude * falloff
                    }
                }
            }
            GroupNoise::SphericalShell { center, radius, amplitude } => {
                let offset = p - center;
                let dist = offset.length();
                match offset.try_normalize() {
                    None => Vec3::ZERO,
                    Some(radial) => {
                        // Inside the radius drift outward, outside drift in.
                        let toward_shell = if dist < radius { radial } else { -radial };
                        toward_shell * amplitude
                    }
                }
            }
        }
    }
}
