//! `BehaviourSettings` — every tunable knob for one behaviour type.
//!
//! One record per behaviour type, authored externally and frozen into the
//! [`BehaviourRegistry`][crate::BehaviourRegistry] at initialization.  All
//! geometric fields are sanitized at registry-build time (non-positive radii
//! clamp to a small epsilon) so the per-step pipeline never has to branch on
//! degenerate input.

use shoal_core::TypeMask;

/// Per-kind sampling caps bounding neighbour-scan cost.
///
/// `0` means unlimited.  Once a counter exceeds its cap the remaining
/// candidates of that kind are skipped; because the scan order is
/// deterministic (grid-cell order, then in-cell index order) the same inputs
/// always drop the same candidates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplingCaps {
    /// Total candidates examined per agent per step.
    pub max_neighbour_checks: u32,
    /// Friendly neighbours folded into alignment/cohesion.
    pub max_friendly_samples: u32,
    /// Candidates folded into the separation sum.
    pub max_separation_samples: u32,
}

/// Distance-band schooling parameters for same-type pairs.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchoolingSettings {
    /// Overall schooling force weight; `0` disables the band entirely.
    pub weight: f32,
    /// Target spacing = `(body_a + body_b) * spacing_factor`.
    pub spacing_factor: f32,
    /// Half-width of the zero-force band around the target spacing,
    /// as a fraction of the target spacing.
    pub dead_zone: f32,
    /// Softening applied to the repulsive side inside the dead zone's
    /// inner edge (1 = full push, 0 = no push).
    pub inner_softness: f32,
    /// Attraction reaches out to `outer_factor * target_spacing`, then
    /// vanishes.
    pub outer_factor: f32,
    /// Damping against the pairwise closing velocity, to stop band
    /// oscillation.  `0` disables.
    pub radial_damping: f32,
}

impl Default for SchoolingSettings {
    fn default() -> Self {
        Self {
            weight: 0.0,
            spacing_factor: 2.0,
            dead_zone: 0.15,
            inner_softness: 0.5,
            outer_factor: 3.0,
            radial_damping: 0.0,
        }
    }
}

/// Split/panic response above the avoid-danger threshold.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitSettings {
    /// Avoid-danger level in `[0,1]` above which the panic blend starts.
    pub threshold: f32,
    /// Weight of the lateral fan-out direction at full panic.
    pub lateral_weight: f32,
    /// Multiplier applied to max acceleration and max speed at full panic
    /// (blended in proportionally above the threshold).
    pub boost: f32,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            lateral_weight: 1.5,
            boost: 1.8,
        }
    }
}

/// Every tunable parameter for one behaviour type.
///
/// Weights scale the corresponding steering channel in the composition stage;
/// a weight of `0` disables the channel for this type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviourSettings {
    // ── Relationship masks ────────────────────────────────────────────────
    /// Types this type schools with (alignment/cohesion/schooling band).
    pub group_mask: TypeMask,
    /// Types this type flees from (predators).
    pub avoid_mask: TypeMask,
    /// Types this type keeps polite distance from without fleeing.
    pub neutral_mask: TypeMask,

    // ── Radii ─────────────────────────────────────────────────────────────
    /// Neighbour search radius.  Also fixes the grid ring count:
    /// `ceil(neighbour_radius / cell_size)` cells in each axis direction.
    pub neighbour_radius: f32,
    /// Soft separation radius; hard separation uses
    /// `max(separation_radius, body_a + body_b)`.
    pub separation_radius: f32,
    /// Physical body radius.  Non-zero bodies are stamped into every grid
    /// cell their bounding box overlaps (up to the per-agent cell cap).
    pub body_radius: f32,

    // ── Channel weights ───────────────────────────────────────────────────
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    /// This type's leadership rank.  Friendly neighbours follow the highest
    /// rank in view (exact ties share the lead).
    pub leadership_weight: f32,
    /// This type's standing in predator/prey weight comparisons.
    pub avoidance_weight: f32,
    /// How strongly this type reacts when it decides to avoid.
    pub avoid_response: f32,
    /// Analogue of `avoidance_weight` for neutral-mask encounters.
    pub neutral_weight: f32,
    pub bounds_weight: f32,
    pub obstacle_weight: f32,
    pub attraction_weight: f32,
    pub pattern_weight: f32,
    /// Weight of the per-cell group noise field.
    pub group_noise_weight: f32,
    /// Weight of the per-agent wander jitter.
    pub wander_weight: f32,
    /// Weight of the preferred-depth correction.
    pub depth_weight: f32,

    // ── Depth preference ──────────────────────────────────────────────────
    /// Preferred depth band, normalized to environment bounds: `0` = bottom,
    /// `1` = surface.  `(min, max)` with `min <= max`.
    pub depth_band: (f32, f32),
    /// When depth preference and an attractor pull in opposite vertical
    /// directions, `true` lets depth win; `false` lets the attractor win.
    /// They are arbitrated, never summed, when in conflict.
    pub depth_wins_over_attractor: bool,

    // ── Limits ────────────────────────────────────────────────────────────
    pub max_acceleration: f32,
    pub max_speed: f32,

    // ── Sub-structures ────────────────────────────────────────────────────
    pub schooling: SchoolingSettings,
    pub split: SplitSettings,
    pub caps: SamplingCaps,
}

impl Default for BehaviourSettings {
    fn default() -> Self {
        Self {
            group_mask: TypeMask::NONE,
            avoid_mask: TypeMask::NONE,
            neutral_mask: TypeMask::NONE,

            neighbour_radius: 5.0,
            separation_radius: 1.0,
            body_radius: 0.0,

            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            separation_weight: 1.5,
            leadership_weight: 0.0,
            avoidance_weight: 1.0,
            avoid_response: 1.0,
            neutral_weight: 1.0,
            bounds_weight: 2.0,
            obstacle_weight: 2.0,
            attraction_weight: 1.0,
            pattern_weight: 1.0,
            group_noise_weight: 0.0,
            wander_weight: 0.0,
            depth_weight: 0.0,

            depth_band: (0.0, 1.0),
            depth_wins_over_attractor: false,

            max_acceleration: 10.0,
            max_speed: 5.0,

            schooling: SchoolingSettings::default(),
            split: SplitSettings::default(),
            caps: SamplingCaps::default(),
        }
    }
}

/// Smallest allowed value for any radius-like field after sanitization.
pub(crate) const MIN_RADIUS: f32 = 1.0e-4;

impl BehaviourSettings {
    /// Clamp degenerate geometric fields to safe minimums.
    ///
    /// Called once at registry build; the per-step pipeline assumes radii are
    /// strictly positive and never re-checks.
    pub(crate) fn sanitize(&mut self) {
        self.neighbour_radius = self.neighbour_radius.max(MIN_RADIUS);
        self.separation_radius = self.separation_radius.max(MIN_RADIUS);
        self.body_radius = self.body_radius.max(0.0);
        self.max_speed = self.max_speed.max(0.0);
        self.max_acceleration = self.max_acceleration.max(0.0);
        if self.depth_band.0 > self.depth_band.1 {
            self.depth_band = (self.depth_band.1, self.depth_band.0);
        }
        self.depth_band.0 = self.depth_band.0.clamp(0.0, 1.0);
        self.depth_band.1 = self.depth_band.1.clamp(0.0, 1.0);
    }
}
