//! Stage two: fold the neighbour aggregate and the field probes into one
//! clamped acceleration, then integrate velocity and position.
//!
//! This stage is total.  Every input degrades to a zero contribution rather
//! than an error, and the output is always inside the environment bounds.

use glam::Vec3;
use shoal_behavior::BehaviourSettings;
use shoal_core::{AgentId, lateral_perpendicular, saturate};
use shoal_field::{BoundsProbe, Environment};

use crate::aggregate::NeighbourAggregate;

/// Per-agent field samples gathered before composition.
///
/// Magnitudes here are unweighted; the per-type channel weights are applied
/// inside [`compose_steering`] so the same probe results can feed agents of
/// different types.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FieldInputs {
    /// Wall probe at the agent's position.
    pub bounds: BoundsProbe,
    /// Summed obstacle repulsion (direction times falloff strength).
    pub obstacle: Vec3,
    /// Strongest applicable attractor pull, if any: unit direction toward
    /// the attractor centre and its scalar strength.
    pub attraction: Option<(Vec3, f32)>,
    /// Summed pattern-shell signal for the agent's type.
    pub pattern: Vec3,
    /// Group noise sampled at the agent's grid cell.
    pub group_noise: Vec3,
    /// Per-agent wander jitter drawn for this step.
    pub wander: Vec3,
    /// The agent's current normalized depth, 0 = bottom, 1 = surface.
    pub depth: f32,
}

/// Integrated result for one agent, written back after the parallel stage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Steering {
    pub velocity: Vec3,
    pub position: Vec3,
}

/// Combine every steering channel, clamp, and integrate over `dt`.
///
/// The returned position is already clamped to the environment bounds.
pub fn compose_steering(
    agent: AgentId,
    settings: &BehaviourSettings,
    agg: &NeighbourAggregate,
    inputs: &FieldInputs,
    env: &Environment,
    pos: Vec3,
    vel: Vec3,
    dt: f32,
) -> Steering {
    let mut accel = Vec3::ZERO;

    // ── Neighbour channels ────────────────────────────────────────────────
    if agg.alignment_weight_sum > 0.0 {
        // Steer toward the leader set's proximity-weighted average velocity.
        let target = agg.alignment_sum / agg.alignment_weight_sum;
        accel += (target - vel) * settings.alignment_weight;
    }
    if agg.cohesion_weight_sum > 0.0 {
        let center = agg.cohesion_sum / agg.cohesion_weight_sum;
        accel += (center - pos).normalize_or_zero() * settings.cohesion_weight;
    }
    // Hard + neutral separation share one weight; per-pair magnitudes are
    // already baked into the sum.
    accel += agg.separation_sum * settings.separation_weight;
    // Predator repulsion carries avoid_response per pair, so no extra weight.
    accel += agg.avoid_separation_sum;
    accel += (agg.schooling_sum + agg.radial_damping) * settings.schooling.weight;

    // ── Field channels ────────────────────────────────────────────────────
    accel += inputs.bounds.direction * inputs.bounds.danger * settings.bounds_weight;
    accel += inputs.obstacle * settings.obstacle_weight;

    // Depth preference and attraction are arbitrated, not summed, when they
    // pull in opposite vertical directions: the losing channel's vertical
    // component is dropped so the composed vertical sign follows the winner.
    let mut depth = depth_correction(settings, inputs.depth) * settings.depth_weight;
    let mut attraction = match inputs.attraction {
        Some((dir, strength)) => dir * strength * settings.attraction_weight,
        None => Vec3::ZERO,
    };
    if attraction.y * depth.y < 0.0 {
        if settings.depth_wins_over_attractor {
            attraction.y = 0.0;
        } else {
            depth.y = 0.0;
        }
    }
    accel += attraction + depth;

    accel += inputs.pattern * settings.pattern_weight;
    accel += inputs.group_noise * settings.group_noise_weight;
    accel += inputs.wander * settings.wander_weight;

    // ── Split/panic blend ─────────────────────────────────────────────────
    let mut max_accel = settings.max_acceleration;
    let mut max_speed = settings.max_speed;
    let threshold = settings.split.threshold;
    if agg.avoid_danger > threshold {
        let span = (1.0 - threshold).max(f32::EPSILON);
        let t = saturate((agg.avoid_danger - threshold) / span);
        // Even/odd agents fan out to opposite sides of the flight line, so a
        // school under attack splits instead of compressing.
        let side = if agent.index() % 2 == 0 { 1.0 } else { -1.0 };
        accel += lateral_perpendicular(vel) * (side * settings.split.lateral_weight * t);
        let boost = 1.0 + (settings.split.boost - 1.0) * t;
        max_accel *= boost;
        max_speed *= boost;
    }

    // ── Clamp and integrate ───────────────────────────────────────────────
    let accel = accel.clamp_length_max(max_accel);
    let velocity = (vel + accel * dt).clamp_length_max(max_speed);
    let position = env.clamp_inside(pos + velocity * dt);
    Steering { velocity, position }
}

/// Vertical correction toward the preferred depth band.
///
/// Zero inside the band; outside, a vertical push proportional to the
/// normalized depth error, saturating at unit strength once the error
/// reaches a full depth unit.
fn depth_correction(settings: &BehaviourSettings, depth: f32) -> Vec3 {
    if settings.depth_weight <= 0.0 {
        return Vec3::ZERO;
    }
    let (low, high) = settings.depth_band;
    if depth < low {
        Vec3::Y * saturate(low - depth)
    } else if depth > high {
        Vec3::NEG_Y * saturate(depth - high)
    } else {
        Vec3::ZERO
    }
}
