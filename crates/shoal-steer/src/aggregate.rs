//! The neighbour scan: one pass over nearby grid cells per agent,
//! accumulating every pairwise steering input.
//!
//! # Scan order and determinism
//!
//! Cells are visited in ascending lattice order (x fastest, then y, then z)
//! within the precomputed ring box around the agent's own cell, and agents
//! within a cell in ascending index order (the pair list is sorted).  The
//! sampling caps truncate in exactly this order, so a capped scan drops the
//! same candidates for the same inputs every time.
//!
//! Agents with positive body radius occupy several cells and may therefore
//! be visited more than once by one observer; the contribution is weight-
//! normalized downstream, and the duplication is accepted as part of the
//! bounded-approximation policy rather than paid for with a dedup set.

use glam::{IVec3, Vec3};
use shoal_agent::AgentStore;
use shoal_behavior::{BehaviourRegistry, Relation};
use shoal_core::{AgentId, saturate};
use shoal_spatial::{AgentGridIndex, GridSpec};

/// Everything the composer needs to know about one agent's neighbourhood,
/// recomputed from scratch every step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NeighbourAggregate {
    /// Proximity-weighted velocities of the current leader set.
    pub alignment_sum: Vec3,
    pub alignment_weight_sum: f32,
    /// Highest leadership weight seen among friendly neighbours.
    pub max_leadership: f32,
    /// Number of neighbours in the current leader set.
    pub leader_count: u32,

    /// Proximity-weighted positions of all friendly neighbours.
    pub cohesion_sum: Vec3,
    pub cohesion_weight_sum: f32,
    pub friendly_count: u32,

    /// Hard-separation and neutral repulsion directions (magnitude baked).
    pub separation_sum: Vec3,
    pub separation_weight_sum: f32,
    pub separation_samples: u32,

    /// Predator repulsion (weight delta and avoid response baked).
    pub avoid_separation_sum: Vec3,
    pub avoid_weight_sum: f32,
    /// Accumulated panic level in `[0, 1]`.
    pub avoid_danger: f32,

    /// Distance-band schooling force, unweighted.
    pub schooling_sum: Vec3,
    /// Anti-oscillation term opposing the pairwise closing velocity.
    pub radial_damping: Vec3,
}

/// Run the neighbour scan for one agent.
///
/// Total for any input: an agent with no live neighbours (or an empty grid)
/// yields the all-zero aggregate.
pub fn aggregate_neighbours(
    agent: AgentId,
    store: &AgentStore,
    registry: &BehaviourRegistry,
    spec: &GridSpec,
    index: &AgentGridIndex,
) -> NeighbourAggregate {
    let mut agg = NeighbourAggregate::default();
    if spec.is_empty() {
        return agg;
    }

    let ty = store.behaviour(agent);
    let settings = registry.get(ty);
    let pos = store.positions[agent.index()];
    let my_vel = store.prev_velocities[agent.index()];
    let rings = registry.cell_rings(ty);

    let caps = settings.caps;
    let mut checks = 0u32;
    let mut friendly_samples = 0u32;

    let base = spec.cell_coords(pos);
    let res = spec.resolution;
    let min = IVec3::new(
        (base.x - rings).max(0),
        (base.y - rings).max(0),
        (base.z - rings).max(0),
    );
    let max = IVec3::new(
        (base.x + rings).min(res.x as i32 - 1),
        (base.y + rings).min(res.y as i32 - 1),
        (base.z + rings).min(res.z as i32 - 1),
    );

    'scan: for z in min.z..=max.z {
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let cell = spec.cell_id(IVec3::new(x, y, z));
                for &(_, other) in index.cell_pairs(cell) {
                    if other == agent {
                        continue;
                    }
                    if caps.max_neighbour_checks > 0 && checks >= caps.max_neighbour_checks {
                        break 'scan;
                    }
                    checks += 1;

                    let other_ty = store.behaviour(other);
                    let other_settings = registry.get(other_ty);
                    let other_pos = store.positions[other.index()];
                    let delta = other_pos - pos;
                    let dist = delta.length();
                    // Two agents at the exact same point have no meaningful
                    // direction; pick a stable vertical so the pair still
                    // separates deterministically.
                    let toward = delta.try_normalize().unwrap_or(Vec3::Y);

                    // ── Hard separation: unconditional below contact range ─
                    //
                    // The only channel allowed to fire outside the friendly/
                    // avoid/neutral classification.
                    let body_sum = settings.body_radius + other_settings.body_radius;
                    let hard_radius = settings.separation_radius.max(body_sum);
                    if dist < hard_radius
                        && (caps.max_separation_samples == 0
                            || agg.separation_samples < caps.max_separation_samples)
                    {
                        // Penetration as a fraction of one body's reach
                        // (half the contact range); quadratic growth as the
                        // overlap deepens.
                        let penetration = (hard_radius - dist) / (hard_radius * 0.5);
                        let magnitude = 1.0 + penetration * penetration;
                        agg.separation_sum -= toward * magnitude;
                        agg.separation_weight_sum += 1.0;
                        agg.separation_samples += 1;
                    }

                    if dist > settings.neighbour_radius {
                        continue;
                    }
                    let proximity = 1.0 - saturate(dist / settings.neighbour_radius);

                    match registry.relation(ty, other_ty) {
                        Some(Relation::Friendly) => {
                            if caps.max_friendly_samples > 0
                                && friendly_samples >= caps.max_friendly_samples
                            {
                                continue;
                            }
                            friendly_samples += 1;
                            agg.friendly_count += 1;

                            // ── Alignment with leadership ─────────────────
                            //
                            // Keep the running maximum leadership weight;
                            // a strictly greater leader resets the set, an
                            // exact tie joins it.
                            let other_vel = store.prev_velocities[other.index()];
                            let lead = other_settings.leadership_weight;
                            if lead > agg.max_leadership {
                                agg.alignment_sum = Vec3::ZERO;
                                agg.alignment_weight_sum = 0.0;
                                agg.leader_count = 0;
                                agg.max_leadership = lead;
                            }
                            if lead >= agg.max_leadership {
                                agg.alignment_sum += other_vel * proximity;
                                agg.alignment_weight_sum += proximity;
                                agg.leader_count += 1;
                            }

                            // ── Cohesion ──────────────────────────────────
                            agg.cohesion_sum += other_pos * proximity;
                            agg.cohesion_weight_sum += proximity;

                            // ── Schooling distance band ───────────────────
                            school(
                                &mut agg,
                                settings,
                                body_sum,
                                dist,
                                toward,
                                other_vel - my_vel,
                            );
                        }
                        Some(Relation::Avoid) => {
                            // The heavier hitter wins: repulsion scales with
                            // the normalized weight advantage the other side
                            // holds over us.
                            let theirs = other_settings.avoidance_weight;
                            if theirs > 0.0 {
                                let advantage = (theirs - settings.avoidance_weight) / theirs;
                                if advantage > 0.0 {
                                    let intensity = saturate(
                                        proximity * advantage * settings.avoid_response,
                                    );
                                    agg.avoid_separation_sum -= toward * intensity;
                                    agg.avoid_weight_sum += proximity;
                                    agg.avoid_danger = saturate(agg.avoid_danger + intensity);
                                }
                            }
                        }
                        Some(Relation::Neutral) => {
                            let theirs = other_settings.neutral_weight;
                            if theirs > 0.0 {
                                let advantage = (theirs - settings.neutral_weight) / theirs;
                                if advantage > 0.0 {
                                    let magnitude = proximity * advantage;
                                    agg.separation_sum -= toward * magnitude;
                                    agg.separation_weight_sum += proximity;
                                }
                            }
                        }
                        None => {}
                    }
                }
            }
        }
    }

    agg
}

/// The schooling distance band for one friendly pair.
///
/// Target spacing = `body_sum * spacing_factor`, with a dead zone of
/// `±dead_zone * target` around it.  Below the dead zone the pair repels
/// (softened); above it the pair attracts with growing strength out to
/// `outer_factor * target`, beyond which the band vanishes.
fn school(
    agg: &mut NeighbourAggregate,
    settings: &shoal_behavior::BehaviourSettings,
    body_sum: f32,
    dist: f32,
    toward: Vec3,
    relative_vel: Vec3,
) {
    let band = settings.schooling;
    if band.weight <= 0.0 || body_sum <= 0.0 {
        return;
    }
    let target = body_sum * band.spacing_factor;
    if target <= 0.0 {
        return;
    }
    let dead = band.dead_zone.max(0.0) * target;
    let inner_edge = (target - dead).max(0.0);
    let outer_edge = target + dead;
    let outer_limit = (band.outer_factor * target).max(outer_edge);

    if dist >= outer_limit {
        return;
    }

    if dist < inner_edge && inner_edge > 0.0 {
        // Too close: push apart, softened so the band doesn't fight the
        // hard-separation channel.
        let magnitude = (1.0 - dist / inner_edge) * band.inner_softness;
        agg.schooling_sum -= toward * magnitude;
    } else if dist > outer_edge {
        // Too far: pull together, ramping up toward the outer limit.
        let span = (outer_limit - outer_edge).max(f32::EPSILON);
        let magnitude = saturate((dist - outer_edge) / span);
        agg.schooling_sum += toward * magnitude;
    }
    // Inside the dead zone: no positional force.

    if band.radial_damping > 0.0 {
        // Oppose the closing component of the pair's relative velocity.
        let closing = relative_vel.dot(toward);
        agg.radial_damping -= toward * closing * band.radial_damping;
    }
}
