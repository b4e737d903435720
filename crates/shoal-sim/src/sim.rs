//! The `Sim` struct and its step pipeline.

use glam::Vec3;
use shoal_agent::{AgentRngs, AgentStore};
use shoal_behavior::BehaviourRegistry;
use shoal_core::{Aabb, AgentId, AgentRng, CellId, SimConfig, TypeId};
use shoal_field::{Attractor, AttractorUsage, Environment, GroupNoise, Obstacle, PatternPool, strongest_pull};
use shoal_spatial::{AgentGridIndex, AttractorGridIndex, AttractorStamp, GridSpec, ObstacleGridIndex};
use shoal_steer::{FieldInputs, Steering, aggregate_neighbours, compose_steering};

use crate::{NoopObserver, SimObserver};

#[cfg(feature = "fx-hash")]
type CellNoiseMap = rustc_hash::FxHashMap<CellId, Vec3>;
#[cfg(not(feature = "fx-hash"))]
type CellNoiseMap = std::collections::HashMap<CellId, Vec3>;

// ── Staged volume edits ───────────────────────────────────────────────────────

/// One staged edit to the obstacle or attractor list.
///
/// Staged edits accumulate between steps and are applied as a batch at the
/// start of the next step, before any grid rebuild, so a step never sees a
/// half-applied set.  `Replace` with an out-of-range index is dropped at
/// apply time.
#[derive(Clone, Debug)]
pub enum VolumeChange<T> {
    Add(T),
    Replace(usize, T),
}

// ── Step summary ──────────────────────────────────────────────────────────────

/// Summary of one completed step, returned synchronously from
/// [`Sim::step`]; `&mut self` on `step` already guarantees all staged
/// changes from before the call are visible in the result.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Number of simulated agents.
    pub agents: usize,
    /// Grid cells holding at least one agent this step.
    pub occupied_cells: usize,
    /// Live runtime patterns after this step.
    pub active_patterns: usize,
    /// Staged changes (behaviour, obstacle, attractor) applied at the top
    /// of this step.
    pub applied_changes: usize,
}

// ── Per-step shared context ───────────────────────────────────────────────────

/// Immutable state shared by every per-agent steering task within one step.
///
/// Assembled from disjoint field borrows of `Sim` so the per-agent RNGs can
/// be borrowed mutably at the same time.
struct StepContext<'a> {
    env: &'a Environment,
    grid: &'a GridSpec,
    registry: &'a BehaviourRegistry,
    agents: &'a AgentStore,
    index: &'a AgentGridIndex,
    obstacle_index: &'a ObstacleGridIndex,
    attractor_index: &'a AttractorGridIndex,
    obstacles: &'a [Obstacle],
    attractors: &'a [Attractor],
    patterns: &'a PatternPool,
    noise: &'a CellNoiseMap,
    dt: f32,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim` holds all simulation state and drives the phase-ordered step loop:
///
/// 1. **Apply** — staged behaviour changes and obstacle/attractor edits are
///    applied as one batch, then cleared.
/// 2. **Snapshot** — `prev_velocities` is frozen so the neighbour scan reads
///    a consistent picture while the integrator overwrites `velocities`.
/// 3. **Rebuild** — the agent pair index (prefix-sum + sort), the obstacle
///    CSR index, and the attractor winner tables are rebuilt from scratch.
/// 4. **Noise** — the group-noise field is evaluated once per occupied cell.
/// 5. **Steer** — per agent (parallel with the `parallel` feature): neighbour
///    aggregation, field probes, composition, and integration, each writing
///    only its own output slot.
/// 6. **Write-back** — positions and velocities are committed sequentially.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (seed, thread count).
    pub config: SimConfig,

    /// World bounds.  Every integrated position is clamped inside.
    pub env: Environment,

    /// The uniform grid all spatial indices share.
    pub grid: GridSpec,

    /// Frozen per-type settings and relationship masks.
    pub registry: BehaviourRegistry,

    /// Agent state (SoA arrays).
    pub agents: AgentStore,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    /// Current obstacle set.  Edited only through staged changes.
    pub obstacles: Vec<Obstacle>,

    /// Current attractor set.  Edited only through staged changes.
    pub attractors: Vec<Attractor>,

    /// Runtime shell patterns; handles stay valid across steps.
    pub patterns: PatternPool,

    /// Optional per-cell group-noise field.
    pub noise: Option<GroupNoise>,

    agent_index: AgentGridIndex,
    obstacle_index: ObstacleGridIndex,
    attractor_index: AttractorGridIndex,

    pending_obstacles: Vec<VolumeChange<Obstacle>>,
    pending_attractors: Vec<VolumeChange<Attractor>>,

    // Step scratch, reused across steps to avoid reallocation.
    outputs: Vec<Steering>,
    broad_boxes: Vec<Aabb>,
    stamps: Vec<AttractorStamp>,

    time: f32,
    step_index: u64,

    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> StepStats {
        self.step_with(dt, &mut NoopObserver)
    }

    /// Advance by `dt` seconds with observer callbacks at the step
    /// boundaries.
    pub fn step_with<O: SimObserver>(&mut self, dt: f32, observer: &mut O) -> StepStats {
        // ── Phase 1: apply staged changes atomically ──────────────────────
        let applied_changes = self.apply_pending_changes();
        observer.on_step_start(self.step_index);

        // ── Phase 2: freeze the velocity snapshot ─────────────────────────
        self.agents.snapshot_velocities();

        // ── Phase 3: rebuild all spatial indices ──────────────────────────
        {
            let registry = &self.registry;
            let behaviours = &self.agents.behaviours;
            self.agent_index.rebuild(&self.grid, &self.agents.positions, |i| {
                registry.get(behaviours[i]).body_radius
            });
        }

        self.broad_boxes.clear();
        self.broad_boxes.extend(self.obstacles.iter().map(Obstacle::broad_aabb));
        self.obstacle_index.rebuild(&self.grid, &self.broad_boxes);

        self.stamps.clear();
        self.stamps.extend(self.attractors.iter().map(|a| AttractorStamp {
            aabb: a.volume.broad_aabb(),
            priority: a.cell_priority,
            group: a.usage == AttractorUsage::Group,
        }));
        self.attractor_index.rebuild(&self.grid, &self.stamps);

        // ── Phase 4: evaluate group noise once per occupied cell ──────────
        let noise_table = self.build_noise_table();

        // ── Phase 5: per-agent steering fan-out ───────────────────────────
        let mut outputs = std::mem::take(&mut self.outputs);
        outputs.clear();
        outputs.resize(
            self.agents.count,
            Steering {
                velocity: Vec3::ZERO,
                position: Vec3::ZERO,
            },
        );

        {
            let ctx = StepContext {
                env: &self.env,
                grid: &self.grid,
                registry: &self.registry,
                agents: &self.agents,
                index: &self.agent_index,
                obstacle_index: &self.obstacle_index,
                attractor_index: &self.attractor_index,
                obstacles: &self.obstacles,
                attractors: &self.attractors,
                patterns: &self.patterns,
                noise: &noise_table,
                dt,
            };

            #[cfg(not(feature = "parallel"))]
            {
                for (i, rng) in self.rngs.inner.iter_mut().enumerate() {
                    outputs[i] = steer_one(AgentId(i as u32), rng, &ctx);
                }
            }

            #[cfg(feature = "parallel")]
            {
                let rngs = self.rngs.inner.as_mut_slice();
                let slots = outputs.as_mut_slice();
                let mut run = || {
                    use rayon::prelude::*;
                    slots
                        .par_iter_mut()
                        .zip(rngs.par_iter_mut())
                        .enumerate()
                        .for_each(|(i, (out, rng))| {
                            *out = steer_one(AgentId(i as u32), rng, &ctx);
                        });
                };
                match &self.pool {
                    Some(pool) => pool.install(run),
                    None => run(),
                }
            }
        }

        // ── Phase 6: sequential write-back ────────────────────────────────
        for (i, steering) in outputs.iter().enumerate() {
            self.agents.velocities[i] = steering.velocity;
            self.agents.positions[i] = steering.position;
        }
        self.outputs = outputs;

        self.time += dt;
        let stats = StepStats {
            agents: self.agents.count,
            occupied_cells: self.agent_index.occupied_cell_count(),
            active_patterns: self.patterns.active_count(),
            applied_changes,
        };
        observer.on_step_end(self.step_index, &stats, &self.agents);
        self.step_index += 1;
        stats
    }

    /// Queue a behaviour-type reassignment, applied at the next step start.
    ///
    /// Returns `false` (staging nothing) for an unregistered type.
    pub fn stage_behaviour_change(&mut self, agent: AgentId, new_type: TypeId) -> bool {
        if !self.registry.is_valid_type(new_type) {
            return false;
        }
        self.agents.stage_behaviour_change(agent, new_type);
        true
    }

    /// Queue an obstacle edit, applied at the next step start.
    pub fn stage_obstacle_change(&mut self, change: VolumeChange<Obstacle>) {
        self.pending_obstacles.push(change);
    }

    /// Queue an attractor edit, applied at the next step start.
    pub fn stage_attractor_change(&mut self, change: VolumeChange<Attractor>) {
        self.pending_attractors.push(change);
    }

    /// Current agent positions, updated by the last completed step.
    pub fn positions(&self) -> &[Vec3] {
        &self.agents.positions
    }

    /// Current agent velocities, updated by the last completed step.
    pub fn velocities(&self) -> &[Vec3] {
        &self.agents.velocities
    }

    /// Accumulated simulation time in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Number of completed steps.
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn apply_pending_changes(&mut self) -> usize {
        let mut applied = self.agents.apply_pending_behaviours();
        applied += apply_volume_changes(&mut self.obstacles, &mut self.pending_obstacles);
        applied += apply_volume_changes(&mut self.attractors, &mut self.pending_attractors);
        applied
    }

    /// Evaluate the group-noise field once per occupied cell, at the cell
    /// center.  Agents in a cell share the cached sample.
    fn build_noise_table(&self) -> CellNoiseMap {
        let mut table = CellNoiseMap::default();
        let Some(noise) = &self.noise else {
            return table;
        };
        // The pair list is sorted by cell, so each occupied cell forms one
        // contiguous run.
        let mut last: Option<CellId> = None;
        for &(cell, _) in self.agent_index.pairs() {
            if last == Some(cell) {
                continue;
            }
            last = Some(cell);
            table.insert(cell, noise.eval(self.grid.cell_center(cell), self.time));
        }
        table
    }

    // ── Package-private constructor used by SimBuilder ────────────────────

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        config: SimConfig,
        env: Environment,
        grid: GridSpec,
        registry: BehaviourRegistry,
        agents: AgentStore,
        rngs: AgentRngs,
        obstacles: Vec<Obstacle>,
        attractors: Vec<Attractor>,
        noise: Option<GroupNoise>,
        #[cfg(feature = "parallel")] pool: Option<rayon::ThreadPool>,
    ) -> Sim {
        Sim {
            config,
            env,
            grid,
            registry,
            agents,
            rngs,
            obstacles,
            attractors,
            patterns: PatternPool::new(),
            noise,
            agent_index: AgentGridIndex::new(),
            obstacle_index: ObstacleGridIndex::new(),
            attractor_index: AttractorGridIndex::new(),
            pending_obstacles: Vec::new(),
            pending_attractors: Vec::new(),
            outputs: Vec::new(),
            broad_boxes: Vec::new(),
            stamps: Vec::new(),
            time: 0.0,
            step_index: 0,
            #[cfg(feature = "parallel")]
            pool,
        }
    }
}

fn apply_volume_changes<T>(target: &mut Vec<T>, pending: &mut Vec<VolumeChange<T>>) -> usize {
    let mut applied = 0;
    for change in pending.drain(..) {
        match change {
            VolumeChange::Add(value) => {
                target.push(value);
                applied += 1;
            }
            VolumeChange::Replace(index, value) => {
                if let Some(slot) = target.get_mut(index) {
                    *slot = value;
                    applied += 1;
                }
            }
        }
    }
    applied
}

// ── Per-agent steering task ───────────────────────────────────────────────────

/// Aggregate, probe, compose, and integrate one agent.
///
/// Reads only shared immutable state plus this agent's own RNG; writes
/// nothing, so the fan-out needs no synchronization.
fn steer_one(agent: AgentId, rng: &mut AgentRng, ctx: &StepContext<'_>) -> Steering {
    let ty = ctx.agents.behaviour(agent);
    let settings = ctx.registry.get(ty);
    let pos = ctx.agents.positions[agent.index()];
    let vel = ctx.agents.prev_velocities[agent.index()];

    let agg = aggregate_neighbours(agent, ctx.agents, ctx.registry, ctx.grid, ctx.index);

    let cell = ctx.grid.cell_id_of(pos);
    let depth = ctx.env.normalized_depth(pos);

    // Obstacle repulsion: broad-phase cell lookup, exact shape test per hit.
    let mut obstacle = Vec3::ZERO;
    for oi in ctx.obstacle_index.obstacles_in(cell) {
        let ob = &ctx.obstacles[oi as usize];
        if !ob.affects.contains(ty) {
            continue;
        }
        if let Some((dir, strength)) = ob.repulsion(pos) {
            obstacle += dir * strength;
        }
    }

    // Attraction: the cell's winner per usage class, then strongest pull of
    // the applicable candidates.
    let individual = ctx
        .attractor_index
        .individual_winner(cell)
        .map(|i| &ctx.attractors[i as usize]);
    let group = ctx
        .attractor_index
        .group_winner(cell)
        .map(|i| &ctx.attractors[i as usize]);
    let attraction = strongest_pull(
        individual
            .into_iter()
            .chain(group)
            .filter(|a| a.affects.contains(ty)),
        pos,
        depth,
    );

    let wander = if settings.wander_weight > 0.0 {
        rng.wander_offset()
    } else {
        Vec3::ZERO
    };

    let inputs = FieldInputs {
        bounds: ctx.env.probe(pos, settings.separation_radius),
        obstacle,
        attraction,
        pattern: ctx.patterns.sample(pos, ty),
        group_noise: ctx.noise.get(&cell).copied().unwrap_or(Vec3::ZERO),
        wander,
        depth,
    };

    compose_steering(agent, settings, &agg, &inputs, ctx.env, pos, vel, ctx.dt)
}
