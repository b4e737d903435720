//! Fluent builder for constructing a [`Sim`].

use shoal_agent::{AgentRngs, AgentStore};
use shoal_behavior::BehaviourRegistry;
use shoal_core::SimConfig;
use shoal_field::{Attractor, Environment, GroupNoise, Obstacle};
use shoal_spatial::GridSpec;

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — seed, thread count
/// - [`Environment`] — world bounds
/// - [`GridSpec`] — the shared uniform grid
/// - [`BehaviourRegistry`] — from [`shoal_behavior::RegistryBuilder`]
/// - [`AgentStore`] + [`AgentRngs`] — from [`shoal_agent::AgentStoreBuilder`]
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default          |
/// |-------------------|------------------|
/// | `.obstacles(v)`   | No obstacles     |
/// | `.attractors(v)`  | No attractors    |
/// | `.group_noise(n)` | No noise field   |
///
/// # Example
///
/// ```rust,ignore
/// let (store, rngs) = AgentStoreBuilder::new(n, seed)
///     .positions(positions)
///     .build()?;
/// let mut sim = SimBuilder::new(config, env, grid, registry, store, rngs)
///     .obstacles(obstacles)
///     .build()?;
/// let stats = sim.step(1.0 / 30.0);
/// ```
pub struct SimBuilder {
    config: SimConfig,
    env: Environment,
    grid: GridSpec,
    registry: BehaviourRegistry,
    agents: AgentStore,
    rngs: AgentRngs,
    obstacles: Vec<Obstacle>,
    attractors: Vec<Attractor>,
    noise: Option<GroupNoise>,
}

impl SimBuilder {
    /// Create a builder with all required inputs.
    pub fn new(
        config: SimConfig,
        env: Environment,
        grid: GridSpec,
        registry: BehaviourRegistry,
        agents: AgentStore,
        rngs: AgentRngs,
    ) -> Self {
        Self {
            config,
            env,
            grid,
            registry,
            agents,
            rngs,
            obstacles: Vec::new(),
            attractors: Vec::new(),
            noise: None,
        }
    }

    /// Supply the initial obstacle set.  Later edits go through
    /// [`Sim::stage_obstacle_change`].
    pub fn obstacles(mut self, obstacles: Vec<Obstacle>) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// Supply the initial attractor set.  Later edits go through
    /// [`Sim::stage_attractor_change`].
    pub fn attractors(mut self, attractors: Vec<Attractor>) -> Self {
        self.attractors = attractors;
        self
    }

    /// Enable the per-cell group-noise field.
    pub fn group_noise(mut self, noise: GroupNoise) -> Self {
        self.noise = Some(noise);
        self
    }

    /// Validate inputs and return a ready-to-step [`Sim`].
    ///
    /// This is the only fallible point of the simulation lifecycle; every
    /// operation after a successful build is total.
    pub fn build(self) -> SimResult<Sim> {
        let agent_count = self.agents.count;

        // Cell lookup assumes at least one cell per axis.
        if self.grid.is_empty() {
            return Err(SimError::Config(
                "grid resolution must be non-zero in every axis".into(),
            ));
        }

        if self.rngs.len() != agent_count {
            return Err(SimError::AgentCountMismatch {
                expected: agent_count,
                got: self.rngs.len(),
                what: "agent rngs",
            });
        }

        for (i, &ty) in self.agents.behaviours.iter().enumerate() {
            if !self.registry.is_valid_type(ty) {
                return Err(SimError::Config(format!(
                    "agent {i} references unregistered behaviour type {ty}"
                )));
            }
        }

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| SimError::Config(e.to_string()))?,
            ),
            // None → Rayon's global pool.
            None => None,
        };

        Ok(Sim::assemble(
            self.config,
            self.env,
            self.grid,
            self.registry,
            self.agents,
            self.rngs,
            self.obstacles,
            self.attractors,
            self.noise,
            #[cfg(feature = "parallel")]
            pool,
        ))
    }
}
