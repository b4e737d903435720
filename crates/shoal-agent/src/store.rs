//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! The parallel steering phase needs `&mut AgentRngs` (exclusive mutable access
//! to each agent's wander RNG) and `&AgentStore` (shared read access to
//! positions/velocities) simultaneously.  Rust's borrow checker forbids this if
//! both live inside a single struct.  Keeping RNGs in a separate `AgentRngs`
//! struct resolves the conflict cleanly:
//!
//! ```ignore
//! let store: &AgentStore = &sim.agents;
//! sim.rngs.inner
//!     .par_iter_mut()
//!     .enumerate()
//!     .for_each(|(i, rng)| steer_one(AgentId(i as u32), store, rng, ..));
//! ```

use glam::Vec3;
use shoal_core::{AgentId, AgentRng, TypeId};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`AgentStore`] to enable
/// simultaneous `&mut AgentRngs` + `&AgentStore` borrows in the parallel phase.
///
/// `AgentRngs` is `Send` (the inner `SmallRng` is `Send`) but intentionally
/// not `Sync` — per-agent RNG state must never be shared between threads.
/// Rayon's `par_iter_mut()` handles the exclusive-per-thread access pattern.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them:
///
/// ```ignore
/// let pos = store.positions[agent.index()];  // O(1), cache-friendly
/// ```
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Current position.
    pub positions: Vec<Vec3>,

    /// Current velocity.
    pub velocities: Vec<Vec3>,

    /// Velocity at the start of the previous step.  The neighbour scan reads
    /// this (not `velocities`) so alignment sees a consistent snapshot while
    /// the integrator overwrites `velocities` in the same step.
    pub prev_velocities: Vec<Vec3>,

    /// Behaviour type per agent.  Only mutated via the staged-change path.
    pub behaviours: Vec<TypeId>,

    /// Staged behaviour reassignments, applied in batch by
    /// [`apply_pending_behaviours`][Self::apply_pending_behaviours].
    pending_behaviours: Vec<(AgentId, TypeId)>,
}

impl AgentStore {
    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    #[inline]
    pub fn behaviour(&self, agent: AgentId) -> TypeId {
        self.behaviours[agent.index()]
    }

    // ── Staged behaviour changes ──────────────────────────────────────────

    /// Queue a behaviour-type reassignment for `agent`.
    ///
    /// Takes effect at the next [`apply_pending_behaviours`] call (the
    /// simulation invokes it at the step boundary, before the grid rebuild).
    /// Out-of-range agents are dropped at apply time, not here.
    ///
    /// [`apply_pending_behaviours`]: Self::apply_pending_behaviours
    pub fn stage_behaviour_change(&mut self, agent: AgentId, new_type: TypeId) {
        self.pending_behaviours.push((agent, new_type));
    }

    /// Apply every staged behaviour change in staging order and clear the
    /// pending list.  Returns the number of changes applied.
    ///
    /// Staging order matters: if the same agent was staged twice, the later
    /// entry wins.
    pub fn apply_pending_behaviours(&mut self) -> usize {
        let mut applied = 0;
        for (agent, new_type) in self.pending_behaviours.drain(..) {
            if let Some(slot) = self.behaviours.get_mut(agent.index()) {
                *slot = new_type;
                applied += 1;
            }
        }
        applied
    }

    /// Number of staged-but-unapplied behaviour changes.
    pub fn pending_behaviour_count(&self) -> usize {
        self.pending_behaviours.len()
    }

    /// Copy `velocities` into `prev_velocities`.  Called once per step before
    /// the integrator runs.
    pub fn snapshot_velocities(&mut self) {
        self.prev_velocities.copy_from_slice(&self.velocities);
    }

    // ── Package-private constructor used by AgentStoreBuilder ─────────────

    pub(crate) fn new(count: usize) -> Self {
        Self {
            count,
            positions: vec![Vec3::ZERO; count],
            velocities: vec![Vec3::ZERO; count],
            prev_velocities: vec![Vec3::ZERO; count],
            behaviours: vec![TypeId(0); count],
            pending_behaviours: Vec::new(),
        }
    }
}
