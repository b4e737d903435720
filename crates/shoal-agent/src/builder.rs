//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use glam::Vec3;
//! use shoal_agent::AgentStoreBuilder;
//! use shoal_core::TypeId;
//!
//! let (store, rngs) = AgentStoreBuilder::new(10_000, /*seed=*/ 42)
//!     .positions(vec![Vec3::ZERO; 10_000])
//!     .behaviours(vec![TypeId(0); 10_000])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(store.count, 10_000);
//! assert_eq!(rngs.len(),  10_000);
//! ```

use glam::Vec3;
use shoal_core::{ShoalError, ShoalResult, TypeId};

use crate::{AgentRngs, AgentStore};

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
///
/// All arrays are pre-allocated at construction time so later field writes
/// (from a spawner, etc.) are simple indexed assignments, not pushes.
pub struct AgentStoreBuilder {
    count: usize,
    seed: u64,
    positions: Option<Vec<Vec3>>,
    velocities: Option<Vec<Vec3>>,
    behaviours: Option<Vec<TypeId>>,
}

impl AgentStoreBuilder {
    /// Create a builder for `count` agents using `seed` as the global RNG seed.
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            count,
            seed,
            positions: None,
            velocities: None,
            behaviours: None,
        }
    }

    /// Supply initial positions (must be length `count`).
    /// Defaults to all-zero if not called.
    pub fn positions(mut self, positions: Vec<Vec3>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Supply initial velocities (must be length `count`).
    /// Defaults to all-zero if not called.
    pub fn velocities(mut self, velocities: Vec<Vec3>) -> Self {
        self.velocities = Some(velocities);
        self
    }

    /// Supply the per-agent behaviour type assignment (must be length `count`).
    /// Defaults to `TypeId(0)` for every agent if not called.
    pub fn behaviours(mut self, behaviours: Vec<TypeId>) -> Self {
        self.behaviours = Some(behaviours);
        self
    }

    /// Validate lengths and construct `AgentStore` + `AgentRngs`.
    pub fn build(self) -> ShoalResult<(AgentStore, AgentRngs)> {
        let mut store = AgentStore::new(self.count);

        if let Some(p) = self.positions {
            check_len(p.len(), self.count, "initial positions")?;
            store.positions = p;
        }
        if let Some(v) = self.velocities {
            check_len(v.len(), self.count, "initial velocities")?;
            store.prev_velocities.copy_from_slice(&v);
            store.velocities = v;
        }
        if let Some(b) = self.behaviours {
            check_len(b.len(), self.count, "behaviour assignment")?;
            store.behaviours = b;
        }

        let rngs = AgentRngs::new(self.count, self.seed);
        Ok((store, rngs))
    }
}

fn check_len(got: usize, expected: usize, what: &'static str) -> ShoalResult<()> {
    if got != expected {
        return Err(ShoalError::CountMismatch { expected, got, what });
    }
    Ok(())
}
