//! `shoal-sim` — step orchestrator for the shoal framework.
//!
//! # Phase-ordered step pipeline
//!
//! ```text
//! for each step(dt):
//!   ① Apply     — staged behaviour changes and obstacle/attractor edits
//!                 are applied as one atomic batch, then cleared.
//!   ② Snapshot  — velocities are frozen into prev_velocities so the
//!                 neighbour scan reads one consistent picture.
//!   ③ Rebuild   — agent pair index (prefix-sum + sort), obstacle CSR
//!                 index, attractor per-cell winner tables.
//!   ④ Noise     — group-noise field evaluated once per occupied cell.
//!   ⑤ Steer     — per agent, parallel with the `parallel` feature:
//!                 neighbour aggregation → field probes → composition →
//!                 integration, each task writing its own output slot.
//!   ⑥ Write-back — positions/velocities committed sequentially.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the steering fan-out on Rayon's thread pool.      |
//! | `fx-hash`  | FxHash for the per-step cell-noise table.              |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use shoal_agent::AgentStoreBuilder;
//! use shoal_core::SimConfig;
//! use shoal_sim::SimBuilder;
//!
//! let (store, rngs) = AgentStoreBuilder::new(10_000, 42)
//!     .positions(positions)
//!     .build()?;
//! let mut sim = SimBuilder::new(config, env, grid, registry, store, rngs)
//!     .build()?;
//! loop {
//!     let stats = sim.step(1.0 / 30.0);
//!     render(sim.positions());
//! }
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, StepStats, VolumeChange};
