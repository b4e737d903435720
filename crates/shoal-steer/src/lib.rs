//! `shoal-steer` — per-agent neighbour aggregation and steering.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`aggregate`] | `NeighbourAggregate` + the grid-bounded neighbour scan       |
//! | [`compose`]   | Force composition, split/panic blend, velocity integration   |
//!
//! # Concurrency contract
//!
//! Both stages are pure per agent: they read shared immutable state (store
//! snapshot, registry, grid index, field inputs) and write only their own
//! output slot.  The simulation crate fans them out with Rayon; nothing in
//! here synchronizes, because nothing needs to.

pub mod aggregate;
pub mod compose;

#[cfg(test)]
mod tests;

pub use aggregate::{NeighbourAggregate, aggregate_neighbours};
pub use compose::{FieldInputs, Steering, compose_steering};
