//! `shoal-spatial` — uniform-grid spatial indexing.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`grid`]        | `GridSpec` — lattice geometry and cell-id arithmetic         |
//! | [`agent_index`] | `AgentGridIndex` — sorted `(cell, agent)` pairs + ranges     |
//! | [`volume_index`]| `ObstacleGridIndex` (CSR), `AttractorGridIndex` (per-cell winner) |
//!
//! # Design notes
//!
//! All three indexes are rebuilt from scratch every step; none of them keep
//! incremental state.  A rebuild is two passes (count, then fill via an
//! exclusive prefix sum) plus one sort, so the cost is O(N log N) in the
//! number of stamped pairs and independent of the previous frame.
//!
//! Out-of-range positions are *clamped* into the lattice, never dropped — an
//! agent outside the world still lands in a border cell and stays visible to
//! the neighbour scan.  A zero-cell grid short-circuits every rebuild and
//! query to a no-op.

pub mod agent_index;
pub mod grid;
pub mod volume_index;

#[cfg(test)]
mod tests;

pub use agent_index::{AgentGridIndex, CellRange, MAX_CELLS_PER_AGENT};
pub use grid::GridSpec;
pub use volume_index::{AttractorGridIndex, AttractorStamp, ObstacleGridIndex};
