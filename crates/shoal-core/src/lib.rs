//! `shoal-core` — foundational types for the `shoal` steering framework.
//!
//! This crate is a dependency of every other `shoal-*` crate.  It intentionally
//! has no `shoal-*` dependencies and minimal external ones (only `glam`,
//! `rand`, and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                           |
//! |------------|----------------------------------------------------|
//! | [`ids`]    | `AgentId`, `CellId`, `TypeId`                      |
//! | [`mask`]   | `TypeMask` — fixed-width behaviour-type bitmask    |
//! | [`math`]   | `Aabb`, saturate/falloff helpers over `glam::Vec3` |
//! | [`rng`]    | `AgentRng` (per-agent), `SimRng` (global)          |
//! | [`config`] | `SimConfig`                                        |
//! | [`error`]  | `ShoalError`, `ShoalResult`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod config;
pub mod error;
pub mod ids;
pub mod mask;
pub mod math;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{ShoalError, ShoalResult};
pub use ids::{AgentId, CellId, TypeId};
pub use mask::TypeMask;
pub use math::{Aabb, lateral_perpendicular, saturate};
pub use rng::{AgentRng, SimRng};

/// The vector type used throughout the framework.
pub use glam::Vec3;
