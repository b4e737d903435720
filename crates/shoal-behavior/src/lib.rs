//! `shoal-behavior` — per-type tuning and type relationships.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`settings`] | `BehaviourSettings` — all tunable weights, radii, and caps |
//! | [`registry`] | `BehaviourRegistry` — validated settings table + relations |
//!
//! # Design notes
//!
//! Settings are immutable per step: the simulation holds the registry behind a
//! shared reference during the parallel scan, and nothing mutates it after
//! construction.  Relationship masks are *symmetric by construction* — the
//! registry builder mirrors every declared relation, so "A avoids B but B does
//! not avoid A" is unrepresentable rather than checked per frame.

pub mod registry;
pub mod settings;

#[cfg(test)]
mod tests;

pub use registry::{BehaviourRegistry, RegistryBuilder, Relation};
pub use settings::{BehaviourSettings, SamplingCaps, SchoolingSettings, SplitSettings};
