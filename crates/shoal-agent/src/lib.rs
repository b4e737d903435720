//! `shoal-agent` — Structure-of-Arrays agent storage.
//!
//! # Crate layout
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`store`]   | `AgentStore` (SoA data) and `AgentRngs`               |
//! | [`builder`] | `AgentStoreBuilder` — one-shot allocation + seeding   |
//!
//! # Design notes
//!
//! Agents are index-identified: an [`AgentId`][shoal_core::AgentId] is a bare
//! index into every SoA array, there is no per-agent object.  All arrays are
//! allocated once at simulation creation and mutated in place every step.
//!
//! Behaviour-type reassignment is *staged*: callers append to a pending list
//! at any time between steps and the simulation applies the whole batch
//! atomically before the grid rebuild, so a parallel steering scan never
//! observes a half-applied type change.

pub mod builder;
pub mod store;


pub use builder::AgentStoreBuilder;
pub use store::{AgentRngs, AgentStore};
