//! `shoal-field` — everything the water pushes back with.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`environment`] | World bounds (box/sphere), wall probe, position clamp     |
//! | [`shape`]       | `Volume` — sphere / oriented-box shape tests              |
//! | [`obstacle`]    | `Obstacle` — solid volumes agents are pushed out of       |
//! | [`attractor`]   | `Attractor` — outer-shell pull volumes                    |
//! | [`pattern`]     | Sphere/box shell patterns and their steering signal       |
//! | [`pool`]        | `PatternPool` — generation-indexed runtime pattern slots  |
//! | [`noise`]       | `GroupNoise` — per-cell procedural drift generators       |
//!
//! # Design notes
//!
//! Every evaluation in this crate is *total*: degenerate geometry (zero
//! radii, zero-length directions) degrades to "no contribution" instead of
//! erroring, so the per-step pipeline never branches on failure.  The only
//! fallible surface is the pattern pool's handle check, which reports a
//! stale handle as a `false` return, by contract rather than by error.

pub mod attractor;
pub mod environment;
pub mod noise;
pub mod obstacle;
pub mod pattern;
pub mod pool;
pub mod shape;


pub use attractor::{Attractor, AttractorUsage, strongest_pull};
pub use environment::{BoundsProbe, Environment};
pub use noise::GroupNoise;
pub use obstacle::Obstacle;
pub use pattern::{BoxShell, SphereShell};
pub use pool::{PatternHandle, PatternPool};
pub use shape::{Shape, Volume};
