//! Top-level simulation configuration.

/// Global run configuration, fixed at initialization.
///
/// Typically loaded from a TOML/JSON file by the application crate and passed
/// to the simulation builder.  Per-step timing is *not* configured here: the
/// caller supplies `delta_time` to every `step()` call so the simulation can
/// follow a variable frame clock.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_threads: None,
        }
    }
}
