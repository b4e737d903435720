//! Simulation observer trait for progress reporting and data collection.

use shoal_agent::AgentStore;

use crate::sim::StepStats;

/// Callbacks invoked by [`Sim::step_with`][crate::Sim::step_with] at the step
/// boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_step_end(&mut self, step: u64, stats: &StepStats, _agents: &AgentStore) {
///         if step % self.interval == 0 {
///             println!("step {step}: {} agents in {} cells", stats.agents, stats.occupied_cells);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of a step, after staged changes were applied but
    /// before any rebuild or steering work.
    fn on_step_start(&mut self, _step: u64) {}

    /// Called at the end of a step with read-only access to the updated
    /// agent state, so recorders can snapshot positions without the sim
    /// knowing about any output format.
    fn on_step_end(&mut self, _step: u64, _stats: &StepStats, _agents: &AgentStore) {}
}

/// A [`SimObserver`] that does nothing.  Use when stepping without callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
