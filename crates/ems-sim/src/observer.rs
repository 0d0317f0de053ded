//! Simulation observer trait for progress reporting and data collection.

use ems_core::Tick;

use crate::{RunMetrics, TickMetrics};

/// Callbacks invoked by [`DispatchSimulator::run`][crate::DispatchSimulator::run]
/// at tick boundaries.
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
///     fn on_tick_end(&mut self, m: &TickMetrics) {
///         if m.tick.0 % self.interval == 0 {
///             println!("{}: {} pending, {} units free", m.tick, m.pending_after, m.available_units);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with that tick's counters.
    fn on_tick_end(&mut self, _metrics: &TickMetrics) {}

    /// Called once after the final tick with the run aggregate.
    fn on_run_end(&mut self, _metrics: &RunMetrics) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Records every tick's metrics for post-run inspection.
#[derive(Default)]
pub struct TickLog {
    pub ticks: Vec<TickMetrics>,
}

impl TickLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SimObserver for TickLog {
    fn on_tick_end(&mut self, metrics: &TickMetrics) {
        self.ticks.push(metrics.clone());
    }
}
