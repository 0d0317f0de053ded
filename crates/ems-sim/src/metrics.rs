//! Per-tick and per-run outcome counters.

use ems_core::{LocationId, Tick};

// ── TickMetrics ───────────────────────────────────────────────────────────────

/// What happened during one tick.  Handed to observers; never stored by the
/// simulator itself.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickMetrics {
    pub tick: Tick,
    /// New emergencies created this tick.
    pub spawned: u32,
    /// Assignments committed this tick.
    pub dispatched: u32,
    /// Units that reached an emergency scene this tick.
    pub scene_arrivals: u32,
    /// Patients delivered to a hospital this tick.
    pub resolved: u32,
    /// Calls that hit the answer deadline this tick.
    pub expired: u32,
    /// Calls still waiting after dispatch ran.
    pub pending_after: u32,
    /// Units idle at a base after the movement phase.
    pub available_units: u32,
    /// Road surged by the traffic generator this tick, if any.
    pub jam: Option<(LocationId, LocationId)>,
}

// ── RunMetrics ────────────────────────────────────────────────────────────────

/// Aggregate outcome of a completed run, computed once from the final case
/// log and fleet state.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunMetrics {
    pub ticks_run: u64,
    pub total_spawned: u64,
    pub resolved: u64,
    pub unanswered: u64,
    /// Calls still pending when the horizon ended.
    pub pending_at_end: u64,
    /// Calls with a committed unit still en route at the horizon.
    pub in_flight_at_end: u64,
    /// Mean spawn→scene-arrival latency in ticks, over calls whose unit
    /// reached the scene.  `None` when no unit ever arrived.
    pub avg_response_ticks: Option<f64>,
    /// Fraction of spawned calls fully resolved.
    pub satisfaction: f64,
    /// Total edge-cost units driven by the whole fleet.
    pub total_distance: u64,
    pub fleet_size: u32,
    /// Mean fraction of the fleet busy (not `Available`) per tick.
    pub utilization: f64,
}

impl RunMetrics {
    /// Conservation law: every spawned call is in exactly one terminal or
    /// live bucket.
    pub fn accounts_for_all_calls(&self) -> bool {
        self.resolved + self.unanswered + self.pending_at_end + self.in_flight_at_end
            == self.total_spawned
    }
}
