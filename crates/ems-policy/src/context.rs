//! Read-only dispatch state passed to every policy call.

use rustc_hash::FxHashMap;

use ems_core::{AmbulanceId, EmergencyId, LocationId, Tick};

// ── Inputs ────────────────────────────────────────────────────────────────────

/// A pending emergency as seen by a dispatch policy.
#[derive(Clone, Debug)]
pub struct PendingCall {
    pub emergency: EmergencyId,
    pub location: LocationId,
    /// Reported priority 1–5 (what dispatch ordering uses).
    pub priority: u8,
    /// Fuzzy-adjusted score (0–100) if a priority model already ran.
    pub score: Option<f64>,
    /// Ticks this call has been waiting for a commit.
    pub waiting_ticks: u64,
}

/// An available fleet unit as seen by a dispatch policy.
#[derive(Copy, Clone, Debug)]
pub struct IdleUnit {
    pub ambulance: AmbulanceId,
    pub location: LocationId,
}

// ── CostTable ─────────────────────────────────────────────────────────────────

/// Feasibility-filtered travel costs for every `(unit, call)` pair.
///
/// Pairs with no path between them are simply absent — a policy that only
/// reads this table can never propose an unreachable assignment.
#[derive(Default, Debug)]
pub struct CostTable {
    costs: FxHashMap<(AmbulanceId, EmergencyId), u32>,
}

impl CostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: AmbulanceId, call: EmergencyId, cost: u32) {
        self.costs.insert((unit, call), cost);
    }

    /// Travel cost from `unit` to `call`, or `None` if the pair is
    /// unreachable.
    #[inline]
    pub fn travel_cost(&self, unit: AmbulanceId, call: EmergencyId) -> Option<u32> {
        self.costs.get(&(unit, call)).copied()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

// ── DispatchContext ───────────────────────────────────────────────────────────

/// Everything a policy may look at when assigning units to calls.
///
/// Built once per tick by the simulator and shared immutably with the
/// policy.  `pending` is ordered by the queue policy: reported priority
/// descending, then spawn tick ascending, then ID ascending.
pub struct DispatchContext<'a> {
    pub tick: Tick,
    pub pending: &'a [PendingCall],
    pub idle: &'a [IdleUnit],
    pub costs: &'a CostTable,
}

impl<'a> DispatchContext<'a> {
    #[inline]
    pub fn new(
        tick: Tick,
        pending: &'a [PendingCall],
        idle: &'a [IdleUnit],
        costs: &'a CostTable,
    ) -> Self {
        Self { tick, pending, idle, costs }
    }
}
