//! The `DispatchPolicy` trait — the main extension point for dispatch logic.

use ems_core::{AmbulanceId, EmergencyId, SimRng};

use crate::DispatchContext;

/// One proposed unit→call commitment.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Assignment {
    pub ambulance: AmbulanceId,
    pub emergency: EmergencyId,
}

/// Pluggable assignment logic, called once per simulation tick.
///
/// Implementations receive a read-only [`DispatchContext`] and a mutable
/// per-run [`SimRng`], so decisions are deterministic given the run seed.
///
/// # Contract
///
/// - Use each ambulance and each emergency at most once per call.
/// - Only propose pairs present in `ctx.costs` (the table already excludes
///   unreachable pairs).
/// - The simulator validates every returned assignment and silently skips
///   invalid ones rather than aborting; a sloppy policy degrades service,
///   it does not crash the run.
///
/// # Thread safety
///
/// Policies are shared across Rayon workers during parallel fitness
/// evaluation, so implementations must be `Send + Sync`; per-run mutable
/// state belongs in the rng or the context, not in the policy itself.
pub trait DispatchPolicy: Send + Sync {
    fn assign(&self, ctx: &DispatchContext<'_>, rng: &mut SimRng) -> Vec<Assignment>;

    /// Short label for logs and reports.
    fn name(&self) -> &'static str {
        "unnamed"
    }
}

impl Assignment {
    pub fn new(ambulance: AmbulanceId, emergency: EmergencyId) -> Self {
        Self { ambulance, emergency }
    }
}
