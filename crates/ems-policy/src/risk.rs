//! External risk-predictor hook.
//!
//! A trained hotspot model can bias *where* emergencies spawn; it is never
//! required for correctness of dispatch itself.  The spawner multiplies each
//! emergency zone's base weight by `risk(tick, location)` when sampling a
//! spawn location.

use ems_core::{LocationId, Tick};

/// Pure prediction function: `(time, location) → relative risk ≥ 0`.
pub trait RiskModel: Send + Sync {
    fn risk(&self, tick: Tick, location: LocationId) -> f64;
}

/// No predictor: every zone is equally likely.
pub struct UniformRisk;

impl RiskModel for UniformRisk {
    fn risk(&self, _tick: Tick, _location: LocationId) -> f64 {
        1.0
    }
}

impl<F> RiskModel for F
where
    F: Fn(Tick, LocationId) -> f64 + Send + Sync,
{
    fn risk(&self, tick: Tick, location: LocationId) -> f64 {
        self(tick, location)
    }
}
