//! External priority-scorer hook.
//!
//! The fuzzy inference system that produces a 0–100 priority score lives
//! outside this workspace; the core consumes it purely through the
//! [`PriorityModel`] trait.  [`CrispPriority`] is the built-in fallback used
//! when no fuzzy engine is plugged in, so "fuzzy on/off" is just a choice of
//! trait object — not a branch inside the simulator.

/// Pure scoring function: `(reported_priority, travel_ticks) → 0–100`.
///
/// Higher scores dispatch first and weigh heavier in fitness.
pub trait PriorityModel: Send + Sync {
    fn score(&self, reported_priority: f64, travel_ticks: f64) -> f64;
}

/// Crisp weighted-sum fallback: 80 % of the score comes from the reported
/// priority (scaled from 1–5), 20 % from the inverted travel time capped at
/// `max_travel` ticks.
pub struct CrispPriority {
    /// Travel times at or beyond this contribute zero to the score.
    pub max_travel: f64,
}

impl CrispPriority {
    pub fn new(max_travel: f64) -> Self {
        Self { max_travel }
    }
}

impl Default for CrispPriority {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl PriorityModel for CrispPriority {
    fn score(&self, reported_priority: f64, travel_ticks: f64) -> f64 {
        let p_comp = (reported_priority / 5.0) * 80.0;
        let t_norm = travel_ticks.clamp(0.0, self.max_travel) / self.max_travel;
        let t_comp = (1.0 - t_norm) * 20.0;
        (p_comp + t_comp).clamp(0.0, 100.0)
    }
}

impl<F> PriorityModel for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn score(&self, reported_priority: f64, travel_ticks: f64) -> f64 {
        self(reported_priority, travel_ticks)
    }
}
