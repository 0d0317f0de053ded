//! Per-run simulation configuration.

use ems_graph::TrafficConfig;

/// All knobs for one simulation run.
///
/// Defaults reproduce the standard scenario: one-minute ticks, up to three
/// new calls per tick, a 25-tick answer deadline, 30 % reporting noise, and
/// the stock traffic-jam generator.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Total ticks to run.
    pub horizon_ticks: u64,
    /// Root seed for the run's RNG stream.
    pub seed: u64,
    /// Ambulances stationed at each base at startup.
    pub units_per_base: u32,
    /// Edge-cost units a moving ambulance covers per tick.
    pub movement_budget: u32,
    /// Each tick spawns `0..=spawn_max` new emergencies.
    pub spawn_max: u32,
    /// Relative frequency of severities 1–5.
    pub severity_weights: [f64; 5],
    /// Probability that a caller misreports severity by ±1.
    pub report_noise: f64,
    /// A call still pending after this many ticks becomes `Unanswered`.
    pub unanswered_after_ticks: u64,
    /// Traffic-jam generator; `None` freezes road weights for the whole run.
    pub traffic: Option<TrafficConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            horizon_ticks: 500,
            seed: 0,
            units_per_base: 2,
            movement_budget: 1,
            spawn_max: 3,
            severity_weights: [10.0, 20.0, 30.0, 25.0, 15.0],
            report_noise: 0.3,
            unanswered_after_ticks: 25,
            traffic: Some(TrafficConfig::default()),
        }
    }
}

impl SimConfig {
    /// Check that the configuration is internally consistent.  Returns a
    /// human-readable description of the first problem found.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.horizon_ticks == 0 {
            return Err("horizon_ticks must be positive".into());
        }
        if self.units_per_base == 0 {
            return Err("units_per_base must be positive".into());
        }
        if self.movement_budget == 0 {
            return Err("movement_budget must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.report_noise) {
            return Err(format!("report_noise {} outside [0, 1]", self.report_noise));
        }
        if !self.severity_weights.iter().any(|w| *w > 0.0) {
            return Err("severity_weights must contain a positive entry".into());
        }
        if self.unanswered_after_ticks == 0 {
            return Err("unanswered_after_ticks must be positive".into());
        }
        Ok(())
    }
}
