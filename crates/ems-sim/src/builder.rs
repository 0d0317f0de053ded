//! Fluent builder for constructing a [`DispatchSimulator`].

use std::sync::Arc;

use ems_agent::Ambulance;
use ems_core::{AmbulanceId, LocationId, SimClock, SimRng};
use ems_graph::{CityGraph, RouteCache, Router};
use ems_policy::{DispatchPolicy, PriorityModel, RiskModel};

use crate::{DispatchSimulator, SimConfig, SimError, SimResult};

/// Fluent builder for [`DispatchSimulator<P, R>`].
///
/// # Required inputs
///
/// - [`CityGraph`] — the map (the simulator takes its own copy)
/// - [`SimConfig`] — horizon, seed, spawn and deadline knobs
/// - `P: DispatchPolicy` — the assignment logic (e.g.
///   [`ems_policy::GreedyNearest`])
/// - `R: Router` — the routing algorithm (e.g.
///   [`ems_graph::DijkstraRouter`])
///
/// # Optional inputs
///
/// | Method               | Default                         |
/// |----------------------|---------------------------------|
/// | `.risk_model(m)`     | Uniform spawn across zones      |
/// | `.priority_model(m)` | Raw reported priority, no score |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(graph, SimConfig::default(), GreedyNearest, DijkstraRouter)
///     .priority_model(Arc::new(CrispPriority::default()))
///     .build()?;
/// let metrics = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: DispatchPolicy, R: Router> {
    graph: CityGraph,
    config: SimConfig,
    policy: P,
    router: R,
    risk: Option<Arc<dyn RiskModel>>,
    scorer: Option<Arc<dyn PriorityModel>>,
}

impl<P: DispatchPolicy, R: Router> SimBuilder<P, R> {
    /// Create a builder with all required inputs.
    pub fn new(graph: CityGraph, config: SimConfig, policy: P, router: R) -> Self {
        Self { graph, config, policy, router, risk: None, scorer: None }
    }

    /// Bias spawn locations by an external risk predictor.
    pub fn risk_model(mut self, model: Arc<dyn RiskModel>) -> Self {
        self.risk = Some(model);
        self
    }

    /// Score each pending call (0–100) against its nearest unit's travel
    /// time, replacing raw-priority dispatch input.
    pub fn priority_model(mut self, model: Arc<dyn PriorityModel>) -> Self {
        self.scorer = Some(model);
        self
    }

    /// Validate the configuration and map, station the fleet, and return a
    /// ready-to-run simulator.
    pub fn build(self) -> SimResult<DispatchSimulator<P, R>> {
        self.config.validate().map_err(SimError::Config)?;

        let bases: Vec<LocationId> = self.graph.bases().map(|l| l.id).collect();
        let hospitals: Vec<LocationId> = self.graph.hospitals().map(|l| l.id).collect();
        let zones: Vec<LocationId> = self.graph.emergency_zones().map(|l| l.id).collect();

        if bases.is_empty() {
            return Err(SimError::Config("map has no ambulance base".into()));
        }
        if hospitals.is_empty() {
            return Err(SimError::Config("map has no hospital".into()));
        }
        if zones.is_empty() {
            return Err(SimError::Config("map has no emergency zone".into()));
        }

        // Station `units_per_base` ambulances at each base, IDs dense and in
        // base order so `fleet[id.index()]` always works.
        let mut fleet = Vec::with_capacity(bases.len() * self.config.units_per_base as usize);
        for &base in &bases {
            for _ in 0..self.config.units_per_base {
                fleet.push(Ambulance::new(AmbulanceId(fleet.len() as u32), base));
            }
        }

        let rng = SimRng::new(self.config.seed);
        Ok(DispatchSimulator {
            clock: SimClock::default(),
            graph: self.graph,
            policy: self.policy,
            router: self.router,
            cache: RouteCache::new(),
            fleet,
            emergencies: Vec::new(),
            rng,
            risk: self.risk,
            scorer: self.scorer,
            zones,
            hospitals,
            busy_unit_ticks: 0,
            config: self.config,
        })
    }
}
