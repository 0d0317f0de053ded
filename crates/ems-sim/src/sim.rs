//! The `DispatchSimulator` struct and its tick loop.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use ems_agent::{Ambulance, AmbulanceStatus, Arrival, Emergency, EmergencyStatus};
use ems_core::{EmergencyId, LocationId, SimClock, SimRng, Tick};
use ems_graph::{CityGraph, GraphError, Route, RouteCache, Router};
use ems_policy::{CostTable, DispatchContext, DispatchPolicy, IdleUnit, PendingCall, PriorityModel, RiskModel};

use crate::{RunMetrics, SimConfig, SimObserver, SimResult, TickMetrics};

/// The main simulation runner.
///
/// `DispatchSimulator<P, R>` owns a private copy of all mutable state — the
/// graph (traffic mutates it), the fleet, the case log, and the run RNG — so
/// concurrent trials never share anything.  Each tick runs six phases in a
/// fixed order:
///
/// 1. **Spawn**: draw `0..=spawn_max` new emergencies at risk-weighted
///    emergency zones, with severity from the configured distribution and
///    reporting noise applied.
/// 2. **Traffic**: with the configured probability, surge one road weight.
/// 3. **Expire**: pending calls past the answer deadline become `Unanswered`.
/// 4. **Dispatch**: build the ordered pending queue, the idle-unit list, and
///    the feasibility-filtered cost table; hand them to the policy; validate
///    and commit the returned assignments.
/// 5. **Move**: advance every en-route unit by the movement budget and react
///    to arrivals (scene → hospital → base transitions).
/// 6. **Record**: snapshot the tick's counters for observers.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct DispatchSimulator<P: DispatchPolicy, R: Router> {
    pub(crate) config: SimConfig,
    pub(crate) clock: SimClock,
    pub(crate) graph: CityGraph,
    pub(crate) policy: P,
    pub(crate) router: R,
    pub(crate) cache: RouteCache,
    pub(crate) fleet: Vec<Ambulance>,
    pub(crate) emergencies: Vec<Emergency>,
    pub(crate) rng: SimRng,
    pub(crate) risk: Option<Arc<dyn RiskModel>>,
    pub(crate) scorer: Option<Arc<dyn PriorityModel>>,
    /// Emergency-zone locations, cached in ID order.
    pub(crate) zones: Vec<LocationId>,
    /// Hospital locations, cached in ID order.
    pub(crate) hospitals: Vec<LocationId>,
    /// Sum over ticks of units not `Available`, for the utilization metric.
    pub(crate) busy_unit_ticks: u64,
}

impl<P: DispatchPolicy, R: Router> DispatchSimulator<P, R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run `config.horizon_ticks` ticks and return the aggregate metrics.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunMetrics> {
        for _ in 0..self.config.horizon_ticks {
            observer.on_tick_start(self.clock.current_tick);
            let metrics = self.step()?;
            observer.on_tick_end(&metrics);
        }
        let metrics = self.finish();
        observer.on_run_end(&metrics);
        Ok(metrics)
    }

    /// Execute one tick at the current clock position, then advance the
    /// clock.  Tests drive this directly for fine-grained inspection.
    pub fn step(&mut self) -> SimResult<TickMetrics> {
        let now = self.clock.current_tick;
        let mut metrics = TickMetrics { tick: now, ..TickMetrics::default() };

        self.spawn_phase(now, &mut metrics);
        self.traffic_phase(&mut metrics);
        self.expire_phase(now, &mut metrics)?;
        self.dispatch_phase(now, &mut metrics)?;
        self.move_phase(now, &mut metrics)?;

        metrics.pending_after = self
            .emergencies
            .iter()
            .filter(|e| e.status == EmergencyStatus::Pending)
            .count() as u32;
        metrics.available_units = self.fleet.iter().filter(|a| a.is_available()).count() as u32;
        self.busy_unit_ticks += (self.fleet.len() as u32 - metrics.available_units) as u64;

        self.clock.advance();
        Ok(metrics)
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn graph(&self) -> &CityGraph {
        &self.graph
    }

    pub fn fleet(&self) -> &[Ambulance] {
        &self.fleet
    }

    pub fn emergencies(&self) -> &[Emergency] {
        &self.emergencies
    }

    // ── Phase 1: spawn ────────────────────────────────────────────────────

    fn spawn_phase(&mut self, now: Tick, metrics: &mut TickMetrics) {
        let count = self.rng.gen_range(0..=self.config.spawn_max);
        for _ in 0..count {
            let weights: Vec<f64> = self
                .zones
                .iter()
                .map(|&z| match &self.risk {
                    Some(model) => model.risk(now, z).max(0.0),
                    None => 1.0,
                })
                .collect();
            // All-zero risk means no zone is eligible right now.
            let Some(zi) = self.rng.weighted_index(&weights) else { break };
            let Some(si) = self.rng.weighted_index(&self.config.severity_weights) else { break };

            let id = EmergencyId(self.emergencies.len() as u32);
            let emergency = Emergency::spawn(
                id,
                self.zones[zi],
                (si + 1) as u8,
                now,
                self.config.report_noise,
                &mut self.rng,
            );
            self.emergencies.push(emergency);
            metrics.spawned += 1;
        }
    }

    // ── Phase 2: traffic ──────────────────────────────────────────────────

    fn traffic_phase(&mut self, metrics: &mut TickMetrics) {
        if let Some(cfg) = &self.config.traffic {
            if self.rng.gen_bool(cfg.probability) {
                metrics.jam = self.graph.apply_traffic_jam(&mut self.rng, cfg);
            }
        }
    }

    // ── Phase 3: expire ───────────────────────────────────────────────────

    fn expire_phase(&mut self, now: Tick, metrics: &mut TickMetrics) -> SimResult<()> {
        let deadline = self.config.unanswered_after_ticks;
        for e in &mut self.emergencies {
            if e.status == EmergencyStatus::Pending && e.waiting_ticks(now) >= deadline {
                e.expire(now)?;
                metrics.expired += 1;
            }
        }
        Ok(())
    }

    // ── Phase 4: dispatch ─────────────────────────────────────────────────

    fn dispatch_phase(&mut self, now: Tick, metrics: &mut TickMetrics) -> SimResult<()> {
        // Queue order: reported priority descending, then oldest first, then
        // ID ascending.
        let mut pending_idx: Vec<usize> = (0..self.emergencies.len())
            .filter(|&i| self.emergencies[i].status == EmergencyStatus::Pending)
            .collect();
        pending_idx.sort_by_key(|&i| {
            let e = &self.emergencies[i];
            (std::cmp::Reverse(e.reported_priority), e.spawn_tick, e.id)
        });

        let idle: Vec<IdleUnit> = self
            .fleet
            .iter()
            .filter(|a| a.is_available())
            .map(|a| IdleUnit { ambulance: a.id(), location: a.at() })
            .collect();

        if pending_idx.is_empty() || idle.is_empty() {
            return Ok(());
        }

        // Feasibility-filtered travel costs.  Unreachable pairs are simply
        // absent; any other routing error aborts the run.
        let mut costs = CostTable::new();
        for unit in &idle {
            for &ei in &pending_idx {
                let to = self.emergencies[ei].location;
                match self.cache.route(&self.graph, &self.router, unit.location, to) {
                    Ok(route) => costs.insert(unit.ambulance, self.emergencies[ei].id, route.total_cost),
                    Err(GraphError::Unreachable { .. }) => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }

        // With a priority model plugged in, score each call against its
        // nearest idle unit's travel time and persist the score on the case
        // record for later inspection.
        if let Some(scorer) = &self.scorer {
            for &ei in &pending_idx {
                let e = &self.emergencies[ei];
                let best = idle
                    .iter()
                    .filter_map(|u| costs.travel_cost(u.ambulance, e.id))
                    .min();
                if let Some(cost) = best {
                    let score = scorer.score(e.reported_priority as f64, cost as f64);
                    self.emergencies[ei].score = Some(score);
                }
            }
        }

        let pending: Vec<PendingCall> = pending_idx
            .iter()
            .map(|&i| {
                let e = &self.emergencies[i];
                PendingCall {
                    emergency: e.id,
                    location: e.location,
                    priority: e.reported_priority,
                    score: e.score,
                    waiting_ticks: e.waiting_ticks(now),
                }
            })
            .collect();

        let ctx = DispatchContext::new(now, &pending, &idle, &costs);
        let assignments = self.policy.assign(&ctx, &mut self.rng);

        // Validate and commit.  A policy that proposes a duplicate, busy, or
        // infeasible pair loses that assignment, nothing else.
        let mut used_units = FxHashSet::default();
        let mut used_calls = FxHashSet::default();
        for a in assignments {
            if costs.travel_cost(a.ambulance, a.emergency).is_none() {
                continue;
            }
            if !used_units.insert(a.ambulance) || !used_calls.insert(a.emergency) {
                continue;
            }
            let ui = a.ambulance.index();
            let ei = a.emergency.index();
            if !self.fleet[ui].is_available()
                || self.emergencies[ei].status != EmergencyStatus::Pending
            {
                continue;
            }

            let from = self.fleet[ui].at();
            let to = self.emergencies[ei].location;
            let route = self.cache.route(&self.graph, &self.router, from, to)?;
            self.emergencies[ei].assign(now)?;
            self.fleet[ui].begin_response(a.emergency, route)?;
            metrics.dispatched += 1;
        }
        Ok(())
    }

    // ── Phase 5: move ─────────────────────────────────────────────────────

    fn move_phase(&mut self, now: Tick, metrics: &mut TickMetrics) -> SimResult<()> {
        let budget = self.config.movement_budget;
        for i in 0..self.fleet.len() {
            // Units stranded by an earlier routing failure retry first.
            if self.fleet[i].needs_route() {
                self.retry_route(i)?;
            }
            if let Some(arrival) = self.fleet[i].advance(budget, &self.graph, now) {
                self.handle_arrival(i, arrival, now, metrics)?;
            }
        }
        Ok(())
    }

    fn handle_arrival(
        &mut self,
        unit: usize,
        arrival: Arrival,
        now: Tick,
        metrics: &mut TickMetrics,
    ) -> SimResult<()> {
        match self.fleet[unit].status() {
            AmbulanceStatus::Responding => {
                if let Some(mission) = self.fleet[unit].mission() {
                    self.emergencies[mission.index()].record_arrival(now)?;
                }
                metrics.scene_arrivals += 1;
                // No reachable hospital leaves the unit holding on scene;
                // the next tick's retry may succeed after a traffic change.
                if let Some(route) = self.nearest_hospital_route(arrival.at)? {
                    self.fleet[unit].begin_transport(route)?;
                }
            }
            AmbulanceStatus::Transporting => {
                if let Some(mission) = self.fleet[unit].mission() {
                    self.emergencies[mission.index()].resolve(now)?;
                }
                metrics.resolved += 1;
                let home = self.fleet[unit].home_base();
                match self.cache.route(&self.graph, &self.router, arrival.at, home) {
                    Ok(route) => self.fleet[unit].begin_return(route)?,
                    Err(GraphError::Unreachable { .. }) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            AmbulanceStatus::Returning => {
                self.fleet[unit].complete_return()?;
            }
            AmbulanceStatus::Available => {}
        }
        Ok(())
    }

    /// Re-attempt the follow-up route for a unit whose previous attempt found
    /// no path.
    fn retry_route(&mut self, unit: usize) -> SimResult<()> {
        match self.fleet[unit].status() {
            AmbulanceStatus::Responding => {
                if let Some(route) = self.nearest_hospital_route(self.fleet[unit].at())? {
                    self.fleet[unit].begin_transport(route)?;
                }
            }
            AmbulanceStatus::Transporting => {
                let home = self.fleet[unit].home_base();
                match self.cache.route(&self.graph, &self.router, self.fleet[unit].at(), home) {
                    Ok(route) => self.fleet[unit].begin_return(route)?,
                    Err(GraphError::Unreachable { .. }) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            AmbulanceStatus::Returning | AmbulanceStatus::Available => {}
        }
        Ok(())
    }

    /// Cheapest route from `from` to any hospital, ties broken toward the
    /// lower hospital ID.
    fn nearest_hospital_route(&mut self, from: LocationId) -> SimResult<Option<Route>> {
        let mut best: Option<Route> = None;
        for &h in &self.hospitals {
            match self.cache.route(&self.graph, &self.router, from, h) {
                Ok(route) => {
                    if best.as_ref().is_none_or(|b| route.total_cost < b.total_cost) {
                        best = Some(route);
                    }
                }
                Err(GraphError::Unreachable { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(best)
    }

    // ── Run aggregate ─────────────────────────────────────────────────────

    fn finish(&self) -> RunMetrics {
        let mut resolved = 0u64;
        let mut unanswered = 0u64;
        let mut pending = 0u64;
        let mut in_flight = 0u64;
        let mut response_sum = 0u64;
        let mut response_count = 0u64;

        for e in &self.emergencies {
            match e.status {
                EmergencyStatus::Resolved => resolved += 1,
                EmergencyStatus::Unanswered => unanswered += 1,
                EmergencyStatus::Pending => pending += 1,
                EmergencyStatus::Assigned => in_flight += 1,
            }
            if let Some(t) = e.response_ticks() {
                response_sum += t;
                response_count += 1;
            }
        }

        let total = self.emergencies.len() as u64;
        RunMetrics {
            ticks_run: self.clock.current_tick.0,
            total_spawned: total,
            resolved,
            unanswered,
            pending_at_end: pending,
            in_flight_at_end: in_flight,
            avg_response_ticks: (response_count > 0)
                .then(|| response_sum as f64 / response_count as f64),
            satisfaction: if total > 0 { resolved as f64 / total as f64 } else { 1.0 },
            total_distance: self.fleet.iter().map(|a| a.distance_traveled()).sum(),
            fleet_size: self.fleet.len() as u32,
            utilization: {
                let unit_ticks = self.clock.current_tick.0 * self.fleet.len() as u64;
                if unit_ticks > 0 {
                    self.busy_unit_ticks as f64 / unit_ticks as f64
                } else {
                    0.0
                }
            },
        }
    }
}
