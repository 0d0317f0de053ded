//! Ambulance units and their movement state machine.
//!
//! # Lifecycle
//!
//! ```text
//! Available ──dispatch──→ Responding ──scene──→ Transporting ──hospital──→ Returning ──base──→ Available
//! ```
//!
//! Each arrow fires only when the unit's current [`Leg`] is exhausted; there
//! is no way to skip a state or to transition without a path-completion
//! event.  All transition methods validate the current status and fail with
//! [`AgentError::IllegalAmbulanceTransition`] otherwise.
//!
//! # Movement model
//!
//! A unit advances along its leg by a per-tick movement budget measured in
//! edge-cost units.  Edge costs are read from the graph *at traversal time*,
//! so a traffic surge applied mid-journey lengthens the remainder of the
//! trip — the unit does not keep a stale snapshot of the weights it routed
//! against.

use ems_core::{AmbulanceId, EmergencyId, LocationId, Tick};
use ems_graph::{CityGraph, Route};

use crate::{AgentError, AgentResult};

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AmbulanceStatus {
    /// Idle at some location, eligible for dispatch.
    Available,
    /// En route to an emergency scene.
    Responding,
    /// Carrying the patient to a hospital.
    Transporting,
    /// Heading back to the home base.
    Returning,
}

// ── Leg ───────────────────────────────────────────────────────────────────────

/// The remaining portion of a routed journey.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    /// Full node sequence of the route (source first).
    nodes: Vec<LocationId>,
    /// Index into `nodes` of the next node to reach.
    next: usize,
    /// Cost already travelled on the current edge.
    edge_progress: u32,
}

impl Leg {
    fn from_route(route: Route) -> Self {
        Self { nodes: route.nodes, next: 1, edge_progress: 0 }
    }

    fn is_done(&self) -> bool {
        self.next >= self.nodes.len()
    }

    /// Final node of the journey.
    pub fn destination(&self) -> LocationId {
        *self.nodes.last().expect("route nodes are never empty")
    }
}

// ── Arrival ───────────────────────────────────────────────────────────────────

/// Emitted by [`Ambulance::advance`] when a leg completes.  The simulator
/// matches on the unit's status to decide the next transition.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Arrival {
    pub ambulance: AmbulanceId,
    pub at: LocationId,
    pub tick: Tick,
}

// ── Ambulance ─────────────────────────────────────────────────────────────────

/// One fleet unit.  Created at simulation start at its home base; owned and
/// mutated exclusively by the simulator's step function.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ambulance {
    id: AmbulanceId,
    home_base: LocationId,
    /// Last node reached (the unit is "at" this node, possibly partway along
    /// the edge to the next one).
    at: LocationId,
    status: AmbulanceStatus,
    /// The emergency this unit committed to; set on dispatch, cleared when
    /// the unit reports back available.
    mission: Option<EmergencyId>,
    leg: Option<Leg>,
    /// Cumulative cost units travelled over the whole run.
    distance_traveled: u64,
}

impl Ambulance {
    pub fn new(id: AmbulanceId, home_base: LocationId) -> Self {
        Self {
            id,
            home_base,
            at: home_base,
            status: AmbulanceStatus::Available,
            mission: None,
            leg: None,
            distance_traveled: 0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> AmbulanceId {
        self.id
    }

    pub fn home_base(&self) -> LocationId {
        self.home_base
    }

    pub fn at(&self) -> LocationId {
        self.at
    }

    pub fn status(&self) -> AmbulanceStatus {
        self.status
    }

    pub fn mission(&self) -> Option<EmergencyId> {
        self.mission
    }

    pub fn distance_traveled(&self) -> u64 {
        self.distance_traveled
    }

    pub fn is_available(&self) -> bool {
        self.status == AmbulanceStatus::Available
    }

    /// `true` when the unit is mid-mission but has no leg — its previous leg
    /// completed and the follow-up route could not be computed yet (e.g. no
    /// hospital was reachable).  The simulator retries routing next tick.
    pub fn needs_route(&self) -> bool {
        self.status != AmbulanceStatus::Available && self.leg.is_none()
    }

    fn illegal(&self, to: AmbulanceStatus) -> AgentError {
        AgentError::IllegalAmbulanceTransition { ambulance: self.id, from: self.status, to }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// `Available → Responding`: commit to `emergency` and start driving
    /// along `route` (which must start at the unit's current location).
    pub fn begin_response(&mut self, emergency: EmergencyId, route: Route) -> AgentResult<()> {
        if self.status != AmbulanceStatus::Available {
            return Err(self.illegal(AmbulanceStatus::Responding));
        }
        debug_assert_eq!(route.nodes.first(), Some(&self.at));
        self.status = AmbulanceStatus::Responding;
        self.mission = Some(emergency);
        self.leg = Some(Leg::from_route(route));
        Ok(())
    }

    /// `Responding → Transporting`: picked up the patient, heading to a
    /// hospital.
    pub fn begin_transport(&mut self, route: Route) -> AgentResult<()> {
        if self.status != AmbulanceStatus::Responding {
            return Err(self.illegal(AmbulanceStatus::Transporting));
        }
        debug_assert_eq!(route.nodes.first(), Some(&self.at));
        self.status = AmbulanceStatus::Transporting;
        self.leg = Some(Leg::from_route(route));
        Ok(())
    }

    /// `Transporting → Returning`: patient delivered, heading home.
    pub fn begin_return(&mut self, route: Route) -> AgentResult<()> {
        if self.status != AmbulanceStatus::Transporting {
            return Err(self.illegal(AmbulanceStatus::Returning));
        }
        debug_assert_eq!(route.nodes.first(), Some(&self.at));
        self.status = AmbulanceStatus::Returning;
        self.leg = Some(Leg::from_route(route));
        Ok(())
    }

    /// `Returning → Available`: back at base, mission cleared.
    pub fn complete_return(&mut self) -> AgentResult<()> {
        if self.status != AmbulanceStatus::Returning {
            return Err(self.illegal(AmbulanceStatus::Available));
        }
        self.status = AmbulanceStatus::Available;
        self.mission = None;
        self.leg = None;
        Ok(())
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Advance along the current leg by `budget` cost units.
    ///
    /// Completed edges are popped off the leg and counted into
    /// `distance_traveled`; partial progress is carried in the leg.  Returns
    /// an [`Arrival`] when the leg is exhausted (the leg is cleared; the
    /// caller decides the next transition).  Idle units and units waiting on
    /// a reroute return `None`.
    pub fn advance(&mut self, mut budget: u32, graph: &CityGraph, now: Tick) -> Option<Arrival> {
        let leg = self.leg.as_mut()?;

        while !leg.is_done() && budget > 0 {
            let next_node = leg.nodes[leg.next];
            // A road removed mid-transit still takes one unit to finish.
            let cost = graph.get_weight(self.at, next_node).unwrap_or(0).max(1);
            let remaining = cost - leg.edge_progress.min(cost);

            if budget >= remaining {
                budget -= remaining;
                self.at = next_node;
                self.distance_traveled += cost as u64;
                leg.next += 1;
                leg.edge_progress = 0;
            } else {
                leg.edge_progress += budget;
                budget = 0;
            }
        }

        if leg.is_done() {
            self.leg = None;
            Some(Arrival { ambulance: self.id, at: self.at, tick: now })
        } else {
            None
        }
    }
}
