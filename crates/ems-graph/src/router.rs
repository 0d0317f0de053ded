//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The simulator calls routing via the [`Router`] trait, so applications can
//! swap in custom implementations (A*, precomputed all-pairs tables) without
//! touching the simulation core.  The default [`DijkstraRouter`] is
//! sufficient for city-scale maps.
//!
//! # Determinism
//!
//! The heap is keyed `(cost, LocationId)`, so equal-cost frontiers pop in ID
//! order and the returned path is identical across runs and platforms.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ems_core::LocationId;

use crate::graph::CityGraph;
use crate::{GraphError, GraphResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the node sequence from source to target
/// (inclusive of both endpoints) and the total traversal cost.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Locations visited in order, starting at the source and ending at the
    /// target.  Always non-empty.
    pub nodes: Vec<LocationId>,
    /// Sum of edge weights along `nodes`.
    pub total_cost: u32,
}

impl Route {
    /// `true` if the source and target are the same location.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Number of edges in the route.
    pub fn edge_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so a single router instance can be
/// shared across Rayon worker threads during parallel fitness evaluation.
pub trait Router: Send + Sync {
    /// Compute a minimum-cost route from `from` to `to` over the graph's
    /// current weights.
    ///
    /// `from == to` yields a trivial single-node route.  A disconnected pair
    /// fails with [`GraphError::Unreachable`]; callers treat that as "no
    /// eligible path" and exclude the pair, never as a fatal error.
    fn route(&self, graph: &CityGraph, from: LocationId, to: LocationId) -> GraphResult<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the dense weight matrix.
///
/// Edges with weight `0` do not exist and are never relaxed, so a returned
/// route can never cross a zero-weight matrix entry.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &CityGraph, from: LocationId, to: LocationId) -> GraphResult<Route> {
        dijkstra(graph, from, to)
    }
}

fn dijkstra(graph: &CityGraph, from: LocationId, to: LocationId) -> GraphResult<Route> {
    // Validate both endpoints up front so unknown IDs surface as
    // InvalidLocation rather than Unreachable.
    graph.location(from)?;
    graph.location(to)?;

    if from == to {
        return Ok(Route { nodes: vec![from], total_cost: 0 });
    }

    let n = graph.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist = vec![u32::MAX; n];
    // prev[v] = predecessor of v on the best path; INVALID for unreached nodes.
    let mut prev = vec![LocationId::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key LocationId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u32, LocationId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(prev, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for (v, &w) in graph.row(node.index()).iter().enumerate() {
            if w == 0 {
                continue; // no road
            }
            let neighbor = LocationId(v as u32);
            let new_cost = cost.saturating_add(w);
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = node;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(GraphError::Unreachable { from, to })
}

fn reconstruct(prev: Vec<LocationId>, from: LocationId, to: LocationId, total: u32) -> Route {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    Route { nodes, total_cost: total }
}
