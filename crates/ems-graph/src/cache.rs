//! Version-keyed shortest-path memoization.
//!
//! A simulation tick queries the same `(from, to)` pairs repeatedly (one per
//! candidate assignment), while weights change only on traffic events.
//! `RouteCache` memoizes router results until the graph version moves, at
//! which point the entire memo is dropped lazily on the next lookup — a
//! stale cache can never outlive a weight mutation.

use rustc_hash::FxHashMap;

use ems_core::LocationId;

use crate::graph::CityGraph;
use crate::router::{Route, Router};
use crate::{GraphError, GraphResult};

/// Per-run route memo.  Owned by a single simulation run; never shared
/// across concurrent trials.
#[derive(Default)]
pub struct RouteCache {
    /// Graph version the memo was built against.
    version: u64,
    /// `(from, to) → route`, with `None` memoizing an unreachable pair.
    memo: FxHashMap<(LocationId, LocationId), Option<Route>>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized pairs (including unreachable ones).
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }

    /// Look up or compute the shortest route from `from` to `to`.
    ///
    /// Unreachable pairs are memoized too, so a disconnected subgraph does
    /// not trigger a full Dijkstra on every retry tick.
    pub fn route<R: Router>(
        &mut self,
        graph: &CityGraph,
        router: &R,
        from: LocationId,
        to: LocationId,
    ) -> GraphResult<Route> {
        if self.version != graph.version() {
            self.memo.clear();
            self.version = graph.version();
        }

        if let Some(cached) = self.memo.get(&(from, to)) {
            return match cached {
                Some(route) => Ok(route.clone()),
                None => Err(GraphError::Unreachable { from, to }),
            };
        }

        match router.route(graph, from, to) {
            Ok(route) => {
                self.memo.insert((from, to), Some(route.clone()));
                Ok(route)
            }
            Err(GraphError::Unreachable { .. }) => {
                self.memo.insert((from, to), None);
                Err(GraphError::Unreachable { from, to })
            }
            // Invalid IDs and other construction errors are not memoized.
            Err(e) => Err(e),
        }
    }
}
