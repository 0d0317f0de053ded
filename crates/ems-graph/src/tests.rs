//! Unit tests for the city graph and router.

use ems_core::{Location, LocationId, LocationKind, SimRng};

use crate::{CityGraph, DijkstraRouter, GraphError, Route, RouteCache, Router, TrafficConfig};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn loc(id: u32, kind: LocationKind) -> Location {
    Location::new(LocationId(id), kind, format!("L{id}"))
}

/// The 7-location downtown map: one base, two hospitals, two emergency
/// zones, two intersections.
fn downtown() -> CityGraph {
    use LocationKind::*;
    let locations = vec![
        loc(0, Base),
        loc(1, Hospital),
        loc(2, Hospital),
        loc(3, EmergencyZone),
        loc(4, Intersection),
        loc(5, Intersection),
        loc(6, EmergencyZone),
    ];
    let matrix = vec![
        vec![0, 0, 0, 0, 2, 0, 0],
        vec![0, 0, 0, 0, 0, 1, 0],
        vec![0, 0, 0, 0, 3, 4, 0],
        vec![0, 0, 0, 0, 1, 0, 5],
        vec![2, 0, 3, 1, 0, 5, 0],
        vec![0, 1, 4, 0, 5, 0, 0],
        vec![0, 0, 0, 5, 0, 0, 0],
    ];
    CityGraph::from_parts(locations, &matrix).unwrap()
}

/// Exhaustive simple-path search: the reference answer Dijkstra must match.
fn brute_force_cost(graph: &CityGraph, from: LocationId, to: LocationId) -> Option<u32> {
    fn walk(
        graph: &CityGraph,
        at: LocationId,
        to: LocationId,
        visited: &mut Vec<bool>,
        cost: u32,
        best: &mut Option<u32>,
    ) {
        if at == to {
            *best = Some(best.map_or(cost, |b: u32| b.min(cost)));
            return;
        }
        visited[at.index()] = true;
        for v in graph.neighbors(at).unwrap() {
            if !visited[v.index()] {
                let w = graph.get_weight(at, v).unwrap();
                walk(graph, v, to, visited, cost + w, best);
            }
        }
        visited[at.index()] = false;
    }

    let mut best = None;
    let mut visited = vec![false; graph.node_count()];
    walk(graph, from, to, &mut visited, 0, &mut best);
    best
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn downtown_builds() {
        let g = downtown();
        assert_eq!(g.node_count(), 7);
        assert_eq!(g.bases().count(), 1);
        assert_eq!(g.hospitals().count(), 2);
        assert_eq!(g.emergency_zones().count(), 2);
    }

    #[test]
    fn dangling_ids_rejected() {
        let locations = vec![loc(0, LocationKind::Base), loc(5, LocationKind::Hospital)];
        let matrix = vec![vec![0, 1], vec![1, 0]];
        assert!(matches!(
            CityGraph::from_parts(locations, &matrix),
            Err(GraphError::MalformedMap(_))
        ));
    }

    #[test]
    fn non_square_matrix_rejected() {
        let locations = vec![loc(0, LocationKind::Base), loc(1, LocationKind::Hospital)];
        let matrix = vec![vec![0, 1]];
        assert!(matches!(
            CityGraph::from_parts(locations, &matrix),
            Err(GraphError::MalformedMap(_))
        ));
    }

    #[test]
    fn asymmetric_matrix_rejected() {
        let locations = vec![loc(0, LocationKind::Base), loc(1, LocationKind::Hospital)];
        let matrix = vec![vec![0, 2], vec![3, 0]];
        assert!(matches!(
            CityGraph::from_parts(locations, &matrix),
            Err(GraphError::MalformedMap(_))
        ));
    }

    #[test]
    fn negative_weight_rejected() {
        let locations = vec![loc(0, LocationKind::Base), loc(1, LocationKind::Hospital)];
        let matrix = vec![vec![0, -2], vec![-2, 0]];
        assert!(matches!(
            CityGraph::from_parts(locations, &matrix),
            Err(GraphError::InvalidWeight { weight: -2, .. })
        ));
    }

    #[test]
    fn non_zero_diagonal_rejected() {
        let locations = vec![loc(0, LocationKind::Base)];
        let matrix = vec![vec![7]];
        assert!(matches!(
            CityGraph::from_parts(locations, &matrix),
            Err(GraphError::MalformedMap(_))
        ));
    }
}

// ── Weights ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod weights {
    use super::*;

    #[test]
    fn symmetry_holds_after_any_set_weight() {
        let mut g = downtown();
        g.set_weight(LocationId(0), LocationId(4), 9).unwrap();
        g.set_weight(LocationId(5), LocationId(1), 3).unwrap();
        for u in 0..g.node_count() as u32 {
            for v in 0..g.node_count() as u32 {
                assert_eq!(
                    g.get_weight(LocationId(u), LocationId(v)).unwrap(),
                    g.get_weight(LocationId(v), LocationId(u)).unwrap(),
                );
            }
        }
    }

    #[test]
    fn unknown_location_errors() {
        let g = downtown();
        assert!(matches!(
            g.get_weight(LocationId(99), LocationId(0)),
            Err(GraphError::InvalidLocation(LocationId(99)))
        ));
        let mut g = downtown();
        assert!(g.set_weight(LocationId(0), LocationId(99), 1).is_err());
    }

    #[test]
    fn self_loop_weight_rejected() {
        let mut g = downtown();
        assert!(matches!(
            g.set_weight(LocationId(3), LocationId(3), 2),
            Err(GraphError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn version_bumps_only_on_effective_change() {
        let mut g = downtown();
        let v0 = g.version();
        g.set_weight(LocationId(0), LocationId(4), 2).unwrap(); // unchanged value
        assert_eq!(g.version(), v0);
        g.set_weight(LocationId(0), LocationId(4), 3).unwrap();
        assert_eq!(g.version(), v0 + 1);
    }

    #[test]
    fn neighbors_excludes_zero_weight_roads() {
        let g = downtown();
        let n: Vec<_> = g.neighbors(LocationId(0)).unwrap().collect();
        assert_eq!(n, vec![LocationId(4)]);
        let n: Vec<_> = g.neighbors(LocationId(4)).unwrap().collect();
        assert_eq!(n, vec![LocationId(0), LocationId(2), LocationId(3), LocationId(5)]);
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use super::*;

    #[test]
    fn matches_brute_force_on_all_pairs() {
        let g = downtown();
        for u in 0..g.node_count() as u32 {
            for v in 0..g.node_count() as u32 {
                let expected = brute_force_cost(&g, LocationId(u), LocationId(v));
                let got = DijkstraRouter.route(&g, LocationId(u), LocationId(v));
                match expected {
                    Some(cost) => assert_eq!(got.unwrap().total_cost, cost, "pair ({u}, {v})"),
                    None => assert!(got.is_err(), "pair ({u}, {v}) should be unreachable"),
                }
            }
        }
    }

    #[test]
    fn base_to_downtown_emergency() {
        let g = downtown();
        let route = DijkstraRouter.route(&g, LocationId(0), LocationId(3)).unwrap();
        assert_eq!(route.nodes, vec![LocationId(0), LocationId(4), LocationId(3)]);
        assert_eq!(route.total_cost, 3);
    }

    #[test]
    fn routes_never_use_zero_weight_edges() {
        let g = downtown();
        for u in 0..g.node_count() as u32 {
            for v in 0..g.node_count() as u32 {
                if let Ok(route) = DijkstraRouter.route(&g, LocationId(u), LocationId(v)) {
                    for pair in route.nodes.windows(2) {
                        let w = g.get_weight(pair[0], pair[1]).unwrap();
                        assert!(w > 0, "route crossed missing road ({}, {})", pair[0], pair[1]);
                    }
                }
            }
        }
    }

    #[test]
    fn trivial_route() {
        let g = downtown();
        let route = DijkstraRouter.route(&g, LocationId(2), LocationId(2)).unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.total_cost, 0);
        assert_eq!(route.edge_count(), 0);
    }

    #[test]
    fn disconnected_pair_is_unreachable() {
        let mut g = downtown();
        // Cut the only road into the highway emergency zone (6).
        g.set_weight(LocationId(3), LocationId(6), 0).unwrap();
        assert!(matches!(
            DijkstraRouter.route(&g, LocationId(0), LocationId(6)),
            Err(GraphError::Unreachable { .. })
        ));
    }

    #[test]
    fn unknown_endpoint_is_invalid_location_not_unreachable() {
        let g = downtown();
        assert!(matches!(
            DijkstraRouter.route(&g, LocationId(0), LocationId(42)),
            Err(GraphError::InvalidLocation(_))
        ));
    }

    #[test]
    fn deterministic_tie_break() {
        // Two equal-cost paths 0→3: via 1 and via 2.  The lower node ID wins.
        use LocationKind::*;
        let locations = vec![
            loc(0, Base),
            loc(1, Intersection),
            loc(2, Intersection),
            loc(3, EmergencyZone),
        ];
        let matrix = vec![
            vec![0, 1, 1, 0],
            vec![1, 0, 0, 1],
            vec![1, 0, 0, 1],
            vec![0, 1, 1, 0],
        ];
        let g = CityGraph::from_parts(locations, &matrix).unwrap();
        let a = DijkstraRouter.route(&g, LocationId(0), LocationId(3)).unwrap();
        let b = DijkstraRouter.route(&g, LocationId(0), LocationId(3)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.nodes, vec![LocationId(0), LocationId(1), LocationId(3)]);
    }
}

// ── Cache ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cache {
    use super::*;

    #[test]
    fn memoizes_and_invalidates_on_weight_change() {
        let mut g = downtown();
        let mut cache = RouteCache::new();

        let r1 = cache.route(&g, &DijkstraRouter, LocationId(0), LocationId(3)).unwrap();
        assert_eq!(r1.total_cost, 3);
        assert_eq!(cache.len(), 1);

        // Traffic on the 0–4 road: the cached answer must not survive.
        g.set_weight(LocationId(0), LocationId(4), 50).unwrap();
        let r2 = cache.route(&g, &DijkstraRouter, LocationId(0), LocationId(3)).unwrap();
        assert_eq!(r2.total_cost, 51);
    }

    #[test]
    fn memoizes_unreachable_pairs() {
        let mut g = downtown();
        g.set_weight(LocationId(3), LocationId(6), 0).unwrap();
        let mut cache = RouteCache::new();
        for _ in 0..3 {
            assert!(matches!(
                cache.route(&g, &DijkstraRouter, LocationId(0), LocationId(6)),
                Err(GraphError::Unreachable { .. })
            ));
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn equals_direct_router_results(){
        let g = downtown();
        let mut cache = RouteCache::new();
        for u in 0..7u32 {
            for v in 0..7u32 {
                let direct = DijkstraRouter.route(&g, LocationId(u), LocationId(v)).ok();
                let cached = cache.route(&g, &DijkstraRouter, LocationId(u), LocationId(v)).ok();
                assert_eq!(direct, cached);
            }
        }
    }
}

// ── Traffic ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod traffic {
    use super::*;

    #[test]
    fn jam_raises_a_road_and_stays_symmetric() {
        let mut g = downtown();
        let mut rng = SimRng::new(3);
        let cfg = TrafficConfig::default();
        let (u, v) = g.apply_traffic_jam(&mut rng, &cfg).unwrap();
        let w = g.get_weight(u, v).unwrap();
        assert!(w > 0 && w <= cfg.max_weight);
        assert_eq!(w, g.get_weight(v, u).unwrap());
    }

    #[test]
    fn jam_respects_cap() {
        let mut g = downtown();
        let mut rng = SimRng::new(5);
        let cfg = TrafficConfig::default();
        for _ in 0..200 {
            g.apply_traffic_jam(&mut rng, &cfg);
        }
        for u in 0..7u32 {
            for v in 0..7u32 {
                assert!(g.get_weight(LocationId(u), LocationId(v)).unwrap() <= cfg.max_weight);
            }
        }
    }

    #[test]
    fn jam_returns_none_when_everything_capped() {
        let locations = vec![loc(0, LocationKind::Base), loc(1, LocationKind::Hospital)];
        let matrix = vec![vec![0, 5], vec![5, 0]];
        let mut g = CityGraph::from_parts(locations, &matrix).unwrap();
        let mut rng = SimRng::new(1);
        assert!(g.apply_traffic_jam(&mut rng, &TrafficConfig::default()).is_none());
    }
}

// ── Route helpers ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod route_type {
    use super::*;

    #[test]
    fn edge_count() {
        let r = Route { nodes: vec![LocationId(0), LocationId(4), LocationId(3)], total_cost: 3 };
        assert_eq!(r.edge_count(), 2);
        assert!(!r.is_trivial());
    }
}
