//! The city graph: locations plus a mutable symmetric weight matrix.
//!
//! # Data layout
//!
//! Weights live in a dense row-major `n × n` matrix (`Vec<u32>`), matching
//! the map interchange format.  A weight of `0` encodes "no road" and is
//! never traversable.  The matrix invariants — square, symmetric, zero
//! diagonal, non-negative — are checked once at construction; `set_weight`
//! preserves them by updating both triangles.
//!
//! # Cache invalidation
//!
//! Every successful weight mutation bumps a monotonic `version` counter.
//! [`RouteCache`](crate::RouteCache) compares versions and drops all memoized
//! paths lazily on the next lookup, so routing is always computed against the
//! current traffic state.

use ems_core::{Location, LocationId, LocationKind, SimRng};

use crate::{GraphError, GraphResult};

// ── TrafficConfig ─────────────────────────────────────────────────────────────

/// Parameters for the stochastic traffic-jam generator.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficConfig {
    /// Probability of one jam event per simulation tick.
    pub probability: f64,
    /// Minimum weight increase per jam.
    pub surge_min: u32,
    /// Maximum weight increase per jam.
    pub surge_max: u32,
    /// Weights are never surged past this cap.
    pub max_weight: u32,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self { probability: 0.10, surge_min: 1, surge_max: 3, max_weight: 5 }
    }
}

// ── CityGraph ─────────────────────────────────────────────────────────────────

/// Weighted undirected graph of city locations and roads.
///
/// Cloning is cheap enough for per-trial copies during parallel optimization:
/// each concurrent simulation run owns its graph so traffic mutations never
/// leak across trials.
#[derive(Clone, Debug)]
pub struct CityGraph {
    locations: Vec<Location>,
    /// Row-major `n × n` weights; `weights[u * n + v]`.
    weights: Vec<u32>,
    /// Bumped on every effective weight mutation.
    version: u64,
}

impl CityGraph {
    /// Build a graph from an ordered location list and an adjacency matrix,
    /// as supplied by an external map loader.
    ///
    /// # Errors
    ///
    /// - `MalformedMap` for dangling/out-of-order IDs, a non-square matrix,
    ///   an asymmetric matrix, or a non-zero diagonal.
    /// - `InvalidWeight` for negative entries.
    pub fn from_parts(locations: Vec<Location>, matrix: &[Vec<i64>]) -> GraphResult<Self> {
        let n = locations.len();

        for (i, loc) in locations.iter().enumerate() {
            if loc.id.index() != i {
                return Err(GraphError::MalformedMap(format!(
                    "location at position {i} has id {}; ids must be dense and ordered",
                    loc.id
                )));
            }
        }

        if matrix.len() != n {
            return Err(GraphError::MalformedMap(format!(
                "matrix has {} rows for {n} locations",
                matrix.len()
            )));
        }

        let mut weights = vec![0u32; n * n];
        for (u, row) in matrix.iter().enumerate() {
            if row.len() != n {
                return Err(GraphError::MalformedMap(format!(
                    "row {u} has {} columns, expected {n}",
                    row.len()
                )));
            }
            for (v, &w) in row.iter().enumerate() {
                if w < 0 {
                    return Err(GraphError::InvalidWeight {
                        u: LocationId(u as u32),
                        v: LocationId(v as u32),
                        weight: w,
                    });
                }
                if u == v && w != 0 {
                    return Err(GraphError::MalformedMap(format!(
                        "non-zero diagonal entry {w} at location {u}"
                    )));
                }
                if matrix[v][u] != w {
                    return Err(GraphError::MalformedMap(format!(
                        "asymmetric weights for road ({u}, {v}): {w} vs {}",
                        matrix[v][u]
                    )));
                }
                weights[u * n + v] = w as u32;
            }
        }

        Ok(Self { locations, weights, version: 0 })
    }

    // ── Dimensions and lookups ────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.locations.len()
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Look up a location, failing with `InvalidLocation` for unknown IDs.
    pub fn location(&self, id: LocationId) -> GraphResult<&Location> {
        self.locations
            .get(id.index())
            .ok_or(GraphError::InvalidLocation(id))
    }

    /// All locations of the given kind, in ID order.
    pub fn of_kind(&self, kind: LocationKind) -> impl Iterator<Item = &Location> {
        self.locations.iter().filter(move |l| l.kind == kind)
    }

    pub fn bases(&self) -> impl Iterator<Item = &Location> {
        self.of_kind(LocationKind::Base)
    }

    pub fn hospitals(&self) -> impl Iterator<Item = &Location> {
        self.of_kind(LocationKind::Hospital)
    }

    pub fn emergency_zones(&self) -> impl Iterator<Item = &Location> {
        self.of_kind(LocationKind::EmergencyZone)
    }

    /// Monotonic counter identifying the current weight state.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    // ── Weights ───────────────────────────────────────────────────────────

    #[inline]
    fn check(&self, id: LocationId) -> GraphResult<usize> {
        if id.index() < self.locations.len() {
            Ok(id.index())
        } else {
            Err(GraphError::InvalidLocation(id))
        }
    }

    /// Road weight between `u` and `v`; `0` means no direct road.
    pub fn get_weight(&self, u: LocationId, v: LocationId) -> GraphResult<u32> {
        let (ui, vi) = (self.check(u)?, self.check(v)?);
        Ok(self.weights[ui * self.locations.len() + vi])
    }

    /// Set the road weight between `u` and `v`, updating both directions.
    ///
    /// A weight of `0` removes the road.  Self-loop weights are rejected with
    /// `InvalidWeight`.  An effective change bumps the graph version, which
    /// invalidates all cached routes touching any pair.
    pub fn set_weight(&mut self, u: LocationId, v: LocationId, w: u32) -> GraphResult<()> {
        let (ui, vi) = (self.check(u)?, self.check(v)?);
        if ui == vi && w != 0 {
            return Err(GraphError::InvalidWeight { u, v, weight: w as i64 });
        }
        let n = self.locations.len();
        if self.weights[ui * n + vi] != w {
            self.weights[ui * n + vi] = w;
            self.weights[vi * n + ui] = w;
            self.version += 1;
        }
        Ok(())
    }

    /// All locations directly connected to `u` (weight > 0), in ID order.
    pub fn neighbors(&self, u: LocationId) -> GraphResult<impl Iterator<Item = LocationId> + '_> {
        let ui = self.check(u)?;
        let n = self.locations.len();
        let row = &self.weights[ui * n..(ui + 1) * n];
        Ok(row
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > 0)
            .map(|(v, _)| LocationId(v as u32)))
    }

    /// Contiguous weight row for `u` — the Dijkstra inner loop scans this
    /// directly instead of going through `neighbors`.
    #[inline]
    pub(crate) fn row(&self, ui: usize) -> &[u32] {
        let n = self.locations.len();
        &self.weights[ui * n..(ui + 1) * n]
    }

    // ── Traffic simulation ────────────────────────────────────────────────

    /// Surge the weight of one randomly chosen existing road by
    /// `surge_min..=surge_max`, capped at `max_weight`.
    ///
    /// Returns the affected pair, or `None` if every road is already at the
    /// cap (or the graph has no roads).
    pub fn apply_traffic_jam(
        &mut self,
        rng: &mut SimRng,
        cfg: &TrafficConfig,
    ) -> Option<(LocationId, LocationId)> {
        let n = self.locations.len();
        let candidates: Vec<(LocationId, LocationId)> = (0..n)
            .flat_map(|u| ((u + 1)..n).map(move |v| (u, v)))
            .filter(|&(u, v)| {
                let w = self.weights[u * n + v];
                w > 0 && w < cfg.max_weight
            })
            .map(|(u, v)| (LocationId(u as u32), LocationId(v as u32)))
            .collect();

        let &(u, v) = rng.choose(&candidates)?;
        let current = self.weights[u.index() * n + v.index()];
        let surge = rng.gen_range(cfg.surge_min..=cfg.surge_max);
        let new = (current + surge).min(cfg.max_weight);
        // Both endpoints validated above; unwrap-free via direct write.
        self.weights[u.index() * n + v.index()] = new;
        self.weights[v.index() * n + u.index()] = new;
        self.version += 1;
        Some((u, v))
    }
}
