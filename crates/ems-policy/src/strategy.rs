//! GA strategy genomes and the policy that executes them.
//!
//! A [`Strategy`] is a fixed-length vector of bounded `f64` genes weighting
//! the features of a candidate `(unit, call)` pair.  The genetic optimizer
//! evolves these vectors; [`StrategyPolicy`] turns one into an executable
//! dispatch rule, so the simulator never needs to know it is being driven by
//! a genome.

use std::sync::Arc;

use ems_core::SimRng;

use crate::{Assignment, DispatchContext, DispatchPolicy, PriorityModel};

// ── Gene layout ───────────────────────────────────────────────────────────────

/// Number of genes in a strategy.
pub const GENE_COUNT: usize = 8;

/// Inclusive `(low, high)` domain per gene.  Initialization, mutation, and
/// validity checks all use the same bounds.
///
/// | Index | Meaning                                   | Domain       |
/// |-------|-------------------------------------------|--------------|
/// | 0     | travel-cost weight                        | 0.0 – 1.0    |
/// | 1     | priority weight                           | 0.0 – 1.0    |
/// | 2     | waiting-time weight                       | 0.0 – 1.0    |
/// | 3–7   | urgency multiplier for severities 1–5     | 0.25 – 2.0   |
const BOUNDS: [(f64, f64); GENE_COUNT] = [
    (0.0, 1.0),
    (0.0, 1.0),
    (0.0, 1.0),
    (0.25, 2.0),
    (0.25, 2.0),
    (0.25, 2.0),
    (0.25, 2.0),
    (0.25, 2.0),
];

/// Fraction of a gene's domain span used as the mutation step size.
const MUTATION_STEP: f64 = 0.15;

// ── Strategy ──────────────────────────────────────────────────────────────────

/// A candidate dispatch strategy — one individual in the GA population.
/// Immutable once evaluated; crossover and mutation produce new values.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Strategy {
    pub genes: [f64; GENE_COUNT],
}

impl Strategy {
    /// Sample a strategy uniformly within the gene bounds.
    pub fn random(rng: &mut SimRng) -> Self {
        let mut genes = [0.0; GENE_COUNT];
        for (g, &(lo, hi)) in genes.iter_mut().zip(BOUNDS.iter()) {
            *g = rng.gen_range(lo..=hi);
        }
        Self { genes }
    }

    /// The baseline strategy: pure distance minimization, uniform urgency.
    /// Behaves like [`GreedyNearest`](crate::GreedyNearest) up to tie-breaks.
    pub fn nearest_first() -> Self {
        let mut genes = [1.0; GENE_COUNT];
        genes[1] = 0.0;
        genes[2] = 0.0;
        Self { genes }
    }

    /// `true` when every gene is finite and within its domain.  Candidates
    /// failing this get minimum fitness instead of crashing the optimizer.
    pub fn is_valid(&self) -> bool {
        self.genes
            .iter()
            .zip(BOUNDS.iter())
            .all(|(g, &(lo, hi))| g.is_finite() && (lo..=hi).contains(g))
    }

    /// Single-point crossover: genes `0..cut` from `self`, the rest from
    /// `other`.
    pub fn crossover(&self, other: &Strategy, rng: &mut SimRng) -> Strategy {
        let cut = rng.gen_range(1..GENE_COUNT);
        let mut genes = self.genes;
        genes[cut..].copy_from_slice(&other.genes[cut..]);
        Strategy { genes }
    }

    /// Perturb each gene with probability `p_per_gene` by a uniform step of
    /// up to ±[`MUTATION_STEP`] of its domain span, clamped to the bounds.
    pub fn mutate(&mut self, p_per_gene: f64, rng: &mut SimRng) {
        for (g, &(lo, hi)) in self.genes.iter_mut().zip(BOUNDS.iter()) {
            if rng.gen_bool(p_per_gene) {
                let step = (hi - lo) * MUTATION_STEP;
                *g = (*g + rng.gen_range(-step..=step)).clamp(lo, hi);
            }
        }
    }

    #[inline]
    fn urgency(&self, severity: u8) -> f64 {
        let idx = 3 + (severity.clamp(1, 5) - 1) as usize;
        self.genes[idx]
    }
}

// ── StrategyPolicy ────────────────────────────────────────────────────────────

/// Executes a [`Strategy`]: scores every feasible `(unit, call)` pair and
/// commits pairs greedily by descending score.
///
/// With a [`PriorityModel`] attached, the priority term of the score comes
/// from the external scorer (travel-time aware, 0–100) instead of the raw
/// reported priority.
pub struct StrategyPolicy {
    strategy: Strategy,
    scorer: Option<Arc<dyn PriorityModel>>,
}

impl StrategyPolicy {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy, scorer: None }
    }

    pub fn with_scorer(strategy: Strategy, scorer: Arc<dyn PriorityModel>) -> Self {
        Self { strategy, scorer: Some(scorer) }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Desirability of committing `unit` to `call` at travel cost `cost`,
    /// normalized against the most expensive feasible pair this tick.
    fn pair_score(&self, call: &crate::PendingCall, cost: u32, max_cost: u32) -> f64 {
        let s = &self.strategy;
        let cost_norm = cost as f64 / max_cost.max(1) as f64;
        // Waiting time saturates smoothly toward 1.0 so very stale calls
        // cannot dominate the urgency term without bound.
        let wait_norm = call.waiting_ticks as f64 / (call.waiting_ticks as f64 + 10.0);

        let priority_term = match (&self.scorer, call.score) {
            (Some(m), _) => m.score(call.priority as f64, cost as f64) / 100.0,
            (None, Some(score)) => score / 100.0,
            (None, None) => call.priority as f64 / 5.0,
        };

        s.urgency(call.priority) * (s.genes[1] * priority_term + s.genes[2] * wait_norm)
            - s.genes[0] * cost_norm
    }
}

impl DispatchPolicy for StrategyPolicy {
    fn assign(&self, ctx: &DispatchContext<'_>, _rng: &mut SimRng) -> Vec<Assignment> {
        // Enumerate feasible pairs once.
        let mut pairs: Vec<(f64, usize, usize, u32)> = Vec::new();
        let mut max_cost = 0;
        for (ci, call) in ctx.pending.iter().enumerate() {
            for (ui, unit) in ctx.idle.iter().enumerate() {
                if let Some(cost) = ctx.costs.travel_cost(unit.ambulance, call.emergency) {
                    max_cost = max_cost.max(cost);
                    pairs.push((0.0, ci, ui, cost));
                }
            }
        }
        for p in &mut pairs {
            p.0 = self.pair_score(&ctx.pending[p.1], p.3, max_cost);
        }

        // Best score first; ties resolve by queue position then unit index
        // so results are deterministic.
        pairs.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then_with(|| a.1.cmp(&b.1))
                .then_with(|| a.2.cmp(&b.2))
        });

        let mut call_used = vec![false; ctx.pending.len()];
        let mut unit_used = vec![false; ctx.idle.len()];
        let mut out = Vec::new();
        for (_, ci, ui, _) in pairs {
            if call_used[ci] || unit_used[ui] {
                continue;
            }
            call_used[ci] = true;
            unit_used[ui] = true;
            out.push(Assignment::new(ctx.idle[ui].ambulance, ctx.pending[ci].emergency));
        }
        out
    }

    fn name(&self) -> &'static str {
        if self.scorer.is_some() { "strategy+scorer" } else { "strategy" }
    }
}
