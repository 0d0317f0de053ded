//! The genetic optimizer: tournament selection, single-point crossover,
//! bounded mutation, elitism.
//!
//! # Determinism
//!
//! Two sources of randomness, both derived from `GaConfig::seed`:
//!
//! - The **evolution stream** drives selection, crossover, and mutation.
//! - Each **trial stream** seeds one Monte-Carlo simulation run.  Trial
//!   seeds depend only on `(seed, trial_index)` — never on the candidate or
//!   the generation — so every candidate in every generation faces the same
//!   scenarios (common random numbers).  A degenerate search (population 1,
//!   no mutation) therefore reports bit-identical fitness each generation.
//!
//! Fitness evaluation fans out over Rayon; each worker builds its own
//! simulator, so nothing mutable is shared.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use ems_core::{SimRng, stream_seed};
use ems_graph::{CityGraph, DijkstraRouter};
use ems_policy::{PriorityModel, RiskModel, Strategy, StrategyPolicy};
use ems_sim::{NoopObserver, SimBuilder, SimConfig};

use crate::{FitnessWeights, GaConfig, OptError, OptResult};

/// Stream tag separating trial seeds from the evolution stream.
const TRIAL_STREAM: u64 = 1;

// ── Scenario ──────────────────────────────────────────────────────────────────

/// The fixed world every candidate is evaluated against: the map, the
/// simulation knobs, and the optional external models.
///
/// `sim.seed` is ignored — the optimizer substitutes per-trial seeds.
pub struct Scenario {
    pub graph: CityGraph,
    pub sim: SimConfig,
    pub scorer: Option<Arc<dyn PriorityModel>>,
    pub risk: Option<Arc<dyn RiskModel>>,
}

impl Scenario {
    pub fn new(graph: CityGraph, sim: SimConfig) -> Self {
        Self { graph, sim, scorer: None, risk: None }
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn PriorityModel>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn with_risk(mut self, risk: Arc<dyn RiskModel>) -> Self {
        self.risk = Some(risk);
        self
    }
}

// ── Report types ──────────────────────────────────────────────────────────────

/// One individual: a genome plus its cached fitness.  Elites carry their
/// fitness forward; fresh offspring are re-evaluated.
struct Individual {
    strategy: Strategy,
    fitness: Option<f64>,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    pub generation: u32,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub worst_fitness: f64,
}

/// Outcome of a search: the best strategy found plus the full trace.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaReport {
    pub best: Strategy,
    pub best_fitness: f64,
    pub trace: Vec<GenerationStats>,
    pub generations_run: u32,
    /// `true` when the run was stopped via the cancel handle; `best` is the
    /// best seen so far.
    pub cancelled: bool,
}

// ── Optimizer ─────────────────────────────────────────────────────────────────

pub struct Optimizer {
    config: GaConfig,
    weights: FitnessWeights,
    scenario: Scenario,
    cancel: Arc<AtomicBool>,
}

impl Optimizer {
    pub fn new(scenario: Scenario, config: GaConfig, weights: FitnessWeights) -> Self {
        Self { config, weights, scenario, cancel: Arc::new(AtomicBool::new(false)) }
    }

    /// Flag checked at every generation boundary.  Setting it stops the
    /// search after the current generation, preserving the best so far.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    // ── Search loop ───────────────────────────────────────────────────────

    pub fn run(&self) -> OptResult<GaReport> {
        self.config.validate().map_err(OptError::Config)?;

        let mut rng = SimRng::for_stream(self.config.seed, 0, 0);
        let mut population: Vec<Individual> = (0..self.config.population_size)
            .map(|_| Individual { strategy: Strategy::random(&mut rng), fitness: None })
            .collect();

        let mut trace = Vec::new();
        let mut best: Option<(Strategy, f64)> = None;
        let mut stale = 0u32;
        let mut cancelled = false;
        let mut generations_run = 0u32;

        for generation in 0..self.config.generations {
            if self.cancel.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }

            self.evaluate_population(&mut population)?;
            generations_run = generation + 1;

            let best_i = fittest(&population);
            let gen_best = fitness_of(&population, best_i);
            let mean = population
                .iter()
                .map(|i| i.fitness.unwrap_or(f64::NEG_INFINITY))
                .sum::<f64>()
                / population.len() as f64;
            let worst = (0..population.len())
                .map(|i| fitness_of(&population, i))
                .fold(f64::INFINITY, f64::min);
            trace.push(GenerationStats {
                generation,
                best_fitness: gen_best,
                mean_fitness: mean,
                worst_fitness: worst,
            });

            if best.as_ref().is_none_or(|(_, f)| gen_best > *f) {
                best = Some((population[best_i].strategy.clone(), gen_best));
                stale = 0;
            } else {
                stale += 1;
            }

            if let Some(limit) = self.config.plateau_generations {
                if stale >= limit {
                    break;
                }
            }
            if generation + 1 < self.config.generations {
                population = self.next_generation(&population, &mut rng);
            }
        }

        let (best, best_fitness) = match best {
            Some(b) => b,
            // Cancelled before the first evaluation completed.
            None => (population[0].strategy.clone(), f64::NEG_INFINITY),
        };
        Ok(GaReport { best, best_fitness, trace, generations_run, cancelled })
    }

    // ── Fitness ───────────────────────────────────────────────────────────

    /// Mean fitness of `strategy` over the configured Monte-Carlo trials.
    ///
    /// Also usable standalone, e.g. to score a hand-written baseline against
    /// the same trials the search used.
    pub fn evaluate(&self, strategy: &Strategy) -> OptResult<f64> {
        if !strategy.is_valid() {
            return Ok(f64::NEG_INFINITY);
        }

        let mut total = 0.0;
        for trial in 0..self.config.trials {
            let mut sim_config = self.scenario.sim.clone();
            sim_config.seed = stream_seed(self.config.seed, TRIAL_STREAM, trial as u64);

            let policy = match &self.scenario.scorer {
                Some(s) => StrategyPolicy::with_scorer(strategy.clone(), Arc::clone(s)),
                None => StrategyPolicy::new(strategy.clone()),
            };
            let mut builder =
                SimBuilder::new(self.scenario.graph.clone(), sim_config, policy, DijkstraRouter);
            if let Some(r) = &self.scenario.risk {
                builder = builder.risk_model(Arc::clone(r));
            }
            if let Some(s) = &self.scenario.scorer {
                builder = builder.priority_model(Arc::clone(s));
            }

            let metrics = builder.build()?.run(&mut NoopObserver)?;
            total += self.weights.score(&metrics);
        }
        Ok(total / self.config.trials as f64)
    }

    fn evaluate_population(&self, population: &mut [Individual]) -> OptResult<()> {
        let fresh: Vec<f64> = population
            .par_iter()
            .map(|ind| match ind.fitness {
                Some(f) => Ok(f),
                None => self.evaluate(&ind.strategy),
            })
            .collect::<OptResult<Vec<_>>>()?;
        for (ind, f) in population.iter_mut().zip(fresh) {
            ind.fitness = Some(f);
        }
        Ok(())
    }

    // ── Breeding ──────────────────────────────────────────────────────────

    fn next_generation(&self, population: &[Individual], rng: &mut SimRng) -> Vec<Individual> {
        let mut next = Vec::with_capacity(population.len());

        // Elites survive with their fitness cache intact.
        let mut order: Vec<usize> = (0..population.len()).collect();
        order.sort_by(|&a, &b| {
            fitness_of(population, b)
                .total_cmp(&fitness_of(population, a))
                .then(a.cmp(&b))
        });
        for &i in order.iter().take(self.config.elite_count) {
            next.push(Individual {
                strategy: population[i].strategy.clone(),
                fitness: population[i].fitness,
            });
        }

        while next.len() < population.len() {
            let a = self.tournament(population, rng);
            let mut child = if rng.gen_bool(self.config.crossover_prob) {
                let b = self.tournament(population, rng);
                population[a].strategy.crossover(&population[b].strategy, rng)
            } else {
                population[a].strategy.clone()
            };
            child.mutate(self.config.mutation_prob, rng);
            next.push(Individual { strategy: child, fitness: None });
        }
        next
    }

    /// Best of `tournament_size` uniform draws (with replacement); ties keep
    /// the earlier draw.
    fn tournament(&self, population: &[Individual], rng: &mut SimRng) -> usize {
        let mut best = rng.gen_range(0..population.len());
        for _ in 1..self.config.tournament_size {
            let i = rng.gen_range(0..population.len());
            if fitness_of(population, i) > fitness_of(population, best) {
                best = i;
            }
        }
        best
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn fitness_of(population: &[Individual], i: usize) -> f64 {
    population[i].fitness.unwrap_or(f64::NEG_INFINITY)
}

/// Index of the fittest individual, ties toward the lower index.
fn fittest(population: &[Individual]) -> usize {
    let mut best = 0;
    for i in 1..population.len() {
        if fitness_of(population, i) > fitness_of(population, best) {
            best = i;
        }
    }
    best
}
