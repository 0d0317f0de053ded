//! Optimizer configuration and the fitness function.

use ems_sim::RunMetrics;

// ── GaConfig ──────────────────────────────────────────────────────────────────

/// Genetic-algorithm knobs.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    pub population_size: usize,
    /// Upper bound on generations; plateau detection may stop earlier.
    pub generations: u32,
    /// Monte-Carlo simulation runs averaged per fitness evaluation.
    pub trials: u32,
    pub crossover_prob: f64,
    /// Per-gene mutation probability.
    pub mutation_prob: f64,
    pub tournament_size: usize,
    /// Top individuals copied unchanged (fitness cache intact) each
    /// generation.
    pub elite_count: usize,
    /// Stop after this many generations without best-fitness improvement.
    pub plateau_generations: Option<u32>,
    /// Root seed for both the evolution RNG and all trial seeds.
    pub seed: u64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 25,
            trials: 3,
            crossover_prob: 0.8,
            mutation_prob: 0.1,
            tournament_size: 3,
            elite_count: 1,
            plateau_generations: None,
            seed: 0,
        }
    }
}

impl GaConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.population_size == 0 {
            return Err("population_size must be positive".into());
        }
        if self.generations == 0 {
            return Err("generations must be positive".into());
        }
        if self.trials == 0 {
            return Err("trials must be positive".into());
        }
        if self.tournament_size == 0 {
            return Err("tournament_size must be positive".into());
        }
        if self.elite_count > self.population_size {
            return Err(format!(
                "elite_count {} exceeds population_size {}",
                self.elite_count, self.population_size
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_prob) {
            return Err(format!("crossover_prob {} outside [0, 1]", self.crossover_prob));
        }
        if !(0.0..=1.0).contains(&self.mutation_prob) {
            return Err(format!("mutation_prob {} outside [0, 1]", self.mutation_prob));
        }
        Ok(())
    }
}

// ── FitnessWeights ────────────────────────────────────────────────────────────

/// Scalarization of a run's outcome into a single fitness value:
///
/// ```text
/// fitness = resolved·w_resolved − avg_response·w_response − unanswered·w_unanswered
/// ```
///
/// Higher is better.  When no unit ever reached a scene the response term is
/// absent; such runs are already crushed by the unanswered term.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitnessWeights {
    pub resolved: f64,
    pub response: f64,
    pub unanswered: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self { resolved: 10.0, response: 1.0, unanswered: 20.0 }
    }
}

impl FitnessWeights {
    pub fn score(&self, metrics: &RunMetrics) -> f64 {
        let response = metrics.avg_response_ticks.unwrap_or(0.0);
        metrics.resolved as f64 * self.resolved
            - response * self.response
            - metrics.unanswered as f64 * self.unanswered
    }
}
