//! Evolution parameters.
//!
//! Operator probabilities and violation weights vary a lot between problem
//! instances, so all of them are tunable here rather than hard-coded.

use serde::{Deserialize, Serialize};

use crate::fitness::FitnessWeights;

/// Tunable parameters for a genetic scheduling run.
///
/// A fixed `seed` with identical parameters reproduces a run bit-for-bit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Probability that a parent pair is crossed over (otherwise cloned).
    pub crossover_rate: f64,
    /// Independent per-gene re-randomization probability.
    pub mutation_rate: f64,
    /// Best individuals copied unchanged into the next generation.
    pub elitism: usize,
    /// Individuals drawn per tournament.
    pub tournament_size: usize,
    /// Hard generation budget.
    pub max_generations: usize,
    /// Stop after this many consecutive generations without improvement
    /// of the best fitness. 0 disables the plateau stop.
    pub plateau_generations: usize,
    /// RNG seed for the whole run.
    pub seed: u64,
    /// Evaluate each generation's individuals on the rayon thread pool.
    /// Evaluation is pure, so this does not affect the result.
    pub parallel: bool,
    /// Violation penalty weights.
    pub weights: FitnessWeights,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            crossover_rate: 0.8,
            mutation_rate: 0.02,
            elitism: 2,
            tournament_size: 3,
            max_generations: 500,
            plateau_generations: 50,
            seed: 0,
            parallel: false,
            weights: FitnessWeights::default(),
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the crossover probability (clamped to `0.0..=1.0`).
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-gene mutation probability (clamped to `0.0..=1.0`).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the elite count.
    pub fn with_elitism(mut self, elitism: usize) -> Self {
        self.elitism = elitism;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the plateau window (0 disables the plateau stop).
    pub fn with_plateau_generations(mut self, generations: usize) -> Self {
        self.plateau_generations = generations;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the violation penalty weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let config = GaConfig::default()
            .with_population_size(40)
            .with_max_generations(200)
            .with_seed(7)
            .with_parallel(true);
        assert_eq!(config.population_size, 40);
        assert_eq!(config.max_generations, 200);
        assert_eq!(config.seed, 7);
        assert!(config.parallel);
    }

    #[test]
    fn test_rates_are_clamped() {
        let config = GaConfig::default()
            .with_crossover_rate(1.7)
            .with_mutation_rate(-0.3);
        assert_eq!(config.crossover_rate, 1.0);
        assert_eq!(config.mutation_rate, 0.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let config = GaConfig::default().with_seed(99);
        let json = serde_json::to_string(&config).unwrap();
        let back: GaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, 99);
        assert_eq!(back.population_size, config.population_size);
    }
}
