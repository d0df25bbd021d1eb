use serde::{Deserialize, Serialize};

use super::traits::ConfigSection;
use crate::engines::generation::GaConfig;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub elitism: usize,
    pub tournament_size: usize,
    pub seed: u64,
    pub crossover_alpha: f64,
    pub mutation_sigma: f64,
    pub verbose_progress: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 40,
            generations: 60,
            crossover_rate: 0.9,
            mutation_rate: 0.05,
            elitism: 2,
            tournament_size: 3,
            seed: 1,
            crossover_alpha: 0.5,
            mutation_sigma: 1.0,
            verbose_progress: false,
        }
    }
}

impl EvolutionConfig {
    pub fn to_ga_config(&self) -> GaConfig {
        GaConfig {
            population_size: self.population_size,
            generations: self.generations,
            crossover_rate: self.crossover_rate,
            mutation_rate: self.mutation_rate,
            elitism: self.elitism,
            tournament_size: self.tournament_size,
            seed: self.seed,
            crossover_alpha: self.crossover_alpha,
            mutation_sigma: self.mutation_sigma,
            verbose_progress: self.verbose_progress,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<()> {
        self.to_ga_config().validate()
    }
}
