//! Evolution loop searching the reel gene boxes.

use std::time::Instant;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use super::genome::{Evaluation, Individual, ReelLayout};
use super::operators::{blend_crossover, mutate, tournament_selection};
use super::progress::ProgressSink;
use crate::engines::evaluation::{Simulator, SpinEngine};
use crate::engines::metrics::{FitnessBreakdown, FitnessEvaluator, SimulationTargets};
use crate::engines::sequencing::{ReelSequencer, SymbolClasses};
use crate::error::{ReelsmithError, Result};
use crate::types::{SlotMachineConfig, Symbol};

/// Per-operator cap on re-drawing a reel whose histogram refuses to
/// sequence. Exceeding it aborts the run.
pub const MAX_SEQUENCE_RETRIES: usize = 250;

#[derive(Debug, Clone)]
pub struct GaConfig {
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

impl Default for GaConfig {
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

impl GaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(ReelsmithError::Configuration(
                "population size must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ReelsmithError::Configuration(
                "crossover rate must lie in [0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ReelsmithError::Configuration(
                "mutation rate must lie in [0, 1]".to_string(),
            ));
        }
        if self.elitism > self.population_size {
            return Err(ReelsmithError::Configuration(
                "elitism cannot exceed the population size".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(ReelsmithError::Configuration(
                "tournament size must be positive".to_string(),
            ));
        }
        if self.crossover_alpha < 0.0 {
            return Err(ReelsmithError::Configuration(
                "crossover alpha must be non-negative".to_string(),
            ));
        }
        if self.mutation_sigma < 0.0 {
            return Err(ReelsmithError::Configuration(
                "mutation sigma must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of a finished search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: Individual,
    pub fitness: FitnessBreakdown,
    /// Best total per generation, starting with the initial population.
    pub history: Vec<f64>,
}

impl SearchOutcome {
    /// JSON report of the search for host tooling: fitness breakdown,
    /// history, the best genome with its strips, and the sorted
    /// winning-combination table.
    pub fn summary_json(&self) -> Result<String> {
        let combinations: Vec<serde_json::Value> = match &self.best.eval {
            Some(eval) => {
                let mut keys: Vec<(Symbol, usize)> =
                    eval.stats.combination_counts.keys().copied().collect();
                keys.sort();
                keys.into_iter()
                    .map(|(symbol, length)| {
                        json!({
                            "symbol": symbol,
                            "length": length,
                            "count": eval.stats.combination_counts[&(symbol, length)],
                            "win_sum": eval.stats.combination_win_sums[&(symbol, length)],
                        })
                    })
                    .collect()
            }
            None => Vec::new(),
        };
        let summary = json!({
            "fitness": self.fitness,
            "history": self.history,
            "genes": self.best.genes,
            "strips": self.best.strips,
            "combinations": combinations,
        });
        Ok(serde_json::to_string_pretty(&summary)?)
    }
}

pub struct EvolutionEngine {
    config: GaConfig,
    layouts: Vec<ReelLayout>,
    classes: SymbolClasses,
    slot: SlotMachineConfig,
    fitness: FitnessEvaluator,
    spin_count: u64,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(
        config: GaConfig,
        layouts: Vec<ReelLayout>,
        classes: SymbolClasses,
        targets: SimulationTargets,
        spin_count: u64,
        slot: SlotMachineConfig,
    ) -> Result<Self> {
        config.validate()?;
        slot.validate()?;
        if layouts.len() != slot.reel_count() {
            return Err(ReelsmithError::Configuration(format!(
                "{} reel gene boxes supplied for a {}-reel machine",
                layouts.len(),
                slot.reel_count()
            )));
        }
        if spin_count == 0 {
            return Err(ReelsmithError::Configuration(
                "spin count must be positive".to_string(),
            ));
        }
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            layouts,
            classes,
            slot,
            fitness: FitnessEvaluator::new(targets)?,
            spin_count,
            rng,
        })
    }

    /// Run the full search and return the best individual observed.
    pub fn run(&mut self, sink: &mut dyn ProgressSink) -> Result<SearchOutcome> {
        let start = Instant::now();
        info!(
            "starting reel search: population {}, {} generations, {} spins per candidate",
            self.config.population_size, self.config.generations, self.spin_count
        );

        let mut population = Vec::with_capacity(self.config.population_size);
        for _ in 0..self.config.population_size {
            population.push(self.random_individual()?);
        }
        for individual in &mut population {
            self.evaluate(individual)?;
        }

        let mut best = population[best_index(&population)].clone();
        let mut history = vec![best.total()];
        self.report(sink, 0, &best, start)?;

        for generation in 1..=self.config.generations {
            let next = self.next_generation(&population)?;
            population = next;
            for individual in &mut population {
                self.evaluate(individual)?;
            }

            let gen_best_idx = best_index(&population);
            if population[gen_best_idx].total() < best.total() {
                best = population[gen_best_idx].clone();
                debug!(
                    "generation {}: new best total {:.6}",
                    generation,
                    best.total()
                );
            }
            history.push(population[gen_best_idx].total());
            self.report(sink, generation, &population[gen_best_idx], start)?;
        }

        let fitness = best
            .eval
            .as_ref()
            .expect("population is evaluated before selection")
            .fitness;
        Ok(SearchOutcome {
            best,
            fitness,
            history,
        })
    }

    fn next_generation(&mut self, population: &[Individual]) -> Result<Vec<Individual>> {
        let mut order: Vec<usize> = (0..population.len()).collect();
        order.sort_by(|&a, &b| {
            population[a]
                .total()
                .partial_cmp(&population[b].total())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut next = Vec::with_capacity(self.config.population_size);
        for &i in order.iter().take(self.config.elitism) {
            next.push(population[i].clone());
        }

        while next.len() < self.config.population_size {
            let p1 = tournament_selection(population, self.config.tournament_size, &mut self.rng);
            let p2 = tournament_selection(population, self.config.tournament_size, &mut self.rng);

            let (mut child1, mut child2) = if self.rng.gen::<f64>() < self.config.crossover_rate {
                self.crossover(&population[p1], &population[p2])?
            } else {
                (population[p1].clone(), population[p2].clone())
            };

            self.mutate_individual(&mut child1)?;
            self.mutate_individual(&mut child2)?;
            next.push(child1);
            if next.len() < self.config.population_size {
                next.push(child2);
            }
        }
        Ok(next)
    }

    fn sequence_reel(&self, reel: usize, genes: &[u32]) -> Option<Vec<Symbol>> {
        let layout = &self.layouts[reel];
        let sequencer = ReelSequencer::new(&self.classes, layout.radius());
        sequencer.sequence(&layout.rows(genes), layout.seed())
    }

    /// Sample a fresh individual, re-drawing any reel whose histogram
    /// cannot be sequenced.
    fn random_individual(&mut self) -> Result<Individual> {
        let mut genes = Vec::with_capacity(self.layouts.len());
        let mut strips = Vec::with_capacity(self.layouts.len());
        for reel in 0..self.layouts.len() {
            let mut retries = 0;
            loop {
                let candidate = self.layouts[reel].sample(&mut self.rng);
                if let Some(strip) = self.sequence_reel(reel, &candidate) {
                    genes.push(candidate);
                    strips.push(strip);
                    break;
                }
                retries += 1;
                if retries >= MAX_SEQUENCE_RETRIES {
                    return Err(ReelsmithError::Sequencing {
                        reel,
                        attempts: MAX_SEQUENCE_RETRIES,
                    });
                }
            }
        }
        Ok(Individual {
            genes,
            strips,
            eval: None,
        })
    }

    /// BLX-α over every reel; a reel that fails to sequence has its
    /// blended genes re-drawn from the same parents.
    fn crossover(&mut self, a: &Individual, b: &Individual) -> Result<(Individual, Individual)> {
        let reel_count = self.layouts.len();
        let mut child1 = Individual {
            genes: Vec::with_capacity(reel_count),
            strips: Vec::with_capacity(reel_count),
            eval: None,
        };
        let mut child2 = child1.clone();

        for reel in 0..reel_count {
            let mut retries = 0;
            loop {
                let (genes1, genes2) = blend_crossover(
                    &a.genes[reel],
                    &b.genes[reel],
                    self.config.crossover_alpha,
                    &self.layouts[reel],
                    &mut self.rng,
                );
                let strips = (
                    self.sequence_reel(reel, &genes1),
                    self.sequence_reel(reel, &genes2),
                );
                if let (Some(strip1), Some(strip2)) = strips {
                    child1.genes.push(genes1);
                    child1.strips.push(strip1);
                    child2.genes.push(genes2);
                    child2.strips.push(strip2);
                    break;
                }
                retries += 1;
                if retries >= MAX_SEQUENCE_RETRIES {
                    return Err(ReelsmithError::Sequencing {
                        reel,
                        attempts: MAX_SEQUENCE_RETRIES,
                    });
                }
            }
        }
        Ok((child1, child2))
    }

    /// Gaussian mutation per reel with re-sequencing. Reels whose genes
    /// end up unchanged keep their strip and the cached evaluation.
    fn mutate_individual(&mut self, individual: &mut Individual) -> Result<()> {
        for reel in 0..self.layouts.len() {
            let original = individual.genes[reel].clone();
            let mut retries = 0;
            loop {
                let mut candidate = original.clone();
                let changed = mutate(
                    &mut candidate,
                    self.config.mutation_rate,
                    self.config.mutation_sigma,
                    &self.layouts[reel],
                    &mut self.rng,
                );
                if !changed {
                    break;
                }
                if let Some(strip) = self.sequence_reel(reel, &candidate) {
                    individual.genes[reel] = candidate;
                    individual.strips[reel] = strip;
                    individual.eval = None;
                    break;
                }
                retries += 1;
                if retries >= MAX_SEQUENCE_RETRIES {
                    return Err(ReelsmithError::Sequencing {
                        reel,
                        attempts: MAX_SEQUENCE_RETRIES,
                    });
                }
            }
        }
        Ok(())
    }

    /// Simulate and score one individual. Cached evaluations are kept; the
    /// spin-index stream is seeded per call, so re-running would reproduce
    /// the identical result.
    fn evaluate(&self, individual: &mut Individual) -> Result<()> {
        if individual.eval.is_some() {
            return Ok(());
        }
        let engine = SpinEngine::new(individual.strips.clone(), &self.slot)?;
        let mut simulator = Simulator::new(engine, self.config.seed);
        let stats = simulator.run(self.spin_count);
        let fitness = self.fitness.evaluate(&stats);
        individual.eval = Some(Evaluation { fitness, stats });
        Ok(())
    }

    fn report(
        &self,
        sink: &mut dyn ProgressSink,
        generation: usize,
        best: &Individual,
        start: Instant,
    ) -> Result<()> {
        let Some(Evaluation { fitness, stats }) = &best.eval else {
            return Ok(());
        };
        sink.line(&format!(
            "generation {:>4}: best {:.6} | rtp {:.4} (d {:.4}) hit {:.4} (d {:.4}) bonus {:.5} (d {:.4}) sym err {:.4} | {:.1}s",
            generation,
            fitness.total,
            fitness.rtp,
            fitness.rtp_delta,
            fitness.hit_frequency,
            fitness.hit_delta,
            fitness.bonus_frequency,
            fitness.bonus_delta,
            fitness.symbol_rtp_error,
            start.elapsed().as_secs_f64(),
        ))?;

        if !self.config.verbose_progress {
            return Ok(());
        }
        for (reel, genes) in best.genes.iter().enumerate() {
            let rows: Vec<String> = self.layouts[reel]
                .rows(genes)
                .iter()
                .map(|(symbol, counts)| format!("{}:{:?}", symbol, counts))
                .collect();
            sink.line(&format!("  reel {} histogram: {}", reel, rows.join(" ")))?;
        }
        for (reel, strip) in best.strips.iter().enumerate() {
            sink.line(&format!("  reel {} strip: {:?}", reel, strip))?;
        }
        let mut keys: Vec<&(Symbol, usize)> = stats.combination_counts.keys().collect();
        keys.sort();
        for key in keys {
            sink.line(&format!(
                "  combo symbol {:>3} length {} count {:>8} win {:>10}",
                key.0,
                key.1,
                stats.combination_counts[key],
                stats.combination_win_sums[key],
            ))?;
        }
        Ok(())
    }
}

fn best_index(population: &[Individual]) -> usize {
    let mut best = 0;
    for i in 1..population.len() {
        if population[i].total() < population[best].total() {
            best = i;
        }
    }
    best
}
