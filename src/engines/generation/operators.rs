//! Genetic operators over flat integer genomes.

use rand::Rng;

use super::genome::{Individual, ReelLayout};

/// Tournament selection: draw `tournament_size` candidates with
/// replacement, return the index of the lowest total.
pub fn tournament_selection<R: Rng>(
    population: &[Individual],
    tournament_size: usize,
    rng: &mut R,
) -> usize {
    let mut best = rng.gen_range(0..population.len());
    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        if population[idx].total() < population[best].total() {
            best = idx;
        }
    }
    best
}

/// BLX-α crossover on one reel's genes: each offspring gene is drawn
/// uniformly from the parents' interval widened by `alpha` on both sides,
/// then clamped back into the gene box.
pub fn blend_crossover<R: Rng>(
    a: &[u32],
    b: &[u32],
    alpha: f64,
    layout: &ReelLayout,
    rng: &mut R,
) -> (Vec<u32>, Vec<u32>) {
    let mut child_a = Vec::with_capacity(a.len());
    let mut child_b = Vec::with_capacity(b.len());
    for i in 0..a.len() {
        let (x, y) = (a[i] as f64, b[i] as f64);
        let spread = alpha * (x - y).abs();
        let lo = (x.min(y) - spread).round() as i64;
        let hi = (x.max(y) + spread).round() as i64;
        child_a.push(layout.clamp(i, rng.gen_range(lo..=hi)));
        child_b.push(layout.clamp(i, rng.gen_range(lo..=hi)));
    }
    (child_a, child_b)
}

/// Gaussian mutation: with probability `rate` per gene, add a rounded
/// N(0, sigma) step and clamp. Returns whether any gene moved.
pub fn mutate<R: Rng>(
    genes: &mut [u32],
    rate: f64,
    sigma: f64,
    layout: &ReelLayout,
    rng: &mut R,
) -> bool {
    let mut changed = false;
    for (i, gene) in genes.iter_mut().enumerate() {
        if rng.gen::<f64>() < rate {
            let step = sample_gaussian(sigma, rng).round() as i64;
            let mutated = layout.clamp(i, *gene as i64 + step);
            changed |= mutated != *gene;
            *gene = mutated;
        }
    }
    changed
}

/// One N(0, sigma) draw via a Box-Muller pair of uniforms.
pub fn sample_gaussian<R: Rng>(sigma: f64, rng: &mut R) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    sigma * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::metrics::FitnessBreakdown;
    use crate::engines::generation::genome::Evaluation;
    use crate::types::SimulationStats;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn individual_with_total(total: f64) -> Individual {
        Individual {
            genes: vec![],
            strips: vec![],
            eval: Some(Evaluation {
                fitness: FitnessBreakdown {
                    total,
                    rtp_delta: 0.0,
                    hit_delta: 0.0,
                    bonus_delta: 0.0,
                    symbol_rtp_error: 0.0,
                    rtp: 0.0,
                    hit_frequency: 0.0,
                    bonus_frequency: 0.0,
                },
                stats: SimulationStats::default(),
            }),
        }
    }

    fn wide_layout() -> ReelLayout {
        ReelLayout::new(2, 0, vec![(1, vec![0, 0, 0, 0], vec![10, 10, 10, 10])]).unwrap()
    }

    #[test]
    fn tournament_prefers_lower_totals() {
        let population: Vec<Individual> =
            [5.0, 0.25, 3.0, 1.0].iter().map(|&t| individual_with_total(t)).collect();
        let mut rng = StdRng::seed_from_u64(3);
        // With the tournament as large as the population, the winner is
        // almost surely the global best over a few trials.
        let mut found_best = false;
        for _ in 0..20 {
            if tournament_selection(&population, 8, &mut rng) == 1 {
                found_best = true;
            }
        }
        assert!(found_best);
    }

    #[test]
    fn blend_offspring_stay_in_the_box() {
        let layout = wide_layout();
        let mut rng = StdRng::seed_from_u64(11);
        let a = vec![0, 10, 5, 7];
        let b = vec![10, 0, 5, 2];
        for _ in 0..200 {
            let (ca, cb) = blend_crossover(&a, &b, 0.5, &layout, &mut rng);
            for child in [&ca, &cb] {
                for (i, &g) in child.iter().enumerate() {
                    let (lo, hi) = layout.bounds(i);
                    assert!(g >= lo && g <= hi);
                }
            }
        }
    }

    #[test]
    fn blend_of_equal_parents_is_identity() {
        let layout = wide_layout();
        let mut rng = StdRng::seed_from_u64(2);
        let parent = vec![4, 4, 4, 4];
        let (ca, cb) = blend_crossover(&parent, &parent, 0.5, &layout, &mut rng);
        assert_eq!(ca, parent);
        assert_eq!(cb, parent);
    }

    #[test]
    fn zero_rate_mutation_is_a_no_op() {
        let layout = wide_layout();
        let mut rng = StdRng::seed_from_u64(8);
        let mut genes = vec![1, 2, 3, 4];
        let changed = mutate(&mut genes, 0.0, 5.0, &layout, &mut rng);
        assert!(!changed);
        assert_eq!(genes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn mutation_respects_bounds() {
        let layout = wide_layout();
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..100 {
            let mut genes = vec![0, 10, 5, 5];
            mutate(&mut genes, 1.0, 50.0, &layout, &mut rng);
            for (i, &g) in genes.iter().enumerate() {
                let (lo, hi) = layout.bounds(i);
                assert!(g >= lo && g <= hi);
            }
        }
    }

    #[test]
    fn zero_sigma_gaussian_is_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(sample_gaussian(0.0, &mut rng), 0.0);
        }
    }
}
