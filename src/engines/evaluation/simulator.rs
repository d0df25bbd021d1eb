//! Monte-Carlo spin batches over one reel set.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::spin_engine::SpinEngine;
use crate::types::{SimulationStats, WinningCombination};

/// Runs batches of random spins and aggregates their statistics.
///
/// The spin-index stream comes from an injected seeded generator, so a
/// batch is reproducible from `(engine, seed, spin_count)` alone.
pub struct Simulator {
    engine: SpinEngine,
    rng: StdRng,
    combo_buf: Vec<WinningCombination>,
}

impl Simulator {
    pub fn new(engine: SpinEngine, seed: u64) -> Self {
        Self {
            engine,
            rng: StdRng::seed_from_u64(seed),
            combo_buf: Vec::new(),
        }
    }

    pub fn engine(&self) -> &SpinEngine {
        &self.engine
    }

    pub fn run(&mut self, spin_count: u64) -> SimulationStats {
        let mut stats = SimulationStats {
            spin_count,
            ..Default::default()
        };
        let cycle = self.engine.cycle();

        for _ in 0..spin_count {
            let index = self.rng.gen_range(0..cycle);
            self.combo_buf.clear();
            let outcome = self.engine.spin_recording(index, &mut self.combo_buf);

            stats.total_win += outcome.win;
            if outcome.win > 0 {
                stats.win_spins += 1;
            }
            if outcome.bonus {
                stats.bonus_spins += 1;
            }
            for combo in &self.combo_buf {
                let key = (combo.symbol, combo.length);
                *stats.combination_counts.entry(key).or_insert(0) += 1;
                *stats.combination_win_sums.entry(key).or_insert(0) += combo.win;
            }
        }
        stats
    }
}
