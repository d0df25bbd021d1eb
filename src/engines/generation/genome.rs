//! Genome representation for the reel search.
//!
//! A genome is one flat integer vector per reel. Gene `j` of a reel counts
//! the stacks of one (symbol, length) slot; the immutable [`ReelLayout`]
//! sidecar maps gene positions to symbol rows and carries the `[low, high]`
//! box the GA may explore. Keeping genes flat makes crossover and mutation
//! plain array passes and cloning a memcpy.

use rand::Rng;

use crate::engines::metrics::FitnessBreakdown;
use crate::error::{ReelsmithError, Result};
use crate::types::{SimulationStats, Symbol};

/// Immutable per-reel gene box: symbol rows, bounds, radius and the
/// sequencer seed.
#[derive(Debug, Clone)]
pub struct ReelLayout {
    radius: usize,
    seed: u32,
    symbols: Vec<Symbol>,
    /// Prefix offsets into the flat gene vector, one past the end last.
    row_offsets: Vec<usize>,
    low: Vec<u32>,
    high: Vec<u32>,
}

impl ReelLayout {
    /// Build a layout from `(symbol, low, high)` rows. Rows may come in any
    /// order; they are sorted by symbol id here.
    pub fn new(
        radius: usize,
        seed: u32,
        mut rows: Vec<(Symbol, Vec<u32>, Vec<u32>)>,
    ) -> Result<Self> {
        if radius == 0 {
            return Err(ReelsmithError::Configuration(
                "sequencing radius must be at least 1".to_string(),
            ));
        }
        rows.sort_by_key(|(symbol, _, _)| *symbol);
        if rows.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(ReelsmithError::Configuration(
                "duplicate symbol in reel gene box".to_string(),
            ));
        }

        let mut symbols = Vec::with_capacity(rows.len());
        let mut row_offsets = vec![0];
        let mut low = Vec::new();
        let mut high = Vec::new();
        for (symbol, row_low, row_high) in rows {
            if row_low.len() != row_high.len() {
                return Err(ReelsmithError::Configuration(format!(
                    "symbol {}: low and high stack counts differ in length",
                    symbol
                )));
            }
            if row_low.iter().zip(&row_high).any(|(lo, hi)| lo > hi) {
                return Err(ReelsmithError::Configuration(format!(
                    "symbol {}: low stack count exceeds high",
                    symbol
                )));
            }
            symbols.push(symbol);
            low.extend_from_slice(&row_low);
            high.extend_from_slice(&row_high);
            row_offsets.push(low.len());
        }

        Ok(Self {
            radius,
            seed,
            symbols,
            row_offsets,
            low,
            high,
        })
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn gene_count(&self) -> usize {
        self.low.len()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Inclusive bounds of gene `i`.
    pub fn bounds(&self, i: usize) -> (u32, u32) {
        (self.low[i], self.high[i])
    }

    pub fn clamp(&self, i: usize, value: i64) -> u32 {
        value.clamp(self.low[i] as i64, self.high[i] as i64) as u32
    }

    /// Histogram view of a gene vector: `(symbol, counts)` rows in
    /// ascending symbol order, as the sequencer expects.
    pub fn rows<'a>(&self, genes: &'a [u32]) -> Vec<(Symbol, &'a [u32])> {
        debug_assert_eq!(genes.len(), self.gene_count());
        self.symbols
            .iter()
            .enumerate()
            .map(|(r, &symbol)| (symbol, &genes[self.row_offsets[r]..self.row_offsets[r + 1]]))
            .collect()
    }

    /// Sample every gene uniformly inside its box.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<u32> {
        (0..self.gene_count())
            .map(|i| rng.gen_range(self.low[i]..=self.high[i]))
            .collect()
    }
}

/// Cached result of one fitness call.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub fitness: FitnessBreakdown,
    pub stats: SimulationStats,
}

/// One candidate: per-reel genes, the strips sequenced from them, and the
/// evaluation cache. Genes and strips are kept consistent by construction.
#[derive(Debug, Clone)]
pub struct Individual {
    pub genes: Vec<Vec<u32>>,
    pub strips: Vec<Vec<Symbol>>,
    pub eval: Option<Evaluation>,
}

impl Individual {
    /// Selection key; unevaluated candidates sort last.
    pub fn total(&self) -> f64 {
        self.eval
            .as_ref()
            .map(|e| e.fitness.total)
            .unwrap_or(f64::INFINITY)
    }
}
