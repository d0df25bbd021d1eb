use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{ReelsmithError, Result};

/// Symbol identifier as it appears on a reel strip.
pub type Symbol = u32;

/// A run of `length` consecutive copies of `symbol` on a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stack {
    pub symbol: Symbol,
    pub length: usize,
}

impl Stack {
    pub fn new(symbol: Symbol, length: usize) -> Self {
        Self { symbol, length }
    }
}

/// A paid line hit: the locked symbol, the run length and the payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningCombination {
    pub symbol: Symbol,
    pub length: usize,
    pub win: u64,
}

/// Immutable per-run machine definition consumed by the spin engine.
#[derive(Debug, Clone)]
pub struct SlotMachineConfig {
    /// Rows visible on each reel.
    pub window: Vec<usize>,
    pub wild: HashSet<Symbol>,
    pub scatter: HashSet<Symbol>,
    /// Payouts indexed by run-length minus one.
    pub paytable: HashMap<Symbol, Vec<u64>>,
    /// Each payline picks one row index per reel.
    pub lines: Vec<Vec<usize>>,
}

impl SlotMachineConfig {
    pub fn reel_count(&self) -> usize {
        self.window.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.is_empty() {
            return Err(ReelsmithError::Configuration(
                "window must list at least one reel".to_string(),
            ));
        }
        if self.window.iter().any(|&rows| rows == 0) {
            return Err(ReelsmithError::Configuration(
                "every reel window must show at least one row".to_string(),
            ));
        }
        for (i, line) in self.lines.iter().enumerate() {
            if line.len() != self.window.len() {
                return Err(ReelsmithError::Configuration(format!(
                    "line {} picks {} cells but the machine has {} reels",
                    i,
                    line.len(),
                    self.window.len()
                )));
            }
            for (reel, &row) in line.iter().enumerate() {
                if row >= self.window[reel] {
                    return Err(ReelsmithError::Configuration(format!(
                        "line {} row {} is outside reel {}'s window of {}",
                        i, row, reel, self.window[reel]
                    )));
                }
            }
        }
        for (symbol, payouts) in &self.paytable {
            if payouts.is_empty() {
                return Err(ReelsmithError::Configuration(format!(
                    "paytable entry for symbol {} is empty",
                    symbol
                )));
            }
        }
        Ok(())
    }
}

/// Aggregate outcome of a simulation batch.
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    pub spin_count: u64,
    pub total_win: u64,
    pub win_spins: u64,
    pub bonus_spins: u64,
    /// How often each (symbol, run length) combination paid.
    pub combination_counts: HashMap<(Symbol, usize), u64>,
    /// Total win attributed to each (symbol, run length) combination.
    pub combination_win_sums: HashMap<(Symbol, usize), u64>,
}

impl SimulationStats {
    pub fn rtp(&self) -> f64 {
        if self.spin_count == 0 {
            return 0.0;
        }
        self.total_win as f64 / self.spin_count as f64
    }

    pub fn hit_frequency(&self) -> f64 {
        if self.spin_count == 0 {
            return 0.0;
        }
        self.win_spins as f64 / self.spin_count as f64
    }

    pub fn bonus_frequency(&self) -> f64 {
        if self.spin_count == 0 {
            return 0.0;
        }
        self.bonus_spins as f64 / self.spin_count as f64
    }

    pub fn symbol_win_sum(&self, symbol: Symbol) -> u64 {
        self.combination_win_sums
            .iter()
            .filter(|((s, _), _)| *s == symbol)
            .map(|(_, sum)| sum)
            .sum()
    }

    pub fn symbol_rtp(&self, symbol: Symbol) -> f64 {
        if self.spin_count == 0 {
            return 0.0;
        }
        self.symbol_win_sum(symbol) as f64 / self.spin_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SlotMachineConfig {
        SlotMachineConfig {
            window: vec![3, 3, 3],
            wild: HashSet::new(),
            scatter: HashSet::new(),
            paytable: HashMap::from([(7, vec![0, 5, 20])]),
            lines: vec![vec![0, 0, 0], vec![1, 1, 1]],
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn line_outside_window_is_rejected() {
        let mut config = base_config();
        config.lines.push(vec![0, 3, 0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn short_line_is_rejected() {
        let mut config = base_config();
        config.lines.push(vec![0, 0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_paytable_row_is_rejected() {
        let mut config = base_config();
        config.paytable.insert(9, vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn stats_ratios_guard_zero_spins() {
        let stats = SimulationStats::default();
        assert_eq!(stats.rtp(), 0.0);
        assert_eq!(stats.hit_frequency(), 0.0);
        assert_eq!(stats.bonus_frequency(), 0.0);
        assert_eq!(stats.symbol_rtp(3), 0.0);
    }

    #[test]
    fn symbol_win_sum_collects_all_lengths() {
        let mut stats = SimulationStats {
            spin_count: 10,
            ..Default::default()
        };
        stats.combination_win_sums.insert((4, 2), 6);
        stats.combination_win_sums.insert((4, 3), 14);
        stats.combination_win_sums.insert((5, 2), 100);
        assert_eq!(stats.symbol_win_sum(4), 20);
        assert_eq!(stats.symbol_rtp(4), 2.0);
    }
}
