//! Payline evaluator for one reel set.
//!
//! A spin is addressed by an index in `[0, cycle)` where `cycle` is the
//! product of the strip lengths. The index decomposes into per-reel
//! offsets; the visible window is copied reel-major into a flat cell
//! buffer that both the line walk and the bonus predicate read.

use std::collections::{HashMap, HashSet};

use crate::error::{ReelsmithError, Result};
use crate::types::{SlotMachineConfig, Symbol, WinningCombination};

/// Result of a single spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinOutcome {
    pub win: u64,
    pub bonus: bool,
}

pub struct SpinEngine {
    reels: Vec<Vec<Symbol>>,
    window: Vec<usize>,
    wild: HashSet<Symbol>,
    scatter: HashSet<Symbol>,
    paytable: HashMap<Symbol, Vec<u64>>,
    /// Per line, indices into the flat cell buffer.
    flat_lines: Vec<Vec<usize>>,
    /// Mixed-radix place value of each reel in the spin index.
    strides: Vec<u64>,
    cycle: u64,
    offsets: Vec<usize>,
    cells: Vec<Symbol>,
}

impl SpinEngine {
    pub fn new(reels: Vec<Vec<Symbol>>, config: &SlotMachineConfig) -> Result<Self> {
        config.validate()?;
        if reels.len() != config.window.len() {
            return Err(ReelsmithError::Configuration(format!(
                "{} reel strips supplied for a {}-reel machine",
                reels.len(),
                config.window.len()
            )));
        }
        if let Some(empty) = reels.iter().position(|r| r.is_empty()) {
            return Err(ReelsmithError::Configuration(format!(
                "reel {} strip is empty",
                empty
            )));
        }

        let mut cycle: u64 = 1;
        for reel in &reels {
            cycle = cycle
                .checked_mul(reel.len() as u64)
                .filter(|&c| c <= i64::MAX as u64)
                .ok_or_else(|| {
                    ReelsmithError::Configuration(
                        "spin cycle overflows the signed 64-bit range".to_string(),
                    )
                })?;
        }

        // strides[r] is the product of the strip lengths after reel r.
        let mut strides = vec![1u64; reels.len()];
        for r in (0..reels.len().saturating_sub(1)).rev() {
            strides[r] = strides[r + 1] * reels[r + 1].len() as u64;
        }

        let mut base = vec![0usize; config.window.len()];
        for r in 1..config.window.len() {
            base[r] = base[r - 1] + config.window[r - 1];
        }
        let flat_lines = config
            .lines
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(r, &row)| base[r] + row)
                    .collect()
            })
            .collect();

        let cell_count: usize = config.window.iter().sum();
        Ok(Self {
            reels,
            window: config.window.clone(),
            wild: config.wild.clone(),
            scatter: config.scatter.clone(),
            paytable: config.paytable.clone(),
            flat_lines,
            strides,
            cycle,
            offsets: vec![0; config.window.len()],
            cells: vec![0; cell_count],
        })
    }

    /// Number of distinct windows, `Π |reel|`.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn reels(&self) -> &[Vec<Symbol>] {
        &self.reels
    }

    /// Fast path: total win and bonus flag, no allocation.
    pub fn spin(&mut self, index: u64) -> SpinOutcome {
        self.load_window(index);
        let mut win = 0;
        for li in 0..self.flat_lines.len() {
            let (_, _, payout) = self.eval_line(li);
            win += payout;
        }
        SpinOutcome {
            win,
            bonus: self.bonus_triggered(),
        }
    }

    /// Recording path: additionally appends each paying combination.
    pub fn spin_recording(
        &mut self,
        index: u64,
        combinations: &mut Vec<WinningCombination>,
    ) -> SpinOutcome {
        self.load_window(index);
        let mut win = 0;
        for li in 0..self.flat_lines.len() {
            let (symbol, length, payout) = self.eval_line(li);
            if payout > 0 {
                combinations.push(WinningCombination {
                    symbol,
                    length,
                    win: payout,
                });
                win += payout;
            }
        }
        SpinOutcome {
            win,
            bonus: self.bonus_triggered(),
        }
    }

    fn load_window(&mut self, index: u64) {
        for r in 0..self.reels.len() {
            self.offsets[r] = ((index / self.strides[r]) % self.reels[r].len() as u64) as usize;
        }
        let mut cell = 0;
        for r in 0..self.reels.len() {
            let reel = &self.reels[r];
            for k in 0..self.window[r] {
                self.cells[cell] = reel[(self.offsets[r] + k) % reel.len()];
                cell += 1;
            }
        }
    }

    /// Walk one line left to right, returning (locked symbol, run length,
    /// payout). Wilds adopt the first concrete symbol; a leading scatter
    /// only extends through further scatters.
    fn eval_line(&self, line_index: usize) -> (Symbol, usize, u64) {
        let flat = &self.flat_lines[line_index];
        let mut locked = self.cells[flat[0]];
        let mut run_len = 1;

        for &cell in &flat[1..] {
            let s = self.cells[cell];
            if self.scatter.contains(&locked) && !self.scatter.contains(&s) {
                break;
            }
            if self.wild.contains(&locked)
                && !self.wild.contains(&s)
                && !self.scatter.contains(&s)
            {
                locked = s;
            }
            if s == locked || self.wild.contains(&s) {
                run_len += 1;
            } else {
                break;
            }
        }

        let payout = self
            .paytable
            .get(&locked)
            .and_then(|payouts| payouts.get(run_len - 1))
            .copied()
            .unwrap_or(0);
        (locked, run_len, payout)
    }

    /// A bonus game triggers when every reel shows a scatter in its window.
    fn bonus_triggered(&self) -> bool {
        let mut cell = 0;
        for r in 0..self.reels.len() {
            let rows = self.window[r];
            let seen = self.cells[cell..cell + rows]
                .iter()
                .any(|s| self.scatter.contains(s));
            if !seen {
                return false;
            }
            cell += rows;
        }
        true
    }
}
