//! Fitness scoring of simulation results against operator targets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ReelsmithError, Result};
use crate::types::{SimulationStats, Symbol};

/// Operator-supplied long-run targets. Lower fitness means closer.
#[derive(Debug, Clone, Default)]
pub struct SimulationTargets {
    pub rtp: f64,
    pub hit_frequency: f64,
    pub bonus_frequency: f64,
    /// Optional per-symbol RTP targets, keyed in ascending order so the
    /// error accumulates deterministically.
    pub symbol_rtp: BTreeMap<Symbol, f64>,
    pub symbol_rtp_unevenness_weight: f64,
}

impl SimulationTargets {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.hit_frequency) {
            return Err(ReelsmithError::Configuration(
                "target hit frequency must lie in [0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.bonus_frequency) {
            return Err(ReelsmithError::Configuration(
                "target bonus frequency must lie in [0, 1]".to_string(),
            ));
        }
        if self.symbol_rtp_unevenness_weight < 0.0 {
            return Err(ReelsmithError::Configuration(
                "symbol RTP unevenness weight must be non-negative".to_string(),
            ));
        }
        if let Some((symbol, _)) = self.symbol_rtp.iter().find(|(_, &t)| t < 0.0) {
            return Err(ReelsmithError::Configuration(format!(
                "symbol {} RTP target must be non-negative",
                symbol
            )));
        }
        Ok(())
    }
}

/// Per-component fitness report. `total` is the selection key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    pub total: f64,
    pub rtp_delta: f64,
    pub hit_delta: f64,
    pub bonus_delta: f64,
    pub symbol_rtp_error: f64,
    pub rtp: f64,
    pub hit_frequency: f64,
    pub bonus_frequency: f64,
}

/// Relative delta in [0, 1]: `|t - a| / (|t| + |a|)`, zero when both
/// magnitudes vanish.
pub fn rel_delta(target: f64, actual: f64) -> f64 {
    let denom = target.abs() + actual.abs();
    if denom < 1e-12 {
        0.0
    } else {
        (target - actual).abs() / denom
    }
}

pub struct FitnessEvaluator {
    targets: SimulationTargets,
}

impl FitnessEvaluator {
    pub fn new(targets: SimulationTargets) -> Result<Self> {
        targets.validate()?;
        Ok(Self { targets })
    }

    pub fn targets(&self) -> &SimulationTargets {
        &self.targets
    }

    pub fn evaluate(&self, stats: &SimulationStats) -> FitnessBreakdown {
        let rtp = stats.rtp();
        let hit_frequency = stats.hit_frequency();
        let bonus_frequency = stats.bonus_frequency();

        let rtp_delta = rel_delta(self.targets.rtp, rtp);
        let hit_delta = rel_delta(self.targets.hit_frequency, hit_frequency);
        let bonus_delta = rel_delta(self.targets.bonus_frequency, bonus_frequency);

        let symbol_rtp_error = if self.targets.symbol_rtp.is_empty() || stats.spin_count == 0 {
            0.0
        } else {
            let sum: f64 = self
                .targets
                .symbol_rtp
                .iter()
                .map(|(&symbol, &target)| rel_delta(target, stats.symbol_rtp(symbol)))
                .sum();
            sum / self.targets.symbol_rtp.len() as f64
        };

        FitnessBreakdown {
            total: rtp_delta
                + hit_delta
                + bonus_delta
                + self.targets.symbol_rtp_unevenness_weight * symbol_rtp_error,
            rtp_delta,
            hit_delta,
            bonus_delta,
            symbol_rtp_error,
            rtp,
            hit_frequency,
            bonus_frequency,
        }
    }
}
