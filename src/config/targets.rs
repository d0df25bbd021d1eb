use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::parse_symbol_key;
use super::traits::ConfigSection;
use crate::engines::metrics::SimulationTargets;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetsConfig {
    pub rtp: f64,
    pub hit_frequency: f64,
    pub bonus_frequency: f64,
    pub symbol_rtp_unevenness_weight: f64,
    pub symbol_rtp: BTreeMap<String, f64>,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            rtp: 0.95,
            hit_frequency: 0.25,
            bonus_frequency: 0.01,
            symbol_rtp_unevenness_weight: 1.0,
            symbol_rtp: BTreeMap::new(),
        }
    }
}

impl TargetsConfig {
    pub fn build(&self) -> Result<SimulationTargets> {
        let mut symbol_rtp = BTreeMap::new();
        for (key, &target) in &self.symbol_rtp {
            symbol_rtp.insert(parse_symbol_key(key)?, target);
        }
        let targets = SimulationTargets {
            rtp: self.rtp,
            hit_frequency: self.hit_frequency,
            bonus_frequency: self.bonus_frequency,
            symbol_rtp,
            symbol_rtp_unevenness_weight: self.symbol_rtp_unevenness_weight,
        };
        targets.validate()?;
        Ok(targets)
    }
}

impl ConfigSection for TargetsConfig {
    fn section_name() -> &'static str {
        "targets"
    }

    fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_build() {
        assert!(TargetsConfig::default().build().is_ok());
    }

    #[test]
    fn out_of_range_frequency_is_rejected() {
        let config = TargetsConfig {
            hit_frequency: 1.2,
            ..Default::default()
        };
        assert!(config.build().is_err());
    }
}
