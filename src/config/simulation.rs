use serde::{Deserialize, Serialize};

use super::traits::ConfigSection;
use crate::error::{ReelsmithError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Spins per fitness evaluation.
    pub spin_count: u64,
    /// Seed of the spin-index stream.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            spin_count: 1_000_000,
            seed: 1,
        }
    }
}

impl ConfigSection for SimulationConfig {
    fn section_name() -> &'static str {
        "simulation"
    }

    fn validate(&self) -> Result<()> {
        if self.spin_count == 0 {
            return Err(ReelsmithError::Configuration(
                "spin count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
