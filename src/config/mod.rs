pub mod evolution;
pub mod manager;
pub mod reels;
pub mod simulation;
pub mod slot;
pub mod targets;
pub mod traits;

pub use evolution::EvolutionConfig;
pub use manager::{AppConfig, ConfigManager};
pub use reels::{ReelBoxConfig, ReelsConfig};
pub use simulation::SimulationConfig;
pub use slot::SlotConfig;
pub use targets::TargetsConfig;

use crate::error::{ReelsmithError, Result};
use crate::types::Symbol;

/// TOML map keys are strings; symbol-keyed tables parse back to ids here.
pub(crate) fn parse_symbol_key(key: &str) -> Result<Symbol> {
    key.parse().map_err(|_| {
        ReelsmithError::Configuration(format!("'{}' is not a symbol id", key))
    })
}
