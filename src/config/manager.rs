use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::{
    evolution::EvolutionConfig, reels::ReelsConfig, simulation::SimulationConfig,
    slot::SlotConfig, targets::TargetsConfig, traits::ConfigSection,
};
use crate::error::{ReelsmithError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub simulation: SimulationConfig,
    pub slot: SlotConfig,
    pub reels: ReelsConfig,
    pub targets: TargetsConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.evolution.validate()?;
        self.simulation.validate()?;
        self.slot.validate()?;
        self.reels.validate()?;
        self.targets.validate()?;
        if self.reels.reels.len() != self.slot.window.len() {
            return Err(ReelsmithError::Configuration(format!(
                "{} reel gene boxes configured for a {}-reel machine",
                self.reels.reels.len(),
                self.slot.window.len()
            )));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Wrap an already-assembled config, rejecting it if invalid.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// Read, parse and validate a TOML search config; the shared config
    /// is only replaced once the whole file checks out.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ReelsmithError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;

        let loaded: AppConfig = toml::from_str(&contents).map_err(|e| {
            ReelsmithError::Configuration(format!(
                "{} is not a valid search config: {}",
                path.display(),
                e
            ))
        })?;
        loaded.validate()?;

        log::info!(
            "loaded search config from {} ({} reels, population {})",
            path.display(),
            loaded.reels.reels.len(),
            loaded.evolution.population_size
        );
        *self.config.write().unwrap() = loaded;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let rendered = toml::to_string_pretty(&self.get()).map_err(|e| {
            ReelsmithError::Configuration(format!("config does not render to TOML: {}", e))
        })?;
        std::fs::write(path, rendered).map_err(|e| {
            ReelsmithError::Configuration(format!("cannot write {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap().clone()
    }

    /// Apply an edit to a staged copy; the shared config is untouched
    /// unless the edited copy still validates.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut staged = self.get();
        f(&mut staged);
        staged.validate()?;
        *self.config.write().unwrap() = staged;
        Ok(())
    }
}
