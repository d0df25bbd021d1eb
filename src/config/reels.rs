use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::parse_symbol_key;
use super::traits::ConfigSection;
use crate::engines::generation::ReelLayout;
use crate::error::{ReelsmithError, Result};

/// Gene box of one reel: per-symbol low/high stack-count bounds, plus the
/// sequencing radius and seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelBoxConfig {
    pub radius: usize,
    pub seed: u32,
    pub low: BTreeMap<String, Vec<u32>>,
    pub high: BTreeMap<String, Vec<u32>>,
}

impl ReelBoxConfig {
    pub fn build(&self) -> Result<ReelLayout> {
        if self.low.len() != self.high.len()
            || self.low.keys().any(|k| !self.high.contains_key(k))
        {
            return Err(ReelsmithError::Configuration(
                "reel gene box lists different symbols in low and high".to_string(),
            ));
        }
        let mut rows = Vec::with_capacity(self.low.len());
        for (key, low) in &self.low {
            let symbol = parse_symbol_key(key)?;
            rows.push((symbol, low.clone(), self.high[key].clone()));
        }
        ReelLayout::new(self.radius, self.seed, rows)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelsConfig {
    pub reels: Vec<ReelBoxConfig>,
}

impl Default for ReelsConfig {
    fn default() -> Self {
        let reel = ReelBoxConfig {
            radius: 2,
            seed: 1,
            low: BTreeMap::from([
                ("4".to_string(), vec![2, 0]),
                ("5".to_string(), vec![2, 0]),
                ("7".to_string(), vec![0]),
                ("8".to_string(), vec![0]),
                ("0".to_string(), vec![0]),
                ("1".to_string(), vec![1]),
            ]),
            high: BTreeMap::from([
                ("4".to_string(), vec![6, 2]),
                ("5".to_string(), vec![6, 2]),
                ("7".to_string(), vec![3]),
                ("8".to_string(), vec![3]),
                ("0".to_string(), vec![1]),
                ("1".to_string(), vec![1]),
            ]),
        };
        Self {
            reels: vec![reel.clone(), reel.clone(), reel],
        }
    }
}

impl ReelsConfig {
    pub fn build(&self) -> Result<Vec<ReelLayout>> {
        self.reels.iter().map(ReelBoxConfig::build).collect()
    }
}

impl ConfigSection for ReelsConfig {
    fn section_name() -> &'static str {
        "reels"
    }

    fn validate(&self) -> Result<()> {
        if self.reels.is_empty() {
            return Err(ReelsmithError::Configuration(
                "at least one reel gene box is required".to_string(),
            ));
        }
        self.build().map(|_| ())
    }
}
