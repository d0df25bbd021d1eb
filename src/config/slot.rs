use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::parse_symbol_key;
use super::traits::ConfigSection;
use crate::engines::sequencing::SymbolClasses;
use crate::error::Result;
use crate::types::{SlotMachineConfig, Symbol};

/// Machine definition as it appears in the config file. TOML map keys are
/// strings, so symbol-keyed tables use string keys here and are parsed
/// into numeric ids by [`SlotConfig::build`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotConfig {
    pub window: Vec<usize>,
    pub wild: Vec<Symbol>,
    pub scatter: Vec<Symbol>,
    /// Symbols the sequencer treats as high-class.
    pub high_symbols: Vec<Symbol>,
    pub lines: Vec<Vec<usize>>,
    pub paytable: BTreeMap<String, Vec<u64>>,
}

impl Default for SlotConfig {
    fn default() -> Self {
        // Small three-reel machine: symbol 0 wild, 1 scatter, 7 and 8 high.
        Self {
            window: vec![3, 3, 3],
            wild: vec![0],
            scatter: vec![1],
            high_symbols: vec![7, 8],
            lines: vec![vec![0, 0, 0], vec![1, 1, 1], vec![2, 2, 2]],
            paytable: BTreeMap::from([
                ("7".to_string(), vec![0, 10, 50]),
                ("8".to_string(), vec![0, 5, 25]),
                ("4".to_string(), vec![0, 2, 10]),
                ("5".to_string(), vec![0, 1, 5]),
            ]),
        }
    }
}

impl SlotConfig {
    pub fn build(&self) -> Result<SlotMachineConfig> {
        let mut paytable = std::collections::HashMap::new();
        for (key, payouts) in &self.paytable {
            paytable.insert(parse_symbol_key(key)?, payouts.clone());
        }
        let config = SlotMachineConfig {
            window: self.window.clone(),
            wild: self.wild.iter().copied().collect(),
            scatter: self.scatter.iter().copied().collect(),
            paytable,
            lines: self.lines.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Adjacency classes for the sequencer: wild and scatter are special,
    /// the configured high symbols are high, the rest is low.
    pub fn symbol_classes(&self) -> SymbolClasses {
        let special: std::collections::HashSet<Symbol> = self
            .wild
            .iter()
            .chain(self.scatter.iter())
            .copied()
            .collect();
        let high = self.high_symbols.iter().copied().collect();
        SymbolClasses::new(special, high)
    }
}

impl ConfigSection for SlotConfig {
    fn section_name() -> &'static str {
        "slot"
    }

    fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        let config = SlotConfig::default();
        let machine = config.build().unwrap();
        assert_eq!(machine.reel_count(), 3);
        assert!(machine.paytable.contains_key(&7));
    }

    #[test]
    fn bad_symbol_key_is_rejected() {
        let mut config = SlotConfig::default();
        config.paytable.insert("seven".to_string(), vec![1]);
        assert!(config.build().is_err());
    }

    #[test]
    fn classes_mark_wild_and_scatter_special() {
        let classes = SlotConfig::default().symbol_classes();
        assert!(classes.is_special(0));
        assert!(classes.is_special(1));
        assert!(classes.is_high(7));
        assert!(!classes.is_high(4));
    }
}
