//! Symbol classes and stack bookkeeping for the sequencer.
//!
//! A stack-count histogram maps each symbol to counts per stack length:
//! index `i` holds the number of stacks of length `i + 1`. The sequencer
//! never looks at raw counts; it works on the bucketed stacks built here.

use std::collections::{BTreeMap, HashSet};

use crate::types::{Stack, Symbol};

/// Adjacency class of a symbol on the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    Special,
    High,
    Low,
}

/// Partition of the symbol space used by the adjacency rules.
///
/// Wild and scatter are both treated as special here; only the spin engine
/// tells them apart.
#[derive(Debug, Clone, Default)]
pub struct SymbolClasses {
    special: HashSet<Symbol>,
    high: HashSet<Symbol>,
}

impl SymbolClasses {
    pub fn new(special: HashSet<Symbol>, high: HashSet<Symbol>) -> Self {
        Self { special, high }
    }

    pub fn classify(&self, symbol: Symbol) -> SymbolClass {
        if self.special.contains(&symbol) {
            SymbolClass::Special
        } else if self.high.contains(&symbol) {
            SymbolClass::High
        } else {
            SymbolClass::Low
        }
    }

    pub fn is_special(&self, symbol: Symbol) -> bool {
        self.special.contains(&symbol)
    }

    pub fn is_high(&self, symbol: Symbol) -> bool {
        !self.is_special(symbol) && self.high.contains(&symbol)
    }
}

/// Stacks of one reel histogram, bucketed by adjacency class.
#[derive(Debug, Clone)]
pub struct StackBuckets {
    /// Special stacks in enumeration order (ascending symbol id).
    pub specials: Vec<Stack>,
    /// High stacks keyed by length.
    pub highs: BTreeMap<usize, Vec<Stack>>,
    /// Low stacks keyed by length.
    pub lows: BTreeMap<usize, Vec<Stack>>,
}

impl StackBuckets {
    /// Materialize buckets from histogram rows.
    ///
    /// Rows must come in ascending symbol order; the special pop order
    /// depends on it.
    pub fn from_rows<'a, I>(rows: I, classes: &SymbolClasses) -> Self
    where
        I: IntoIterator<Item = (Symbol, &'a [u32])>,
    {
        let mut buckets = Self {
            specials: Vec::new(),
            highs: BTreeMap::new(),
            lows: BTreeMap::new(),
        };
        for (symbol, counts) in rows {
            for (i, &count) in counts.iter().enumerate() {
                let length = i + 1;
                for _ in 0..count {
                    let stack = Stack::new(symbol, length);
                    match classes.classify(symbol) {
                        SymbolClass::Special => buckets.specials.push(stack),
                        SymbolClass::High => {
                            buckets.highs.entry(length).or_default().push(stack)
                        }
                        SymbolClass::Low => {
                            buckets.lows.entry(length).or_default().push(stack)
                        }
                    }
                }
            }
        }
        buckets
    }

    pub fn has_stock(bucket: &BTreeMap<usize, Vec<Stack>>, length: usize) -> bool {
        bucket.get(&length).is_some_and(|stacks| !stacks.is_empty())
    }

    /// Flatten a length-keyed bucket, ascending length then insertion order.
    pub fn flatten(bucket: &BTreeMap<usize, Vec<Stack>>) -> Vec<Stack> {
        bucket.values().flatten().copied().collect()
    }
}

/// Cyclic run-length encoding of a strip.
///
/// Wrap-around runs of the first symbol merge with the tail, so a strip
/// ending and starting with the same symbol reports one stack.
pub fn cyclic_stacks(strip: &[Symbol]) -> Vec<Stack> {
    if strip.is_empty() {
        return Vec::new();
    }
    let mut runs: Vec<Stack> = Vec::new();
    for &symbol in strip {
        match runs.last_mut() {
            Some(run) if run.symbol == symbol => run.length += 1,
            _ => runs.push(Stack::new(symbol, 1)),
        }
    }
    if runs.len() > 1 && runs[0].symbol == runs[runs.len() - 1].symbol {
        let tail = runs.pop().unwrap();
        runs[0].length += tail.length;
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> SymbolClasses {
        SymbolClasses::new(HashSet::from([1]), HashSet::from([7, 8]))
    }

    #[test]
    fn classify_partitions_symbols() {
        let classes = classes();
        assert_eq!(classes.classify(1), SymbolClass::Special);
        assert_eq!(classes.classify(7), SymbolClass::High);
        assert_eq!(classes.classify(5), SymbolClass::Low);
    }

    #[test]
    fn special_wins_over_high() {
        let classes = SymbolClasses::new(HashSet::from([7]), HashSet::from([7]));
        assert_eq!(classes.classify(7), SymbolClass::Special);
        assert!(!classes.is_high(7));
    }

    #[test]
    fn buckets_expand_counts_into_stacks() {
        let classes = classes();
        let rows: Vec<(Symbol, &[u32])> =
            vec![(1, &[2][..]), (5, &[1, 1][..]), (7, &[0, 2][..])];
        let buckets = StackBuckets::from_rows(rows, &classes);

        assert_eq!(buckets.specials, vec![Stack::new(1, 1), Stack::new(1, 1)]);
        assert_eq!(buckets.lows[&1], vec![Stack::new(5, 1)]);
        assert_eq!(buckets.lows[&2], vec![Stack::new(5, 2)]);
        assert_eq!(buckets.highs[&2], vec![Stack::new(7, 2), Stack::new(7, 2)]);
        assert!(!buckets.highs.contains_key(&1));
    }

    #[test]
    fn flatten_orders_by_length_then_insertion() {
        let classes = classes();
        let rows: Vec<(Symbol, &[u32])> = vec![(7, &[1, 1][..]), (8, &[1][..])];
        let buckets = StackBuckets::from_rows(rows, &classes);
        let flat = StackBuckets::flatten(&buckets.highs);
        assert_eq!(
            flat,
            vec![Stack::new(7, 1), Stack::new(8, 1), Stack::new(7, 2)]
        );
    }

    #[test]
    fn cyclic_rle_merges_wraparound() {
        assert_eq!(
            cyclic_stacks(&[3, 5, 5, 3]),
            vec![Stack::new(3, 2), Stack::new(5, 2)]
        );
        assert_eq!(cyclic_stacks(&[4, 4, 4]), vec![Stack::new(4, 3)]);
        assert!(cyclic_stacks(&[]).is_empty());
    }
}
