//! Randomized constructive search turning a stack histogram into a strip.
//!
//! Specials are laid down first, each followed by a gap of non-special
//! stacks totalling `radius - 1` cells; the remaining stacks go into a
//! suffix. High stacks never touch each other and never open a gap. A gap
//! that cannot be filled aborts the attempt; attempts retry with fresh
//! Mulberry32 streams up to the attempt cap.

use std::collections::BTreeMap;

use super::rng::Mulberry32;
use super::stacks::{StackBuckets, SymbolClasses};
use crate::types::{Stack, Symbol};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

/// Sequencer for a single reel.
#[derive(Debug, Clone)]
pub struct ReelSequencer<'a> {
    classes: &'a SymbolClasses,
    radius: usize,
    max_attempts: u32,
}

impl<'a> ReelSequencer<'a> {
    /// `radius` is the spacing rule around specials; must be at least 1.
    pub fn new(classes: &'a SymbolClasses, radius: usize) -> Self {
        debug_assert!(radius >= 1);
        Self {
            classes,
            radius,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Build a strip for the histogram `rows` (ascending symbol order,
    /// counts indexed by stack length minus one). Returns `None` when no
    /// attempt produced a valid strip.
    pub fn sequence(&self, rows: &[(Symbol, &[u32])], seed: u32) -> Option<Vec<Symbol>> {
        for attempt in 0..self.max_attempts {
            if let Some(strip) = self.try_attempt(rows, seed, attempt) {
                return Some(strip);
            }
        }
        None
    }

    fn try_attempt(
        &self,
        rows: &[(Symbol, &[u32])],
        seed: u32,
        attempt: u32,
    ) -> Option<Vec<Symbol>> {
        let mut rng = Mulberry32::new(seed, attempt);
        let mut buckets = StackBuckets::from_rows(rows.iter().copied(), self.classes);
        let mut placed: Vec<Stack> = Vec::new();

        if buckets.specials.is_empty() {
            build_suffix(&mut placed, &mut buckets, false, &mut rng);
        } else {
            let specials = std::mem::take(&mut buckets.specials);
            for special in specials {
                placed.push(special);
                if !fill_gap(
                    &mut placed,
                    &mut buckets,
                    self.radius - 1,
                    false,
                    true,
                    &mut rng,
                ) {
                    return None;
                }
            }
            build_suffix(&mut placed, &mut buckets, true, &mut rng);
        }

        Some(expand(&placed))
    }
}

/// Depth-first gap fill. `g` counts remaining cells; recursion depth is
/// bounded by `radius - 1`.
fn fill_gap(
    out: &mut Vec<Stack>,
    buckets: &mut StackBuckets,
    g: usize,
    prev_was_high: bool,
    is_first: bool,
    rng: &mut Mulberry32,
) -> bool {
    if g == 0 {
        return true;
    }

    // (length, is_high) moves; lows fit any remaining length, highs must
    // leave room, may not open the gap and may not follow another high.
    let mut moves: Vec<(usize, bool)> = Vec::new();
    for ln in 1..=g {
        if StackBuckets::has_stock(&buckets.lows, ln) {
            moves.push((ln, false));
        }
        if ln < g && !is_first && !prev_was_high && StackBuckets::has_stock(&buckets.highs, ln) {
            moves.push((ln, true));
        }
    }
    if moves.is_empty() {
        return false;
    }

    let (ln, is_high) = moves[rng.pick(moves.len())];
    let bucket = if is_high {
        &mut buckets.highs
    } else {
        &mut buckets.lows
    };
    let stack = pop_random_from(bucket, ln, rng);
    out.push(stack);
    fill_gap(out, buckets, g - ln, is_high, false, rng)
}

/// Exhaust the remaining high and low stacks behind the last gap.
fn build_suffix(
    out: &mut Vec<Stack>,
    buckets: &mut StackBuckets,
    must_start_low: bool,
    rng: &mut Mulberry32,
) {
    let mut highs = StackBuckets::flatten(&buckets.highs);
    let mut lows = StackBuckets::flatten(&buckets.lows);
    buckets.highs.clear();
    buckets.lows.clear();

    let mut prev_was_high = false;
    if must_start_low && !lows.is_empty() {
        out.push(pop_random(&mut lows, rng));
    }

    while !highs.is_empty() || !lows.is_empty() {
        if prev_was_high && !lows.is_empty() {
            out.push(pop_random(&mut lows, rng));
            prev_was_high = false;
        } else if lows.is_empty() {
            out.push(pop_random(&mut highs, rng));
            prev_was_high = true;
        } else if highs.is_empty() {
            out.push(pop_random(&mut lows, rng));
            prev_was_high = false;
        } else if rng.next_f64() < 0.5 || highs.len() > lows.len() {
            out.push(pop_random(&mut highs, rng));
            prev_was_high = true;
        } else {
            out.push(pop_random(&mut lows, rng));
            prev_was_high = false;
        }
    }
}

fn pop_random(stacks: &mut Vec<Stack>, rng: &mut Mulberry32) -> Stack {
    let i = rng.pick(stacks.len());
    stacks.swap_remove(i)
}

fn pop_random_from(
    bucket: &mut BTreeMap<usize, Vec<Stack>>,
    length: usize,
    rng: &mut Mulberry32,
) -> Stack {
    let stacks = bucket.get_mut(&length).expect("move offered empty bucket");
    let i = rng.pick(stacks.len());
    stacks.swap_remove(i)
}

fn expand(stacks: &[Stack]) -> Vec<Symbol> {
    let total: usize = stacks.iter().map(|s| s.length).sum();
    let mut strip = Vec::with_capacity(total);
    for stack in stacks {
        strip.extend(std::iter::repeat(stack.symbol).take(stack.length));
    }
    strip
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn rows(histogram: &[(Symbol, Vec<u32>)]) -> Vec<(Symbol, &[u32])> {
        histogram.iter().map(|(s, c)| (*s, c.as_slice())).collect()
    }

    #[test]
    fn radius_one_places_specials_back_to_back() {
        let classes = SymbolClasses::new(HashSet::from([1]), HashSet::new());
        let histogram = vec![(1u32, vec![2u32]), (5u32, vec![1u32])];
        let sequencer = ReelSequencer::new(&classes, 1);
        let strip = sequencer.sequence(&rows(&histogram), 0).unwrap();
        assert_eq!(strip, vec![1, 1, 5]);
    }

    #[test]
    fn attempt_cap_bounds_the_search() {
        // One special wants a 3-cell gap, but no low stock exists at all.
        let classes = SymbolClasses::new(HashSet::from([1]), HashSet::new());
        let histogram = vec![(1u32, vec![1u32])];
        let sequencer = ReelSequencer::new(&classes, 4).with_max_attempts(5);
        assert!(sequencer.sequence(&rows(&histogram), 7).is_none());
    }

    #[test]
    fn specials_are_spaced_by_radius() {
        let classes = SymbolClasses::new(HashSet::from([1]), HashSet::new());
        let histogram = vec![(1u32, vec![2u32]), (5u32, vec![6u32])];
        let sequencer = ReelSequencer::new(&classes, 3);
        let strip = sequencer.sequence(&rows(&histogram), 11).unwrap();

        assert_eq!(strip.len(), 8);
        let positions: Vec<usize> = strip
            .iter()
            .enumerate()
            .filter(|(_, &s)| s == 1)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(positions.len(), 2);
        for w in 0..positions.len() {
            let a = positions[w];
            let b = positions[(w + 1) % positions.len()];
            let forward = (b + strip.len() - a) % strip.len();
            assert!(forward == 0 || forward > 2, "specials too close: {:?}", positions);
        }
    }

    #[test]
    fn same_seed_reproduces_the_strip() {
        let classes = SymbolClasses::new(HashSet::from([0]), HashSet::from([9]));
        let histogram = vec![
            (0u32, vec![1u32]),
            (5u32, vec![4u32, 1]),
            (9u32, vec![2u32]),
        ];
        let sequencer = ReelSequencer::new(&classes, 2);
        let a = sequencer.sequence(&rows(&histogram), 42).unwrap();
        let b = sequencer.sequence(&rows(&histogram), 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn strip_preserves_cell_totals_per_symbol() {
        let classes = SymbolClasses::new(HashSet::from([0]), HashSet::from([9]));
        let histogram = vec![
            (0u32, vec![1u32]),
            (5u32, vec![3u32, 2]),
            (9u32, vec![2u32]),
        ];
        let sequencer = ReelSequencer::new(&classes, 3);
        let strip = sequencer.sequence(&rows(&histogram), 3).unwrap();

        let count = |sym: Symbol| strip.iter().filter(|&&s| s == sym).count();
        assert_eq!(count(0), 1);
        assert_eq!(count(5), 3 + 2 * 2);
        assert_eq!(count(9), 2);
        assert_eq!(strip.len(), 1 + 7 + 2);
    }
}
