//! reelsmith — genetic search for slot reel strips.
//!
//! The crate evolves stack-count genomes: a genome names how many stacks
//! of each length a symbol contributes per reel, a sequencer turns it into
//! concrete strips under adjacency rules, a Monte-Carlo simulator measures
//! the strips against a paytable, and a fitness function compares the
//! measured RTP, hit frequency, bonus frequency and per-symbol RTP spread
//! with the operator's targets.

pub mod config;
pub mod engines;
pub mod error;
pub mod types;

pub use engines::evaluation::{Simulator, SpinEngine};
pub use engines::generation::{
    EvolutionEngine, GaConfig, Individual, ProgressSink, ReelLayout, SearchOutcome,
};
pub use engines::metrics::{FitnessBreakdown, SimulationTargets};
pub use engines::sequencing::{ReelSequencer, SymbolClasses};
pub use error::{ReelsmithError, Result};
pub use types::{SimulationStats, SlotMachineConfig, Symbol};

/// Simulate `spin_count` random spins of fixed reel strips.
///
/// The seed drives the spin-index stream; equal inputs reproduce equal
/// statistics.
pub fn run_simulation(
    reels: Vec<Vec<Symbol>>,
    spin_count: u64,
    seed: u64,
    slot: &SlotMachineConfig,
) -> Result<SimulationStats> {
    if spin_count == 0 {
        return Err(ReelsmithError::Configuration(
            "spin count must be positive".to_string(),
        ));
    }
    let engine = SpinEngine::new(reels, slot)?;
    let mut simulator = Simulator::new(engine, seed);
    Ok(simulator.run(spin_count))
}

/// Run the full genetic search and stream progress into `sink`.
#[allow(clippy::too_many_arguments)]
pub fn run_genetic_search(
    ga: GaConfig,
    layouts: Vec<ReelLayout>,
    classes: SymbolClasses,
    targets: SimulationTargets,
    spin_count: u64,
    slot: SlotMachineConfig,
    sink: &mut dyn ProgressSink,
) -> Result<SearchOutcome> {
    let mut engine = EvolutionEngine::new(ga, layouts, classes, targets, spin_count, slot)?;
    engine.run(sink)
}
