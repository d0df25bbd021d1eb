pub mod rng;
pub mod sequencer;
pub mod stacks;

pub use rng::Mulberry32;
pub use sequencer::{ReelSequencer, DEFAULT_MAX_ATTEMPTS};
pub use stacks::{cyclic_stacks, StackBuckets, SymbolClass, SymbolClasses};
