pub mod simulator;
pub mod spin_engine;

pub use simulator::Simulator;
pub use spin_engine::{SpinEngine, SpinOutcome};
