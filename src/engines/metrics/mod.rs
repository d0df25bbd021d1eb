pub mod fitness;

pub use fitness::{rel_delta, FitnessBreakdown, FitnessEvaluator, SimulationTargets};
