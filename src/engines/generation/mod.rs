pub mod evolution_engine;
pub mod genome;
pub mod operators;
pub mod progress;

pub use evolution_engine::{
    EvolutionEngine, GaConfig, SearchOutcome, MAX_SEQUENCE_RETRIES,
};
pub use genome::{Evaluation, Individual, ReelLayout};
pub use progress::{ChannelSink, NullSink, ProgressSink, WriterSink};
