mod pair_writer;

pub use pair_writer::PairWriter;

use crate::degradation::TrainingPair;
use crate::error::Result;

/// Trait for training pair destinations
pub trait OutputSink {
    /// Persist one (input, label) pair under `name`
    fn write_pair(&mut self, name: &str, pair: &TrainingPair) -> Result<()>;
}
