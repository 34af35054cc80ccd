pub mod algorithms;
pub mod detectors;
pub mod pipeline;

pub use algorithms::history::HistoryBuffer;
pub use algorithms::martingale::{MartingaleState, PowerMartingale};
pub use algorithms::nonconformity::{MeanDeviation, NonconformityMeasure, SustainedDeviation};
pub use algorithms::pvalue::PValueComputer;
pub use detectors::{
    ChangeOutcome, ChangePointDetector, SequentialDetector, SpikeDetector, SpikeOutcome,
};
pub use pipeline::{detect, summarize, Pipeline, RunSummary};
