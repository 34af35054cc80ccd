//! Sequential detectors.
//!
//! Both detectors follow the same per-observation cycle: snapshot the history
//! window, score the candidate against it, then push the candidate. The
//! shared part lives in [`ConformalScorer`].

pub mod changepoint;
pub mod spike;

pub use changepoint::{ChangeOutcome, ChangePointDetector};
pub use spike::{SpikeDetector, SpikeOutcome};

use tidemark_core::{Observation, ScoreRecord, TidemarkError};

use crate::algorithms::history::HistoryBuffer;
use crate::algorithms::nonconformity::NonconformityMeasure;
use crate::algorithms::pvalue::PValueComputer;

/// A single-pass detector producing one outcome per observation.
pub trait SequentialDetector: Send {
    type Outcome: Send;

    /// Score one observation. Observations must arrive in index order.
    fn observe(&mut self, observation: &Observation) -> Self::Outcome;

    /// Forget all state, as if a new stream had started.
    fn reset(&mut self);

    /// Score a whole sequence in order.
    fn run(&mut self, observations: &[Observation]) -> Vec<Self::Outcome> {
        observations.iter().map(|o| self.observe(o)).collect()
    }
}

/// History window + nonconformity measure + p-value computer.
#[derive(Debug, Clone)]
pub struct ConformalScorer<M> {
    history: HistoryBuffer,
    measure: M,
    pvalues: PValueComputer,
}

impl<M: NonconformityMeasure> ConformalScorer<M> {
    pub fn new(window_size: usize, measure: M, pvalues: PValueComputer) -> Result<Self, TidemarkError> {
        Ok(Self {
            history: HistoryBuffer::new(window_size)?,
            measure,
            pvalues,
        })
    }

    /// Score `value` against the current window, then push it.
    ///
    /// Returns `None` when the window was empty: there is no evidence either
    /// way and callers must not flag the point.
    pub fn score_next(&mut self, value: f64) -> Option<ScoreRecord> {
        let record = if self.history.is_empty() {
            None
        } else {
            let eval = self.measure.evaluate(value, self.history.snapshot());
            let pvalue = self
                .pvalues
                .p_value(eval.strangeness, &eval.references, eval.magnitude);
            Some(ScoreRecord {
                strangeness: eval.strangeness,
                pvalue,
            })
        };
        self.history.push(value);
        record
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}
