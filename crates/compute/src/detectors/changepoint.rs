use serde::Serialize;
use tracing::debug;

use tidemark_core::{Observation, ResolvedConfig, ScoreRecord, TidemarkError};

use super::{ConformalScorer, SequentialDetector};
use crate::algorithms::martingale::{MartingaleState, PowerMartingale};
use crate::algorithms::nonconformity::SustainedDeviation;
use crate::algorithms::pvalue::PValueComputer;

/// Change-point verdict for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChangeOutcome {
    pub index: usize,
    /// Input value, echoed back for alignment checks.
    pub value: f64,
    pub score: ScoreRecord,
    pub martingale_value: f64,
    pub is_change: bool,
}

/// Flags persistent regime changes with a power martingale test.
///
/// Every scored p-value is bet on; `is_change = M ≥ 1 / (1 - confidence)`.
/// The martingale is never reset after a detection, so once a change has
/// been found the detector stays elevated. Call
/// [`SequentialDetector::reset`] to re-arm it for a new stream.
#[derive(Debug, Clone)]
pub struct ChangePointDetector {
    scorer: ConformalScorer<SustainedDeviation>,
    martingale: PowerMartingale,
    threshold: f64,
    onset: Option<usize>,
}

impl ChangePointDetector {
    pub fn new(config: &ResolvedConfig) -> Result<Self, TidemarkError> {
        Ok(Self {
            scorer: ConformalScorer::new(
                config.window_size,
                SustainedDeviation::new(config.run_length),
                PValueComputer::new(config.pvalue_method),
            )?,
            martingale: PowerMartingale::new(config.martingale_epsilon),
            threshold: config.change_threshold(),
            onset: None,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn martingale(&self) -> MartingaleState {
        self.martingale.state()
    }

    /// Index of the first observation flagged since the last reset.
    pub fn onset(&self) -> Option<usize> {
        self.onset
    }
}

impl SequentialDetector for ChangePointDetector {
    type Outcome = ChangeOutcome;

    fn observe(&mut self, observation: &Observation) -> ChangeOutcome {
        let (score, is_change) = match self.scorer.score_next(observation.value) {
            Some(score) => {
                let m = self.martingale.update(score.pvalue);
                (score, m >= self.threshold)
            }
            None => (ScoreRecord::UNSCORED, false),
        };
        let martingale_value = self.martingale.value();

        if is_change && self.onset.is_none() {
            self.onset = Some(observation.index);
            debug!(
                index = observation.index,
                value = observation.value,
                martingale = martingale_value,
                threshold = self.threshold,
                "change-point onset"
            );
        }

        ChangeOutcome {
            index: observation.index,
            value: observation.value,
            score,
            martingale_value,
            is_change,
        }
    }

    fn reset(&mut self) {
        self.scorer.clear();
        self.martingale.reset();
        self.onset = None;
    }
}
