use serde::Serialize;
use tracing::debug;

use tidemark_core::{Observation, ResolvedConfig, ScoreRecord, TidemarkError};

use super::{ConformalScorer, SequentialDetector};
use crate::algorithms::nonconformity::MeanDeviation;
use crate::algorithms::pvalue::PValueComputer;

/// Spike verdict for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpikeOutcome {
    pub index: usize,
    /// Input value, echoed back for alignment checks.
    pub value: f64,
    pub score: ScoreRecord,
    pub is_spike: bool,
}

/// Flags single points in the extreme tail of the recent window.
///
/// Each point is judged on its own: `is_spike = p ≤ 1 - confidence`. A spike
/// stays in the window as an ordinary value until FIFO eviction, so it only
/// affects how later points are judged while it is still in the window.
#[derive(Debug, Clone)]
pub struct SpikeDetector {
    scorer: ConformalScorer<MeanDeviation>,
    level: f64,
}

impl SpikeDetector {
    pub fn new(config: &ResolvedConfig) -> Result<Self, TidemarkError> {
        Ok(Self {
            scorer: ConformalScorer::new(
                config.window_size,
                MeanDeviation,
                PValueComputer::new(config.pvalue_method),
            )?,
            level: config.spike_level(),
        })
    }

    /// P-values at or below this are spikes.
    pub fn level(&self) -> f64 {
        self.level
    }
}

impl SequentialDetector for SpikeDetector {
    type Outcome = SpikeOutcome;

    fn observe(&mut self, observation: &Observation) -> SpikeOutcome {
        let (score, is_spike) = match self.scorer.score_next(observation.value) {
            Some(score) => (score, score.pvalue <= self.level),
            None => (ScoreRecord::UNSCORED, false),
        };

        if is_spike {
            debug!(
                index = observation.index,
                value = observation.value,
                pvalue = score.pvalue,
                strangeness = score.strangeness,
                "spike detected"
            );
        }

        SpikeOutcome {
            index: observation.index,
            value: observation.value,
            score,
            is_spike,
        }
    }

    fn reset(&mut self) {
        self.scorer.clear();
    }
}
