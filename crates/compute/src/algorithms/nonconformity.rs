//! Nonconformity measures.
//!
//! A measure scores a candidate value against the history window and also
//! scores the window's own baseline leave-one-out, so the p-value computer
//! can rank the candidate against scores produced the same way.

/// Output of a nonconformity measure for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Strangeness of the candidate. 0 when there is nothing to compare against.
    pub strangeness: f64,
    /// Leave-one-out strangeness of each baseline element.
    pub references: Vec<f64>,
    /// Mean absolute value of the history. Sets the rounding tolerance for
    /// ties; it never enters a score.
    pub magnitude: f64,
}

impl Evaluation {
    fn unmeasurable(history: &[f64]) -> Self {
        Self {
            strangeness: 0.0,
            references: Vec::new(),
            magnitude: mean_abs(history),
        }
    }
}

/// Maps a candidate value and a history snapshot to a strangeness score.
pub trait NonconformityMeasure: Send + Sync {
    fn evaluate(&self, candidate: f64, history: &[f64]) -> Evaluation;
}

/// `|v - mean(H)|`. Used by the spike detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanDeviation;

impl NonconformityMeasure for MeanDeviation {
    fn evaluate(&self, candidate: f64, history: &[f64]) -> Evaluation {
        let Some(center) = mean(history) else {
            return Evaluation::unmeasurable(history);
        };
        Evaluation {
            strangeness: (candidate - center).abs(),
            references: leave_one_out_deviations(history),
            magnitude: mean_abs(history),
        }
    }
}

/// Deviation of a run of consecutive points from the baseline before them.
///
/// The run is the last `run_length - 1` history values plus the candidate;
/// the baseline is the rest of the history. Strangeness is the smallest
/// `|x - mean(baseline)|` over the run, so it is large only when every point
/// of the run has left the baseline level. A lone excursion scores near 0
/// both when it arrives and while it sits at the head of the run.
///
/// With `run_length == 1` this is [`MeanDeviation`].
#[derive(Debug, Clone, Copy)]
pub struct SustainedDeviation {
    run_length: usize,
}

impl SustainedDeviation {
    pub fn new(run_length: usize) -> Self {
        Self {
            run_length: run_length.max(1),
        }
    }

    pub fn run_length(&self) -> usize {
        self.run_length
    }
}

impl NonconformityMeasure for SustainedDeviation {
    fn evaluate(&self, candidate: f64, history: &[f64]) -> Evaluation {
        let lead = self.run_length - 1;
        if history.len() <= lead {
            return Evaluation::unmeasurable(history);
        }
        let (baseline, run) = history.split_at(history.len() - lead);
        let Some(center) = mean(baseline) else {
            return Evaluation::unmeasurable(history);
        };

        let strangeness = run
            .iter()
            .chain(std::iter::once(&candidate))
            .map(|x| (x - center).abs())
            .fold(f64::INFINITY, f64::min);

        Evaluation {
            strangeness,
            references: leave_one_out_deviations(baseline),
            magnitude: mean_abs(history),
        }
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn mean_abs(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64
}

/// `|h_i - mean(H \ {h_i})|` for every element. A lone element scores 0.
pub(crate) fn leave_one_out_deviations(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n < 2 {
        return vec![0.0; n];
    }
    let total: f64 = values.iter().sum();
    let rest = (n - 1) as f64;
    values
        .iter()
        .map(|&h| (h - (total - h) / rest).abs())
        .collect()
}
