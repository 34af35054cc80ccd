//! Pipeline driver.
//!
//! Runs the spike and change-point detectors over the same observations,
//! each with its own history window, and merges their outcomes by index:
//!
//! - spike pass:  MeanDeviation → p-value → tail rule
//! - change pass: SustainedDeviation → p-value → power martingale → threshold
//!
//! The passes share nothing but the read-only input, so they run on two
//! rayon workers and meet again at the merge.

pub mod summary;

use std::time::Instant;

use tracing::{debug, info, warn};

use tidemark_core::{
    Alert, DetectionConfig, Observation, ReportRow, ResolvedConfig, TidemarkError,
};

use crate::detectors::{
    ChangeOutcome, ChangePointDetector, SequentialDetector, SpikeDetector, SpikeOutcome,
};

pub use self::summary::{summarize, RunSummary};

/// Both detectors plus the merge step, for one resolved configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: ResolvedConfig,
}

impl Pipeline {
    pub fn new(config: ResolvedConfig) -> Self {
        Self { config }
    }

    /// Resolve `config` for a series of `total_count` points.
    pub fn for_series(config: &DetectionConfig, total_count: usize) -> Result<Self, TidemarkError> {
        Ok(Self::new(config.resolve(total_count)?))
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Score every observation. Returns one alert per observation, in input
    /// order, or an error and no alerts at all.
    pub fn run(&self, observations: &[Observation]) -> Result<Vec<Alert>, TidemarkError> {
        validate_inputs(observations)?;

        // Both constructors validate the window before any scoring starts.
        let mut spikes = SpikeDetector::new(&self.config)?;
        let mut changes = ChangePointDetector::new(&self.config)?;

        if observations.is_empty() {
            warn!("empty series, nothing to score");
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let (spike_out, change_out) = rayon::join(
            || spikes.run(observations),
            || changes.run(observations),
        );

        let alerts = merge(observations, &spike_out, &change_out)?;

        info!(
            observations = observations.len(),
            window = self.config.window_size,
            spikes = spike_out.iter().filter(|o| o.is_spike).count(),
            changes = change_out.iter().filter(|o| o.is_change).count(),
            change_onset = ?changes.onset(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "detection complete"
        );

        Ok(alerts)
    }

    /// [`Pipeline::run`], with each alert joined to its observation.
    pub fn run_report(&self, observations: &[Observation]) -> Result<Vec<ReportRow>, TidemarkError> {
        let alerts = self.run(observations)?;
        Ok(observations
            .iter()
            .zip(alerts.iter())
            .map(|(o, a)| ReportRow::new(o, a))
            .collect())
    }
}

/// Resolve `config` against the series length and run the full pipeline.
pub fn detect(
    observations: &[Observation],
    config: &DetectionConfig,
) -> Result<Vec<ReportRow>, TidemarkError> {
    Pipeline::for_series(config, observations.len())?.run_report(observations)
}

fn validate_inputs(observations: &[Observation]) -> Result<(), TidemarkError> {
    for (row, obs) in observations.iter().enumerate() {
        if !obs.value.is_finite() {
            return Err(TidemarkError::input_format(
                row + 1,
                format!("value for '{}' is not a finite number", obs.label),
            ));
        }
    }
    Ok(())
}

/// Join the two outcome streams position by position.
///
/// Every stream must have one outcome per observation, carrying the same
/// index and value. Anything else is a bug in a detector and aborts.
fn merge(
    observations: &[Observation],
    spikes: &[SpikeOutcome],
    changes: &[ChangeOutcome],
) -> Result<Vec<Alert>, TidemarkError> {
    if spikes.len() != observations.len() || changes.len() != observations.len() {
        return Err(TidemarkError::SequenceMismatch(format!(
            "expected {} outcomes, spike detector produced {}, change-point detector produced {}",
            observations.len(),
            spikes.len(),
            changes.len()
        )));
    }

    let mut alerts = Vec::with_capacity(observations.len());
    for ((obs, spike), change) in observations.iter().zip(spikes).zip(changes) {
        for (detector, index, value) in [
            ("spike", spike.index, spike.value),
            ("change-point", change.index, change.value),
        ] {
            if index != obs.index || value.to_bits() != obs.value.to_bits() {
                return Err(TidemarkError::SequenceMismatch(format!(
                    "{} detector returned index {} (value {}) for observation {} (value {})",
                    detector, index, value, obs.index, obs.value
                )));
            }
        }

        alerts.push(Alert {
            index: obs.index,
            is_spike: spike.is_spike,
            is_change: change.is_change,
            pvalue: spike.score.pvalue,
            martingale_value: change.martingale_value,
        });
    }

    debug!(alerts = alerts.len(), "merged detector outcomes");
    Ok(alerts)
}
