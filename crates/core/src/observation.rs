use serde::{Deserialize, Serialize};

/// One input row. `index` is the arrival position and fixes the windowing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub label: String,
    pub value: f64,
    pub index: usize,
}

impl Observation {
    pub fn new(label: impl Into<String>, value: f64, index: usize) -> Self {
        Self {
            label: label.into(),
            value,
            index,
        }
    }

    /// Build a sequence from bare values, labelling each row with its index.
    pub fn from_values(values: &[f64]) -> Vec<Observation> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Observation::new(i.to_string(), v, i))
            .collect()
    }
}

/// Strangeness and p-value for one observation, as seen by one detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub strangeness: f64,
    pub pvalue: f64,
}

impl ScoreRecord {
    /// Record used when there is no history to compare against.
    pub const UNSCORED: ScoreRecord = ScoreRecord {
        strangeness: 0.0,
        pvalue: 1.0,
    };
}

/// Merged verdict of both detectors for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub index: usize,
    pub is_spike: bool,
    pub is_change: bool,
    /// P-value from the spike detector.
    pub pvalue: f64,
    pub martingale_value: f64,
}

/// Observation plus its alert, in the shape handed to report writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub label: String,
    pub value: f64,
    pub is_spike: bool,
    pub is_change: bool,
    pub pvalue: f64,
    pub martingale_value: f64,
}

impl ReportRow {
    pub fn new(observation: &Observation, alert: &Alert) -> Self {
        Self {
            label: observation.label.clone(),
            value: observation.value,
            is_spike: alert.is_spike,
            is_change: alert.is_change,
            pvalue: alert.pvalue,
            martingale_value: alert.martingale_value,
        }
    }
}
