use serde::Serialize;

use tidemark_core::ReportRow;

/// Counts over a finished report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunSummary {
    pub observations: usize,
    pub spikes: usize,
    pub changes: usize,
    /// Position of the first row flagged as a change-point.
    pub first_change: Option<usize>,
}

pub fn summarize(rows: &[ReportRow]) -> RunSummary {
    RunSummary {
        observations: rows.len(),
        spikes: rows.iter().filter(|r| r.is_spike).count(),
        changes: rows.iter().filter(|r| r.is_change).count(),
        first_change: rows.iter().position(|r| r.is_change),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(is_spike: bool, is_change: bool) -> ReportRow {
        ReportRow {
            label: String::new(),
            value: 0.0,
            is_spike,
            is_change,
            pvalue: 1.0,
            martingale_value: 1.0,
        }
    }

    #[test]
    fn empty_report() {
        assert_eq!(summarize(&[]), RunSummary::default());
    }

    #[test]
    fn counts_flags() {
        let rows = vec![
            row(false, false),
            row(true, false),
            row(false, true),
            row(true, true),
        ];
        let s = summarize(&rows);
        assert_eq!(s.observations, 4);
        assert_eq!(s.spikes, 2);
        assert_eq!(s.changes, 2);
        assert_eq!(s.first_change, Some(2));
    }
}
