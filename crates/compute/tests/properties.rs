//! Property-based invariants of the detection pipeline.
//!
//! 1. One output row per input row, labels and values in input order.
//! 2. P-values in (0, 1].
//! 3. Martingale values finite and non-negative.
//! 4. Determinism: same input + config → same output.
//! 5. Constant input never alerts.
//! 6. The first row is always neutral.
//! 7. Adding a constant to the series leaves every flag unchanged.

use proptest::prelude::*;
use tidemark_compute::detect;
use tidemark_core::{DetectionConfig, Observation, PValueMethod};

// ── Strategies ────────────────────────────────────────────────────────────

fn series_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e6f64..1.0e6, 1..120)
}

fn config_strategy() -> impl Strategy<Value = DetectionConfig> {
    (
        prop::option::of(1usize..=30), // window_size
        0.5f64..0.999,                 // confidence
        0.05f64..0.99,                 // martingale_epsilon
        prop::bool::ANY,               // rank vs smoothed
        1usize..=4,                    // run_length
    )
        .prop_map(|(window_size, confidence, eps, rank, run_length)| DetectionConfig {
            window_size,
            confidence,
            martingale_epsilon: eps,
            pvalue_method: if rank {
                PValueMethod::Rank
            } else {
                PValueMethod::Smoothed
            },
            run_length,
        })
}

/// Half-integer values, so shifted series are represented exactly and the
/// only arithmetic difference between the two runs is in divisions.
fn grid_series_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((-200i32..200).prop_map(|v| v as f64 * 0.5), 1..80)
}

// ── Properties ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn output_matches_input_order(values in series_strategy(), config in config_strategy()) {
        let obs = Observation::from_values(&values);
        let rows = detect(&obs, &config).unwrap();
        prop_assert_eq!(rows.len(), obs.len());
        for (row, o) in rows.iter().zip(&obs) {
            prop_assert_eq!(&row.label, &o.label);
            prop_assert_eq!(row.value.to_bits(), o.value.to_bits());
        }
    }

    #[test]
    fn scores_stay_in_range(values in series_strategy(), config in config_strategy()) {
        let rows = detect(&Observation::from_values(&values), &config).unwrap();
        for row in &rows {
            prop_assert!(row.pvalue > 0.0 && row.pvalue <= 1.0, "pvalue {}", row.pvalue);
            prop_assert!(row.martingale_value.is_finite());
            prop_assert!(row.martingale_value >= 0.0);
        }
    }

    #[test]
    fn detection_is_deterministic(values in series_strategy(), config in config_strategy()) {
        let obs = Observation::from_values(&values);
        let a = detect(&obs, &config).unwrap();
        let b = detect(&obs, &config).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn constant_input_never_alerts(
        value in -1.0e6f64..1.0e6,
        len in 1usize..80,
        config in config_strategy(),
    ) {
        let rows = detect(&Observation::from_values(&vec![value; len]), &config).unwrap();
        for row in &rows {
            prop_assert!(!row.is_spike);
            prop_assert!(!row.is_change);
        }
    }

    #[test]
    fn first_row_is_neutral(values in series_strategy(), config in config_strategy()) {
        let rows = detect(&Observation::from_values(&values), &config).unwrap();
        let first = &rows[0];
        prop_assert_eq!(first.pvalue, 1.0);
        prop_assert_eq!(first.martingale_value, 1.0);
        prop_assert!(!first.is_spike && !first.is_change);
    }

    #[test]
    fn flags_ignore_constant_offset(
        values in grid_series_strategy(),
        offset in (-2000i32..2000).prop_map(f64::from),
        config in config_strategy(),
    ) {
        let shifted: Vec<f64> = values.iter().map(|v| v + offset).collect();
        let a = detect(&Observation::from_values(&values), &config).unwrap();
        let b = detect(&Observation::from_values(&shifted), &config).unwrap();
        for (i, (x, y)) in a.iter().zip(&b).enumerate() {
            prop_assert_eq!(x.is_spike, y.is_spike, "row {}", i);
            prop_assert_eq!(x.is_change, y.is_change, "row {}", i);
        }
    }
}
