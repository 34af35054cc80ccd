use serde::Serialize;

use super::pvalue::MIN_PVALUE;

/// Snapshot of a martingale's state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MartingaleState {
    pub current_value: f64,
    pub epsilon: f64,
}

/// Power betting function `ε · p^(ε - 1)`.
pub fn power_bet(pvalue: f64, epsilon: f64) -> f64 {
    epsilon * pvalue.powf(epsilon - 1.0)
}

/// Power martingale over a stream of p-values.
///
/// `M_t = Π ε · p_i^(ε - 1)`, starting at 1. Under uniform p-values this is a
/// martingale with expectation 1; a run of small p-values makes it grow, and
/// by Ville's inequality `P(sup M_t ≥ c) ≤ 1/c` under the null.
///
/// The product is accumulated as `ln M` so it never overflows; the reported
/// value saturates at `f64::MAX`.
#[derive(Debug, Clone)]
pub struct PowerMartingale {
    epsilon: f64,
    log_value: f64,
    updates: u64,
}

impl PowerMartingale {
    pub fn new(epsilon: f64) -> Self {
        debug_assert!(
            epsilon > 0.0 && epsilon < 1.0,
            "epsilon must be in (0, 1), got {}",
            epsilon
        );
        Self {
            epsilon,
            log_value: 0.0,
            updates: 0,
        }
    }

    /// Bet on one p-value and return the new martingale value.
    pub fn update(&mut self, pvalue: f64) -> f64 {
        let p = if pvalue.is_nan() {
            1.0
        } else {
            pvalue.clamp(MIN_PVALUE, 1.0)
        };
        self.log_value += self.epsilon.ln() + (self.epsilon - 1.0) * p.ln();
        self.updates += 1;
        self.value()
    }

    pub fn value(&self) -> f64 {
        self.log_value.exp().min(f64::MAX)
    }

    pub fn log_value(&self) -> f64 {
        self.log_value
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of p-values consumed since the last reset.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn state(&self) -> MartingaleState {
        MartingaleState {
            current_value: self.value(),
            epsilon: self.epsilon,
        }
    }

    /// Start a new stream.
    pub fn reset(&mut self) {
        self.log_value = 0.0;
        self.updates = 0;
    }
}
