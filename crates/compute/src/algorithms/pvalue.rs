//! Strangeness → p-value.
//!
//! Both methods rank the candidate's strangeness `s` against the reference
//! scores `R` of the window (`n = |R|`), counting ties fully:
//!
//! - `Rank`:     `(#{r > s} + θ·#{r == s} + 1) / (n + 1)`, θ = 1
//! - `Smoothed`: `max(Rank, (#{r >= s} + Σ_{r < s} Φ̄((s - r) / h)) / n)`
//!
//! `Rank` is the conformal p-value; it cannot go below `1 / (n + 1)`.
//! `Smoothed` never reports less than `Rank`, so it keeps the rank rule's
//! validity under exchangeable input. The one exception is a flat window
//! (every reference score is 0): nothing in it ever deviated, so a candidate
//! that does deviate gets [`MIN_PVALUE`]. Both methods return exactly 1 when
//! no reference lies below `s`, and 1 when there are no references at all.

use tidemark_core::PValueMethod;

/// Weight of a tied reference score. 1.0 counts ties as "at least as strange".
pub const TIE_WEIGHT: f64 = 1.0;

/// Smallest p-value ever reported. Keeps `ln(p)` finite.
pub const MIN_PVALUE: f64 = f64::MIN_POSITIVE;

/// Rounding allowance, in units of `n · ε · magnitude`. Scores closer than
/// that are ties: a sum of `n` window values is only exact to about
/// `n · ε` of its magnitude, so smaller differences are arithmetic noise.
const ROUNDING_ULPS: f64 = 8.0;

/// References needed before a flat window counts as evidence.
const MIN_FLAT_REFERENCES: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct PValueComputer {
    method: PValueMethod,
}

impl PValueComputer {
    pub fn new(method: PValueMethod) -> Self {
        Self { method }
    }

    /// P-value of `strangeness` against `references`. Always in `(0, 1]`.
    ///
    /// `magnitude` is the mean absolute value of the window; it only sets the
    /// rounding tolerance for ties, never a score or a bandwidth.
    pub fn p_value(&self, strangeness: f64, references: &[f64], magnitude: f64) -> f64 {
        if references.is_empty() || !strangeness.is_finite() {
            return 1.0;
        }
        let tolerance = tie_tolerance(references.len() + 1, magnitude);
        let rank = rank_p_value(strangeness, references, tolerance);
        let p = match self.method {
            PValueMethod::Rank => rank,
            PValueMethod::Smoothed => {
                if is_flat(references, tolerance) {
                    if strangeness > tolerance {
                        MIN_PVALUE
                    } else {
                        1.0
                    }
                } else {
                    rank.max(kernel_p_value(strangeness, references, tolerance))
                }
            }
        };
        p.clamp(MIN_PVALUE, 1.0)
    }
}

fn tie_tolerance(window_len: usize, magnitude: f64) -> f64 {
    ROUNDING_ULPS * window_len as f64 * f64::EPSILON * magnitude.abs()
}

fn rank_p_value(s: f64, references: &[f64], tolerance: f64) -> f64 {
    let mut greater = 0usize;
    let mut ties = 0usize;
    for &r in references {
        if (r - s).abs() <= tolerance {
            ties += 1;
        } else if r > s {
            greater += 1;
        }
    }
    (greater as f64 + TIE_WEIGHT * ties as f64 + 1.0) / (references.len() as f64 + 1.0)
}

/// Every reference score is zero: the window never deviated from itself.
fn is_flat(references: &[f64], tolerance: f64) -> bool {
    references.len() >= MIN_FLAT_REFERENCES && references.iter().all(|r| r.abs() <= tolerance)
}

/// Survival count with a Gaussian tail for references below `s`. 0 when the
/// references have no spread to set a bandwidth from.
fn kernel_p_value(s: f64, references: &[f64], tolerance: f64) -> f64 {
    let h = silverman_bandwidth(references);
    if h <= 0.0 {
        return 0.0;
    }

    let mass: f64 = references
        .iter()
        .map(|&r| {
            if r >= s - tolerance {
                1.0
            } else {
                normal_sf((s - r) / h)
            }
        })
        .sum();

    mass / references.len() as f64
}

/// Silverman's rule of thumb, `1.06 σ n^(-1/5)`. 0 for fewer than two points.
fn silverman_bandwidth(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    1.06 * variance.sqrt() * (n as f64).powf(-0.2)
}

/// Standard normal survival function `P(Z > z)`.
///
/// Abramowitz & Stegun 7.1.26 for erfc, evaluated on the upper tail so
/// small probabilities keep their relative precision.
pub(crate) fn normal_sf(z: f64) -> f64 {
    if z < 0.0 {
        return 1.0 - normal_sf(-z);
    }
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let x = z / std::f64::consts::SQRT_2;
    let t = 1.0 / (1.0 + p * x);
    let erfc = (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();
    0.5 * erfc
}
