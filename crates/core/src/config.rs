use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TidemarkError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn parse_key<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    ignored: &mut Vec<&'static str>,
) -> Option<T> {
    let raw = get(key)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable config value, using default");
            ignored.push(key);
            None
        }
    }
}

pub const DEFAULT_CONFIDENCE: f64 = 0.95;
pub const DEFAULT_MARTINGALE_EPSILON: f64 = 0.92;
pub const DEFAULT_RUN_LENGTH: usize = 2;

fn default_confidence() -> f64 { DEFAULT_CONFIDENCE }
fn default_epsilon() -> f64 { DEFAULT_MARTINGALE_EPSILON }
fn default_run_length() -> usize { DEFAULT_RUN_LENGTH }

// ── P-value method ────────────────────────────────────────────

/// How a strangeness score is turned into a p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PValueMethod {
    /// Conformal rank: `(#{r >= s} + 1) / (n + 1)`.
    Rank,
    /// Rank, raised by a Gaussian kernel tail; floorless on a flat window.
    #[default]
    Smoothed,
}

impl FromStr for PValueMethod {
    type Err = TidemarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rank" => Ok(PValueMethod::Rank),
            "smoothed" | "kernel" => Ok(PValueMethod::Smoothed),
            other => Err(TidemarkError::configuration(format!(
                "unknown p-value method '{}' (expected 'rank' or 'smoothed')",
                other
            ))),
        }
    }
}

impl fmt::Display for PValueMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PValueMethod::Rank => write!(f, "rank"),
            PValueMethod::Smoothed => write!(f, "smoothed"),
        }
    }
}

// ── Detection config ──────────────────────────────────────────

/// User-facing detection parameters, typically parsed from TOML or env.
///
/// `window_size` is optional: when absent it is derived from the series
/// length at [`DetectionConfig::resolve`] time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectionConfig {
    /// History window length. `None` = total_count / 4 (minimum 1).
    #[serde(default)]
    pub window_size: Option<usize>,
    /// Confidence level in (0, 1). Spike level is `1 - confidence`,
    /// change threshold is `1 / (1 - confidence)`.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Power martingale epsilon in (0, 1).
    #[serde(default = "default_epsilon")]
    pub martingale_epsilon: f64,
    #[serde(default)]
    pub pvalue_method: PValueMethod,
    /// Consecutive deviating points the change-point scorer requires.
    #[serde(default = "default_run_length")]
    pub run_length: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            window_size: None,
            confidence: default_confidence(),
            martingale_epsilon: default_epsilon(),
            pvalue_method: PValueMethod::default(),
            run_length: default_run_length(),
        }
    }
}

impl DetectionConfig {
    /// Build config from `TIDEMARK_*` environment variables (call `load_dotenv()` first).
    /// Unset keys keep their defaults; unparsable keys are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(env_opt).0
    }

    /// Returns the config and the keys that were set but could not be parsed.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> (Self, Vec<&'static str>) {
        let mut config = Self::default();
        let mut ignored = Vec::new();
        if let Some(w) = parse_key(&get, "TIDEMARK_WINDOW_SIZE", &mut ignored) {
            config.window_size = Some(w);
        }
        if let Some(c) = parse_key(&get, "TIDEMARK_CONFIDENCE", &mut ignored) {
            config.confidence = c;
        }
        if let Some(e) = parse_key(&get, "TIDEMARK_EPSILON", &mut ignored) {
            config.martingale_epsilon = e;
        }
        if let Some(m) = parse_key(&get, "TIDEMARK_PVALUE_METHOD", &mut ignored) {
            config.pvalue_method = m;
        }
        if let Some(k) = parse_key(&get, "TIDEMARK_RUN_LENGTH", &mut ignored) {
            config.run_length = k;
        }
        (config, ignored)
    }

    /// Load config from a TOML file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, TidemarkError> {
        tracing::debug!(?path, "Loading detection config");
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            TidemarkError::configuration(format!(
                "failed to parse config {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Check every parameter range.
    pub fn validate(&self) -> Result<(), TidemarkError> {
        if let Some(0) = self.window_size {
            return Err(TidemarkError::configuration("window_size must be at least 1"));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(TidemarkError::configuration(format!(
                "confidence must be in (0, 1), got {}",
                self.confidence
            )));
        }
        if !(self.martingale_epsilon > 0.0 && self.martingale_epsilon < 1.0) {
            return Err(TidemarkError::configuration(format!(
                "martingale_epsilon must be in (0, 1), got {}",
                self.martingale_epsilon
            )));
        }
        if self.run_length == 0 {
            return Err(TidemarkError::configuration("run_length must be at least 1"));
        }
        Ok(())
    }

    /// Validate and fix the window size for a series of `total_count` points.
    pub fn resolve(&self, total_count: usize) -> Result<ResolvedConfig, TidemarkError> {
        self.validate()?;
        let window_size = self.window_size.unwrap_or_else(|| (total_count / 4).max(1));
        Ok(ResolvedConfig {
            window_size,
            confidence: self.confidence,
            martingale_epsilon: self.martingale_epsilon,
            pvalue_method: self.pvalue_method,
            run_length: self.run_length,
        })
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        let window = self
            .window_size
            .map(|w| w.to_string())
            .unwrap_or_else(|| "auto (n/4)".to_string());
        tracing::info!("Detection config:");
        tracing::info!("  window_size:        {}", window);
        tracing::info!("  confidence:         {}", self.confidence);
        tracing::info!("  martingale_epsilon: {}", self.martingale_epsilon);
        tracing::info!("  pvalue_method:      {}", self.pvalue_method);
        tracing::info!("  run_length:         {}", self.run_length);
    }
}

/// Validated parameters with a concrete window size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub window_size: usize,
    pub confidence: f64,
    pub martingale_epsilon: f64,
    pub pvalue_method: PValueMethod,
    pub run_length: usize,
}

impl ResolvedConfig {
    /// P-values at or below this are spikes.
    pub fn spike_level(&self) -> f64 {
        1.0 - self.confidence
    }

    /// Martingale values at or above this are change-points.
    pub fn change_threshold(&self) -> f64 {
        1.0 / (1.0 - self.confidence)
    }
}
