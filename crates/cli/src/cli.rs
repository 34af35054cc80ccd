use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tidemark_core::{DetectionConfig, PValueMethod};

/// Spike and change-point detection over a univariate series.
///
/// Reads a `label,value` CSV, scores every row with a conformal spike
/// detector and a martingale change-point detector, and writes one report
/// line per row.
#[derive(Parser, Debug)]
#[command(name = "tidemark", about = "Spike and change-point detection for a CSV series")]
pub struct CliArgs {
    /// CSV file with a header row and `label,value` columns
    pub input: PathBuf,

    /// Report destination
    #[arg(short, long, default_value = "report.txt", env = "TIDEMARK_OUTPUT")]
    pub output: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// TOML file with detection parameters (default: TIDEMARK_* env vars)
    #[arg(long, env = "TIDEMARK_CONFIG")]
    pub config: Option<PathBuf>,

    /// History window length (default: a quarter of the series, at least 1)
    #[arg(long)]
    pub window_size: Option<usize>,

    /// Confidence level in (0, 1)
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Power martingale epsilon in (0, 1)
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// P-value method: rank or smoothed
    #[arg(long)]
    pub pvalue_method: Option<PValueMethod>,

    /// Consecutive points a shift must hold before it counts as a change
    #[arg(long)]
    pub run_length: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Tab-separated text with a header line
    Text,
    /// One JSON object per line
    Json,
}

impl CliArgs {
    /// Overlay explicit flags on `base`. Flags that were not given keep the
    /// file or environment value.
    pub fn apply_overrides(&self, mut base: DetectionConfig) -> DetectionConfig {
        if let Some(w) = self.window_size {
            base.window_size = Some(w);
        }
        if let Some(c) = self.confidence {
            base.confidence = c;
        }
        if let Some(e) = self.epsilon {
            base.martingale_epsilon = e;
        }
        if let Some(m) = self.pvalue_method {
            base.pvalue_method = m;
        }
        if let Some(k) = self.run_length {
            base.run_length = k;
        }
        base
    }
}
