use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use tidemark_cli::cli::{CliArgs, ReportFormat};
use tidemark_cli::report;
use tidemark_compute::{detect, summarize};
use tidemark_core::{load_dotenv, DetectionConfig};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse();

    // File config replaces the env layer; explicit flags win over both.
    let base = match args.config.as_deref() {
        Some(path) => DetectionConfig::load(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => DetectionConfig::from_env(),
    };
    let config = args.apply_overrides(base);
    config.validate().context("invalid detection parameters")?;
    config.log_summary();

    let observations = tidemark_ingest::load_observations(&args.input)
        .with_context(|| format!("failed to read series '{}'", args.input.display()))?;

    let rows = detect(&observations, &config).context("detection failed")?;

    report::write_report(&args.output, &rows, args.format == ReportFormat::Json)
        .with_context(|| format!("failed to write report '{}'", args.output.display()))?;
    info!(path = %args.output.display(), rows = rows.len(), "Report written");

    let summary = summarize(&rows);
    println!(
        "Processed {} observations: {} spikes, {} change-points",
        summary.observations, summary.spikes, summary.changes
    );
    if let Some((i, row)) = summary.first_change.and_then(|i| rows.get(i).map(|r| (i, r))) {
        println!("First change-point at row {} ({})", i + 1, row.label);
    }
    println!("Report written to {}", args.output.display());

    Ok(())
}
