//! market-sim CLI - run a market simulation and print its monthly history

use anyhow::Context;
use clap::Parser;
use market_simulator_core_rs::{Orchestrator, SimConfig, DEFAULT_CONFIG_PATH};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "market-sim")]
#[command(about = "Simulate a monthly economy of producers and people")]
struct Cli {
    /// Path to the JSON configuration (created with defaults if it is the default path)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// RNG seed (overrides the configuration; defaults to the clock)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of months to run (overrides the configuration)
    #[arg(short, long)]
    months: Option<usize>,

    /// Write the full JSON report to this path
    #[arg(long, value_name = "PATH")]
    json_out: Option<PathBuf>,

    /// Do not print the monthly table
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();

    let cli = Cli::parse();

    let mut config = SimConfig::load_or_create_default(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    if let Some(months) = cli.months {
        config.max_months = months;
    }
    let seed = match cli.seed.or(config.rng_seed) {
        Some(seed) => seed,
        None => clock_seed()?,
    };
    config.rng_seed = Some(seed);
    info!(seed, config = %cli.config.display(), "configuration loaded");

    let mut orchestrator =
        Orchestrator::new(config).context("initialising simulation")?;
    let report = orchestrator.run().context("running simulation")?;

    if !cli.quiet {
        print!("{}", report.render_table());
    }

    if let Some(path) = cli.json_out {
        let json = report.to_json().context("serializing report")?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    Ok(())
}

/// Filter from `RUST_LOG` directives, `info` when unset or unparsable
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Milliseconds since the Unix epoch
fn clock_seed() -> anyhow::Result<u64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the Unix epoch")?;
    Ok(elapsed.as_millis() as u64)
}
