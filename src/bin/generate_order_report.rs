use anyhow::{Context, Result};
use ecommerce_etl::{bootstrap, config, report};

fn main() -> Result<()> {
    bootstrap::init_env();
    bootstrap::init_tracing();

    let config = config::load().context("Failed to load configuration")?;

    tracing::info!("Generating order report...");
    let summary = report::run(&config).context("Failed to generate order report")?;

    println!("Saved {} rows to {}", summary.rows, summary.path.display());
    Ok(())
}
