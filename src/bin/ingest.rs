use anyhow::{Context, Result};
use ecommerce_etl::{bootstrap, config, ingest};

fn main() -> Result<()> {
    bootstrap::init_env();
    bootstrap::init_tracing();

    let config = config::load().context("Failed to load configuration")?;

    tracing::info!("Running ingestion...");
    let summary = ingest::run(&config).context("Ingestion failed")?;

    println!(
        "Data ingested successfully: {} rows into {}",
        summary.total_rows(),
        config.database_path.display()
    );
    Ok(())
}
