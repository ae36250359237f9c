//! Mirror importer entry point.

use anyhow::{Context, Result};
use mirror_importer::{load_config, Importer};
use mirror_telemetry::init_telemetry;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config().context("Failed to load configuration")?;
    init_telemetry(&config.telemetry).context("Failed to initialise logging")?;
    config.validate().context("Invalid configuration")?;

    info!(
        "[importer] Starting {} importer over {}",
        config.network,
        config.data_dir.display()
    );
    let importer = Importer::new(config)?;

    let migrations = importer
        .run_migrations()
        .context("Startup migrations failed")?;
    info!(
        "[importer] Migrations applied={:?} skipped={}",
        migrations.applied,
        migrations.skipped.len()
    );

    importer.ingest().await?;
    Ok(())
}
