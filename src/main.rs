use anyhow::Context;
use gamemapper::{ConfigData, statics};
use std::path::Path;

fn setup_logging() {
    use tracing_subscriber::prelude::*;

    // Default to info for dependencies, debug for this crate; RUST_LOG overrides.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,gamemapper=debug"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .init();
}

fn main() -> anyhow::Result<()> {
    setup_logging();

    let config_path = Path::new(statics::CONFIG_FILE_NAME);
    let config = ConfigData::load(config_path).context("loading map config")?;

    gamemapper::run_gui(config.clone()).map_err(|e| anyhow::anyhow!("GUI error: {e}"))?;

    config.save(config_path).context("saving map config")?;
    Ok(())
}
