use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fireworks::config::AppConfig;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("fireworks=info".parse()?))
        .init();

    info!("Fireworks {} starting", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load();
    fireworks::app::run(config)?;

    info!("Shutdown complete");
    Ok(())
}
