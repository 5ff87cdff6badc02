pub mod app;
pub mod config;
pub mod error;
pub mod query_state;

pub use app::App;
pub use config::{Config, NarrationConfig, ValidationResult, WeatherConfig};
pub use error::{AppError, ConfigError};
pub use query_state::{QueryToken, QueryTracker};

use anyhow::Result;

/// Initialize logging for the application
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    tracing::debug!("Skycast core initialized");
    Ok(())
}
