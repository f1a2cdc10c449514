//! Core configuration and shared primitives for WeatherPulse.

pub mod config;
pub mod error;
pub mod units;

pub use config::Config;
pub use error::ConfigError;
pub use units::{format_temp, TemperatureUnit};

use anyhow::Result;

/// Initialize logging for the application.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("WeatherPulse core initialized");
    Ok(())
}
