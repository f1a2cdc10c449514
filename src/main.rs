use std::time::Duration;

use anyhow::{Context, Result};

use pulse_api::{ApiClient, GeoClient};
use pulse_core::{format_temp, Config, TemperatureUnit};
use pulse_dashboard::{aqi_category, feels_like_insight, CacheStore, DashboardService};

#[tokio::main]
async fn main() -> Result<()> {
    pulse_core::init()?;

    let config = Config::load()?;
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let mut api = ApiClient::with_timeout(&config.api_base, timeout)?;
    if let Some(token) = &config.access_token {
        api = api.with_access_token(token.clone());
    }
    let geo = GeoClient::new(&config.geocoding_base, &config.forecast_base)?;
    let cache = CacheStore::open(config.cache_db_path())
        .context("opening cache database")?;

    let service = DashboardService::new(api, geo, cache)
        .with_suggest_debounce(Duration::from_millis(config.suggest_debounce_ms))
        .with_suggest_limit(config.suggest_limit);

    let city = std::env::args().nth(1).unwrap_or_else(|| "Toronto".to_string());
    tracing::info!("loading dashboard for {}", city);
    service.load_weather_for_city(&city).await;

    render(&service.state());
    Ok(())
}

fn render(state: &pulse_dashboard::DashboardState) {
    match state.weather.value() {
        Some(bundle) => {
            let place = &bundle.location;
            println!(
                "{}{}",
                place.name,
                place
                    .country
                    .as_deref()
                    .map(|c| format!(", {}", c))
                    .unwrap_or_default()
            );
            if let Some(current) = &bundle.forecast.current {
                println!(
                    "  {} (feels like {})",
                    format_temp(current.temperature_2m, TemperatureUnit::Celsius),
                    format_temp(current.apparent_temperature, TemperatureUnit::Celsius),
                );
                let insight = feels_like_insight(current);
                println!("  {} - {}", insight.headline, insight.detail);
            }
        }
        None => {
            if let Some(message) = state.weather.error() {
                println!("Weather unavailable: {}", message);
            }
        }
    }
    if let Some(notice) = &state.weather.notice {
        println!("  ! {}", notice);
    }

    if let Some(report) = state.air_quality.value() {
        if let Some(category) = aqi_category(report.aqi.current.us_aqi) {
            println!("  Air quality: {}", category.label);
        }
    }
    if let Some(notice) = &state.air_quality.notice {
        println!("  ! {}", notice);
    }

    if let Some(alerts) = state.alerts.value() {
        for alert in alerts {
            println!("  [{}] {}", alert.severity, alert.title);
        }
    }
    if let Some(notice) = &state.alerts.notice {
        println!("  ! {}", notice);
    }
}
