//! Open-Meteo geocoding and spot-forecast lookups backing search-as-you-type.

use std::time::Duration;

use tracing::instrument;

use crate::client::classify;
use crate::error::ApiError;
use crate::types::{CurrentConditions, GeoMatch, GeoSearchResponse};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct GeoClient {
    client: reqwest::Client,
    geocoding_base: String,
    forecast_base: String,
}

impl GeoClient {
    /// Create a client against the given geocoding and forecast base URLs.
    ///
    /// # Errors
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn new(geocoding_base: &str, forecast_base: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            geocoding_base: geocoding_base.trim_end_matches('/').to_string(),
            forecast_base: forecast_base.trim_end_matches('/').to_string(),
        })
    }

    /// Look up place candidates for a typed name, bounded to `count`.
    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, name: &str, count: u32) -> Result<Vec<GeoMatch>, ApiError> {
        let url = format!(
            "{}/v1/search?name={}&count={}&language=en&format=json",
            self.geocoding_base,
            urlencoding::encode(name),
            count
        );
        let response = self.client.get(&url).send().await?;
        let parsed: GeoSearchResponse = classify(response).await?;
        Ok(parsed.results)
    }

    /// Current temperature and feels-like for one candidate.
    #[instrument(skip(self), level = "debug")]
    pub async fn current_conditions(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, ApiError> {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current=temperature_2m,apparent_temperature&timezone=auto",
            self.forecast_base, latitude, longitude
        );
        let response = self.client.get(&url).send().await?;
        classify(response).await
    }
}
