//! WeatherPulse backend API client.

use std::time::Duration;

use tracing::instrument;

use crate::error::ApiError;
use crate::types::*;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl ApiClient {
    /// Create a client against the given base URL (e.g. `http://host/api`).
    ///
    /// # Errors
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// # Errors
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        })
    }

    /// Attach an opaque bearer credential sent with every request.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url);
        if let Some(token) = &self.access_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        request
    }

    #[instrument(skip(self), level = "info")]
    pub async fn weather_by_city(&self, city: &str) -> Result<WeatherBundle, ApiError> {
        let url = format!(
            "{}/weather?city={}",
            self.base_url,
            urlencoding::encode(city)
        );
        let response = self.get(&url).send().await?;
        classify(response).await
    }

    /// Coordinates are expected to be pre-rounded by the caller so the
    /// query string matches the cache key built from the same values.
    #[instrument(skip(self), level = "info")]
    pub async fn weather_by_coords(&self, lat: f64, lon: f64) -> Result<WeatherBundle, ApiError> {
        let url = format!("{}/weather?lat={}&lon={}", self.base_url, lat, lon);
        let response = self.get(&url).send().await?;
        classify(response).await
    }

    #[instrument(skip(self), level = "info")]
    pub async fn air_quality(
        &self,
        lat: f64,
        lon: f64,
        timezone: &str,
    ) -> Result<AqiReport, ApiError> {
        let url = format!(
            "{}/aqi?lat={}&lon={}&timezone={}",
            self.base_url,
            lat,
            lon,
            urlencoding::encode(timezone)
        );
        let response = self.get(&url).send().await?;
        classify(response).await
    }

    #[instrument(skip(self), level = "info")]
    pub async fn alerts(
        &self,
        lat: f64,
        lon: f64,
        timezone: &str,
    ) -> Result<AlertsReport, ApiError> {
        let url = format!(
            "{}/alerts?lat={}&lon={}&timezone={}",
            self.base_url,
            lat,
            lon,
            urlencoding::encode(timezone)
        );
        let response = self.get(&url).send().await?;
        classify(response).await
    }

    /// List the signed-in user's saved locations (requires a bearer token).
    #[instrument(skip(self), level = "info")]
    pub async fn saved_locations(&self) -> Result<Vec<SavedLocation>, ApiError> {
        let url = format!("{}/saved-locations", self.base_url);
        let response = self.get(&url).send().await?;
        classify(response).await
    }
}

/// Single classification point for every response in this crate.
///
/// Reads the body as text and best-effort parses it as JSON; a parse
/// failure yields an absent body, never a hard error. Non-success statuses
/// become a typed failure carrying the status and the body's `detail`
/// message when one exists.
pub(crate) async fn classify<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body: Option<serde_json::Value> = serde_json::from_str(&text).ok();

    if !status.is_success() {
        let message = body
            .as_ref()
            .and_then(|b| b.get("detail"))
            .and_then(|d| d.as_str())
            .unwrap_or("Request failed")
            .to_string();
        tracing::debug!(status = status.as_u16(), "request failed: {}", message);

        if status.as_u16() == 429 {
            return Err(ApiError::RateLimited {
                status: 429,
                message,
            });
        }
        return Err(ApiError::Unavailable {
            status: Some(status.as_u16()),
            message,
        });
    }

    match body {
        Some(value) => serde_json::from_value(value).map_err(|e| ApiError::Unavailable {
            status: None,
            message: format!("Invalid response: {}", e),
        }),
        None => Err(ApiError::Unavailable {
            status: None,
            message: "Empty response".to_string(),
        }),
    }
}
