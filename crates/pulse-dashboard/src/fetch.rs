//! Resource fetchers and the dependent-fetch orchestrator.
//!
//! Every fetcher follows the same shape: mark the slice loading, call the
//! classifier-backed client, commit `Fresh` plus a cache write on success,
//! fall back to the cached entry (when permitted) on failure, and clear the
//! loading flag on every exit path.

use std::sync::atomic::AtomicU64;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use pulse_api::types::{AlertsReport, AqiReport, Location, WeatherBundle};
use pulse_api::{ApiClient, ApiError, GeoClient};

use crate::cache::CacheStore;
use crate::keys;
use crate::state::{DashboardState, FetchOutcome};

const DEFAULT_SUGGEST_DEBOUNCE_MS: u64 = 350;
const DEFAULT_SUGGEST_LIMIT: u32 = 5;

/// Owns the read model and coordinates every fetch component.
///
/// Wrap in an [`std::sync::Arc`] to drive the suggestion stream and the
/// comparison set, which spawn background cycles.
pub struct DashboardService {
    pub(crate) api: ApiClient,
    pub(crate) geo: GeoClient,
    pub(crate) cache: CacheStore,
    pub(crate) state: RwLock<DashboardState>,
    pub(crate) suggest_debounce: Duration,
    pub(crate) suggest_limit: u32,
    pub(crate) suggest_generation: AtomicU64,
    pub(crate) suggest_cancel: Mutex<Option<CancellationToken>>,
    pub(crate) compare_generation: AtomicU64,
}

impl DashboardService {
    pub fn new(api: ApiClient, geo: GeoClient, cache: CacheStore) -> Self {
        Self {
            api,
            geo,
            cache,
            state: RwLock::new(DashboardState::default()),
            suggest_debounce: Duration::from_millis(DEFAULT_SUGGEST_DEBOUNCE_MS),
            suggest_limit: DEFAULT_SUGGEST_LIMIT,
            suggest_generation: AtomicU64::new(0),
            suggest_cancel: Mutex::new(None),
            compare_generation: AtomicU64::new(0),
        }
    }

    /// Override the suggestion debounce interval.
    pub fn with_suggest_debounce(mut self, debounce: Duration) -> Self {
        self.suggest_debounce = debounce;
        self
    }

    /// Override the suggestion candidate limit.
    pub fn with_suggest_limit(mut self, limit: u32) -> Self {
        self.suggest_limit = limit;
        self
    }

    /// Snapshot of the current read model for the view layer.
    pub fn state(&self) -> DashboardState {
        self.state.read().clone()
    }

    /// Fetch weather for a city by name, then the dependent resources.
    #[instrument(skip(self), level = "info")]
    pub async fn load_weather_for_city(&self, city: &str) {
        self.state.write().weather.begin();
        let key = keys::weather_city_key(city);

        let resolved = match self.api.weather_by_city(city).await {
            Ok(bundle) => Some(self.commit_fresh_weather(&key, bundle)),
            Err(reason) => self.fall_back_weather(&key, &reason),
        };

        if let Some((location, degraded)) = resolved {
            self.load_dependents(&location, degraded).await;
        }
    }

    /// Fetch weather for raw coordinates (e.g. a geolocation result), then
    /// the dependent resources.
    ///
    /// Coordinates are rounded to 4 decimals before they reach either the
    /// query string or the cache key, so jittered reads of the same spot
    /// share one entry.
    #[instrument(skip(self), level = "info")]
    pub async fn load_weather_for_coords(&self, lat: f64, lon: f64) {
        let lat = keys::round_coord(lat);
        let lon = keys::round_coord(lon);

        self.state.write().weather.begin();
        let key = keys::weather_coords_key(lat, lon);

        let resolved = match self.api.weather_by_coords(lat, lon).await {
            Ok(bundle) => Some(self.commit_fresh_weather(&key, bundle)),
            Err(reason) => self.fall_back_weather(&key, &reason),
        };

        if let Some((location, degraded)) = resolved {
            self.load_dependents(&location, degraded).await;
        }
    }

    fn commit_fresh_weather(&self, key: &str, bundle: WeatherBundle) -> (Location, bool) {
        if let Ok(value) = serde_json::to_value(&bundle) {
            self.cache.put(key, &value);
        }
        let location = bundle.location.clone();
        let mut state = self.state.write();
        state.weather.outcome = Some(FetchOutcome::Fresh(bundle));
        state.weather.loading = false;
        (location, false)
    }

    /// Cache fallback for a failed primary weather fetch. Returns the
    /// location to drive dependent fetches, flagged when the path degraded
    /// to cache; `None` when there is nothing to show.
    fn fall_back_weather(&self, key: &str, reason: &ApiError) -> Option<(Location, bool)> {
        let cached = self.cache.get(key).and_then(|entry| {
            let bundle: WeatherBundle = serde_json::from_value(entry.value).ok()?;
            Some((bundle, entry.cached_at))
        });

        let mut state = self.state.write();
        state.weather.loading = false;
        match cached {
            Some((bundle, served_at)) => {
                let location = bundle.location.clone();
                state.weather.notice =
                    Some(fallback_notice("weather data", reason, served_at));
                state.weather.outcome = Some(FetchOutcome::Stale {
                    value: bundle,
                    served_at,
                });
                Some((location, true))
            }
            None => {
                state.weather.outcome =
                    Some(FetchOutcome::Failed(reason.message().to_string()));
                None
            }
        }
    }

    /// Run the air-quality and alert fetchers for a resolved location.
    ///
    /// The two fetches are independent: a failure in one never blocks or
    /// clears the other. The stale-data banner on a dependent is surfaced
    /// only when the weather path itself degraded to cache; on a fresh
    /// weather result a dependent fallback stays silent.
    pub(crate) async fn load_dependents(&self, location: &Location, announce_fallback: bool) {
        tokio::join!(
            self.load_air_quality(location, announce_fallback),
            self.load_alerts(location, announce_fallback),
        );
    }

    /// Fetch air quality for a location, falling back to cache on failure.
    #[instrument(skip(self, location), level = "info")]
    pub async fn load_air_quality(&self, location: &Location, announce_fallback: bool) {
        self.state.write().air_quality.begin();
        let timezone = location.timezone_or_auto();
        let key = keys::aqi_key(location.lat, location.lon, timezone);

        match self
            .api
            .air_quality(location.lat, location.lon, timezone)
            .await
        {
            Ok(report) => {
                if let Ok(value) = serde_json::to_value(&report) {
                    self.cache.put(&key, &value);
                }
                let mut state = self.state.write();
                state.air_quality.outcome = Some(FetchOutcome::Fresh(report));
                state.air_quality.loading = false;
            }
            Err(reason) => {
                let cached = self.cache.get(&key).and_then(|entry| {
                    let report: AqiReport = serde_json::from_value(entry.value).ok()?;
                    Some((report, entry.cached_at))
                });

                let mut state = self.state.write();
                state.air_quality.loading = false;
                match cached {
                    Some((report, served_at)) => {
                        if announce_fallback {
                            state.air_quality.notice =
                                Some(fallback_notice("AQI", &reason, served_at));
                        }
                        state.air_quality.outcome = Some(FetchOutcome::Stale {
                            value: report,
                            served_at,
                        });
                    }
                    None => {
                        state.air_quality.outcome =
                            Some(FetchOutcome::Failed(reason.message().to_string()));
                    }
                }
            }
        }
    }

    /// Fetch weather alerts for a location, falling back to cache on failure.
    #[instrument(skip(self, location), level = "info")]
    pub async fn load_alerts(&self, location: &Location, announce_fallback: bool) {
        self.state.write().alerts.begin();
        let timezone = location.timezone_or_auto();
        let key = keys::alerts_key(location.lat, location.lon, timezone);

        match self.api.alerts(location.lat, location.lon, timezone).await {
            Ok(report) => {
                if let Ok(value) = serde_json::to_value(&report) {
                    self.cache.put(&key, &value);
                }
                let mut state = self.state.write();
                state.alerts.outcome = Some(FetchOutcome::Fresh(report.alerts));
                state.alerts.loading = false;
            }
            Err(reason) => {
                let cached = self.cache.get(&key).and_then(|entry| {
                    let report: AlertsReport = serde_json::from_value(entry.value).ok()?;
                    Some((report, entry.cached_at))
                });

                let mut state = self.state.write();
                state.alerts.loading = false;
                match cached {
                    Some((report, served_at)) => {
                        if announce_fallback {
                            state.alerts.notice =
                                Some(fallback_notice("alerts", &reason, served_at));
                        }
                        state.alerts.outcome = Some(FetchOutcome::Stale {
                            value: report.alerts,
                            served_at,
                        });
                    }
                    None => {
                        state.alerts.outcome =
                            Some(FetchOutcome::Failed(reason.message().to_string()));
                    }
                }
            }
        }
    }
}

/// Banner text for a failed call that fell back to a cached entry.
/// The timestamp is formatted for display once, never reparsed.
fn fallback_notice(what: &str, reason: &ApiError, served_at: DateTime<Utc>) -> String {
    let when = served_at.format("%Y-%m-%d %H:%M UTC");
    if reason.is_rate_limited() {
        format!(
            "Rate limited. Showing cached {} (last updated {}).",
            what, when
        )
    } else {
        format!(
            "Offline or unavailable. Showing cached {} (last updated {}).",
            what, when
        )
    }
}
