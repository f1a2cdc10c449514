//! Composite cache keys: resource kind plus location identity.

/// Round a coordinate to 4 decimal digits.
///
/// Repeated geolocation reads jitter past the fourth decimal; rounding
/// before the value reaches either the query string or the cache key keeps
/// both stable across reads of the same spot.
pub fn round_coord(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

pub fn weather_city_key(city: &str) -> String {
    format!("weather:{}", city.trim().to_lowercase())
}

/// Key for coordinate lookups. Callers pass coordinates already rounded
/// with [`round_coord`].
pub fn weather_coords_key(lat: f64, lon: f64) -> String {
    format!("weather:{}:{}", lat, lon)
}

pub fn aqi_key(lat: f64, lon: f64, timezone: &str) -> String {
    format!("aqi:{}:{}:{}", lat, lon, timezone)
}

pub fn alerts_key(lat: f64, lon: f64, timezone: &str) -> String {
    format!("alerts:{}:{}:{}", lat, lon, timezone)
}
