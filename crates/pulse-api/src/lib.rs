//! HTTP clients for the WeatherPulse backend and Open-Meteo lookups.
//!
//! All responses pass through a single classifier that turns non-success
//! statuses into a typed failure: 429 is rate limiting, everything else
//! (4xx, 5xx, DNS, connect, timeout) is "unavailable".

pub mod client;
pub mod error;
pub mod geo;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use geo::GeoClient;
