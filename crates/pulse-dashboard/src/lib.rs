//! Resilient data-fetch and cache-fallback orchestration for the
//! WeatherPulse dashboard.
//!
//! The pieces, leaf-first: a durable key/value [`cache`], composite [`keys`]
//! naming each resource+location pair, the shared read-model [`state`], the
//! resource fetchers and dependent-fetch orchestrator in [`fetch`], the
//! debounced suggestion stream in [`suggest`], the parallel comparison set
//! in [`compare`], and pure display [`insight`] helpers.

pub mod cache;
pub mod compare;
pub mod fetch;
pub mod insight;
pub mod keys;
pub mod state;
pub mod suggest;

pub use cache::{CacheEntry, CacheStore};
pub use fetch::DashboardService;
pub use insight::{aqi_category, feels_like_insight, AqiCategory, FeelsLikeInsight};
pub use state::{CompareEntry, DashboardState, FetchOutcome, ResourceState};
pub use suggest::SuggestionCandidate;
