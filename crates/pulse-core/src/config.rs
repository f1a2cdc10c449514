use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";
const DEFAULT_GEOCODING_BASE: &str = "https://geocoding-api.open-meteo.com";
const DEFAULT_FORECAST_BASE: &str = "https://api.open-meteo.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL for the WeatherPulse backend API
    pub api_base: String,

    /// Base URL for the Open-Meteo geocoding service
    #[serde(default = "default_geocoding_base")]
    pub geocoding_base: String,

    /// Base URL for the Open-Meteo forecast service
    #[serde(default = "default_forecast_base")]
    pub forecast_base: String,

    /// Directory holding the local cache database
    pub data_dir: PathBuf,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Quiet interval before a typed query triggers a lookup
    #[serde(default = "default_suggest_debounce_ms")]
    pub suggest_debounce_ms: u64,

    /// Maximum number of autocomplete candidates per query
    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: u32,

    /// Opaque bearer credential for authenticated endpoints (optional,
    /// can be set via the WEATHERPULSE_ACCESS_TOKEN environment variable)
    #[serde(default)]
    pub access_token: Option<String>,
}

fn default_geocoding_base() -> String {
    DEFAULT_GEOCODING_BASE.to_string()
}

fn default_forecast_base() -> String {
    DEFAULT_FORECAST_BASE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_suggest_debounce_ms() -> u64 {
    350
}

fn default_suggest_limit() -> u32 {
    5
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("weatherpulse");

        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            geocoding_base: default_geocoding_base(),
            forecast_base: default_forecast_base(),
            data_dir,
            request_timeout_secs: default_request_timeout_secs(),
            suggest_debounce_ms: default_suggest_debounce_ms(),
            suggest_limit: default_suggest_limit(),
            access_token: std::env::var("WEATHERPULSE_ACCESS_TOKEN").ok(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating a default file if
    /// none exists.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save(&config_path)?;
            return Ok(config);
        }

        Self::load_from_path(&config_path)
    }

    /// Load and validate configuration from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or fails validation.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;

        let mut config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        // Environment overrides win over the file.
        if let Ok(api_base) = std::env::var("WEATHERPULSE_API_BASE") {
            config.api_base = api_base;
        }
        if let Ok(token) = std::env::var("WEATHERPULSE_ACCESS_TOKEN") {
            config.access_token = Some(token);
        }

        config.validate()?;
        Ok(config)
    }

    fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write(e.to_string()))?;
        }
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Write(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Write(e.to_string()))
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("weatherpulse")
            .join("config.toml")
    }

    /// Path of the local cache database inside `data_dir`.
    pub fn cache_db_path(&self) -> PathBuf {
        self.data_dir.join("cache.db")
    }

    /// Validate base URLs and intervals.
    ///
    /// # Errors
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("api_base", &self.api_base),
            ("geocoding_base", &self.geocoding_base),
            ("forecast_base", &self.forecast_base),
        ] {
            if Url::parse(value).is_err() {
                return Err(ConfigError::Invalid {
                    field: field.to_string(),
                    message: format!("not a valid URL: {}", value),
                });
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_secs".to_string(),
                message: "timeout must be greater than 0".to_string(),
            });
        }

        if self.suggest_debounce_ms == 0 {
            tracing::warn!("suggest_debounce_ms is 0; every keystroke will issue a lookup");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.suggest_debounce_ms, 350);
        assert_eq!(config.suggest_limit, 5);
    }

    #[test]
    fn test_load_from_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.api_base = "http://localhost:9999/api".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.api_base, config.api_base);
        assert_eq!(loaded.geocoding_base, config.geocoding_base);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = Config {
            api_base: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "api_base"
        ));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_base = \"http://localhost:8000/api\"\ndata_dir = \"/tmp/wp\"\n",
        )
        .unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.request_timeout_secs, 10);
        assert_eq!(loaded.forecast_base, DEFAULT_FORECAST_BASE);
    }

    #[test]
    fn test_cache_db_path() {
        let config = Config {
            data_dir: PathBuf::from("/tmp/wp"),
            ..Config::default()
        };
        assert_eq!(config.cache_db_path(), PathBuf::from("/tmp/wp/cache.db"));
    }
}
