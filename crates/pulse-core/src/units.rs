//! Temperature unit preference and display formatting.

use serde::{Deserialize, Serialize};

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Format a Celsius reading for display, rounded to whole degrees.
/// Absent readings render as the `-` placeholder, never as an error.
pub fn format_temp(celsius: Option<f64>, unit: TemperatureUnit) -> String {
    match celsius {
        None => "-".to_string(),
        Some(c) => match unit {
            TemperatureUnit::Celsius => format!("{}°C", c.round() as i64),
            TemperatureUnit::Fahrenheit => format!("{}°F", (c * 9.0 / 5.0 + 32.0).round() as i64),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_celsius() {
        assert_eq!(format_temp(Some(18.4), TemperatureUnit::Celsius), "18°C");
        assert_eq!(format_temp(Some(-0.4), TemperatureUnit::Celsius), "0°C");
    }

    #[test]
    fn test_format_fahrenheit() {
        assert_eq!(format_temp(Some(0.0), TemperatureUnit::Fahrenheit), "32°F");
        assert_eq!(format_temp(Some(20.0), TemperatureUnit::Fahrenheit), "68°F");
    }

    #[test]
    fn test_absent_reading_renders_placeholder() {
        assert_eq!(format_temp(None, TemperatureUnit::Celsius), "-");
    }
}
