//! Pure read-model insights derived from current conditions.

use pulse_api::types::CurrentWeather;

/// Headline/detail pair describing why conditions feel the way they do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeelsLikeInsight {
    pub headline: &'static str,
    pub detail: &'static str,
}

/// Summarize the perceived conditions. Absent readings skip their rule
/// rather than failing; the comfortable default always applies.
pub fn feels_like_insight(current: &CurrentWeather) -> FeelsLikeInsight {
    let temp = current.temperature_2m;
    let humidity = current.relative_humidity_2m;
    let wind = current.wind_speed_10m;
    let precip = current.precipitation.unwrap_or(0.0);

    if let (Some(t), Some(h)) = (temp, humidity) {
        if t >= 30.0 && h >= 60.0 {
            return FeelsLikeInsight {
                headline: "Hot and humid",
                detail: "Heat index can feel higher than the air temperature.",
            };
        }
    }
    if matches!(temp, Some(t) if t >= 30.0) {
        return FeelsLikeInsight {
            headline: "Hot conditions",
            detail: "Stay hydrated and take breaks in the shade.",
        };
    }
    if let (Some(t), Some(w)) = (temp, wind) {
        if t <= 0.0 && w >= 20.0 {
            return FeelsLikeInsight {
                headline: "Wind chill",
                detail: "Wind makes it feel colder than the air temperature.",
            };
        }
    }
    if precip > 0.0 {
        return FeelsLikeInsight {
            headline: "Wet conditions",
            detail: "Light precipitation can make surfaces slick.",
        };
    }
    if matches!(current.uv_index, Some(uv) if uv >= 7.0) {
        return FeelsLikeInsight {
            headline: "High UV",
            detail: "Consider sunscreen and sunglasses outdoors.",
        };
    }
    if let (Some(apparent), Some(t)) = (current.apparent_temperature, temp) {
        if (apparent - t).abs() >= 3.0 {
            return FeelsLikeInsight {
                headline: "Feels different",
                detail: "Wind and humidity shift the perceived temperature.",
            };
        }
    }

    FeelsLikeInsight {
        headline: "Comfortable conditions",
        detail: "Light winds and typical humidity.",
    }
}

/// US AQI band with guidance text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiCategory {
    pub label: &'static str,
    pub detail: &'static str,
}

/// Map a US AQI reading to its band; `None` when no reading is available.
pub fn aqi_category(us_aqi: Option<f64>) -> Option<AqiCategory> {
    let value = us_aqi?;
    Some(if value <= 50.0 {
        AqiCategory {
            label: "Good",
            detail: "Air quality is satisfactory for most people.",
        }
    } else if value <= 100.0 {
        AqiCategory {
            label: "Moderate",
            detail: "Sensitive individuals should reduce prolonged outdoor exertion.",
        }
    } else if value <= 150.0 {
        AqiCategory {
            label: "Unhealthy for sensitive groups",
            detail: "Limit outdoor activity if you are sensitive.",
        }
    } else if value <= 200.0 {
        AqiCategory {
            label: "Unhealthy",
            detail: "Everyone should reduce prolonged outdoor exertion.",
        }
    } else if value <= 300.0 {
        AqiCategory {
            label: "Very Unhealthy",
            detail: "Avoid outdoor activity if possible.",
        }
    } else {
        AqiCategory {
            label: "Hazardous",
            detail: "Remain indoors and avoid all outdoor exertion.",
        }
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn current(temp: f64) -> CurrentWeather {
        CurrentWeather {
            temperature_2m: Some(temp),
            apparent_temperature: Some(temp),
            relative_humidity_2m: Some(50.0),
            wind_speed_10m: Some(5.0),
            ..CurrentWeather::default()
        }
    }

    #[test]
    fn test_hot_and_humid_beats_hot() {
        let mut c = current(32.0);
        c.relative_humidity_2m = Some(70.0);
        assert_eq!(feels_like_insight(&c).headline, "Hot and humid");

        c.relative_humidity_2m = Some(40.0);
        assert_eq!(feels_like_insight(&c).headline, "Hot conditions");
    }

    #[test]
    fn test_wind_chill() {
        let mut c = current(-2.0);
        c.wind_speed_10m = Some(25.0);
        assert_eq!(feels_like_insight(&c).headline, "Wind chill");
    }

    #[test]
    fn test_feels_different_threshold() {
        let mut c = current(20.0);
        c.apparent_temperature = Some(24.0);
        assert_eq!(feels_like_insight(&c).headline, "Feels different");

        c.apparent_temperature = Some(21.0);
        assert_eq!(
            feels_like_insight(&c).headline,
            "Comfortable conditions"
        );
    }

    #[test]
    fn test_absent_readings_fall_through() {
        let c = CurrentWeather::default();
        assert_eq!(
            feels_like_insight(&c).headline,
            "Comfortable conditions"
        );
    }

    #[test]
    fn test_aqi_bands() {
        assert_eq!(aqi_category(Some(30.0)).unwrap().label, "Good");
        assert_eq!(aqi_category(Some(75.0)).unwrap().label, "Moderate");
        assert_eq!(
            aqi_category(Some(125.0)).unwrap().label,
            "Unhealthy for sensitive groups"
        );
        assert_eq!(aqi_category(Some(180.0)).unwrap().label, "Unhealthy");
        assert_eq!(aqi_category(Some(250.0)).unwrap().label, "Very Unhealthy");
        assert_eq!(aqi_category(Some(400.0)).unwrap().label, "Hazardous");
        assert!(aqi_category(None).is_none());
    }
}
