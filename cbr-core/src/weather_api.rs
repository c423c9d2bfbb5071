//! OpenWeather current-conditions client (feature `api`).
//!
//! Fetch failures never propagate into the engine: after the retries are
//! exhausted the caller receives the fixed fallback reading, flagged so a
//! consumer can surface a fallback banner.

use chrono::{DateTime, Utc};
use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::weather::WeatherReading;

/// Default query point: Hanoi.
pub const DEFAULT_LATITUDE: f64 = 21.0285;
pub const DEFAULT_LONGITUDE: f64 = 105.8542;

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const MAX_TRIES: u32 = 3;

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    rain: Option<OwmRain>,
    name: Option<String>,
}

/// A current-conditions sample, either live or the fixed fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub reading: WeatherReading,
    pub location: String,
    pub observed_at: DateTime<Utc>,
    /// True when the fetch failed and the fixed fallback values were
    /// substituted.
    pub is_fallback: bool,
}

impl CurrentConditions {
    fn fallback() -> Self {
        CurrentConditions {
            reading: WeatherReading::fallback(),
            location: "Hanoi (fallback)".to_string(),
            observed_at: Utc::now(),
            is_fallback: true,
        }
    }
}

/// Hourly rainfall from an OpenWeather response: `rain.1h` when present,
/// otherwise `rain.3h` averaged, otherwise 0.
fn hourly_rainfall(rain: &Option<OwmRain>) -> f64 {
    match rain {
        Some(OwmRain {
            one_hour: Some(mm), ..
        }) => *mm,
        Some(OwmRain {
            three_hours: Some(mm),
            ..
        }) => mm / 3.0,
        _ => 0.0,
    }
}

/// Fetch current conditions, retrying on transient failures. Returns the
/// fixed fallback reading if every attempt fails.
pub async fn fetch_current_conditions(
    client: &Client,
    api_key: &str,
    latitude: f64,
    longitude: f64,
) -> CurrentConditions {
    let url = format!(
        "{BASE_URL}/weather?lat={latitude}&lon={longitude}&appid={api_key}&units=metric"
    );

    for attempt in 1..=MAX_TRIES {
        match client.get(&url).send().await {
            Ok(response) => {
                if response.status() != StatusCode::OK {
                    warn!(
                        "Attempt {}/{}: bad weather response status: {}",
                        attempt,
                        MAX_TRIES,
                        response.status()
                    );
                } else {
                    match response.json::<OwmResponse>().await {
                        Ok(body) => {
                            let reading =
                                WeatherReading::new(body.main.temp, hourly_rainfall(&body.rain));
                            info!(
                                "Weather for {}: {} C, {} mm/h",
                                body.name.as_deref().unwrap_or("unknown"),
                                reading.air_temperature,
                                reading.rainfall
                            );
                            return CurrentConditions {
                                reading,
                                location: body.name.unwrap_or_else(|| "unknown".to_string()),
                                observed_at: Utc::now(),
                                is_fallback: false,
                            };
                        }
                        Err(e) => {
                            warn!(
                                "Attempt {}/{}: failed to decode weather response: {}",
                                attempt, MAX_TRIES, e
                            );
                        }
                    }
                }
            }
            Err(e) => {
                warn!(
                    "Attempt {}/{}: weather request failed: {}",
                    attempt, MAX_TRIES, e
                );
            }
        }
    }

    warn!("Weather fetch failed after {} attempts, using fallback values", MAX_TRIES);
    CurrentConditions::fallback()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hourly_rainfall_prefers_one_hour() {
        let rain = Some(OwmRain {
            one_hour: Some(4.0),
            three_hours: Some(9.0),
        });
        assert_eq!(hourly_rainfall(&rain), 4.0);
    }

    #[test]
    fn test_hourly_rainfall_averages_three_hours() {
        let rain = Some(OwmRain {
            one_hour: None,
            three_hours: Some(9.0),
        });
        assert_eq!(hourly_rainfall(&rain), 3.0);
    }

    #[test]
    fn test_hourly_rainfall_defaults_to_dry() {
        assert_eq!(hourly_rainfall(&None), 0.0);
        let rain = Some(OwmRain {
            one_hour: None,
            three_hours: None,
        });
        assert_eq!(hourly_rainfall(&rain), 0.0);
    }

    #[test]
    fn test_fallback_conditions() {
        let conditions = CurrentConditions::fallback();
        assert!(conditions.is_fallback);
        assert_eq!(conditions.reading, WeatherReading::fallback());
    }

    #[test]
    fn test_response_decoding() {
        let body = r#"{"main":{"temp":28.4},"rain":{"1h":2.5},"name":"Hanoi"}"#;
        let decoded: OwmResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.main.temp, 28.4);
        assert_eq!(hourly_rainfall(&decoded.rain), 2.5);
        assert_eq!(decoded.name.as_deref(), Some("Hanoi"));
    }
}
