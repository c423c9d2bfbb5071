//! Weather normalization: converting raw ambient measurements into the
//! model's internal rainfall (X) and temperature (Y) coefficients.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Rainfall below this rate (mm/h) never reaches the channel.
pub const RAINFALL_THRESHOLD: f64 = 3.0;
/// Share of above-threshold rainfall that becomes river input.
pub const RAINFALL_RUNOFF_FRACTION: f64 = 0.5;
/// Air-to-water temperature transfer coefficient.
pub const TEMPERATURE_TRANSFER: f64 = 0.7;

/// Fixed fallback reading used when no live weather is available. The engine
/// never invents weather values; collaborators substitute these.
pub const FALLBACK_AIR_TEMPERATURE: f64 = 31.0;
pub const FALLBACK_RAINFALL: f64 = 10.0;

/// How raw weather measurements map onto the model coefficients.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub enum WeatherMode {
    /// Raw air temperature and rainfall are used directly as Y and X.
    Legacy,
    /// Affine/threshold conversion: `Y = 0.7 · T_air`, `X = 0` for rain at or
    /// below 3 mm/h, else `0.5 · (rain − 3)`.
    #[default]
    Converted,
}

impl FromStr for WeatherMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(WeatherMode::Legacy),
            "converted" => Ok(WeatherMode::Converted),
            other => anyhow::bail!("unknown weather mode: {other} (expected legacy|converted)"),
        }
    }
}

/// A raw ambient reading, as supplied by a weather collaborator.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Air temperature in °C.
    pub air_temperature: f64,
    /// Rainfall over the last hour, mm.
    pub rainfall: f64,
}

impl WeatherReading {
    pub fn new(air_temperature: f64, rainfall: f64) -> Self {
        WeatherReading {
            air_temperature,
            rainfall,
        }
    }

    /// The fixed fallback reading (§ weather collaborator contract).
    pub fn fallback() -> Self {
        WeatherReading {
            air_temperature: FALLBACK_AIR_TEMPERATURE,
            rainfall: FALLBACK_RAINFALL,
        }
    }
}

/// The model-internal drivers: rainfall coefficient X and temperature
/// coefficient Y.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ModelInputs {
    pub x: f64,
    pub y: f64,
}

/// Normalize a raw reading once per query, before classification.
pub fn normalize(mode: WeatherMode, reading: &WeatherReading) -> ModelInputs {
    match mode {
        WeatherMode::Legacy => ModelInputs {
            x: reading.rainfall,
            y: reading.air_temperature,
        },
        WeatherMode::Converted => ModelInputs {
            x: if reading.rainfall <= RAINFALL_THRESHOLD {
                0.0
            } else {
                RAINFALL_RUNOFF_FRACTION * (reading.rainfall - RAINFALL_THRESHOLD)
            },
            y: TEMPERATURE_TRANSFER * reading.air_temperature,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_passes_through() {
        let inputs = normalize(WeatherMode::Legacy, &WeatherReading::new(25.0, 7.0));
        assert_eq!(inputs.x, 7.0);
        assert_eq!(inputs.y, 25.0);
    }

    #[test]
    fn test_converted_temperature_transfer() {
        let inputs = normalize(WeatherMode::Converted, &WeatherReading::new(30.0, 0.0));
        assert_eq!(inputs.y, 21.0);
    }

    #[test]
    fn test_converted_rainfall_threshold() {
        for rain in [0.0, 1.0, 3.0] {
            let inputs = normalize(WeatherMode::Converted, &WeatherReading::new(25.0, rain));
            assert_eq!(inputs.x, 0.0);
        }
        let inputs = normalize(WeatherMode::Converted, &WeatherReading::new(25.0, 5.0));
        assert_eq!(inputs.x, 1.0);
        let inputs = normalize(WeatherMode::Converted, &WeatherReading::new(25.0, 20.0));
        assert_eq!(inputs.x, 8.5);
    }

    #[test]
    fn test_mode_names_parse() {
        assert_eq!("legacy".parse::<WeatherMode>().unwrap(), WeatherMode::Legacy);
        assert_eq!(
            "CONVERTED".parse::<WeatherMode>().unwrap(),
            WeatherMode::Converted
        );
        assert!("debug".parse::<WeatherMode>().is_err());
    }
}
