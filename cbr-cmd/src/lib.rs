//! Command implementations for the Cầu Bây water-quality CLI.
//!
//! Each subcommand builds an engine from the weather-mode and kinetics
//! flags (a bad name is a parse error at startup, not a per-call failure),
//! samples it, and writes the requested output.

use anyhow::Context;
use cbr_core::engine::Engine;
use cbr_core::kinetics::KineticsModel;
use cbr_core::weather::{WeatherMode, WeatherReading};
use cbr_core::weather_api;
use cbr_data::{profile, sampling};
use clap::Subcommand;
use log::{info, warn};

pub mod report;

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate pollutant concentrations at one river position
    Evaluate {
        /// Position along the reach in meters (clamped to 0..8013)
        #[arg(short = 'z', long)]
        position: f64,

        /// Rainfall over the last hour, mm
        #[arg(short, long, default_value_t = 0.0)]
        rainfall: f64,

        /// Air temperature, °C
        #[arg(short, long, default_value_t = 25.0)]
        temperature: f64,

        /// Weather input convention: legacy | converted
        #[arg(long, default_value = "converted")]
        mode: String,

        /// Decay formulation: ratio | polynomial
        #[arg(long, default_value = "ratio")]
        kinetics: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Sample a concentration profile along the reach and write it as CSV
    Profile {
        /// Output path for the profile CSV
        #[arg(short, long)]
        output: String,

        /// Intermediate sample points per inter-station gap
        #[arg(long, default_value_t = 10)]
        points_per_gap: usize,

        /// Rainfall over the last hour, mm
        #[arg(short, long, default_value_t = 0.0)]
        rainfall: f64,

        /// Air temperature, °C
        #[arg(short, long, default_value_t = 25.0)]
        temperature: f64,

        /// Weather input convention: legacy | converted
        #[arg(long, default_value = "converted")]
        mode: String,

        /// Decay formulation: ratio | polynomial
        #[arg(long, default_value = "ratio")]
        kinetics: String,
    },

    /// Write the curated survey table (CSV with BOM, or HTML for print)
    Survey {
        /// Output path for the survey table
        #[arg(short, long)]
        output: String,

        /// Rainfall over the last hour, mm
        #[arg(short, long, default_value_t = 0.0)]
        rainfall: f64,

        /// Air temperature, °C
        #[arg(short, long, default_value_t = 25.0)]
        temperature: f64,

        /// Weather input convention: legacy | converted
        #[arg(long, default_value = "converted")]
        mode: String,

        /// Decay formulation: ratio | polynomial
        #[arg(long, default_value = "ratio")]
        kinetics: String,

        /// Emit an HTML table instead of CSV
        #[arg(long)]
        html: bool,
    },

    /// Fetch current weather (fallback values on failure) and evaluate
    Weather {
        /// Position along the reach in meters
        #[arg(short = 'z', long)]
        position: f64,

        /// OpenWeather API key (falls back to $OPENWEATHER_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Query latitude
        #[arg(long, default_value_t = weather_api::DEFAULT_LATITUDE)]
        latitude: f64,

        /// Query longitude
        #[arg(long, default_value_t = weather_api::DEFAULT_LONGITUDE)]
        longitude: f64,

        /// Weather input convention: legacy | converted
        #[arg(long, default_value = "converted")]
        mode: String,

        /// Decay formulation: ratio | polynomial
        #[arg(long, default_value = "ratio")]
        kinetics: String,
    },
}

/// Build an engine from the flag strings; unknown names fail here, once.
fn build_engine(mode: &str, kinetics: &str) -> anyhow::Result<Engine> {
    let mode: WeatherMode = mode.parse()?;
    let kinetics: KineticsModel = kinetics.parse()?;
    Ok(Engine::new(mode, kinetics))
}

fn print_concentrations(z: f64, c: &cbr_core::concentration::Concentrations) {
    println!("Position {z} m");
    println!("  BOD5 sample 1: {:>6.2} mg/L", c.bod5_a);
    println!("  BOD5 sample 0: {:>6.2} mg/L", c.bod5_b);
    println!("  NH4+ sample 1: {:>6.2} mg/L", c.nh4_a);
    println!("  NH4+ sample 0: {:>6.2} mg/L", c.nh4_b);
    println!("  NO3- sample 1: {:>6.2} mg/L", c.no3);
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Evaluate {
            position,
            rainfall,
            temperature,
            mode,
            kinetics,
            json,
        } => {
            let engine = build_engine(&mode, &kinetics)?;
            let reading = WeatherReading::new(temperature, rainfall);
            let result = engine.evaluate(position, &reading);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_concentrations(position, &result);
            }
            Ok(())
        }

        Command::Profile {
            output,
            points_per_gap,
            rainfall,
            temperature,
            mode,
            kinetics,
        } => {
            let engine = build_engine(&mode, &kinetics)?;
            let reading = WeatherReading::new(temperature, rainfall);
            let positions = sampling::chart_positions(points_per_gap);
            info!(
                "Sampling {} positions (rainfall {} mm/h, temperature {} C)",
                positions.len(),
                rainfall,
                temperature
            );
            let points = profile::sample(&engine, &reading, &positions);
            let csv = report::profile_csv(&points)?;
            std::fs::write(&output, csv).with_context(|| format!("writing {output}"))?;
            info!("Profile written to {output}");
            Ok(())
        }

        Command::Survey {
            output,
            rainfall,
            temperature,
            mode,
            kinetics,
            html,
        } => {
            let engine = build_engine(&mode, &kinetics)?;
            let reading = WeatherReading::new(temperature, rainfall);
            let positions = sampling::survey_positions();
            let points = profile::sample_survey(&engine, &reading, &positions);
            let body = if html {
                report::survey_html(&points, rainfall, temperature)
            } else {
                report::survey_csv_with_bom(&points, rainfall, temperature)?
            };
            std::fs::write(&output, body).with_context(|| format!("writing {output}"))?;
            info!("Survey table ({} rows) written to {output}", points.len());
            Ok(())
        }

        Command::Weather {
            position,
            api_key,
            latitude,
            longitude,
            mode,
            kinetics,
        } => {
            let engine = build_engine(&mode, &kinetics)?;
            let api_key = api_key.or_else(|| std::env::var("OPENWEATHER_API_KEY").ok());
            let conditions = match api_key {
                Some(key) => {
                    let client = reqwest::Client::builder()
                        .timeout(std::time::Duration::from_secs(30))
                        .build()?;
                    weather_api::fetch_current_conditions(&client, &key, latitude, longitude).await
                }
                None => {
                    warn!("No OpenWeather API key configured, using fallback weather values");
                    weather_api::CurrentConditions {
                        reading: WeatherReading::fallback(),
                        location: "Hanoi (fallback)".to_string(),
                        observed_at: chrono::Utc::now(),
                        is_fallback: true,
                    }
                }
            };

            println!(
                "Weather for {}: {} C, {} mm/h{}",
                conditions.location,
                conditions.reading.air_temperature,
                conditions.reading.rainfall,
                if conditions.is_fallback { " (fallback)" } else { "" }
            );
            let result = engine.evaluate(position, &conditions.reading);
            print_concentrations(position, &result);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_engine_accepts_documented_names() {
        assert!(build_engine("legacy", "ratio").is_ok());
        assert!(build_engine("converted", "polynomial").is_ok());
    }

    #[test]
    fn test_build_engine_rejects_unknown_names_at_startup() {
        assert!(build_engine("debug", "ratio").is_err());
        assert!(build_engine("legacy", "magic").is_err());
    }
}
