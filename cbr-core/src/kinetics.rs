//! Decay/growth kinetics: per-pollutant change magnitudes as a function of
//! travel time and temperature.
//!
//! Two formulations exist in the calibration lineage. The ratio-kinetics
//! model (competing first-order BOD-degradation and re-aeration rates) is the
//! default; the older polynomial-rate model (a single temperature multiplier)
//! is kept as an explicit choice. A given engine uses exactly one of them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::concentration::Concentrations;

/// BOD degradation rate constant at 20 °C, per day.
const BOD_DECAY_RATE_20C: f64 = 0.165;
/// Arrhenius-style temperature correction base for the BOD rate.
const BOD_DECAY_THETA: f64 = 1.091;
/// Reference re-aeration rate constant, per day.
const REAERATION_RATE: f64 = 0.279;

/// Which decay formulation the engine applies.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub enum KineticsModel {
    /// `Δ = 2.5^((Y-26)/10) · poly(t)` for every pollutant.
    PolynomialRate,
    /// Separate BOD and nitrogen fractions from competing exponential rates.
    #[default]
    Ratio,
}

impl FromStr for KineticsModel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "polynomial" | "polynomial-rate" => Ok(KineticsModel::PolynomialRate),
            "ratio" | "ratio-kinetics" => Ok(KineticsModel::Ratio),
            other => anyhow::bail!("unknown kinetics model: {other} (expected ratio|polynomial)"),
        }
    }
}

/// Temperature multiplier of the polynomial-rate model.
pub fn temperature_factor(y: f64) -> f64 {
    2.5_f64.powf((y - 26.0) / 10.0)
}

/// BOD fraction of the ratio-kinetics model. `t` is in minutes, `y` in the
/// model's temperature units.
pub fn tbod(t: f64, y: f64) -> f64 {
    let days = t / 60.0 / 24.0;
    let numerator = 1.0 - (-days * BOD_DECAY_RATE_20C * BOD_DECAY_THETA.powf(y - 20.0)).exp();
    let denominator = 1.0 - (-days * REAERATION_RATE).exp();
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Nitrogen fraction of the ratio-kinetics model.
pub fn tn(t: f64, y: f64) -> f64 {
    let days = t / 60.0 / 24.0;
    let numerator = (-days * BOD_DECAY_RATE_20C * BOD_DECAY_THETA.powf(y - 20.0)).exp();
    let denominator = (-days * REAERATION_RATE).exp();
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

// Calibrated decay-rate polynomials per pollutant, quadratic in travel time
// (minutes). The NO3 polynomial goes negative over typical travel times,
// which is what makes nitrate grow in transport.

pub fn d_bod5_a(t: f64) -> f64 {
    -1e-5 * t * t + 0.0305 * t - 0.4113
}

pub fn d_bod5_b(t: f64) -> f64 {
    0.0012 * t - 2e-15
}

pub fn d_nh4_a(t: f64) -> f64 {
    -1e-6 * t * t + 0.0021 * t - 0.0121
}

pub fn d_nh4_b(t: f64) -> f64 {
    -2e-7 * t * t + 0.0003 * t - 0.0006
}

pub fn d_no3(t: f64) -> f64 {
    6e-7 * t * t - 0.0006 * t - 0.0085
}

/// Per-pollutant change magnitudes for one transport step of `t` minutes at
/// temperature `y`. The caller subtracts these from the upstream vector.
pub fn decay_amounts(model: KineticsModel, t: f64, y: f64) -> Concentrations {
    match model {
        KineticsModel::PolynomialRate => {
            let factor = temperature_factor(y);
            Concentrations {
                bod5_a: factor * d_bod5_a(t),
                bod5_b: factor * d_bod5_b(t),
                nh4_a: factor * d_nh4_a(t),
                nh4_b: factor * d_nh4_b(t),
                no3: factor * d_no3(t),
            }
        }
        KineticsModel::Ratio => {
            let bod_fraction = tbod(t, y);
            let n_fraction = tn(t, y);
            Concentrations {
                bod5_a: bod_fraction * d_bod5_a(t),
                bod5_b: bod_fraction * d_bod5_b(t),
                nh4_a: n_fraction * d_nh4_a(t),
                nh4_b: n_fraction * d_nh4_b(t),
                no3: n_fraction * d_no3(t),
            }
        }
    }
}
