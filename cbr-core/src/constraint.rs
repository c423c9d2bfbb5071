//! Constraint enforcement for computed concentrations: monotonic clamps
//! against the immediate upstream value, non-finite fallback, and the final
//! floor-at-zero plus 2-decimal truncation applied on output.

use crate::concentration::Concentrations;

/// Monotone direction a pollutant obeys along a purely-decaying stretch.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Trend {
    /// BOD5 and NH4+: never above the upstream value.
    Decreasing,
    /// NO3-: never below the upstream value.
    Increasing,
}

/// Clamp `value` against `upstream` for the given trend. A non-finite value
/// falls back to the upstream value, or 0 if the upstream value is itself
/// non-finite.
pub fn clamp_to_trend(value: f64, upstream: f64, trend: Trend) -> f64 {
    if !value.is_finite() {
        return if upstream.is_finite() { upstream } else { 0.0 };
    }
    if !upstream.is_finite() {
        return value;
    }
    match trend {
        Trend::Decreasing if value > upstream => upstream,
        Trend::Increasing if value < upstream => upstream,
        _ => value,
    }
}

/// Clamp every component of a transported vector against its upstream
/// vector: decrease-only for both BOD5 and both NH4 variants, increase-only
/// for NO3.
pub fn clamp_vector(value: &Concentrations, upstream: &Concentrations) -> Concentrations {
    Concentrations {
        bod5_a: clamp_to_trend(value.bod5_a, upstream.bod5_a, Trend::Decreasing),
        bod5_b: clamp_to_trend(value.bod5_b, upstream.bod5_b, Trend::Decreasing),
        nh4_a: clamp_to_trend(value.nh4_a, upstream.nh4_a, Trend::Decreasing),
        nh4_b: clamp_to_trend(value.nh4_b, upstream.nh4_b, Trend::Decreasing),
        no3: clamp_to_trend(value.no3, upstream.no3, Trend::Increasing),
    }
}

/// Truncate (not round) to 2 decimal places; non-finite values become 0.
pub fn truncate_two_decimals(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).floor() / 100.0
}

/// Output finalization: floor each component at 0 and truncate to 2
/// decimals. Applied exactly once per query, never on intermediate chain
/// values.
pub fn finalize(c: &Concentrations) -> Concentrations {
    let out = |v: f64| truncate_two_decimals(v).max(0.0);
    Concentrations {
        bod5_a: out(c.bod5_a),
        bod5_b: out(c.bod5_b),
        nh4_a: out(c.nh4_a),
        nh4_b: out(c.nh4_b),
        no3: out(c.no3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decreasing_clamps_upward_drift() {
        assert_eq!(clamp_to_trend(5.1, 5.0, Trend::Decreasing), 5.0);
        assert_eq!(clamp_to_trend(4.9, 5.0, Trend::Decreasing), 4.9);
    }

    #[test]
    fn test_increasing_clamps_downward_drift() {
        assert_eq!(clamp_to_trend(0.2, 0.25, Trend::Increasing), 0.25);
        assert_eq!(clamp_to_trend(0.3, 0.25, Trend::Increasing), 0.3);
    }

    #[test]
    fn test_non_finite_falls_back_to_upstream() {
        assert_eq!(clamp_to_trend(f64::NAN, 5.0, Trend::Decreasing), 5.0);
        assert_eq!(clamp_to_trend(f64::INFINITY, 5.0, Trend::Increasing), 5.0);
        assert_eq!(clamp_to_trend(f64::NAN, f64::NAN, Trend::Decreasing), 0.0);
        assert_eq!(clamp_to_trend(3.0, f64::NAN, Trend::Decreasing), 3.0);
    }

    #[test]
    fn test_truncation_floors_toward_zero_from_above() {
        assert_eq!(truncate_two_decimals(38.109), 38.1);
        assert_eq!(truncate_two_decimals(0.2504), 0.25);
        assert_eq!(truncate_two_decimals(15.299999), 15.29);
        assert_eq!(truncate_two_decimals(f64::NAN), 0.0);
        assert_eq!(truncate_two_decimals(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_finalize_floors_at_zero() {
        let c = Concentrations::from_groups(-0.5, 1.239, f64::NAN);
        let out = finalize(&c);
        assert_eq!(out.bod5_a, 0.0);
        assert_eq!(out.nh4_a, 1.23);
        assert_eq!(out.no3, 0.0);
    }

    #[test]
    fn test_clamp_vector_directions() {
        let upstream = Concentrations::from_groups(10.0, 5.0, 0.3);
        let drifted = Concentrations::from_groups(10.5, 4.8, 0.2);
        let clamped = clamp_vector(&drifted, &upstream);
        assert_eq!(clamped.bod5_a, 10.0);
        assert_eq!(clamped.bod5_b, 10.0);
        assert_eq!(clamped.nh4_a, 4.8);
        assert_eq!(clamped.no3, 0.3);
    }
}
