use serde::{Deserialize, Serialize};

/// Concentrations of the five monitored pollutant indicators at one river
/// position, in mg/L.
///
/// BOD5 and NH4+ each carry two independent sampling/estimation variants
/// (`_a` is the "sample 1" series, `_b` the "sample 0" series); NO3- has a
/// single variant.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Concentrations {
    pub bod5_a: f64,
    pub bod5_b: f64,
    pub nh4_a: f64,
    pub nh4_b: f64,
    pub no3: f64,
}

impl Concentrations {
    /// A vector with the same value in every BOD5/NH4/NO3 slot pair, used for
    /// tributary sources where both sampling variants share one formula.
    pub fn from_groups(bod5: f64, nh4: f64, no3: f64) -> Self {
        Concentrations {
            bod5_a: bod5,
            bod5_b: bod5,
            nh4_a: nh4,
            nh4_b: nh4,
            no3,
        }
    }

    /// Apply `f` to each component, pairing it with the matching component of
    /// `other`. Used for the per-pollutant mixing and clamping steps.
    pub fn zip_with<F>(&self, other: &Concentrations, mut f: F) -> Concentrations
    where
        F: FnMut(f64, f64) -> f64,
    {
        Concentrations {
            bod5_a: f(self.bod5_a, other.bod5_a),
            bod5_b: f(self.bod5_b, other.bod5_b),
            nh4_a: f(self.nh4_a, other.nh4_a),
            nh4_b: f(self.nh4_b, other.nh4_b),
            no3: f(self.no3, other.no3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_groups_duplicates_variants() {
        let c = Concentrations::from_groups(38.1, 15.3, 0.25);
        assert_eq!(c.bod5_a, c.bod5_b);
        assert_eq!(c.nh4_a, c.nh4_b);
        assert_eq!(c.no3, 0.25);
    }

    #[test]
    fn test_zip_with_pairs_components() {
        let a = Concentrations::from_groups(10.0, 4.0, 1.0);
        let b = Concentrations::from_groups(2.0, 1.0, 0.5);
        let sum = a.zip_with(&b, |x, y| x + y);
        assert_eq!(sum.bod5_a, 12.0);
        assert_eq!(sum.nh4_b, 5.0);
        assert_eq!(sum.no3, 1.5);
    }
}
