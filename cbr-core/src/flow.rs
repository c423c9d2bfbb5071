//! Volumetric flow model: every flow on the reach is an affine function of
//! the rainfall coefficient X, with coefficients calibrated per discharge
//! point. The coefficient table is empirical and reproduced verbatim from the
//! calibration study.

/// An affine law `base + slope * x`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Affine {
    pub base: f64,
    pub slope: f64,
}

impl Affine {
    pub const fn new(base: f64, slope: f64) -> Self {
        Affine { base, slope }
    }

    pub fn at(&self, x: f64) -> f64 {
        self.base + self.slope * x
    }
}

/// Main-channel flow per segment, ordered downstream. Segment k spans from
/// the downstream point of node k-1 (the origin for k = 0) to the upstream
/// point of node k (the end of the reach for the last segment).
pub const MAIN_CHANNEL: [Affine; 5] = [
    Affine::new(1250.0, 13550.0),
    Affine::new(1480.0, 17370.0),
    Affine::new(2522.0, 35700.0),
    Affine::new(4839.0, 46720.0),
    Affine::new(6074.0, 53610.0),
];

/// Tributary inflow at each discharge node, same order as
/// `station::NODE_POSITIONS`.
pub const TRIBUTARIES: [Affine; 4] = [
    Affine::new(230.0, 3820.0),
    Affine::new(1042.0, 18330.0),
    Affine::new(2317.0, 11020.0),
    Affine::new(1235.0, 6890.0),
];

/// Empirical unit-conversion factor between meters of channel, flow, and
/// minutes of travel time.
pub const TRAVEL_TIME_FACTOR: f64 = 480.0;

/// Travel time in minutes for water to cover `distance` meters at segment
/// flow `q`.
pub fn travel_time(distance: f64, q: f64) -> f64 {
    TRAVEL_TIME_FACTOR * distance / q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mass_balance_at_every_node() {
        // Downstream flow must equal upstream flow plus tributary flow, for
        // any rainfall: both base and slope terms have to add up exactly.
        for k in 0..TRIBUTARIES.len() {
            assert_eq!(
                MAIN_CHANNEL[k].base + TRIBUTARIES[k].base,
                MAIN_CHANNEL[k + 1].base
            );
            assert_eq!(
                MAIN_CHANNEL[k].slope + TRIBUTARIES[k].slope,
                MAIN_CHANNEL[k + 1].slope
            );
        }
        for x in [0.0, 0.5, 3.0, 25.0, 100.0] {
            for k in 0..TRIBUTARIES.len() {
                assert_eq!(
                    MAIN_CHANNEL[k].at(x) + TRIBUTARIES[k].at(x),
                    MAIN_CHANNEL[k + 1].at(x)
                );
            }
        }
    }

    #[test]
    fn test_flow_increases_with_rainfall() {
        for law in MAIN_CHANNEL.iter().chain(TRIBUTARIES.iter()) {
            assert!(law.base > 0.0);
            assert!(law.slope > 0.0);
            assert!(law.at(10.0) > law.at(0.0));
        }
    }

    #[test]
    fn test_travel_time() {
        // Full first segment in dry weather: 480 * 1110 / 1250 minutes.
        assert_eq!(travel_time(1110.0, MAIN_CHANNEL[0].at(0.0)), 426.24);
        // More flow, less time.
        assert!(
            travel_time(1110.0, MAIN_CHANNEL[0].at(5.0))
                < travel_time(1110.0, MAIN_CHANNEL[0].at(0.0))
        );
    }
}
