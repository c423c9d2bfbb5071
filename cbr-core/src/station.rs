use serde::{Deserialize, Serialize};

/// Total modeled length of the Cầu Bây reach, in meters.
pub const REACH_LENGTH: f64 = 8013.0;

/// Half-width of a discharge node: the upstream and downstream sampling
/// points sit this many meters from the gate coordinate.
pub const NODE_HALF_WIDTH: f64 = 2.0;

/// A named monitoring station on the reach.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Station {
    pub name: &'static str,
    /// Distance from the river origin, in meters.
    pub position: f64,
}

/// The six monitoring stations, ordered downstream. Every station after the
/// origin except the terminal one is a discharge gate with a tributary
/// inflow.
pub const STATIONS: [Station; 6] = [
    Station { name: "Sài Đồng", position: 0.0 },
    Station { name: "Đài Tư", position: 1112.0 },
    Station { name: "An Lạc", position: 3170.0 },
    Station { name: "Trâu Quỳ", position: 4590.0 },
    Station { name: "Đa Tốn", position: 7070.0 },
    Station { name: "Xuân Thụy", position: REACH_LENGTH },
];

/// Gate coordinates of the four discharge nodes.
pub const NODE_POSITIONS: [f64; 4] = [1112.0, 3170.0, 4590.0, 7070.0];

/// The 14 critical breakpoints: origin, the ±2 m pair around each discharge
/// gate plus the gate itself, and the end of the reach.
pub fn critical_positions() -> Vec<f64> {
    let mut positions = vec![0.0];
    for node in NODE_POSITIONS {
        positions.push(node - NODE_HALF_WIDTH);
        positions.push(node);
        positions.push(node + NODE_HALF_WIDTH);
    }
    positions.push(REACH_LENGTH);
    positions
}

/// Clamp a query position to the modeled reach. Out-of-domain positions are
/// not an error.
pub fn clamp_position(z: f64) -> f64 {
    z.clamp(0.0, REACH_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourteen_critical_positions() {
        let positions = critical_positions();
        assert_eq!(positions.len(), 14);
        assert_eq!(positions[0], 0.0);
        assert_eq!(positions[1], 1110.0);
        assert_eq!(positions[2], 1112.0);
        assert_eq!(positions[3], 1114.0);
        assert_eq!(positions[13], REACH_LENGTH);
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_stations_ordered_downstream() {
        assert!(STATIONS.windows(2).all(|w| w[0].position < w[1].position));
        assert_eq!(STATIONS[5].position, REACH_LENGTH);
    }

    #[test]
    fn test_clamp_position() {
        assert_eq!(clamp_position(-100.0), 0.0);
        assert_eq!(clamp_position(9000.0), REACH_LENGTH);
        assert_eq!(clamp_position(4590.0), 4590.0);
    }
}
