//! Position sampling and concentration profiles.
//!
//! This crate turns the engine's single-point `evaluate` into the sampled
//! series that chart, heatmap and export consumers need.

/// Position generators along the reach.
pub mod sampling {
    use cbr_core::station::{NODE_HALF_WIDTH, NODE_POSITIONS, REACH_LENGTH, STATIONS};

    /// Chart sampling: every station plus `per_gap` evenly spaced
    /// intermediate points in each inter-station gap, sorted by position.
    pub fn chart_positions(per_gap: usize) -> Vec<f64> {
        let mut positions = Vec::with_capacity(STATIONS.len() + per_gap * (STATIONS.len() - 1));
        for window in STATIONS.windows(2) {
            let (from, to) = (window[0].position, window[1].position);
            positions.push(from);
            for i in 1..=per_gap {
                let progress = i as f64 / (per_gap + 1) as f64;
                positions.push(from + (to - from) * progress);
            }
        }
        positions.push(STATIONS[STATIONS.len() - 1].position);
        positions
    }

    /// Heatmap sampling: `n` evenly spaced positions covering the whole
    /// reach, endpoints included. `n` is typically 60-300.
    pub fn uniform_positions(n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![0.0],
            _ => (0..n)
                .map(|i| REACH_LENGTH * i as f64 / (n - 1) as f64)
                .collect(),
        }
    }

    /// A curated survey position: a label for the output table plus the
    /// query coordinate.
    #[derive(Debug, Clone)]
    pub struct SurveyPosition {
        pub label: String,
        pub position: f64,
    }

    /// The curated survey-table positions: for each gated station the
    /// approach point, the gate itself and the departure point, plus fixed
    /// intermediate offsets between stations, ending at the terminal gate.
    pub fn survey_positions() -> Vec<SurveyPosition> {
        let mut rows: Vec<SurveyPosition> = Vec::new();
        let mut push = |label: String, position: f64| {
            rows.push(SurveyPosition { label, position });
        };

        // Origin region: the first gate and its downstream run.
        push(format!("1. {} at gate", STATIONS[0].name), 0.0);
        for z in [100.0, 300.0, 500.0, 700.0, 900.0] {
            push(format!("{z:.0}"), z);
        }

        // Each discharge node: 2 m before, at, and 2 m after the gate, then
        // 200 m strides to just short of the next critical point.
        for (k, gate) in NODE_POSITIONS.iter().enumerate() {
            let station = &STATIONS[k + 1];
            push(
                format!("{}. {} before gate", k + 2, station.name),
                gate - NODE_HALF_WIDTH,
            );
            push("at gate".to_string(), *gate);
            push("after gate".to_string(), gate + NODE_HALF_WIDTH);

            let next = if k + 1 < NODE_POSITIONS.len() {
                NODE_POSITIONS[k + 1] - NODE_HALF_WIDTH
            } else {
                REACH_LENGTH
            };
            let mut z = gate + NODE_HALF_WIDTH + 200.0;
            while z < next - 100.0 {
                push(format!("{z:.0}"), z);
                z += 200.0;
            }
        }

        push(
            format!("{}. {} at gate", STATIONS.len(), STATIONS[STATIONS.len() - 1].name),
            REACH_LENGTH,
        );
        rows
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_chart_positions_include_all_stations() {
            let positions = chart_positions(3);
            for station in &STATIONS {
                assert!(positions.contains(&station.position));
            }
            assert_eq!(positions.len(), STATIONS.len() + 3 * (STATIONS.len() - 1));
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn test_chart_positions_no_intermediates() {
            let positions = chart_positions(0);
            assert_eq!(positions.len(), STATIONS.len());
        }

        #[test]
        fn test_uniform_positions_cover_reach() {
            let positions = uniform_positions(100);
            assert_eq!(positions.len(), 100);
            assert_eq!(positions[0], 0.0);
            assert_eq!(positions[99], REACH_LENGTH);
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn test_uniform_positions_degenerate_counts() {
            assert!(uniform_positions(0).is_empty());
            assert_eq!(uniform_positions(1), vec![0.0]);
        }

        #[test]
        fn test_survey_positions_hit_every_breakpoint_region() {
            let rows = survey_positions();
            // Roughly the curated table size of the monitoring campaign.
            assert!(rows.len() >= 40 && rows.len() <= 50, "got {}", rows.len());
            assert_eq!(rows[0].position, 0.0);
            assert_eq!(rows.last().unwrap().position, REACH_LENGTH);
            for gate in NODE_POSITIONS {
                assert!(rows.iter().any(|r| r.position == gate - NODE_HALF_WIDTH));
                assert!(rows.iter().any(|r| r.position == gate));
                assert!(rows.iter().any(|r| r.position == gate + NODE_HALF_WIDTH));
            }
            assert!(rows.windows(2).all(|w| w[0].position < w[1].position));
        }
    }
}

/// Batch evaluation of position lists against one engine configuration.
pub mod profile {
    use cbr_core::concentration::Concentrations;
    use cbr_core::engine::Engine;
    use cbr_core::weather::WeatherReading;
    use serde::Serialize;

    use crate::sampling::SurveyPosition;

    /// One sampled point of a concentration profile.
    #[derive(Debug, Clone, Serialize)]
    pub struct ProfilePoint {
        pub position: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub label: Option<String>,
        #[serde(flatten)]
        pub concentrations: Concentrations,
    }

    /// Evaluate the engine at each position for a fixed weather reading.
    pub fn sample(engine: &Engine, reading: &WeatherReading, positions: &[f64]) -> Vec<ProfilePoint> {
        positions
            .iter()
            .map(|&z| ProfilePoint {
                position: z,
                label: None,
                concentrations: engine.evaluate(z, reading),
            })
            .collect()
    }

    /// Evaluate the engine at each labeled survey position.
    pub fn sample_survey(
        engine: &Engine,
        reading: &WeatherReading,
        positions: &[SurveyPosition],
    ) -> Vec<ProfilePoint> {
        positions
            .iter()
            .map(|p| ProfilePoint {
                position: p.position,
                label: Some(p.label.clone()),
                concentrations: engine.evaluate(p.position, reading),
            })
            .collect()
    }

}
