//! The transport-and-mixing engine: a pure function from (position,
//! rainfall, temperature) to the five pollutant concentrations.
//!
//! The reach is an ordered list of main-channel segments separated by
//! discharge nodes. Evaluation walks upstream node-by-node from the river
//! origin: each segment advances the concentration vector by decay over the
//! travel time, each node mixes in its tributary by flow weighting. The walk
//! is stateless; every call rebuilds its own chain.

use crate::concentration::Concentrations;
use crate::constraint::{clamp_vector, finalize};
use crate::flow::{travel_time, Affine, MAIN_CHANNEL, TRIBUTARIES};
use crate::kinetics::{decay_amounts, KineticsModel};
use crate::station::{clamp_position, NODE_HALF_WIDTH, NODE_POSITIONS};
use crate::weather::{normalize, ModelInputs, WeatherMode, WeatherReading};

// Pollutant load numerators at the origin; concentration = load / Q_1.
const ORIGIN_BOD5_LOAD: Affine = Affine::new(47625.0, 9.0 * 13550.0);
const ORIGIN_NH4_LOAD: Affine = Affine::new(19125.0, 0.56 * 13550.0);
const ORIGIN_NO3_LOAD: Affine = Affine::new(313.0, 0.14 * 13550.0);

/// A discharge node: tributary flow plus pollutant load numerators, all
/// affine in the rainfall coefficient. Source concentration = load / q_trib.
#[derive(Debug, Clone, Copy)]
struct ConfluenceNode {
    position: f64,
    tributary: Affine,
    bod5_load: Affine,
    nh4_load: Affine,
    no3_load: Affine,
}

impl ConfluenceNode {
    /// Tributary source water at the gate, evaluated directly at the node
    /// (not decayed; it enters at that instant).
    fn source_concentrations(&self, x: f64) -> Concentrations {
        let q = self.tributary.at(x);
        Concentrations::from_groups(
            self.bod5_load.at(x) / q,
            self.nh4_load.at(x) / q,
            self.no3_load.at(x) / q,
        )
    }
}

/// The four discharge nodes, ordered downstream. Coefficients are the
/// calibration constants of the model.
const NODES: [ConfluenceNode; 4] = [
    ConfluenceNode {
        position: NODE_POSITIONS[0],
        tributary: TRIBUTARIES[0],
        bod5_load: Affine::new(8736.0, 34380.0),
        nh4_load: Affine::new(3519.0, 2139.0),
        no3_load: Affine::new(58.0, 535.0),
    },
    ConfluenceNode {
        position: NODE_POSITIONS[1],
        tributary: TRIBUTARIES[1],
        bod5_load: Affine::new(39688.0, 164970.0),
        nh4_load: Affine::new(15938.0, 10265.0),
        no3_load: Affine::new(260.0, 2566.0),
    },
    ConfluenceNode {
        position: NODE_POSITIONS[2],
        tributary: TRIBUTARIES[2],
        bod5_load: Affine::new(88278.0, 99180.0),
        nh4_load: Affine::new(35450.0, 6171.0),
        no3_load: Affine::new(579.0, 1543.0),
    },
    ConfluenceNode {
        position: NODE_POSITIONS[3],
        tributary: TRIBUTARIES[3],
        bod5_load: Affine::new(47054.0, 62010.0),
        nh4_load: Affine::new(18896.0, 3858.0),
        no3_load: Affine::new(309.0, 965.0),
    },
];

/// Which of the 18 evaluation cases a (clamped) position falls into.
///
/// Equality against the critical breakpoints is exact: the chained upstream
/// recomputation depends on hitting the discharge-node points precisely.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PositionCase {
    /// The river origin, Z = 0.
    Origin,
    /// Strictly inside segment `segment`, before the next gate (the last
    /// segment runs to the end of the reach).
    Reach { segment: usize },
    /// Exactly 2 m upstream of gate `node`.
    UpstreamGate { node: usize },
    /// Exactly at gate `node`: pure tributary source water.
    AtGate { node: usize },
    /// At (or within) 2 m downstream of gate `node`: the mixed vector.
    DownstreamGate { node: usize },
}

/// Classify a clamped position onto the case table.
pub fn classify(z: f64) -> PositionCase {
    if z == 0.0 {
        return PositionCase::Origin;
    }
    for (k, node) in NODES.iter().enumerate() {
        let gate_upstream = node.position - NODE_HALF_WIDTH;
        if z == gate_upstream {
            return PositionCase::UpstreamGate { node: k };
        }
        if z < node.position {
            // Includes the open gap (gate-2, gate): the in-segment transport
            // formula extends continuously up to the gate.
            return PositionCase::Reach { segment: k };
        }
        if z == node.position {
            return PositionCase::AtGate { node: k };
        }
        if z <= node.position + NODE_HALF_WIDTH {
            return PositionCase::DownstreamGate { node: k };
        }
    }
    PositionCase::Reach {
        segment: NODES.len(),
    }
}

/// Advance a concentration vector `distance` meters through a segment with
/// flow `q`, applying decay over the travel time and the monotonic clamps
/// against the upstream value.
fn transport(
    upstream: &Concentrations,
    distance: f64,
    q: f64,
    y: f64,
    model: KineticsModel,
) -> Concentrations {
    if distance <= 0.0 {
        return *upstream;
    }
    let t = travel_time(distance, q);
    let delta = decay_amounts(model, t, y);
    let advanced = upstream.zip_with(&delta, |c, d| c - d);
    clamp_vector(&advanced, upstream)
}

/// The concentration vector and position of segment `k`'s upstream reference
/// point: the origin for the first segment, otherwise the mixed vector just
/// downstream of the previous gate.
fn segment_inflow(k: usize, x: f64, y: f64, model: KineticsModel) -> (Concentrations, f64) {
    if k == 0 {
        let q = MAIN_CHANNEL[0].at(x);
        let origin = Concentrations::from_groups(
            ORIGIN_BOD5_LOAD.at(x) / q,
            ORIGIN_NH4_LOAD.at(x) / q,
            ORIGIN_NO3_LOAD.at(x) / q,
        );
        (origin, 0.0)
    } else {
        let node = k - 1;
        (
            mixed_below_gate(node, x, y, model),
            NODES[node].position + NODE_HALF_WIDTH,
        )
    }
}

/// Flow-weighted mix at node `node`: the transported upstream vector against
/// the tributary source, weighted by their flows. The denominator is the
/// downstream channel flow (mass conservation).
fn mixed_below_gate(node: usize, x: f64, y: f64, model: KineticsModel) -> Concentrations {
    let gate = &NODES[node];
    let (upstream, start) = segment_inflow(node, x, y, model);
    let q_up = MAIN_CHANNEL[node].at(x);
    let gate_upstream = gate.position - NODE_HALF_WIDTH;
    let at_gate = transport(&upstream, gate_upstream - start, q_up, y, model);

    let q_trib = gate.tributary.at(x);
    let q_down = MAIN_CHANNEL[node + 1].at(x);
    at_gate.zip_with(&gate.source_concentrations(x), |c_up, c_trib| {
        (c_up * q_up + c_trib * q_trib) / q_down
    })
}

/// Evaluate the model at position `z` (meters, clamped to the reach) for
/// rainfall coefficient `x` and temperature coefficient `y`.
///
/// Pure and deterministic: identical inputs give bit-identical output.
pub fn evaluate_model(z: f64, x: f64, y: f64, model: KineticsModel) -> Concentrations {
    let z = clamp_position(z);
    match classify(z) {
        PositionCase::Origin => {
            let (origin, _) = segment_inflow(0, x, y, model);
            finalize(&origin)
        }
        PositionCase::AtGate { node } => finalize(&NODES[node].source_concentrations(x)),
        PositionCase::DownstreamGate { node } => finalize(&mixed_below_gate(node, x, y, model)),
        PositionCase::UpstreamGate { node } => {
            let (upstream, start) = segment_inflow(node, x, y, model);
            let q = MAIN_CHANNEL[node].at(x);
            let gate_upstream = NODES[node].position - NODE_HALF_WIDTH;
            finalize(&transport(&upstream, gate_upstream - start, q, y, model))
        }
        PositionCase::Reach { segment } => {
            let (upstream, start) = segment_inflow(segment, x, y, model);
            let q = MAIN_CHANNEL[segment].at(x);
            finalize(&transport(&upstream, z - start, q, y, model))
        }
    }
}

/// An engine configuration: the weather-input convention and the kinetics
/// formulation, both fixed at construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    pub mode: WeatherMode,
    pub kinetics: KineticsModel,
}

impl Engine {
    pub fn new(mode: WeatherMode, kinetics: KineticsModel) -> Self {
        Engine { mode, kinetics }
    }

    /// Normalize a raw weather reading and evaluate at `z`.
    pub fn evaluate(&self, z: f64, reading: &WeatherReading) -> Concentrations {
        let ModelInputs { x, y } = normalize(self.mode, reading);
        evaluate_model(z, x, y, self.kinetics)
    }

    /// Evaluate with already-normalized model coefficients.
    pub fn evaluate_raw(&self, z: f64, x: f64, y: f64) -> Concentrations {
        evaluate_model(z, x, y, self.kinetics)
    }
}
