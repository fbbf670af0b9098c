//! Scenario definitions.
//!
//! Each scenario is a named configuration of vehicles, a camera and the
//! counting lines drawn on its image. All scenarios are deterministic given
//! the same seed.

use crate::vehicle::{MotionSpec, Vehicle};
use counter_core::{config::EngineConfig, line::LineGeometry};
use detector_models::{BlobFilter, CameraParams};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Which pre-defined scenario to load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenarioKind {
    /// 2 lanes, 6 vehicles, ideal detector
    Simple,
    /// The 7-lane reference highway camera, mixed traffic, noisy detector
    Highway,
    /// 3 slow lanes with stop-and-go queues and short headways
    Congested,
    /// 50 lanes, ~2000 vehicles — throughput stress test
    Stress,
}

/// A fully configured simulation scenario.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub seed: u64,
    pub duration: f64, // seconds
    pub camera: CameraParams,
    pub blob_filter: BlobFilter,
    pub engine: EngineConfig,
    pub vehicles: Vec<Vehicle>,
}

/// Bounding boxes (w, h) of the simulated vehicle classes.
const CAR: (i32, i32) = (80, 60);
const TRUCK: (i32, i32) = (140, 110);
const MOTORBIKE: (i32, i32) = (30, 45);

impl Scenario {
    /// Build the named scenario. Uses `seed` for repeatability.
    pub fn build(kind: ScenarioKind, seed: u64) -> Self {
        match kind {
            ScenarioKind::Simple => Self::simple(seed),
            ScenarioKind::Highway => Self::highway(seed),
            ScenarioKind::Congested => Self::congested(seed),
            ScenarioKind::Stress => Self::stress(seed),
        }
    }

    /// Simulation step: one camera frame.
    pub fn frame_dt(&self) -> f64 {
        self.camera.frame_period()
    }

    /// Number of frames in the scenario.
    pub fn frame_count(&self) -> u64 {
        (self.duration * self.camera.fps).round().max(0.0) as u64
    }

    // -----------------------------------------------------------------------
    // Scenario 1: Simple
    // -----------------------------------------------------------------------
    fn simple(seed: u64) -> Self {
        let lines = vec![
            LineGeometry::new(300, 500, 600, 10),
            LineGeometry::new(700, 900, 600, 10),
        ];
        let vehicles = (0..6)
            .map(|i| {
                let x = if i % 2 == 0 { 400.0 } else { 800.0 };
                Vehicle::new(i, [x, 100.0], [0.0, 250.0], CAR, MotionSpec::ConstantVelocity)
                    .appearing_at(i as f64 * 1.5)
            })
            .collect();

        Scenario {
            name: "simple".into(),
            seed,
            duration: 12.0,
            camera: CameraParams {
                p_detection: 1.0,
                jitter_px: 0,
                clutter_rate: 0.0,
                ..Default::default()
            },
            blob_filter: BlobFilter::default(),
            engine: EngineConfig::with_lines(lines),
            vehicles,
        }
    }

    // -----------------------------------------------------------------------
    // Scenario 2: Highway
    // -----------------------------------------------------------------------
    fn highway(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
        let engine = EngineConfig::default();
        let mut vehicles = Vec::new();
        let mut id = 0u64;

        for line in &engine.lines {
            let centre = f64::from(line.x1 + line.x2) / 2.0;
            let mut t = rng.gen::<f64>() * 2.0;
            while t < 55.0 {
                let size = match rng.gen_range(0..10) {
                    0 => TRUCK,
                    1 => MOTORBIKE,
                    _ => CAR,
                };
                let speed = 200.0 + rng.gen::<f64>() * 250.0;
                let x = centre + (rng.gen::<f64>() - 0.5) * 10.0;
                let start_y = f64::from(line.y_ref) - 350.0;
                vehicles.push(
                    Vehicle::new(id, [x, start_y], [0.0, speed], size, MotionSpec::ConstantVelocity)
                        .appearing_at(t),
                );
                id += 1;
                // headway: at least 1.2 s so vehicles in one lane never share a gate
                t += 1.2 + rng.gen::<f64>() * 4.0;
            }
        }

        Scenario {
            name: "highway".into(),
            seed,
            duration: 60.0,
            camera: CameraParams::default(),
            blob_filter: BlobFilter::default(),
            engine,
            vehicles,
        }
    }

    // -----------------------------------------------------------------------
    // Scenario 3: Congested
    // -----------------------------------------------------------------------
    fn congested(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(2));
        let lines = vec![
            LineGeometry::new(200, 400, 700, 10),
            LineGeometry::new(450, 650, 700, 10),
            LineGeometry::new(700, 900, 700, 10),
        ];
        let mut vehicles = Vec::new();
        let mut id = 0u64;

        for line in &lines {
            let centre = f64::from(line.x1 + line.x2) / 2.0;
            let mut t = 0.0;
            while t < 50.0 {
                let speed = 60.0 + rng.gen::<f64>() * 60.0;
                let stop_at = t + 2.0 + rng.gen::<f64>() * 3.0;
                let go_at = stop_at + 1.0 + rng.gen::<f64>() * 2.0;
                let motion = MotionSpec::Segmented {
                    segments: vec![
                        (stop_at, Box::new(MotionSpec::Stopped)),
                        (go_at, Box::new(MotionSpec::ConstantVelocity)),
                    ],
                };
                vehicles.push(
                    Vehicle::new(id, [centre, 400.0], [0.0, speed], CAR, motion).appearing_at(t),
                );
                id += 1;
                t += 0.8 + rng.gen::<f64>() * 1.5;
            }
        }

        Scenario {
            name: "congested".into(),
            seed,
            duration: 60.0,
            camera: CameraParams {
                jitter_px: 3,
                clutter_rate: 1.0,
                ..Default::default()
            },
            blob_filter: BlobFilter::default(),
            engine: EngineConfig::with_lines(lines),
            vehicles,
        }
    }

    // -----------------------------------------------------------------------
    // Scenario 4: Stress
    // -----------------------------------------------------------------------
    fn stress(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(3));
        let camera = CameraParams {
            width: 10_000,
            height: 2_000,
            ..Default::default()
        };
        let lines: Vec<LineGeometry> = (0..50)
            .map(|i| {
                let x1 = i * 200;
                LineGeometry::new(x1, x1 + 180, 1000 + (i % 5) * 100, 10)
            })
            .collect();

        let vehicles = (0..2000)
            .map(|i| {
                let lane = &lines[rng.gen_range(0..lines.len())];
                let x = f64::from(lane.x1 + lane.x2) / 2.0;
                let speed = 150.0 + rng.gen::<f64>() * 350.0;
                Vehicle::new(i, [x, 0.0], [0.0, speed], CAR, MotionSpec::ConstantVelocity)
                    .appearing_at(rng.gen::<f64>() * 50.0)
            })
            .collect();

        Scenario {
            name: "stress".into(),
            seed,
            duration: 60.0,
            camera,
            blob_filter: BlobFilter::default(),
            engine: EngineConfig::with_lines(lines),
            vehicles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scenario_has_a_valid_engine_config() {
        for kind in [
            ScenarioKind::Simple,
            ScenarioKind::Highway,
            ScenarioKind::Congested,
            ScenarioKind::Stress,
        ] {
            let s = Scenario::build(kind.clone(), 42);
            s.engine.validate().unwrap();
            assert!(!s.vehicles.is_empty(), "{:?} has no vehicles", kind);
            assert!(s.frame_count() > 0);
        }
    }

    #[test]
    fn build_is_deterministic() {
        let a = Scenario::build(ScenarioKind::Highway, 9);
        let b = Scenario::build(ScenarioKind::Highway, 9);
        assert_eq!(a.vehicles.len(), b.vehicles.len());
        assert_eq!(a.vehicles[3].state, b.vehicles[3].state);
        assert_eq!(a.vehicles[3].appear_at, b.vehicles[3].appear_at);
    }

    #[test]
    fn simple_frame_count() {
        let s = Scenario::build(ScenarioKind::Simple, 0);
        assert_eq!(s.frame_count(), 360);
    }
}
