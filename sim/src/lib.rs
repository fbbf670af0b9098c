//! `sim` — Traffic simulator: vehicle trajectories, simulated detector,
//! ground-truth crossings, replay logs.

pub mod detector_sim;
pub mod replay;
pub mod runner;
pub mod scenarios;
pub mod truth;
pub mod vehicle;

pub use detector_sim::DetectorSimulator;
pub use replay::{load_detections, load_engine_config, load_replay, save_replay, ReplayLog};
pub use runner::{simulate, SimulationRun};
pub use scenarios::{Scenario, ScenarioKind};
pub use truth::CrossingTally;
pub use vehicle::{MotionSpec, Vehicle};
