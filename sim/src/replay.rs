//! Replay: serialize/deserialize detection logs for offline counting.

use anyhow::Context;
use counter_core::{config::EngineConfig, metrics::LineGroundTruth, types::DetectionFrame};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A full recorded detector log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplayLog {
    pub scenario_name: String,
    pub seed: u64,
    /// Lines and association parameters used when recording
    pub engine: EngineConfig,
    /// Detector output in frame order
    pub frames: Vec<DetectionFrame>,
    /// True per-line crossings, empty for logs of real footage
    #[serde(default)]
    pub ground_truth: Vec<LineGroundTruth>,
}

/// Save a replay log to a JSON file.
pub fn save_replay(log: &ReplayLog, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating replay file {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, log)?;
    Ok(())
}

/// Load a replay log from a JSON file.
pub fn load_replay(path: &Path) -> anyhow::Result<ReplayLog> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening replay file {}", path.display()))?;
    let reader = BufReader::new(file);
    let log: ReplayLog = serde_json::from_reader(reader)
        .with_context(|| format!("parsing replay file {}", path.display()))?;
    Ok(log)
}

/// Load a bare JSON array of detection frames (external detector output).
pub fn load_detections(path: &Path) -> anyhow::Result<Vec<DetectionFrame>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening detections file {}", path.display()))?;
    let frames: Vec<DetectionFrame> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing detections file {}", path.display()))?;
    Ok(frames)
}

/// Load an engine configuration from a JSON file.
pub fn load_engine_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening config file {}", path.display()))?;
    let config: EngineConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(config)
}
