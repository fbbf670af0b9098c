//! Aggregated counting statistics exposed to reporters.

use crate::types::LineId;
use serde::{Deserialize, Serialize};

/// Statistics for one counting line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineStats {
    pub line_id: LineId,
    /// Tracks ever created on the line
    pub count: u64,
    /// Mean of recorded speeds (px/s), 0.0 without samples
    pub average_speed: f64,
    /// Number of recorded speed samples
    pub sample_count: usize,
}

/// Run-wide totals across all lines.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_count: u64,
    /// Mean over every line's speed samples pooled together
    pub global_average_speed: f64,
    pub sample_count: usize,
}

/// Snapshot of all statistics at a given frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Frames processed so far
    pub frames: u64,
    pub lines: Vec<LineStats>,
    pub global: GlobalStats,
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
