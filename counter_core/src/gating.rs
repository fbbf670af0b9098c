//! Gating: decides whether a detection is close enough to a track to be
//! considered the same object.
//!
//! # Gating criterion
//! - `Euclidean`: `‖z − p‖ < threshold`, where `p` is the track's last position.
//! - `PerAxis`:   `|zx − px| < threshold && |zy − py| < threshold`
//!   (an axis-aligned square gate of side `2·threshold`).
//!
//! Both are strict. There is no prediction step: the gate is centred on the
//! last observed sample.

use crate::track::Track;
use serde::{Deserialize, Serialize};

/// Distance rule used to gate a detection against a track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMetric {
    /// Straight-line pixel distance from the last position
    #[default]
    Euclidean,
    /// Independent per-axis distance (square gate)
    PerAxis,
}

impl MatchMetric {
    /// True if `(x, y)` falls inside the gate of `track`.
    pub fn passes(self, track: &Track, x: i32, y: i32, threshold: f64) -> bool {
        match self {
            MatchMetric::Euclidean => track.distance_to(x, y) < threshold,
            MatchMetric::PerAxis => {
                let (px, py) = track.current_position();
                let dx = (i64::from(x) - i64::from(px)).abs();
                let dy = (i64::from(y) - i64::from(py)).abs();
                (dx as f64) < threshold && (dy as f64) < threshold
            }
        }
    }
}
