//! Counting line: a horizontal pixel band owning its own track registry,
//! crossing count and speed samples.
//!
//! # Policy
//! - **Membership**: a detection belongs to the line when
//!   `x1 ≤ x ≤ x2` and `|y − y_ref| ≤ margin` (both bounds inclusive).
//!   Direction and prior side are not considered.
//! - **Matching**: tracks are scanned in ascending id order and the FIRST one
//!   whose gate accepts the detection wins. This is first-match, not
//!   closest-match.
//! - **Birth**: an unmatched detection creates a track and counts one crossing.
//! - **Expiry**: tracks unseen for more than `max_tracking` frames are removed;
//!   the crossing count is never decremented.

use crate::{
    error::{CountingError, Result},
    gating::MatchMetric,
    stats::{mean, LineStats},
    track::Track,
    types::{FrameIndex, LineId, TrackId},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default vertical tolerance of a line band (pixels).
pub const DEFAULT_MARGIN: i32 = 10;

fn default_margin() -> i32 {
    DEFAULT_MARGIN
}

/// Geometry of a horizontal counting band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineGeometry {
    /// Left end (inclusive)
    #[serde(alias = "cx1")]
    pub x1: i32,
    /// Right end (inclusive)
    #[serde(alias = "cx2")]
    pub x2: i32,
    /// Row shared by both endpoints
    #[serde(alias = "cy1", alias = "y1_ref")]
    pub y_ref: i32,
    /// Vertical tolerance around `y_ref` (inclusive)
    #[serde(default = "default_margin")]
    pub margin: i32,
}

impl LineGeometry {
    pub fn new(x1: i32, x2: i32, y_ref: i32, margin: i32) -> Self {
        Self {
            x1,
            x2,
            y_ref,
            margin,
        }
    }

    /// Reject degenerate bands.
    pub fn validate(&self, line_id: LineId) -> Result<()> {
        if self.x1 > self.x2 {
            return Err(CountingError::InvalidLine {
                line_id,
                reason: format!("x1 ({}) must not exceed x2 ({})", self.x1, self.x2),
            });
        }
        if self.margin < 0 {
            return Err(CountingError::InvalidLine {
                line_id,
                reason: format!("margin must be non-negative, got {}", self.margin),
            });
        }
        Ok(())
    }

    /// Inclusive band membership test.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let dy = (i64::from(y) - i64::from(self.y_ref)).abs();
        self.x1 <= x && x <= self.x2 && dy <= i64::from(self.margin)
    }
}

/// Gate parameters shared by every line of an engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gate {
    pub threshold: f64,
    pub metric: MatchMetric,
}

/// Outcome of one match-or-create on a line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineUpdate {
    pub track_id: TrackId,
    /// Speed computed on a match; 0.0 for a new track
    pub speed: f64,
    pub is_new: bool,
}

/// One counting line and its local track registry.
#[derive(Clone, Debug)]
pub struct CountingLine {
    pub id: LineId,
    pub geometry: LineGeometry,
    gate: Gate,
    /// Live tracks, iterated in ascending id order
    tracks: BTreeMap<TrackId, Track>,
    next_id: u64,
    crossing_count: u64,
    speeds: Vec<f64>,
}

impl CountingLine {
    /// Create a line after validating its geometry.
    pub fn new(id: LineId, geometry: LineGeometry, gate: Gate) -> Result<Self> {
        geometry.validate(id)?;
        Ok(Self {
            id,
            geometry,
            gate,
            tracks: BTreeMap::new(),
            next_id: 0,
            crossing_count: 0,
            speeds: Vec::new(),
        })
    }

    fn next_track_id(&mut self) -> TrackId {
        let id = TrackId(self.next_id);
        self.next_id += 1;
        id
    }

    /// True if `(x, y)` lies inside this line's band.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.geometry.contains(x, y)
    }

    /// First track (ascending id) whose gate accepts `(x, y)`.
    pub fn find_matching_track(&self, x: i32, y: i32, threshold: f64) -> Option<TrackId> {
        self.tracks
            .values()
            .find(|t| self.gate.metric.passes(t, x, y, threshold))
            .map(|t| t.id)
    }

    /// Update the first matching track, or birth a new one.
    pub fn update_or_create(&mut self, x: i32, y: i32, frame: FrameIndex, fps: f64) -> LineUpdate {
        let matched = self.find_matching_track(x, y, self.gate.threshold);
        if let Some(track) = matched.and_then(|id| self.tracks.get_mut(&id)) {
            track.update(x, y, frame);
            let speed = track.speed_since_last(fps);
            if speed > 0.0 {
                self.speeds.push(speed);
            }
            return LineUpdate {
                track_id: track.id,
                speed,
                is_new: false,
            };
        }

        let id = self.next_track_id();
        self.tracks.insert(id, Track::new(id, x, y, frame));
        self.crossing_count += 1;
        LineUpdate {
            track_id: id,
            speed: 0.0,
            is_new: true,
        }
    }

    /// Remove expired tracks. Returns the number removed.
    pub fn sweep_expired(&mut self, current_frame: FrameIndex, max_tracking: u64) -> usize {
        let before = self.tracks.len();
        self.tracks.retain(|_, t| !t.is_expired(current_frame, max_tracking));
        before - self.tracks.len()
    }

    pub fn stats(&self) -> LineStats {
        LineStats {
            line_id: self.id,
            count: self.crossing_count,
            average_speed: mean(&self.speeds),
            sample_count: self.speeds.len(),
        }
    }

    pub fn crossing_count(&self) -> u64 {
        self.crossing_count
    }

    /// Every positive speed recorded on this line, in recording order.
    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    /// Live tracks in ascending id order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn live_track_count(&self) -> usize {
        self.tracks.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
