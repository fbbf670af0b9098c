//! Fundamental types used across the entire workspace.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Scalar types: detections arrive as integer pixels, distances and speeds
// are computed in f64.
// ---------------------------------------------------------------------------

/// Frame index on the engine's time base (first processed frame is 1).
pub type FrameIndex = u64;

/// 2D pixel displacement, used for distance and speed computation
pub type PixelVec = Vector2<f64>;

// ---------------------------------------------------------------------------
// Identifier types — newtype wrappers so IDs are never confused at compile time
// ---------------------------------------------------------------------------

/// Track identifier, unique within the owning counting line.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TrackId(pub u64);

/// Counting line identifier: the line's index in the engine configuration.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LineId(pub usize);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// A single centroid reported by the detector for the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Detection {
    /// Pixel column
    pub x: i32,
    /// Pixel row (grows downwards)
    pub y: i32,
}

impl Detection {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Detection {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// One position sample in a track's history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub x: i32,
    pub y: i32,
    pub frame: FrameIndex,
}

impl Sample {
    pub fn new(x: i32, y: i32, frame: FrameIndex) -> Self {
        Self { x, y, frame }
    }

    /// Displacement vector from `self` to `(x, y)`.
    pub fn offset_to(&self, x: i32, y: i32) -> PixelVec {
        PixelVec::new(
            f64::from(x) - f64::from(self.x),
            f64::from(y) - f64::from(self.y),
        )
    }
}

// ---------------------------------------------------------------------------
// DetectionFrame — one frame's worth of detector output
// ---------------------------------------------------------------------------

/// Detector output for one video frame.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DetectionFrame {
    /// Frames per second reported by the video source for this frame
    pub fps: f64,
    /// Unordered centroids
    pub detections: Vec<Detection>,
}
