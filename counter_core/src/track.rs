//! Track: position history, last-seen frame and lifecycle status.

use crate::types::{FrameIndex, Sample, TrackId};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a track.
///
/// There is no materialised "expired" state: an expired track is removed
/// from its line's registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackStatus {
    /// Just created, holds only its birth sample
    New,
    /// Matched at least once after birth
    Active,
}

/// A single followed object on one counting line.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    /// Identifier, unique within the owning line
    pub id: TrackId,
    /// Past samples (most recent last), never empty
    history: Vec<Sample>,
    /// Frame of the most recent sample
    last_seen_frame: FrameIndex,
}

impl Track {
    /// Create a track from its first detection.
    pub fn new(id: TrackId, x: i32, y: i32, frame: FrameIndex) -> Self {
        Self {
            id,
            history: vec![Sample::new(x, y, frame)],
            last_seen_frame: frame,
        }
    }

    /// Append a sample. `frame` must not precede the last seen frame.
    pub fn update(&mut self, x: i32, y: i32, frame: FrameIndex) {
        debug_assert!(
            frame >= self.last_seen_frame,
            "track {} updated with frame {frame} < last seen {}",
            self.id,
            self.last_seen_frame
        );
        self.history.push(Sample::new(x, y, frame));
        self.last_seen_frame = frame;
    }

    /// Pixel speed (px/s) between the last two samples.
    ///
    /// Returns `0.0` with fewer than two samples or when no positive
    /// elapsed time can be derived (`fps <= 0`, non-finite `fps`, same frame).
    pub fn speed_since_last(&self, fps: f64) -> f64 {
        let [.., prev, cur] = self.history.as_slice() else {
            return 0.0;
        };
        if !fps.is_finite() || fps <= 0.0 {
            return 0.0;
        }
        let distance = prev.offset_to(cur.x, cur.y).norm();
        let elapsed = cur.frame.saturating_sub(prev.frame) as f64 / fps;
        if elapsed > 0.0 {
            distance / elapsed
        } else {
            0.0
        }
    }

    /// True once the track has gone unseen for strictly more than `max_tracking` frames.
    pub fn is_expired(&self, current_frame: FrameIndex, max_tracking: u64) -> bool {
        current_frame.saturating_sub(self.last_seen_frame) > max_tracking
    }

    /// Euclidean distance from the current position to `(x, y)`.
    pub fn distance_to(&self, x: i32, y: i32) -> f64 {
        self.last_sample().offset_to(x, y).norm()
    }

    /// Current (last) position.
    pub fn current_position(&self) -> (i32, i32) {
        let s = self.last_sample();
        (s.x, s.y)
    }

    /// Frame of the most recent sample.
    pub fn last_seen_frame(&self) -> FrameIndex {
        self.last_seen_frame
    }

    /// Frames elapsed between birth and the last sample.
    pub fn age_frames(&self) -> u64 {
        self.last_seen_frame - self.history[0].frame
    }

    pub fn status(&self) -> TrackStatus {
        if self.history.len() > 1 {
            TrackStatus::Active
        } else {
            TrackStatus::New
        }
    }

    /// Full position history, oldest first.
    pub fn history(&self) -> &[Sample] {
        &self.history
    }

    fn last_sample(&self) -> &Sample {
        // history is never empty: constructed with one sample, only appended to
        &self.history[self.history.len() - 1]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn new_track_has_one_sample_and_zero_speed() {
        let track = Track::new(TrackId(0), 5, 5, 1);
        assert_eq!(track.history().len(), 1);
        assert_eq!(track.status(), TrackStatus::New);
        assert_eq!(track.speed_since_last(30.0), 0.0);
    }

    #[test]
    fn speed_uses_last_two_samples() {
        let mut track = Track::new(TrackId(0), 5, 5, 1);
        track.update(10, 5, 2);
        assert_eq!(track.status(), TrackStatus::Active);
        assert_abs_diff_eq!(track.speed_since_last(10.0), 50.0, epsilon = 1e-9);

        // 3-4-5 triangle over two frames at 20 fps: 5 px / 0.1 s
        track.update(13, 9, 4);
        assert_abs_diff_eq!(track.speed_since_last(20.0), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn non_positive_fps_gives_zero_speed() {
        let mut track = Track::new(TrackId(0), 0, 0, 1);
        track.update(30, 40, 2);
        assert_eq!(track.speed_since_last(0.0), 0.0);
        assert_eq!(track.speed_since_last(-25.0), 0.0);
        assert_eq!(track.speed_since_last(f64::NAN), 0.0);
    }

    #[test]
    fn same_frame_update_gives_zero_speed() {
        let mut track = Track::new(TrackId(0), 0, 0, 3);
        track.update(8, 6, 3);
        assert_eq!(track.speed_since_last(30.0), 0.0);
    }

    #[test]
    fn expiry_is_strict() {
        let track = Track::new(TrackId(0), 0, 0, 2);
        assert!(!track.is_expired(2 + 14, 14), "gap == max_tracking is kept");
        assert!(track.is_expired(2 + 15, 14), "gap == max_tracking + 1 expires");
    }

    #[test]
    fn distance_is_measured_from_last_position() {
        let mut track = Track::new(TrackId(1), 0, 0, 1);
        track.update(100, 100, 2);
        assert_abs_diff_eq!(track.distance_to(103, 104), 5.0, epsilon = 1e-9);
        assert_eq!(track.current_position(), (100, 100));
        assert_eq!(track.last_seen_frame(), 2);
        assert_eq!(track.age_frames(), 1);
    }
}
