//! Camera and detector-quality parameters.

use serde::{Deserialize, Serialize};

/// Physical and statistical configuration of a fixed traffic camera.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraParams {
    /// Frame width (pixels)
    pub width: i32,
    /// Frame height (pixels)
    pub height: i32,
    /// Nominal frame rate (frames per second)
    pub fps: f64,
    /// Probability that a visible vehicle produces a blob in a frame
    pub p_detection: f64,
    /// Centroid noise: uniform jitter in [-jitter_px, +jitter_px] per axis
    pub jitter_px: i32,
    /// Mean number of spurious blobs per frame (shadows, foliage, noise)
    pub clutter_rate: f64,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30.0,
            p_detection: 0.95,
            jitter_px: 2,
            clutter_rate: 0.5,
        }
    }
}

impl CameraParams {
    /// Duration of one frame in seconds, 0.0 when fps is not positive.
    pub fn frame_period(&self) -> f64 {
        if self.fps > 0.0 {
            1.0 / self.fps
        } else {
            0.0
        }
    }

    /// True if the pixel lies inside the image.
    pub fn in_frame(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_period_guards_zero_fps() {
        let cam = CameraParams {
            fps: 0.0,
            ..Default::default()
        };
        assert_eq!(cam.frame_period(), 0.0);
        assert_eq!(CameraParams::default().frame_period(), 1.0 / 30.0);
    }

    #[test]
    fn in_frame_excludes_far_edges() {
        let cam = CameraParams::default();
        assert!(cam.in_frame(0, 0));
        assert!(cam.in_frame(1919, 1079));
        assert!(!cam.in_frame(1920, 10));
        assert!(!cam.in_frame(10, -1));
    }
}
