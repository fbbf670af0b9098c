//! Vehicle trajectory models and state propagation in image space.
//!
//! Each vehicle has a true pixel state [px, py, vx, vy] (velocity in px/s),
//! a bounding-box size, and a `MotionSpec` describing how it moves. The
//! simulator steps each vehicle forward in time.

use detector_models::Blob;
use serde::{Deserialize, Serialize};

/// Describes vehicle motion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum MotionSpec {
    /// Constant velocity: no acceleration.
    ConstantVelocity,
    /// Standing still (queue, red light). Velocity is kept for the next segment.
    Stopped,
    /// Segmented: switch motion model at given sim times.
    /// `segments` is sorted by time ascending: [(t_start, MotionSpec), ...].
    /// The active segment is the last one whose t_start <= current_t.
    Segmented {
        segments: Vec<(f64, Box<MotionSpec>)>,
    },
}

/// A simulated vehicle with ground-truth state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique vehicle ID (used for ground truth)
    pub id: u64,
    /// True state [px, py, vx, vy]
    pub state: [f64; 4],
    /// Bounding box size (w, h) in pixels
    pub size: (i32, i32),
    /// Motion model for this vehicle
    pub motion: MotionSpec,
    /// Optional: vehicle enters the scene at this time
    pub appear_at: Option<f64>,
}

impl Vehicle {
    pub fn new(id: u64, pos: [f64; 2], vel: [f64; 2], size: (i32, i32), motion: MotionSpec) -> Self {
        Self {
            id,
            state: [pos[0], pos[1], vel[0], vel[1]],
            size,
            motion,
            appear_at: None,
        }
    }

    pub fn appearing_at(mut self, t: f64) -> Self {
        self.appear_at = Some(t);
        self
    }

    /// Propagate true state by `dt` seconds according to its motion model.
    /// Vehicles that have not appeared yet stay parked at their entry point.
    pub fn step(&mut self, t: f64, dt: f64) {
        if self.appear_at.is_some_and(|a| t < a) {
            return;
        }
        let motion = self.motion.clone();
        apply_motion(&mut self.state, &motion, t, dt);
    }

    /// True if vehicle is in the scene at time `t`.
    pub fn is_active(&self, t: f64) -> bool {
        self.appear_at.map_or(true, |a| t >= a)
    }

    /// 2D position rounded to the pixel grid
    pub fn pixel_pos(&self) -> (i32, i32) {
        (self.state[0].round() as i32, self.state[1].round() as i32)
    }

    /// Current speed magnitude (px/s)
    pub fn speed(&self) -> f64 {
        self.state[2].hypot(self.state[3])
    }

    /// Bounding-box blob centred on `(cx, cy)`.
    pub fn blob_at(&self, cx: i32, cy: i32) -> Blob {
        let (w, h) = self.size;
        Blob::from_rect(cx - w / 2, cy - h / 2, w, h)
    }
}

fn apply_motion(s: &mut [f64; 4], motion: &MotionSpec, t: f64, dt: f64) {
    match motion {
        MotionSpec::ConstantVelocity => {
            s[0] += s[2] * dt;
            s[1] += s[3] * dt;
        }
        MotionSpec::Stopped => {}
        MotionSpec::Segmented { segments } => {
            let active = segments.iter().filter(|(t_start, _)| *t_start <= t).last();
            match active {
                Some((_, spec)) => apply_motion(s, spec, t, dt),
                // Before first segment: CV
                None => apply_motion(s, &MotionSpec::ConstantVelocity, t, dt),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_velocity_moves_linearly() {
        let mut v = Vehicle::new(0, [100.0, 0.0], [0.0, 300.0], (80, 60), MotionSpec::ConstantVelocity);
        for i in 0..30 {
            v.step(i as f64 / 30.0, 1.0 / 30.0);
        }
        assert!((v.state[1] - 300.0).abs() < 1e-9);
        assert_eq!(v.pixel_pos(), (100, 300));
    }

    #[test]
    fn stopped_vehicle_never_drifts() {
        let mut v = Vehicle::new(0, [0.0, 50.0], [0.0, 120.0], (80, 60), MotionSpec::Stopped);
        for i in 0..600 {
            v.step(i as f64 * 0.1, 0.1);
        }
        assert_eq!(v.state[1], 50.0);
        // velocity is kept for the next segment
        assert_eq!(v.speed(), 120.0);
    }

    #[test]
    fn segmented_stop_and_go() {
        let motion = MotionSpec::Segmented {
            segments: vec![
                (1.0, Box::new(MotionSpec::Stopped)),
                (2.0, Box::new(MotionSpec::ConstantVelocity)),
            ],
        };
        let mut v = Vehicle::new(0, [0.0, 0.0], [0.0, 10.0], (80, 60), motion);
        let dt = 0.5;
        for i in 0..6 {
            v.step(i as f64 * dt, dt);
        }
        // moving for t in [0,1) and [2,3): 2 s at 10 px/s
        assert!((v.state[1] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn not_yet_appeared_vehicle_is_parked() {
        let mut v = Vehicle::new(0, [0.0, 0.0], [0.0, 10.0], (80, 60), MotionSpec::ConstantVelocity)
            .appearing_at(5.0);
        v.step(1.0, 1.0);
        assert!(!v.is_active(1.0));
        assert_eq!(v.state[1], 0.0);
        assert!(v.is_active(5.0));
    }

    #[test]
    fn blob_is_centred() {
        let v = Vehicle::new(0, [0.0, 0.0], [0.0, 0.0], (80, 60), MotionSpec::Stopped);
        let blob = v.blob_at(500, 400);
        assert_eq!(blob.centroid(), counter_core::Detection::new(500, 400));
    }
}
