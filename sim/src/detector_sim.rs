//! Detector simulator.
//!
//! Generates per-frame detector output with:
//! - Uniform centroid jitter
//! - Miss probability (1 - P_D)
//! - Poisson clutter blobs (shadows, foliage), most of them removed by the
//!   blob size filter
//! - The same blob filter the real detector applies before counting

use crate::vehicle::Vehicle;
use counter_core::types::DetectionFrame;
use detector_models::{Blob, BlobFilter, CameraParams};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Upper bound on clutter blobs drawn per frame.
const MAX_CLUTTER: usize = 50;

/// Generates detection frames from a set of vehicles.
pub struct DetectorSimulator {
    pub camera: CameraParams,
    pub filter: BlobFilter,
    rng: ChaCha8Rng,
}

impl DetectorSimulator {
    pub fn new(camera: CameraParams, filter: BlobFilter, seed: u64) -> Self {
        Self {
            camera,
            filter,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Blobs visible at time `t`: noisy vehicle boxes plus clutter.
    pub fn generate_blobs(&mut self, vehicles: &[Vehicle], t: f64) -> Vec<Blob> {
        let mut blobs = Vec::new();
        let jitter = self.camera.jitter_px;

        // True detections
        for vehicle in vehicles {
            if !vehicle.is_active(t) {
                continue;
            }
            let (px, py) = vehicle.pixel_pos();
            if !self.camera.in_frame(px, py) {
                continue;
            }
            // Miss detection?
            if self.rng.gen::<f64>() > self.camera.p_detection {
                continue;
            }
            let (jx, jy) = if jitter > 0 {
                (
                    self.rng.gen_range(-jitter..=jitter),
                    self.rng.gen_range(-jitter..=jitter),
                )
            } else {
                (0, 0)
            };
            blobs.push(vehicle.blob_at(px + jx, py + jy));
        }

        // Clutter (Poisson): draw N until product of U < e^{-lambda}
        let lambda = self.camera.clutter_rate;
        let n_clutter = if lambda <= 0.0 {
            0usize
        } else {
            let mut n = 0usize;
            let threshold = (-lambda).exp();
            let mut prod = self.rng.gen::<f64>();
            while prod > threshold && n < MAX_CLUTTER {
                prod *= self.rng.gen::<f64>();
                n += 1;
            }
            n
        };
        for _ in 0..n_clutter {
            let w = self.rng.gen_range(4..=48);
            let h = self.rng.gen_range(4..=48);
            let x = self.rng.gen_range(0..(self.camera.width - w).max(1));
            let y = self.rng.gen_range(0..(self.camera.height - h).max(1));
            let mut blob = Blob::from_rect(x, y, w, h);
            // irregular shapes fill only part of their box
            blob.area *= self.rng.gen_range(0.3..1.0);
            blobs.push(blob);
        }

        blobs
    }

    /// Full detector output for the frame at time `t`.
    pub fn generate_frame(&mut self, vehicles: &[Vehicle], t: f64) -> DetectionFrame {
        let blobs = self.generate_blobs(vehicles, t);
        DetectionFrame {
            fps: self.camera.fps,
            detections: self.filter.centroids(&blobs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::MotionSpec;
    use counter_core::Detection;

    fn ideal_camera() -> CameraParams {
        CameraParams {
            p_detection: 1.0,
            jitter_px: 0,
            clutter_rate: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn ideal_detector_reports_exact_centroids() {
        let vehicles = vec![
            Vehicle::new(0, [500.0, 400.0], [0.0, 0.0], (80, 60), MotionSpec::Stopped),
            Vehicle::new(1, [900.0, 200.0], [0.0, 0.0], (80, 60), MotionSpec::Stopped),
        ];
        let mut sim = DetectorSimulator::new(ideal_camera(), BlobFilter::default(), 1);
        let frame = sim.generate_frame(&vehicles, 0.0);
        assert_eq!(frame.fps, 30.0);
        assert_eq!(
            frame.detections,
            vec![Detection::new(500, 400), Detection::new(900, 200)]
        );
    }

    #[test]
    fn inactive_and_off_screen_vehicles_are_skipped() {
        let vehicles = vec![
            Vehicle::new(0, [500.0, 400.0], [0.0, 0.0], (80, 60), MotionSpec::Stopped)
                .appearing_at(10.0),
            Vehicle::new(1, [500.0, -50.0], [0.0, 0.0], (80, 60), MotionSpec::Stopped),
        ];
        let mut sim = DetectorSimulator::new(ideal_camera(), BlobFilter::default(), 1);
        assert!(sim.generate_frame(&vehicles, 0.0).detections.is_empty());
    }

    #[test]
    fn oversized_blobs_are_filtered() {
        let vehicles = vec![Vehicle::new(0, [500.0, 400.0], [0.0, 0.0], (500, 100), MotionSpec::Stopped)];
        let mut sim = DetectorSimulator::new(ideal_camera(), BlobFilter::default(), 1);
        assert_eq!(sim.generate_blobs(&vehicles, 0.0).len(), 1);
        assert!(sim.generate_frame(&vehicles, 0.0).detections.is_empty());
    }

    #[test]
    fn same_seed_same_output() {
        let camera = CameraParams {
            clutter_rate: 3.0,
            jitter_px: 3,
            p_detection: 0.8,
            ..Default::default()
        };
        let vehicles: Vec<Vehicle> = (0..10)
            .map(|i| {
                Vehicle::new(i, [100.0 + 150.0 * i as f64, 500.0], [0.0, 0.0], (80, 60), MotionSpec::Stopped)
            })
            .collect();
        let mut a = DetectorSimulator::new(camera.clone(), BlobFilter::default(), 7);
        let mut b = DetectorSimulator::new(camera, BlobFilter::default(), 7);
        for k in 0..20 {
            let t = k as f64 / 30.0;
            assert_eq!(
                a.generate_frame(&vehicles, t).detections,
                b.generate_frame(&vehicles, t).detections
            );
        }
    }
}
