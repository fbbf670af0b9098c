//! `detector_models` — Detector-side models: blob size filtering, centroid
//! extraction and camera parameters.

pub mod blob;
pub mod camera;

pub use blob::{Blob, BlobFilter};
pub use camera::CameraParams;
