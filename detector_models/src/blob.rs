//! Blob filtering: foreground blobs (bounding box + area) → vehicle centroids.
//!
//! # Filtering rules
//! - **Area**: blobs with `area < min_area` are noise and dropped.
//! - **Width**: blobs wider than `max_width` are merged vehicles or lighting
//!   changes and dropped.
//! - **Centroid**: centre of the bounding box, `(x + w/2, y + h/2)` with
//!   integer division.

use counter_core::types::Detection;
use serde::{Deserialize, Serialize};

/// One connected foreground region as reported by contour extraction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    /// Bounding box top-left column
    pub x: i32,
    /// Bounding box top-left row
    pub y: i32,
    /// Bounding box width (pixels)
    pub w: i32,
    /// Bounding box height (pixels)
    pub h: i32,
    /// Contour area (pixels²), at most `w * h`
    pub area: f64,
}

impl Blob {
    /// Blob whose contour fills its bounding box.
    pub fn from_rect(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            area: f64::from(w) * f64::from(h),
        }
    }

    /// Bounding-box centre, rounded down.
    pub fn centroid(&self) -> Detection {
        Detection::new(self.x + self.w / 2, self.y + self.h / 2)
    }
}

/// Size filter applied to blobs before they reach the counting engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlobFilter {
    /// Minimum contour area (pixels²)
    pub min_area: f64,
    /// Maximum bounding-box width (pixels)
    pub max_width: i32,
}

impl Default for BlobFilter {
    fn default() -> Self {
        Self {
            min_area: 500.0,
            max_width: 420,
        }
    }
}

impl BlobFilter {
    pub fn new(min_area: f64, max_width: i32) -> Self {
        Self {
            min_area,
            max_width,
        }
    }

    /// True if the blob is vehicle-sized.
    pub fn accepts(&self, blob: &Blob) -> bool {
        blob.area >= self.min_area && blob.w <= self.max_width
    }

    /// Centroids of accepted blobs, in input order.
    pub fn centroids(&self, blobs: &[Blob]) -> Vec<Detection> {
        blobs
            .iter()
            .filter(|b| self.accepts(b))
            .map(Blob::centroid)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_rounds_down() {
        let blob = Blob::from_rect(10, 20, 41, 31);
        assert_eq!(blob.centroid(), Detection::new(30, 35));
    }

    #[test]
    fn filter_bounds() {
        let f = BlobFilter::default();
        assert!(f.accepts(&Blob::from_rect(0, 0, 25, 20)), "area == min_area kept");
        assert!(!f.accepts(&Blob::from_rect(0, 0, 24, 20)), "area 480 dropped");
        assert!(f.accepts(&Blob::from_rect(0, 0, 420, 2)), "width == max_width kept");
        assert!(!f.accepts(&Blob::from_rect(0, 0, 421, 2)));
    }

    #[test]
    fn centroids_keep_input_order() {
        let f = BlobFilter::new(100.0, 200);
        let blobs = [
            Blob::from_rect(100, 100, 40, 30),
            Blob::from_rect(0, 0, 5, 5),
            Blob::from_rect(300, 50, 20, 20),
        ];
        assert_eq!(
            f.centroids(&blobs),
            vec![Detection::new(120, 115), Detection::new(310, 60)]
        );
    }
}
