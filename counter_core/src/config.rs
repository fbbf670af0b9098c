//! Engine configuration: counting lines and association parameters.

use crate::{
    error::{CountingError, Result},
    gating::MatchMetric,
    line::{LineGeometry, DEFAULT_MARGIN},
    types::LineId,
};
use serde::{Deserialize, Serialize};

/// Default expiry horizon (frames a track may go unseen).
pub const DEFAULT_MAX_TRACKING: u64 = 14;

/// Default gate size (pixels).
pub const DEFAULT_MATCH_DISTANCE: f64 = 50.0;

fn default_max_tracking() -> u64 {
    DEFAULT_MAX_TRACKING
}

fn default_match_distance() -> f64 {
    DEFAULT_MATCH_DISTANCE
}

/// Configuration for the tracking engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Counting lines, in order. A line's index is its `LineId`.
    pub lines: Vec<LineGeometry>,
    /// Frames a track may go unmatched before it is removed
    #[serde(default = "default_max_tracking")]
    pub max_tracking: u64,
    /// Gate size for matching a detection to a track (pixels)
    #[serde(default = "default_match_distance")]
    pub match_distance_threshold: f64,
    /// Distance rule used by the gate
    #[serde(default)]
    pub match_metric: MatchMetric,
}

impl EngineConfig {
    /// Configuration with the given lines and default association parameters.
    pub fn with_lines(lines: Vec<LineGeometry>) -> Self {
        Self {
            lines,
            max_tracking: DEFAULT_MAX_TRACKING,
            match_distance_threshold: DEFAULT_MATCH_DISTANCE,
            match_metric: MatchMetric::default(),
        }
    }

    /// Check association parameters and every line's geometry.
    pub fn validate(&self) -> Result<()> {
        if self.max_tracking == 0 {
            return Err(CountingError::InvalidConfig(
                "max_tracking must be positive".to_string(),
            ));
        }
        if !self.match_distance_threshold.is_finite() || self.match_distance_threshold <= 0.0 {
            return Err(CountingError::InvalidConfig(format!(
                "match_distance_threshold must be positive and finite, got {}",
                self.match_distance_threshold
            )));
        }
        for (i, line) in self.lines.iter().enumerate() {
            line.validate(LineId(i))?;
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    /// The seven lanes of the reference highway camera (1920×1080).
    fn default() -> Self {
        Self::with_lines(vec![
            LineGeometry::new(480, 580, 850, DEFAULT_MARGIN),
            LineGeometry::new(610, 720, 850, DEFAULT_MARGIN),
            LineGeometry::new(990, 1090, 750, DEFAULT_MARGIN),
            LineGeometry::new(1320, 1470, 900, DEFAULT_MARGIN),
            LineGeometry::new(1180, 1210, 640, DEFAULT_MARGIN),
            LineGeometry::new(1420, 1500, 730, DEFAULT_MARGIN),
            LineGeometry::new(1630, 1770, 770, DEFAULT_MARGIN),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.lines.len(), 7);
        assert_eq!(cfg.max_tracking, 14);
        assert_eq!(cfg.match_distance_threshold, 50.0);
        cfg.validate().unwrap();
    }

    #[test]
    fn rejects_non_positive_parameters() {
        let cfg = EngineConfig {
            max_tracking: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(CountingError::InvalidConfig(_))));

        for threshold in [0.0, -5.0, f64::NAN] {
            let cfg = EngineConfig {
                match_distance_threshold: threshold,
                ..Default::default()
            };
            assert!(cfg.validate().is_err(), "threshold {threshold} accepted");
        }
    }

    #[test]
    fn reports_offending_line_index() {
        let mut cfg = EngineConfig::default();
        cfg.lines[3] = LineGeometry::new(100, 50, 0, 10);
        match cfg.validate() {
            Err(CountingError::InvalidLine { line_id, .. }) => assert_eq!(line_id, LineId(3)),
            other => panic!("expected InvalidLine, got {other:?}"),
        }
    }

    #[test]
    fn json_fills_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"lines": [{"x1": 0, "x2": 100, "y_ref": 0}]}"#).unwrap();
        assert_eq!(cfg.max_tracking, DEFAULT_MAX_TRACKING);
        assert_eq!(cfg.match_distance_threshold, DEFAULT_MATCH_DISTANCE);
        assert_eq!(cfg.match_metric, MatchMetric::Euclidean);
        assert_eq!(cfg.lines[0].margin, DEFAULT_MARGIN);
    }
}
