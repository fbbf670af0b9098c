//! Counting metrics: per-line count error and speed error against ground truth.

use crate::{stats::LineStats, types::LineId};
use serde::{Deserialize, Serialize};

/// Ground-truth crossings of one line (from a simulator or manual annotation).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineGroundTruth {
    pub line_id: LineId,
    /// Vehicles that actually crossed the band
    pub true_count: u64,
    /// Mean true speed of those vehicles (px/s)
    pub true_mean_speed: f64,
}

/// Evaluation of one line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineAccuracy {
    pub line_id: LineId,
    pub counted: u64,
    pub expected: u64,
    /// counted − expected
    pub count_error: i64,
    /// |measured mean speed − true mean speed|, None when either side has no data
    pub speed_error: Option<f64>,
}

/// Accumulated metric statistics for a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CountingMetrics {
    pub lines: Vec<LineAccuracy>,
}

impl CountingMetrics {
    /// Compare engine statistics with ground truth. Lines missing from
    /// `truth` are evaluated against an expected count of zero.
    pub fn evaluate(stats: &[LineStats], truth: &[LineGroundTruth]) -> Self {
        let lines = stats
            .iter()
            .map(|s| {
                let gt = truth.iter().find(|g| g.line_id == s.line_id);
                let expected = gt.map_or(0, |g| g.true_count);
                let speed_error = match gt {
                    Some(g) if s.sample_count > 0 && g.true_count > 0 => {
                        Some((s.average_speed - g.true_mean_speed).abs())
                    }
                    _ => None,
                };
                LineAccuracy {
                    line_id: s.line_id,
                    counted: s.count,
                    expected,
                    count_error: s.count as i64 - expected as i64,
                    speed_error,
                }
            })
            .collect();
        Self { lines }
    }

    /// Sum of |count error| over lines.
    pub fn total_abs_count_error(&self) -> u64 {
        self.lines.iter().map(|l| l.count_error.unsigned_abs()).sum()
    }

    /// 1 − Σ|error| / Σexpected, clamped at 0. 1.0 when nothing was expected.
    pub fn count_accuracy(&self) -> f64 {
        let expected: u64 = self.lines.iter().map(|l| l.expected).sum();
        if expected == 0 {
            return if self.total_abs_count_error() == 0 { 1.0 } else { 0.0 };
        }
        (1.0 - self.total_abs_count_error() as f64 / expected as f64).max(0.0)
    }

    /// Mean speed error over lines where it is defined.
    pub fn mean_speed_error(&self) -> Option<f64> {
        let errs: Vec<f64> = self.lines.iter().filter_map(|l| l.speed_error).collect();
        if errs.is_empty() {
            None
        } else {
            Some(errs.iter().sum::<f64>() / errs.len() as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(line: usize, count: u64, avg: f64, samples: usize) -> LineStats {
        LineStats {
            line_id: LineId(line),
            count,
            average_speed: avg,
            sample_count: samples,
        }
    }

    fn truth(line: usize, count: u64, speed: f64) -> LineGroundTruth {
        LineGroundTruth {
            line_id: LineId(line),
            true_count: count,
            true_mean_speed: speed,
        }
    }

    #[test]
    fn perfect_counts_score_one() {
        let m = CountingMetrics::evaluate(
            &[stats(0, 4, 100.0, 10), stats(1, 2, 80.0, 3)],
            &[truth(0, 4, 100.0), truth(1, 2, 90.0)],
        );
        assert_eq!(m.total_abs_count_error(), 0);
        assert_eq!(m.count_accuracy(), 1.0);
        assert_eq!(m.lines[1].speed_error, Some(10.0));
        assert_eq!(m.mean_speed_error(), Some(5.0));
    }

    #[test]
    fn over_and_under_counting_both_penalised() {
        let m = CountingMetrics::evaluate(
            &[stats(0, 6, 0.0, 0), stats(1, 1, 0.0, 0)],
            &[truth(0, 5, 0.0), truth(1, 3, 0.0)],
        );
        assert_eq!(m.lines[0].count_error, 1);
        assert_eq!(m.lines[1].count_error, -2);
        assert_eq!(m.total_abs_count_error(), 3);
        assert!((m.count_accuracy() - 0.625).abs() < 1e-12);
        assert_eq!(m.mean_speed_error(), None);
    }

    #[test]
    fn missing_truth_means_zero_expected() {
        let m = CountingMetrics::evaluate(&[stats(0, 2, 0.0, 0)], &[]);
        assert_eq!(m.lines[0].expected, 0);
        assert_eq!(m.count_accuracy(), 0.0);
    }
}
