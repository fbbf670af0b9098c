//! Reporter: end-of-run text summary and a live speed printer.

use counter_core::engine::{CrossingEvent, EventSink};
use counter_core::metrics::CountingMetrics;
use counter_core::stats::EngineStats;
use std::fmt::Write;

const RULE: &str = "====================================================";

/// End-of-run summary: per-lane counts and speeds, total, global average.
pub fn format_report(stats: &EngineStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n========== Vehicle count per lane ==========");
    for line in &stats.lines {
        if line.sample_count > 0 {
            let _ = writeln!(
                out,
                "Lane {}: {} vehicles, average speed: {:.1} px/s",
                line.line_id.0 + 1,
                line.count,
                line.average_speed
            );
        } else {
            let _ = writeln!(
                out,
                "Lane {}: {} vehicles, no speed data",
                line.line_id.0 + 1,
                line.count
            );
        }
    }
    let _ = writeln!(out, "TOTAL vehicles: {}", stats.global.total_count);
    if stats.global.sample_count > 0 {
        let _ = writeln!(
            out,
            "Global average speed: {:.1} px/s",
            stats.global.global_average_speed
        );
    }
    let _ = write!(out, "{RULE}");
    out
}

/// Accuracy lines printed after a simulated run.
pub fn format_metrics(metrics: &CountingMetrics) -> String {
    let mut out = String::new();
    for line in &metrics.lines {
        let _ = writeln!(
            out,
            "Lane {}: counted {} / expected {} ({:+})",
            line.line_id.0 + 1,
            line.counted,
            line.expected,
            line.count_error
        );
    }
    let _ = write!(
        out,
        "Count accuracy: {:.1}%",
        metrics.count_accuracy() * 100.0
    );
    if let Some(err) = metrics.mean_speed_error() {
        let _ = write!(out, ", mean speed error: {err:.1} px/s");
    }
    out
}

/// Prints every positive speed measurement as it happens.
#[derive(Debug, Default)]
pub struct SpeedPrinter {
    pub printed: usize,
}

impl SpeedPrinter {
    pub fn format(event: &CrossingEvent) -> Option<String> {
        (event.speed > 0.0)
            .then(|| format!("Lane {} speed: {:.2} px/s", event.line_id.0 + 1, event.speed))
    }
}

impl EventSink for SpeedPrinter {
    fn on_event(&mut self, event: &CrossingEvent) {
        if let Some(line) = Self::format(event) {
            println!("{line}");
            self.printed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counter_core::stats::{GlobalStats, LineStats};
    use counter_core::types::{LineId, TrackId};

    fn stats() -> EngineStats {
        EngineStats {
            frames: 100,
            lines: vec![
                LineStats {
                    line_id: LineId(0),
                    count: 4,
                    average_speed: 312.46,
                    sample_count: 9,
                },
                LineStats {
                    line_id: LineId(1),
                    count: 0,
                    average_speed: 0.0,
                    sample_count: 0,
                },
            ],
            global: GlobalStats {
                total_count: 4,
                global_average_speed: 312.46,
                sample_count: 9,
            },
        }
    }

    #[test]
    fn report_lists_lanes_one_based() {
        let text = format_report(&stats());
        assert!(text.contains("Lane 1: 4 vehicles, average speed: 312.5 px/s"));
        assert!(text.contains("Lane 2: 0 vehicles, no speed data"));
        assert!(text.contains("TOTAL vehicles: 4"));
        assert!(text.contains("Global average speed: 312.5 px/s"));
    }

    #[test]
    fn report_omits_global_speed_without_samples() {
        let mut s = stats();
        s.global.sample_count = 0;
        assert!(!format_report(&s).contains("Global average speed"));
    }

    #[test]
    fn speed_printer_skips_births() {
        let birth = CrossingEvent {
            line_id: LineId(2),
            track_id: TrackId(0),
            speed: 0.0,
            is_new: true,
        };
        assert_eq!(SpeedPrinter::format(&birth), None);
        let matched = CrossingEvent {
            speed: 50.0,
            is_new: false,
            ..birth
        };
        assert_eq!(
            SpeedPrinter::format(&matched).as_deref(),
            Some("Lane 3 speed: 50.00 px/s")
        );
    }
}
