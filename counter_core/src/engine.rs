//! Engine orchestrator: the full counting cycle for one detector frame.
//!
//! # Processing steps per frame
//! 1. Advance the frame counter (the engine's only time base)
//! 2. Fan each detection out to every line whose band contains it
//!    (overlapping bands each claim the detection)
//! 3. Match-or-create on each claiming line
//! 4. Sweep expired tracks on every line
//! 5. Emit one `CrossingEvent` per match/creation
//!
//! Lines share no state, so steps 2–4 run per line in parallel. Each line
//! still sees detections in received order, and events are re-ordered to
//! (detection index, line index) so output matches a sequential run.

use crate::{
    config::EngineConfig,
    error::Result,
    line::{CountingLine, Gate},
    stats::{mean, EngineStats, GlobalStats, LineStats},
    types::{Detection, FrameIndex, LineId, TrackId},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// One match or creation performed during a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrossingEvent {
    pub line_id: LineId,
    pub track_id: TrackId,
    /// Speed in px/s (0.0 for new tracks)
    pub speed: f64,
    /// True when this event created the track (a counted crossing)
    pub is_new: bool,
}

/// Consumer of per-frame crossing events (renderer, reporter, logger...).
pub trait EventSink {
    fn on_event(&mut self, event: &CrossingEvent);
}

impl EventSink for Vec<CrossingEvent> {
    fn on_event(&mut self, event: &CrossingEvent) {
        self.push(*event);
    }
}

/// Outputs of one engine step.
#[derive(Clone, Debug, Default)]
pub struct FrameOutput {
    /// Frame index assigned to this step
    pub frame: FrameIndex,
    /// Matches and creations, ordered by (detection, line)
    pub events: Vec<CrossingEvent>,
    /// Number of tracks created this step (crossings counted)
    pub births: usize,
    /// Number of tracks removed by the expiry sweep
    pub expirations: usize,
    /// Wall-clock time of processing
    pub total_time_us: u64,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The counting engine. Owns every line and the frame counter.
#[derive(Clone, Debug)]
pub struct TrackingEngine {
    config: EngineConfig,
    lines: Vec<CountingLine>,
    frame_counter: FrameIndex,
}

impl TrackingEngine {
    /// Validate `config` and build one `CountingLine` per configured line.
    pub fn new(config: EngineConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            warn!(%err, "rejecting engine configuration");
            return Err(err);
        }
        let lines = Self::build_lines(&config)?;
        debug!(
            lines = lines.len(),
            max_tracking = config.max_tracking,
            threshold = config.match_distance_threshold,
            "tracking engine ready"
        );
        Ok(Self {
            config,
            lines,
            frame_counter: 0,
        })
    }

    fn build_lines(config: &EngineConfig) -> Result<Vec<CountingLine>> {
        let gate = Gate {
            threshold: config.match_distance_threshold,
            metric: config.match_metric,
        };
        config
            .lines
            .iter()
            .enumerate()
            .map(|(i, geometry)| CountingLine::new(LineId(i), *geometry, gate))
            .collect()
    }

    /// Process one frame of detections. Never fails.
    pub fn process_frame(&mut self, detections: &[Detection], fps: f64) -> FrameOutput {
        let start = Instant::now();

        // ----------------------------------------------------------------
        // Step 1: advance time
        // ----------------------------------------------------------------
        self.frame_counter += 1;
        let frame = self.frame_counter;
        let max_tracking = self.config.max_tracking;

        // ----------------------------------------------------------------
        // Steps 2-4: per line, distribute + match-or-create + sweep
        // ----------------------------------------------------------------
        let per_line: Vec<(Vec<(usize, CrossingEvent)>, usize)> = self
            .lines
            .par_iter_mut()
            .map(|line| {
                let mut events = Vec::new();
                for (di, det) in detections.iter().enumerate() {
                    if !line.contains_point(det.x, det.y) {
                        continue;
                    }
                    let upd = line.update_or_create(det.x, det.y, frame, fps);
                    events.push((
                        di,
                        CrossingEvent {
                            line_id: line.id,
                            track_id: upd.track_id,
                            speed: upd.speed,
                            is_new: upd.is_new,
                        },
                    ));
                }
                let removed = line.sweep_expired(frame, max_tracking);
                (events, removed)
            })
            .collect();

        // ----------------------------------------------------------------
        // Step 5: merge events into sequential order
        // ----------------------------------------------------------------
        let mut keyed: Vec<(usize, CrossingEvent)> = Vec::new();
        let mut expirations = 0;
        for (events, removed) in per_line {
            keyed.extend(events);
            expirations += removed;
        }
        keyed.sort_by_key(|(di, ev)| (*di, ev.line_id));
        let events: Vec<CrossingEvent> = keyed.into_iter().map(|(_, ev)| ev).collect();

        let births = events.iter().filter(|e| e.is_new).count();
        for ev in &events {
            if ev.is_new {
                debug!(frame, line = %ev.line_id, track = %ev.track_id, "crossing counted");
            } else {
                trace!(frame, line = %ev.line_id, track = %ev.track_id, speed = ev.speed, "track matched");
            }
        }
        if expirations > 0 {
            debug!(frame, expirations, "expired tracks removed");
        }

        FrameOutput {
            frame,
            events,
            births,
            expirations,
            total_time_us: start.elapsed().as_micros() as u64,
        }
    }

    /// Process one frame and forward its events to `sink`.
    pub fn process_frame_into<S: EventSink + ?Sized>(
        &mut self,
        detections: &[Detection],
        fps: f64,
        sink: &mut S,
    ) -> FrameOutput {
        let output = self.process_frame(detections, fps);
        for event in &output.events {
            sink.on_event(event);
        }
        output
    }

    /// Per-line statistics in configured order.
    pub fn line_stats(&self) -> Vec<LineStats> {
        self.lines.iter().map(CountingLine::stats).collect()
    }

    /// Totals across every line.
    pub fn global_stats(&self) -> GlobalStats {
        let speeds: Vec<f64> = self
            .lines
            .iter()
            .flat_map(|l| l.speeds().iter().copied())
            .collect();
        GlobalStats {
            total_count: self.lines.iter().map(CountingLine::crossing_count).sum(),
            global_average_speed: mean(&speeds),
            sample_count: speeds.len(),
        }
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            frames: self.frame_counter,
            lines: self.line_stats(),
            global: self.global_stats(),
        }
    }

    pub fn frame_counter(&self) -> FrameIndex {
        self.frame_counter
    }

    pub fn lines(&self) -> &[CountingLine] {
        &self.lines
    }

    pub fn line(&self, id: LineId) -> Option<&CountingLine> {
        self.lines.get(id.0)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reset: start a new run with the same configuration.
    pub fn reset(&mut self) -> Result<()> {
        self.lines = Self::build_lines(&self.config)?;
        self.frame_counter = 0;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
