//! `counter_core` — Line-crossing vehicle counting engine.
//!
//! # Module layout
//! - [`types`]   — Fundamental types (IDs, detections, samples)
//! - [`track`]   — Track history, speed and expiry
//! - [`gating`]  — Detection-to-track distance gate
//! - [`line`]    — Counting line: band test, match-or-create, expiry sweep
//! - [`config`]  — Engine configuration and validation
//! - [`engine`]  — Per-frame orchestrator and event stream
//! - [`stats`]   — Per-line and global statistics
//! - [`metrics`] — Count/speed error against ground truth
//! - [`error`]   — Configuration errors

pub mod config;
pub mod engine;
pub mod error;
pub mod gating;
pub mod line;
pub mod metrics;
pub mod stats;
pub mod track;
pub mod types;

pub use config::EngineConfig;
pub use engine::{CrossingEvent, EventSink, FrameOutput, TrackingEngine};
pub use error::{CountingError, Result};
pub use gating::MatchMetric;
pub use line::{CountingLine, LineGeometry, LineUpdate};
pub use stats::{EngineStats, GlobalStats, LineStats};
pub use track::{Track, TrackStatus};
pub use types::{Detection, DetectionFrame, FrameIndex, LineId, Sample, TrackId};
