//! Performance Diagnostics
//!
//! This crate provides the map client's performance-diagnostics layer:
//! - A lifecycle and frame-metrics recorder that marks `create`/`load`/
//!   `fullLoad` instants, tracks animation-frame deltas, and computes
//!   load durations, FPS, and a weighted dropped-frame ratio on demand
//! - A per-resource timing wrapper that brackets one outbound request
//!   with start/end marks and resolves its timing entries, synthesizing
//!   a measure when the execution context does not auto-populate
//!   resource timing (and cleaning up after itself when it does)
//!
//! Both components talk to the host's timing facility through the
//! [`Timeline`] trait. [`MonotonicTimeline`] is the `Instant`-backed
//! production implementation; [`ManualTimeline`] is deterministic for
//! tests and externally clocked hosts.
//!
//! # Example
//!
//! ```rust
//! use diagnostics::{FrameMetricsRecorder, LifecycleMarker, ManualTimeline};
//!
//! let mut timeline = ManualTimeline::new();
//! let mut recorder = FrameMetricsRecorder::new();
//!
//! recorder.mark(&mut timeline, LifecycleMarker::Create);
//! timeline.advance_ms(150.0);
//! recorder.mark(&mut timeline, LifecycleMarker::Load);
//! recorder.mark(&mut timeline, LifecycleMarker::FullLoad);
//!
//! recorder.frame(0.0);
//! recorder.frame(16.0);
//!
//! let metrics = recorder.metrics(&mut timeline).unwrap();
//! assert_eq!(metrics.load_time, 150.0);
//! assert_eq!(metrics.total_frames, 1);
//! ```

mod error;
mod recorder;
mod resource;
mod timeline;

pub use error::{DiagnosticsError, DiagnosticsResult};
pub use recorder::{
    FrameMetricsRecorder, LifecycleMarker, PerformanceMetrics, FULL_LOAD_TIME, LOAD_TIME,
};
pub use resource::{RequestDescriptor, ResourceTiming, ResourceTimingOutcome};
pub use timeline::{
    EntryType, ManualTimeline, MonotonicTimeline, Timeline, TimelineEntry, DEFAULT_MAX_ENTRIES,
};
