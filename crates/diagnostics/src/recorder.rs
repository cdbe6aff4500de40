//! Lifecycle and animation-frame metrics recording.

use crate::error::DiagnosticsResult;
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};

/// Measure name for the create-to-load interval.
pub const LOAD_TIME: &str = "loadTime";
/// Measure name for the create-to-full-load interval.
pub const FULL_LOAD_TIME: &str = "fullLoadTime";

/// Per-frame budget for a 60 Hz target, in milliseconds.
const FRAME_BUDGET_MS: f64 = 1000.0 / 60.0;

/// Page-lifecycle instants the recorder can mark.
///
/// Callers are responsible for marking `Create` before `Load` and
/// `FullLoad`; ordering is not validated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleMarker {
    /// The client object was constructed
    Create,
    /// Initial style and first renderable state are ready
    Load,
    /// Every pending resource has arrived
    FullLoad,
}

impl LifecycleMarker {
    /// Stable mark name in the shared timeline log.
    pub fn name(self) -> &'static str {
        match self {
            LifecycleMarker::Create => "create",
            LifecycleMarker::Load => "load",
            LifecycleMarker::FullLoad => "fullLoad",
        }
    }
}

/// Aggregate load and frame-health metrics, recomputed on each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Milliseconds from the `create` mark to the `load` mark
    pub load_time: f64,
    /// Milliseconds from the `create` mark to the `fullLoad` mark
    pub full_load_time: f64,
    /// Average frames per second over the recorded samples; NaN when no
    /// frames were recorded
    pub fps: f64,
    /// Effective frames lost to over-budget frames, as a percentage of
    /// the effective total; NaN when no frames were recorded
    pub percent_dropped_frames: f64,
    /// Number of frame deltas recorded
    pub total_frames: usize,
}

/// Records lifecycle marks and per-frame deltas, and computes aggregate
/// metrics on demand.
///
/// One recorder covers one logical session. State is never torn down
/// automatically: call [`clear_metrics`](Self::clear_metrics) between
/// sessions or metrics will mix across them. All methods must be invoked
/// from a single serialized call sequence; the timeline is injected per
/// call so the recorder itself holds no clock.
#[derive(Debug, Default)]
pub struct FrameMetricsRecorder {
    /// Elapsed milliseconds between consecutive frame callbacks
    frame_times: Vec<f64>,
    /// Timestamp of the most recent frame callback, once seeded
    last_frame_time: Option<f64>,
}

impl FrameMetricsRecorder {
    /// Create a recorder with no recorded frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lifecycle instant in the shared timeline log.
    pub fn mark(&self, timeline: &mut dyn Timeline, marker: LifecycleMarker) {
        timeline.record_mark(marker.name());
    }

    /// Record one animation-frame callback.
    ///
    /// The first call after construction or after a clear only seeds the
    /// baseline; every later call appends `timestamp - previous` to the
    /// sample and moves the baseline. Timestamps must be monotonically
    /// non-decreasing and in the timeline's clock domain; no fixed frame
    /// cadence is assumed.
    pub fn frame(&mut self, timestamp: f64) {
        if let Some(previous) = self.last_frame_time {
            let delta = timestamp - previous;
            self.frame_times.push(delta);
            tracing::trace!(
                target: "diag::frame",
                delta_ms = delta,
                "frame delta recorded"
            );
        }
        self.last_frame_time = Some(timestamp);
    }

    /// Number of frame deltas recorded so far.
    pub fn total_frames(&self) -> usize {
        self.frame_times.len()
    }

    /// Recorded frame deltas in milliseconds.
    pub fn frame_times(&self) -> &[f64] {
        &self.frame_times
    }

    /// Reset to a clean session: drop the baseline and every frame
    /// sample, and remove this recorder's measures and lifecycle marks
    /// from the shared timeline log.
    pub fn clear_metrics(&mut self, timeline: &mut dyn Timeline) {
        self.frame_times.clear();
        self.last_frame_time = None;

        timeline.clear_measures(LOAD_TIME);
        timeline.clear_measures(FULL_LOAD_TIME);
        for marker in [
            LifecycleMarker::Create,
            LifecycleMarker::Load,
            LifecycleMarker::FullLoad,
        ] {
            timeline.clear_marks(marker.name());
        }
    }

    /// Compute the current metrics snapshot.
    ///
    /// Registers the `loadTime` and `fullLoadTime` measures in the shared
    /// log as a side effect; repeated calls without a clear leave harmless
    /// duplicate measure entries behind. Returns `Err` when a lifecycle
    /// mark is missing (a caller-precondition failure). With zero recorded
    /// frames, `fps` and `percent_dropped_frames` are NaN, not an error.
    pub fn metrics(&self, timeline: &mut dyn Timeline) -> DiagnosticsResult<PerformanceMetrics> {
        let load = timeline.record_measure(
            LOAD_TIME,
            LifecycleMarker::Create.name(),
            LifecycleMarker::Load.name(),
        )?;
        let full_load = timeline.record_measure(
            FULL_LOAD_TIME,
            LifecycleMarker::Create.name(),
            LifecycleMarker::FullLoad.name(),
        )?;

        let total_frames = self.frame_times.len();
        let avg_frame_time_s =
            self.frame_times.iter().sum::<f64>() / total_frames as f64 / 1000.0;
        let fps = 1.0 / avg_frame_time_s;

        // Weight over-budget frames by their fractional overage so a
        // severely late frame counts for more than a mildly late one.
        let dropped_weight: f64 = self
            .frame_times
            .iter()
            .filter(|&&delta| delta > FRAME_BUDGET_MS)
            .map(|&delta| (delta - FRAME_BUDGET_MS) / FRAME_BUDGET_MS)
            .sum();
        // The denominator includes the dropped weight itself: the ratio is
        // frames lost out of an effective total that carries the time debt
        // of the slow frames.
        let percent_dropped_frames =
            dropped_weight / (total_frames as f64 + dropped_weight) * 100.0;

        Ok(PerformanceMetrics {
            load_time: load.duration,
            full_load_time: full_load.duration,
            fps,
            percent_dropped_frames,
            total_frames,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{EntryType, ManualTimeline};
    use proptest::prelude::*;

    fn mark_lifecycle(tl: &mut ManualTimeline, rec: &FrameMetricsRecorder) {
        rec.mark(tl, LifecycleMarker::Create);
        tl.advance_ms(120.0);
        rec.mark(tl, LifecycleMarker::Load);
        tl.advance_ms(300.0);
        rec.mark(tl, LifecycleMarker::FullLoad);
    }

    #[test]
    fn test_first_frame_seeds_baseline_only() {
        let mut rec = FrameMetricsRecorder::new();
        rec.frame(100.0);
        assert_eq!(rec.total_frames(), 0);

        rec.frame(116.0);
        assert_eq!(rec.total_frames(), 1);
        assert_eq!(rec.frame_times(), &[16.0]);
    }

    #[test]
    fn test_load_measures() {
        let mut tl = ManualTimeline::new();
        let rec = FrameMetricsRecorder::new();
        mark_lifecycle(&mut tl, &rec);

        let metrics = rec.metrics(&mut tl).unwrap();
        assert_eq!(metrics.load_time, 120.0);
        assert_eq!(metrics.full_load_time, 420.0);
        assert_eq!(metrics.total_frames, 0);
    }

    #[test]
    fn test_on_budget_frames_drop_nothing() {
        let mut tl = ManualTimeline::new();
        let mut rec = FrameMetricsRecorder::new();
        mark_lifecycle(&mut tl, &rec);

        // Four callbacks at an exact 60 Hz cadence: three deltas.
        for i in 0..4 {
            rec.frame(i as f64 * 1000.0 / 60.0);
        }

        let metrics = rec.metrics(&mut tl).unwrap();
        assert_eq!(metrics.total_frames, 3);
        assert!((metrics.fps - 60.0).abs() < 1e-9);
        assert_eq!(metrics.percent_dropped_frames, 0.0);
    }

    #[test]
    fn test_double_budget_frame_is_half_dropped() {
        let mut tl = ManualTimeline::new();
        let mut rec = FrameMetricsRecorder::new();
        mark_lifecycle(&mut tl, &rec);

        // One delta at exactly twice the budget: overage weight 1.0,
        // so 1.0 / (1 + 1.0) = 50%.
        rec.frame(0.0);
        rec.frame(2.0 * 1000.0 / 60.0);

        let metrics = rec.metrics(&mut tl).unwrap();
        assert_eq!(metrics.total_frames, 1);
        assert!((metrics.percent_dropped_frames - 50.0).abs() < 1e-9);
        assert!((metrics.fps - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_frames_yields_nan_not_error() {
        let mut tl = ManualTimeline::new();
        let rec = FrameMetricsRecorder::new();
        mark_lifecycle(&mut tl, &rec);

        let metrics = rec.metrics(&mut tl).unwrap();
        assert_eq!(metrics.total_frames, 0);
        assert!(metrics.fps.is_nan());
        assert!(metrics.percent_dropped_frames.is_nan());
    }

    #[test]
    fn test_metrics_idempotent_but_measures_accumulate() {
        let mut tl = ManualTimeline::new();
        let mut rec = FrameMetricsRecorder::new();
        mark_lifecycle(&mut tl, &rec);
        rec.frame(0.0);
        rec.frame(20.0);

        let first = rec.metrics(&mut tl).unwrap();
        let second = rec.metrics(&mut tl).unwrap();
        assert_eq!(first.total_frames, second.total_frames);
        assert_eq!(first.fps, second.fps);
        assert_eq!(first.percent_dropped_frames, second.percent_dropped_frames);

        // Repeated calls re-register the measures in the shared log.
        assert_eq!(tl.entries_by_name(LOAD_TIME).len(), 2);
        assert_eq!(tl.entries_by_name(FULL_LOAD_TIME).len(), 2);
    }

    #[test]
    fn test_clear_metrics_scrubs_log_and_samples() {
        let mut tl = ManualTimeline::new();
        let mut rec = FrameMetricsRecorder::new();
        mark_lifecycle(&mut tl, &rec);
        rec.frame(0.0);
        rec.frame(16.0);
        rec.metrics(&mut tl).unwrap();

        rec.clear_metrics(&mut tl);
        assert_eq!(rec.total_frames(), 0);
        assert!(tl.entries_by_name(LOAD_TIME).is_empty());
        assert!(tl.entries_by_name(FULL_LOAD_TIME).is_empty());
        assert!(tl.entries_by_name("create").is_empty());

        // The baseline is unset again: the next frame call seeds, only.
        rec.frame(500.0);
        assert_eq!(rec.total_frames(), 0);

        // And the lifecycle marks are gone, so metrics now fails.
        assert!(rec.metrics(&mut tl).is_err());
    }

    #[test]
    fn test_metrics_serialize_camel_case() {
        let mut tl = ManualTimeline::new();
        let mut rec = FrameMetricsRecorder::new();
        mark_lifecycle(&mut tl, &rec);
        rec.frame(0.0);
        rec.frame(1000.0 / 60.0);

        let metrics = rec.metrics(&mut tl).unwrap();
        let value = serde_json::to_value(&metrics).unwrap();
        assert!(value.get("loadTime").is_some());
        assert!(value.get("fullLoadTime").is_some());
        assert!(value.get("percentDroppedFrames").is_some());
        assert_eq!(value.get("totalFrames").unwrap(), 1);
    }

    #[test]
    fn test_lifecycle_mark_entry_type() {
        let mut tl = ManualTimeline::new();
        let rec = FrameMetricsRecorder::new();
        rec.mark(&mut tl, LifecycleMarker::Create);

        let entries = tl.entries_by_name("create");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_type, EntryType::Mark);
    }

    proptest! {
        #[test]
        fn prop_frame_count_and_delta_sum(
            deltas in proptest::collection::vec(0.1f64..100.0, 1..64)
        ) {
            let mut rec = FrameMetricsRecorder::new();
            let mut timestamp = 0.0;
            rec.frame(timestamp);
            for delta in &deltas {
                timestamp += delta;
                rec.frame(timestamp);
            }

            prop_assert_eq!(rec.total_frames(), deltas.len());
            let recorded: f64 = rec.frame_times().iter().sum();
            prop_assert!((recorded - timestamp).abs() < 1e-6);
        }
    }
}
