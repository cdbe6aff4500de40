//! Per-resource timing: one short-lived wrapper per outbound request.

use crate::timeline::{Timeline, TimelineEntry};
use serde::{Deserialize, Serialize};

/// Minimal descriptor for an outbound resource request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// Canonical identifier for the resource, typically its URL
    pub url: String,
}

impl RequestDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// How a resource's timing entries were obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceTimingOutcome {
    /// Entries the environment populated on its own for this resource
    Observed(Vec<TimelineEntry>),
    /// A measure this wrapper synthesized between its own start/end
    /// marks, after cleaning its entries back out of the shared log
    Synthesized(TimelineEntry),
    /// No timing data could be produced
    Unavailable,
}

impl ResourceTimingOutcome {
    /// The timing entries, regardless of how they were obtained.
    pub fn into_entries(self) -> Vec<TimelineEntry> {
        match self {
            ResourceTimingOutcome::Observed(entries) => entries,
            ResourceTimingOutcome::Synthesized(entry) => vec![entry],
            ResourceTimingOutcome::Unavailable => Vec::new(),
        }
    }

    /// True when the fallback synthesis path produced the entry.
    pub fn is_synthesized(&self) -> bool {
        matches!(self, ResourceTimingOutcome::Synthesized(_))
    }
}

/// Start/end timing wrapper for a single resource request.
///
/// Construction records the start mark; [`finish`](Self::finish) records
/// the end mark and returns whatever timing entries exist for the
/// resource. In a main execution context the environment populates
/// resource entries on its own; in worker-like contexts it does not, so
/// the wrapper synthesizes a measure between its own marks and then
/// removes everything it wrote, keeping the shared bounded buffer clean.
///
/// The wrapper is terminal after `finish`; instances are not reusable.
#[derive(Debug)]
pub struct ResourceTiming {
    mark_start: String,
    mark_end: String,
    measure_name: String,
    finished: bool,
}

impl ResourceTiming {
    /// Derive the mark/measure names for `request` and record the start
    /// mark. No other side effects.
    pub fn begin(timeline: &mut dyn Timeline, request: &RequestDescriptor) -> Self {
        let mark_start = format!("{}#start", request.url);
        let mark_end = format!("{}#end", request.url);
        timeline.record_mark(&mark_start);

        Self {
            mark_start,
            mark_end,
            measure_name: request.url.clone(),
            finished: false,
        }
    }

    /// The resource's canonical measure name.
    pub fn measure_name(&self) -> &str {
        &self.measure_name
    }

    /// Record the end mark and resolve this resource's timing entries.
    /// Never fails; absence of timing data is an empty entry list.
    pub fn finish(&mut self, timeline: &mut dyn Timeline) -> Vec<TimelineEntry> {
        self.resolve(timeline).into_entries()
    }

    /// Like [`finish`](Self::finish), but keeps the observed-vs-synthesized
    /// distinction visible.
    pub fn resolve(&mut self, timeline: &mut dyn Timeline) -> ResourceTimingOutcome {
        if self.finished {
            tracing::warn!(
                target: "diag::resource",
                resource = %self.measure_name,
                "finish called on an already finished resource timer"
            );
            return ResourceTimingOutcome::Unavailable;
        }
        self.finished = true;

        timeline.record_mark(&self.mark_end);

        let observed = timeline.entries_by_name(&self.measure_name);
        if !observed.is_empty() {
            return ResourceTimingOutcome::Observed(observed);
        }

        // Worker-like context: no auto-populated entries. Synthesize the
        // measure from our own marks, read it back, then delete all three
        // synthetic entries so they never crowd the shared buffer.
        match timeline.record_measure(&self.measure_name, &self.mark_start, &self.mark_end) {
            Ok(_) => {
                let mut entries = timeline.entries_by_name(&self.measure_name);
                timeline.clear_marks(&self.mark_start);
                timeline.clear_marks(&self.mark_end);
                timeline.clear_measures(&self.measure_name);
                match entries.pop() {
                    Some(entry) => ResourceTimingOutcome::Synthesized(entry),
                    None => ResourceTimingOutcome::Unavailable,
                }
            }
            Err(err) => {
                // The start mark can be evicted from a bounded buffer
                // before the resource completes.
                tracing::warn!(
                    target: "diag::resource",
                    resource = %self.measure_name,
                    error = %err,
                    "could not synthesize resource timing"
                );
                timeline.clear_marks(&self.mark_start);
                timeline.clear_marks(&self.mark_end);
                ResourceTimingOutcome::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{EntryType, ManualTimeline, Timeline};

    const URL: &str = "https://tiles.example/3/4/5.pbf";

    #[test]
    fn test_begin_records_start_mark_only() {
        let mut tl = ManualTimeline::new();
        let timer = ResourceTiming::begin(&mut tl, &RequestDescriptor::new(URL));

        assert_eq!(timer.measure_name(), URL);
        let marks = tl.entries_by_name(&format!("{URL}#start"));
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].entry_type, EntryType::Mark);
        assert!(tl.entries_by_name(URL).is_empty());
    }

    #[test]
    fn test_finish_prefers_observed_entries() {
        let mut tl = ManualTimeline::new();
        let mut timer = ResourceTiming::begin(&mut tl, &RequestDescriptor::new(URL));
        tl.advance_ms(12.0);
        tl.push_resource_entry(URL, 34.0);
        tl.advance_ms(34.0);

        let outcome = timer.resolve(&mut tl);
        assert!(!outcome.is_synthesized());
        let entries = outcome.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_type, EntryType::Resource);
        assert_eq!(entries[0].duration, 34.0);

        // No synthetic measure was created under the resource name.
        let remaining = tl.entries_by_name(URL);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].entry_type, EntryType::Resource);
    }

    #[test]
    fn test_finish_synthesizes_and_cleans_up() {
        let mut tl = ManualTimeline::new();
        let mut timer = ResourceTiming::begin(&mut tl, &RequestDescriptor::new(URL));
        tl.advance_ms(57.0);

        let entries = timer.finish(&mut tl);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_type, EntryType::Measure);
        assert_eq!(entries[0].name, URL);
        assert_eq!(entries[0].duration, 57.0);

        // Nothing synthetic remains under any derived name.
        assert!(tl.entries_by_name(URL).is_empty());
        assert!(tl.entries_by_name(&format!("{URL}#start")).is_empty());
        assert!(tl.entries_by_name(&format!("{URL}#end")).is_empty());
    }

    #[test]
    fn test_synthesized_duration_zero_for_instant_finish() {
        let mut tl = ManualTimeline::new();
        let mut timer = ResourceTiming::begin(&mut tl, &RequestDescriptor::new(URL));

        let outcome = timer.resolve(&mut tl);
        assert!(outcome.is_synthesized());
        let entries = outcome.into_entries();
        assert_eq!(entries[0].duration, 0.0);
    }

    #[test]
    fn test_finish_is_terminal() {
        let mut tl = ManualTimeline::new();
        let mut timer = ResourceTiming::begin(&mut tl, &RequestDescriptor::new(URL));
        tl.advance_ms(5.0);

        assert_eq!(timer.finish(&mut tl).len(), 1);
        assert!(timer.finish(&mut tl).is_empty());
    }

    #[test]
    fn test_evicted_start_mark_yields_empty_not_panic() {
        // A buffer of two slots loses the start mark before finish.
        let mut tl = ManualTimeline::with_max_entries(2);
        let mut timer = ResourceTiming::begin(&mut tl, &RequestDescriptor::new(URL));
        tl.record_mark("noise-1");
        tl.record_mark("noise-2");

        let outcome = timer.resolve(&mut tl);
        assert_eq!(outcome, ResourceTimingOutcome::Unavailable);
        assert!(tl.entries_by_name(&format!("{URL}#end")).is_empty());
    }

    #[test]
    fn test_concurrent_wrappers_do_not_interfere() {
        let mut tl = ManualTimeline::new();
        let mut a = ResourceTiming::begin(&mut tl, &RequestDescriptor::new("https://a.example"));
        tl.advance_ms(10.0);
        let mut b = ResourceTiming::begin(&mut tl, &RequestDescriptor::new("https://b.example"));
        tl.advance_ms(10.0);

        let a_entries = a.finish(&mut tl);
        tl.advance_ms(10.0);
        let b_entries = b.finish(&mut tl);

        assert_eq!(a_entries[0].duration, 20.0);
        assert_eq!(b_entries[0].duration, 20.0);
        assert!(tl.entries_by_name("https://a.example").is_empty());
        assert!(tl.entries_by_name("https://b.example").is_empty());
    }
}
