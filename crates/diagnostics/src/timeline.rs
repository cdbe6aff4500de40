//! Shared timing facility: named marks, measures, and the entry log.
//!
//! The host environment owns a single monotonic-clock entry log; both the
//! frame recorder and the per-resource wrappers read and write it through
//! the [`Timeline`] trait. Abstracting the log behind a trait keeps the
//! aggregation logic independent of the real clock, so tests can drive a
//! [`ManualTimeline`] deterministically.

use crate::error::{DiagnosticsError, DiagnosticsResult};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Default capacity of the shared entry buffer.
///
/// Real host environments bound their timing buffers; the in-memory log
/// mirrors that by evicting the oldest entry once full.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Kind of entry retained in the timeline log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// A named instant
    Mark,
    /// A named duration between two marks
    Measure,
    /// An entry the environment produced on its own for a network fetch
    Resource,
}

/// A named, timestamped entry in the shared timeline log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// Entry name (mark name, measure name, or resource URL)
    pub name: String,
    /// What kind of entry this is
    pub entry_type: EntryType,
    /// Milliseconds since the timeline's origin
    pub start_time: f64,
    /// Milliseconds; zero for marks
    pub duration: f64,
}

/// The timing capability the diagnostics components consume.
///
/// All times are f64 milliseconds in one monotonic clock domain. The log
/// is shared, environment-managed state: callers do not own the entries
/// they record and must clear what they do not want retained.
pub trait Timeline {
    /// Record a named instant at the current time.
    fn record_mark(&mut self, name: &str) -> TimelineEntry;

    /// Record a named duration between two previously recorded marks.
    ///
    /// Re-recording a mark is legal; when a mark name appears more than
    /// once, the most recently retained entry wins.
    fn record_measure(
        &mut self,
        name: &str,
        start_mark: &str,
        end_mark: &str,
    ) -> DiagnosticsResult<TimelineEntry>;

    /// All retained entries under `name`, of any type, in insertion order.
    fn entries_by_name(&self, name: &str) -> Vec<TimelineEntry>;

    /// Remove every mark entry recorded under `name`.
    fn clear_marks(&mut self, name: &str);

    /// Remove every measure entry recorded under `name`.
    fn clear_measures(&mut self, name: &str);
}

/// Bounded entry buffer shared by both timeline implementations.
#[derive(Debug, Clone)]
struct EntryLog {
    entries: Vec<TimelineEntry>,
    max_entries: usize,
}

impl EntryLog {
    fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    fn push(&mut self, entry: TimelineEntry) -> TimelineEntry {
        if self.entries.len() >= self.max_entries {
            let evicted = self.entries.remove(0);
            tracing::trace!(
                target: "diag::timeline",
                name = %evicted.name,
                "entry buffer full, oldest entry evicted"
            );
        }
        self.entries.push(entry.clone());
        entry
    }

    fn mark(&mut self, name: &str, now_ms: f64) -> TimelineEntry {
        self.push(TimelineEntry {
            name: name.to_string(),
            entry_type: EntryType::Mark,
            start_time: now_ms,
            duration: 0.0,
        })
    }

    /// Timestamp of the most recently retained mark under `name`.
    fn last_mark(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.entry_type == EntryType::Mark && e.name == name)
            .map(|e| e.start_time)
    }

    fn measure(
        &mut self,
        name: &str,
        start_mark: &str,
        end_mark: &str,
    ) -> DiagnosticsResult<TimelineEntry> {
        let start = self
            .last_mark(start_mark)
            .ok_or_else(|| DiagnosticsError::MissingMark(start_mark.to_string()))?;
        let end = self
            .last_mark(end_mark)
            .ok_or_else(|| DiagnosticsError::MissingMark(end_mark.to_string()))?;

        Ok(self.push(TimelineEntry {
            name: name.to_string(),
            entry_type: EntryType::Measure,
            start_time: start,
            duration: end - start,
        }))
    }

    fn by_name(&self, name: &str) -> Vec<TimelineEntry> {
        self.entries.iter().filter(|e| e.name == name).cloned().collect()
    }

    fn clear(&mut self, entry_type: EntryType, name: &str) {
        self.entries
            .retain(|e| e.entry_type != entry_type || e.name != name);
    }
}

/// Production timeline backed by [`std::time::Instant`].
///
/// The origin is fixed at construction; every recorded time is the
/// elapsed milliseconds since then.
#[derive(Debug)]
pub struct MonotonicTimeline {
    origin: Instant,
    log: EntryLog,
}

impl MonotonicTimeline {
    /// Create a timeline with the default entry-buffer capacity.
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Create a timeline with a custom entry-buffer capacity.
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            origin: Instant::now(),
            log: EntryLog::new(max_entries),
        }
    }

    /// Current time in milliseconds since this timeline's origin.
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for MonotonicTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline for MonotonicTimeline {
    fn record_mark(&mut self, name: &str) -> TimelineEntry {
        let now = self.now_ms();
        self.log.mark(name, now)
    }

    fn record_measure(
        &mut self,
        name: &str,
        start_mark: &str,
        end_mark: &str,
    ) -> DiagnosticsResult<TimelineEntry> {
        self.log.measure(name, start_mark, end_mark)
    }

    fn entries_by_name(&self, name: &str) -> Vec<TimelineEntry> {
        self.log.by_name(name)
    }

    fn clear_marks(&mut self, name: &str) {
        self.log.clear(EntryType::Mark, name);
    }

    fn clear_measures(&mut self, name: &str) {
        self.log.clear(EntryType::Measure, name);
    }
}

/// Deterministic timeline whose clock only moves when told to.
///
/// Used by tests and by host integrations that forward an external clock.
/// Seeding it with [`push_resource_entry`](ManualTimeline::push_resource_entry)
/// simulates a main execution context where the environment auto-populates
/// resource-timing entries; leaving it unseeded simulates a worker-like
/// context where it does not.
#[derive(Debug)]
pub struct ManualTimeline {
    now_ms: f64,
    log: EntryLog,
}

impl ManualTimeline {
    /// Create a timeline at t = 0 with the default buffer capacity.
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Create a timeline at t = 0 with a custom buffer capacity.
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            now_ms: 0.0,
            log: EntryLog::new(max_entries),
        }
    }

    /// Current time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Advance the clock by `delta_ms` milliseconds.
    pub fn advance_ms(&mut self, delta_ms: f64) {
        self.now_ms += delta_ms;
    }

    /// Set the clock to an absolute time. The clock is monotonic; moving
    /// it backwards is a caller error.
    pub fn set_now_ms(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    /// Append an environment-style resource-timing entry under `name`,
    /// starting at the current time.
    pub fn push_resource_entry(&mut self, name: &str, duration_ms: f64) -> TimelineEntry {
        let entry = TimelineEntry {
            name: name.to_string(),
            entry_type: EntryType::Resource,
            start_time: self.now_ms,
            duration: duration_ms,
        };
        self.log.push(entry)
    }
}

impl Default for ManualTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline for ManualTimeline {
    fn record_mark(&mut self, name: &str) -> TimelineEntry {
        let now = self.now_ms;
        self.log.mark(name, now)
    }

    fn record_measure(
        &mut self,
        name: &str,
        start_mark: &str,
        end_mark: &str,
    ) -> DiagnosticsResult<TimelineEntry> {
        self.log.measure(name, start_mark, end_mark)
    }

    fn entries_by_name(&self, name: &str) -> Vec<TimelineEntry> {
        self.log.by_name(name)
    }

    fn clear_marks(&mut self, name: &str) {
        self.log.clear(EntryType::Mark, name);
    }

    fn clear_measures(&mut self, name: &str) {
        self.log.clear(EntryType::Measure, name);
    }
}
