// In-memory sample history with sliding retention and dirty tracking.
// One mutex guards samples + generation; every critical section is a short
// in-memory copy or mutation, never I/O.

pub mod file;
pub mod resample;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::models::Sample;

/// Seconds since the Unix epoch as a float; 0.0 if the clock is before the epoch.
pub fn unix_now_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "unix_now_secs", "system time error");
            0.0
        })
}

#[derive(Debug, Default)]
struct HistoryState {
    samples: Vec<Sample>,
    /// Bumped on every append.
    generation: u64,
    /// Generation of the last snapshot that reached disk.
    persisted_generation: u64,
}

impl HistoryState {
    fn trim(&mut self, cutoff: f64) -> usize {
        let before = self.samples.len();
        self.samples.retain(|s| s.timestamp >= cutoff);
        before - self.samples.len()
    }
}

#[derive(Debug)]
pub struct HistoryStore {
    state: Mutex<HistoryState>,
    retention_secs: f64,
}

impl HistoryStore {
    /// Seeds the store from previously persisted samples (trimmed to the window).
    /// A freshly seeded store is clean.
    pub fn new(samples: Vec<Sample>, retention: Duration) -> Self {
        let retention_secs = retention.as_secs_f64();
        let mut state = HistoryState {
            samples,
            ..Default::default()
        };
        let dropped = state.trim(unix_now_secs() - retention_secs);
        if dropped > 0 {
            tracing::debug!(dropped, "expired samples dropped on load");
        }
        Self {
            state: Mutex::new(state),
            retention_secs,
        }
    }

    pub fn empty(retention: Duration) -> Self {
        Self::new(Vec::new(), retention)
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, sample: Sample) {
        self.append_at(sample, unix_now_secs());
    }

    /// Appends then drops everything older than `now - retention`, in one critical section.
    pub fn append_at(&self, sample: Sample, now: f64) {
        let cutoff = now - self.retention_secs;
        let mut state = self.lock();
        state.samples.push(sample);
        state.generation += 1;
        state.trim(cutoff);
    }

    /// Point-in-time copy of the full buffer.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.lock().samples.clone()
    }

    /// Copy of the samples inside the last `period_hours`, filtered while held.
    pub fn window(&self, period_hours: f64, now: f64) -> Vec<Sample> {
        resample::filter_by_period(&self.lock().samples, period_hours, now)
    }

    /// Full copy plus its generation when there are unsaved appends; `None` when clean.
    pub fn dirty_snapshot(&self) -> Option<(u64, Vec<Sample>)> {
        let state = self.lock();
        if state.generation == state.persisted_generation {
            return None;
        }
        Some((state.generation, state.samples.clone()))
    }

    /// Records that the snapshot taken at `generation` is on disk. Appends that
    /// happened after that snapshot keep the store dirty.
    pub fn mark_persisted(&self, generation: u64) {
        let mut state = self.lock();
        state.persisted_generation = state.persisted_generation.max(generation);
    }

    pub fn is_dirty(&self) -> bool {
        let state = self.lock();
        state.generation != state.persisted_generation
    }

    pub fn len(&self) -> usize {
        self.lock().samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
