//! `EventQueue` — the time-ordered event multimap.
//!
//! # Why a `BTreeMap`
//!
//! Most instants have no events.  Keying batches by timestamp gives
//! O(log W) scheduling and O(log W) batch pop where W is the number of
//! distinct future timestamps — and, crucially, every event sharing a
//! timestamp comes back in one batch, in insertion order, so a whole
//! batch applies before any observer runs.

use std::collections::BTreeMap;

use wt_core::{SimTime, TwinError, TwinResult};

use crate::event::Event;

/// A multimap from timestamp to the events due at that instant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventQueue {
    inner: BTreeMap<SimTime, Vec<Event>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `event` at its own timestamp, after anything already
    /// scheduled there.
    pub fn schedule(&mut self, event: Event) {
        self.inner.entry(event.at).or_default().push(event);
        self.total += 1;
    }

    /// The earliest timestamp with at least one event, or `None` if empty.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// Remove and return the whole earliest batch.
    ///
    /// Every returned event shares the batch timestamp; afterwards
    /// [`next_time`][Self::next_time] (if any) is strictly greater.
    /// Calling this on an empty queue is a programmer error.
    pub fn pop_batch(&mut self) -> TwinResult<(SimTime, Vec<Event>)> {
        let (at, batch) = self.inner.pop_first().ok_or(TwinError::EmptyBatch)?;
        self.total -= batch.len();
        Ok((at, batch))
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.total = 0;
    }

    /// Total events across all future timestamps.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
