//! Simulated time and the simulation clock.
//!
//! # Design
//!
//! Time is represented as absolute simulated seconds (`SimTime`, a `u64`
//! Unix-style timestamp).  The clock advances only through an explicit
//! [`SimClock::advance`] call, by a configurable `step_secs` per tick, so
//! all event arithmetic is exact integer math and comparisons are O(1).
//!
//! Averaged quantities (mean item durations, setup overheads, capacities)
//! are `f64` seconds; they are rounded back to whole seconds only at the
//! moment a successor event is scheduled.

use std::fmt;

// ── SimTime ──────────────────────────────────────────────────────────────────

/// An absolute simulated timestamp in whole seconds.
///
/// Stored as `u64`: at one-second resolution a `u64` outlasts any
/// conceivable run by a comfortable margin.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    /// Return the instant `secs` seconds after `self`.
    #[inline]
    pub fn offset(self, secs: u64) -> SimTime {
        SimTime(self.0 + secs)
    }

    /// Seconds elapsed from `earlier` to `self`, saturating at zero if
    /// `earlier` is actually later.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: SimTime) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

// ── SimClock ─────────────────────────────────────────────────────────────────

/// The simulation clock: window start, current instant, and step size.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data, so
/// cloning a simulator clones its clock for free.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// First instant of the simulated window.
    pub start: SimTime,
    /// The current instant.  Advanced only by [`advance`][Self::advance].
    pub now: SimTime,
    /// Seconds added per tick.  Default: 1.
    pub step_secs: u32,
}

impl SimClock {
    /// Create a clock positioned at `start`.
    pub fn new(start: SimTime, step_secs: u32) -> Self {
        Self { start, now: start, step_secs }
    }

    /// Advance the clock by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.now = self.now + self.step_secs as u64;
    }

    /// Elapsed simulated seconds since the window start.
    #[inline]
    pub fn elapsed_secs(&self) -> u64 {
        self.now.since(self.start)
    }

    /// Break an instant into (day-of-run, hour, minute, second) components.
    /// Useful for human-readable event-log lines without a datetime crate.
    pub fn dhms(&self, t: SimTime) -> (u64, u32, u32, u32) {
        let total = t.since(self.start);
        let days = total / 86_400;
        let hours = ((total % 86_400) / 3_600) as u32;
        let minutes = ((total % 3_600) / 60) as u32;
        let seconds = (total % 60) as u32;
        (days, hours, minutes, seconds)
    }

    /// Render an instant as `d0 02:13:45` relative to the window start.
    pub fn stamp(&self, t: SimTime) -> String {
        let (d, h, m, s) = self.dhms(t);
        format!("d{d} {h:02}:{m:02}:{s:02}")
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stamp(self.now))
    }
}
