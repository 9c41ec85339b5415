//! Observer trait for progress reporting and data collection.

use wt_core::SimTime;
use wt_state::StateStore;

use crate::snapshot::TwinSnapshot;

/// Callbacks invoked by [`Twin::run`][crate::Twin::run] at tick
/// boundaries.
///
/// All methods have default no-op implementations so implementors only
/// need to override what they care about.  `on_tick_end` sees the raw
/// state (cheap, borrowed); `on_snapshot` receives the derived
/// published view built once per tick.
pub trait TwinObserver {
    /// Called before the tick's events are drained.
    fn on_tick_start(&mut self, _now: SimTime) {}

    /// Called after the tick's events were applied and the worker ran.
    fn on_tick_end(&mut self, _now: SimTime, _state: &StateStore) {}

    /// Called once per tick with the published snapshot.
    fn on_snapshot(&mut self, _snapshot: &TwinSnapshot) {}

    /// Called when the run ends — drained, window end, or halted.
    fn on_finish(&mut self, _now: SimTime) {}
}

/// A [`TwinObserver`] that does nothing.
pub struct NoopObserver;

impl TwinObserver for NoopObserver {}
