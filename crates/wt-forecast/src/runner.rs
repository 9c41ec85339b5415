//! The forecast runner: clone, hand off, publish atomically.

use std::sync::Arc;
use std::thread::JoinHandle;

use arc_swap::ArcSwapOption;

use wt_core::CancelToken;
use wt_sim::{RunOutcome, Twin};

use crate::segment::{ForecastResult, SegmentRecorder};

/// Runs at most one background forecast at a time.
///
/// `launch` deep-clones the live twin on the caller's thread (the live
/// tick thread never shares state with the worker), cancels and joins any
/// forecast still in flight, and spawns a thread that drives the clone
/// flat out until its horizon, a full drain, or cancellation.  Only a
/// completed run publishes; the published slot is a single-writer atomic
/// swap, so readers always see either the previous result or the new one,
/// never a partial write.  A worker that fails keeps the previous result
/// (the failure is logged and swallowed).
#[derive(Default)]
pub struct ForecastRunner {
    slot: Arc<ArcSwapOption<ForecastResult>>,
    current: Option<ForecastHandle>,
}

struct ForecastHandle {
    cancel: CancelToken,
    thread: JoinHandle<()>,
}

impl ForecastRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently published forecast, if any run has completed.
    pub fn latest(&self) -> Option<Arc<ForecastResult>> {
        self.slot.load_full()
    }

    /// Start a forecast from the twin's current instant, superseding any
    /// forecast already running.
    pub fn launch(&mut self, twin: &Twin) {
        self.cancel_current();

        let mut clone = twin.clone();
        // Forecasts never pace; zero is always a valid speed.
        let _ = clone.set_speed(0.0);
        let launched_at = clone.clock.now;
        let horizon_end = launched_at.offset(clone.config.forecast_horizon_secs);
        clone.clamp_window(horizon_end);

        let cancel = CancelToken::new();
        let token = cancel.clone();
        let slot = Arc::clone(&self.slot);

        let thread = std::thread::spawn(move || {
            let mut recorder = SegmentRecorder::new(clone.state.agents.len());
            match clone.run(&mut recorder, &token) {
                Ok(RunOutcome::Completed) => {
                    let completed_at = clone.clock.now;
                    let result = ForecastResult {
                        launched_at,
                        horizon_end,
                        completed_at,
                        segments: recorder.into_segments(completed_at),
                    };
                    tracing::debug!(
                        from = launched_at.0,
                        to = completed_at.0,
                        segments = result.segments.len(),
                        "forecast published"
                    );
                    slot.store(Some(Arc::new(result)));
                }
                Ok(RunOutcome::Paused) => {
                    tracing::debug!(from = launched_at.0, "forecast cancelled; nothing published");
                }
                Err(error) => {
                    tracing::warn!(%error, "forecast failed; previous result retained");
                }
            }
        });
        self.current = Some(ForecastHandle { cancel, thread });
    }

    /// Cancel the in-flight forecast (if any) and wait for its thread.
    pub fn cancel_current(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.cancel.cancel();
            let _ = handle.thread.join();
        }
    }

    /// Wait for the in-flight forecast (if any) without cancelling it.
    pub fn wait(&mut self) {
        if let Some(handle) = self.current.take() {
            let _ = handle.thread.join();
        }
    }
}

impl Drop for ForecastRunner {
    fn drop(&mut self) {
        self.cancel_current();
    }
}
