//! `ReportObserver<W>` — bridges `TwinObserver` to an `OutputWriter`.

use wt_core::SimTime;
use wt_state::{AgentPhase, StateStore};
use wt_sim::TwinObserver;

use crate::row::{QueueDepthRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`TwinObserver`] that writes per-tick counters to any
/// [`OutputWriter`] backend.
///
/// Writer errors are stored internally because observer methods have no
/// return value; after the run, check with
/// [`take_error`][Self::take_error].
pub struct ReportObserver<W: OutputWriter> {
    writer: W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> ReportObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(error) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(error);
            }
        }
    }
}

impl<W: OutputWriter> TwinObserver for ReportObserver<W> {
    fn on_tick_end(&mut self, now: SimTime, state: &StateStore) {
        let summary = TickSummaryRow {
            time_secs: now.0,
            pending_total: state.queues.iter().map(|q| q.pending.len() as u64).sum(),
            completed_total: state.total_completed() as u64,
            working_agents: state
                .agents
                .iter()
                .filter(|a| a.phase == AgentPhase::Working)
                .count() as u64,
        };
        let result = self.writer.write_summary(&summary);
        self.store_err(result);

        let depths: Vec<QueueDepthRow> = state
            .queues
            .iter()
            .map(|q| QueueDepthRow {
                time_secs: now.0,
                queue_id: q.id.0,
                pending: q.pending.len() as u64,
                completed: q.finished.len() as u64,
            })
            .collect();
        if !depths.is_empty() {
            let result = self.writer.write_depths(&depths);
            self.store_err(result);
        }
    }

    fn on_finish(&mut self, _now: SimTime) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
