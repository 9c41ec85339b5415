//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, QueueDepthRow, TickSummaryRow};

/// A sink for per-tick report rows.
///
/// All methods return `OutputResult`, but the bridging observer stores
/// errors internally and keeps the simulation running — check with
/// [`ReportObserver::take_error`][crate::ReportObserver::take_error]
/// after the run.
pub trait OutputWriter {
    /// Write one tick summary row.
    fn write_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Write a batch of per-queue depth rows.
    fn write_depths(&mut self, rows: &[QueueDepthRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
