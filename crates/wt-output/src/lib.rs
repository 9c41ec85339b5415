//! `wt-output` — report writers for worktwin runs.
//!
//! A [`ReportObserver`] attaches to the simulator's observer seam and
//! streams per-tick counters to an [`OutputWriter`] backend.  Only the
//! CSV backend ships here; the trait is the seam where other formats
//! would plug in.
//!
//! | Module       | Contents                             |
//! |--------------|--------------------------------------|
//! | [`row`]      | `TickSummaryRow`, `QueueDepthRow`    |
//! | [`writer`]   | `OutputWriter` trait                 |
//! | [`csv`]      | `CsvWriter` backend                  |
//! | [`observer`] | `ReportObserver<W>`                  |
//! | [`error`]    | `OutputError`, `OutputResult`        |

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


// ── Re-exports ───────────────────────────────────────────────────────────────

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::ReportObserver;
pub use row::{QueueDepthRow, TickSummaryRow};
pub use writer::OutputWriter;
