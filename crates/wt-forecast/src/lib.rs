//! `wt-forecast` — asynchronous what-if projections of a worktwin
//! simulation.
//!
//! A forecast is a deep clone of the live twin (state, clock, event
//! queue, wave cursor) driven on a background thread to a bounded
//! horizon.  The live loop is never perturbed: the only shared datum is
//! the latest published [`ForecastResult`], swapped atomically when a
//! run completes.
//!
//! | Module      | Contents                                        |
//! |-------------|-------------------------------------------------|
//! | [`segment`] | `Segment`, `SegmentRecorder`, `ForecastResult`  |
//! | [`runner`]  | `ForecastRunner`                                |

pub mod runner;
pub mod segment;


// ── Re-exports ───────────────────────────────────────────────────────────────

pub use runner::ForecastRunner;
pub use segment::{ForecastResult, Segment, SegmentKind, SegmentRecorder};
