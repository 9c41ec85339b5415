//! `wt-sim` — the worktwin discrete-event simulator.
//!
//! # Tick loop
//!
//! ```text
//! run():
//!   process the start instant once (drain + observe, no advance)
//!   loop:
//!     ① advance    — clock moves one step
//!     ② waves      — task arrivals at timestamps ≤ now append to queues
//!     ③ drain      — every event batch with timestamp ≤ now applies
//!                    atomically, in timestamp order
//!     ④ observe    — the worker may re-plan (timer / idle triggers),
//!                    then dispatches one pending command per stable agent
//! ```
//!
//! Item-level work never goes back to the decision engine: a working
//! agent's `ItemDone` claims the next pending item and schedules its own
//! successor.
//!
//! | Module          | Contents                                       |
//! |-----------------|------------------------------------------------|
//! | [`event_queue`] | `EventQueue` — timestamp-keyed batches         |
//! | [`event`]       | `Event`, `EventKind`, the claim protocol       |
//! | [`adapter`]     | live state → engine snapshot collapse          |
//! | [`worker`]      | triggers, engine invocation, dispatch          |
//! | [`sim`]         | `Twin`, `TaskWave`, `RunOutcome`               |
//! | [`builder`]     | `TwinBuilder`                                  |
//! | [`observer`]    | `TwinObserver`, `NoopObserver`                 |
//! | [`snapshot`]    | `TwinSnapshot` and derived metrics             |

pub mod adapter;
pub mod builder;
pub mod event;
pub mod event_queue;
pub mod observer;
pub mod sim;
pub mod snapshot;
pub mod worker;

#[cfg(test)]
mod tests;

// ── Re-exports ───────────────────────────────────────────────────────────────

pub use adapter::adapt;
pub use builder::TwinBuilder;
pub use event::{Event, EventKind};
pub use event_queue::EventQueue;
pub use observer::{NoopObserver, TwinObserver};
pub use sim::{RunOutcome, TaskWave, Twin};
pub use snapshot::{AgentView, Metrics, QueueView, TwinSnapshot};
pub use worker::{translate, Worker};
