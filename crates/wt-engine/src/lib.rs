//! `wt-engine` — the worktwin assignment decision engine.
//!
//! A pure function from a snapshot of agents and queues to an ordered
//! plan of per-agent setup-command sequences:
//!
//! ```text
//! populate    agent × queue × pending-priority → candidates
//!             (cached real capacity per candidate)
//! loop:
//!   redistribute   equalize task counts, most urgent first
//!   select         arg-max by benefit, tie-break by queue
//!   decrement      same-queue same-priority siblings lose the
//!                  winner's task count; the winner's agent leaves
//! ```
//!
//! The engine holds no clock and no mutable state; in-flight work is
//! priced in by the adapter through `ResourceState::Working`.
//!
//! | Module           | Contents                                     |
//! |------------------|----------------------------------------------|
//! | [`state`]        | `ResourceState`, `SetupCommand`              |
//! | [`snapshot`]     | `EngineAgent`, `EngineQueue`, history types  |
//! | [`benefit`]      | `Benefit` and its total order                |
//! | [`candidate`]    | `Candidate`, population, real capacity       |
//! | [`redistribute`] | stack-based task equalization                |
//! | [`engine`]       | `DecisionEngine`, `Assignment`               |

pub mod benefit;
pub mod candidate;
pub mod engine;
pub mod redistribute;
pub mod snapshot;
pub mod state;


// ── Re-exports ───────────────────────────────────────────────────────────────

pub use benefit::Benefit;
pub use candidate::{populate, real_capacity, Candidate};
pub use engine::{Assignment, DecisionEngine};
pub use redistribute::redistribute;
pub use snapshot::{EngineAgent, EngineFinished, EngineQueue, EngineTask};
pub use state::{ResourceState, SetupCommand};
