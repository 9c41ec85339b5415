//! `wt-core` — foundational types for the worktwin workforce simulator.
//!
//! This crate is a dependency of every other `wt-*` crate.  It has no
//! `wt-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                          |
//! |------------|---------------------------------------------------|
//! | [`ids`]    | `AgentId`, `QueueId`, `UserId`, `TaskId`          |
//! | [`time`]   | `SimTime`, `SimClock`                             |
//! | [`config`] | `TwinConfig` and its fail-fast validation         |
//! | [`cancel`] | `CancelToken`                                     |
//! | [`error`]  | `TwinError`, `TwinResult`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                               |
//! |---------|------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.  |

pub mod cancel;
pub mod config;
pub mod error;
pub mod ids;
pub mod time;


// ── Re-exports ───────────────────────────────────────────────────────────────

pub use cancel::CancelToken;
pub use config::TwinConfig;
pub use error::{TwinError, TwinResult};
pub use ids::{AgentId, QueueId, TaskId, UserId};
pub use time::{SimClock, SimTime};
