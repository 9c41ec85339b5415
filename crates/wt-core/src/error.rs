//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert them into
//! `TwinError` via `From` impls, or wrap `TwinError` as one variant.

use thiserror::Error;

use crate::{AgentId, QueueId, SimTime};

/// The top-level error type for the `wt-*` crates.
#[derive(Debug, Error)]
pub enum TwinError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("queue {0} not found")]
    QueueNotFound(QueueId),

    /// An event batch surfaced below the last applied timestamp — time
    /// would run backwards.  Always a programming bug; the tick that hits
    /// it fails and the loop halts.
    #[error("event batch at {at} is earlier than already-applied {watermark}")]
    EventOrder { at: SimTime, watermark: SimTime },

    /// `pop_batch` was called on an empty event queue.
    #[error("pop_batch called on an empty event queue")]
    EmptyBatch,
}

/// Shorthand result type for all `wt-*` crates.
pub type TwinResult<T> = Result<T, TwinError>;
