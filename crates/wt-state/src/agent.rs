//! Agents and their simulator-side state machine.

use std::collections::VecDeque;

use wt_core::{AgentId, QueueId, SimTime, TaskId, UserId};

use crate::command::AgentCommand;

// ── AgentPhase ───────────────────────────────────────────────────────────────

/// The simulator-side agent state machine.
///
/// `LoggedOut` and `Idle` are *stable*: the worker may dispatch the next
/// pending command to an agent in a stable phase.  `LoggingIn`,
/// `LoggingOut`, and `SettingUpQueue` are *transient*: a completion event
/// is already scheduled and the agent is skipped until it fires.
/// `Working` agents claim successive items on their own and only return
/// to `Idle` when their queue runs dry or processing is disabled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentPhase {
    LoggedOut,
    LoggingIn,
    Idle,
    LoggingOut,
    SettingUpQueue,
    Working,
}

impl AgentPhase {
    /// Stable phases accept command dispatch; all others are in-flight.
    #[inline]
    pub fn is_stable(self) -> bool {
        matches!(self, AgentPhase::LoggedOut | AgentPhase::Idle)
    }
}

// ── Agent ────────────────────────────────────────────────────────────────────

/// One workforce agent: an RPA robot, a human operator, or an AI worker.
///
/// All fields are owned data, so `Clone` is a deep clone — mutating a
/// cloned agent is never observable through the original.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id: AgentId,
    pub name: String,

    /// Historical average login duration, whole seconds.
    pub avg_login_secs: u64,
    /// Historical average logout duration, whole seconds.
    pub avg_logout_secs: u64,

    pub phase: AgentPhase,
    /// The credential the agent is (or is becoming) logged in as.
    pub current_user: Option<UserId>,
    /// The queue the agent is setting up for or working.
    pub current_queue: Option<QueueId>,
    /// The item currently claimed by this agent, if any.
    pub current_item: Option<TaskId>,
    /// When work on `current_item` began.
    pub last_item_start: Option<SimTime>,

    /// Cleared when the queue runs dry or a stop is requested; a disabled
    /// agent drops to `Idle` at its next item completion.
    pub process_enabled: bool,
    /// Set by `StopProcessCommand`; purely informational afterwards.
    pub stop_requested_at: Option<SimTime>,

    /// Commands queued by the worker, executed one per tick while the
    /// agent is in a stable phase.
    pub pending_commands: VecDeque<AgentCommand>,
}

impl Agent {
    /// A logged-out agent with no history and no pending commands.
    pub fn new(id: AgentId, name: impl Into<String>, avg_login_secs: u64, avg_logout_secs: u64) -> Self {
        Self {
            id,
            name: name.into(),
            avg_login_secs,
            avg_logout_secs,
            phase: AgentPhase::LoggedOut,
            current_user: None,
            current_queue: None,
            current_item: None,
            last_item_start: None,
            process_enabled: false,
            stop_requested_at: None,
            pending_commands: VecDeque::new(),
        }
    }
}
