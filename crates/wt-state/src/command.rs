//! Simulator-side agent commands.

use wt_core::{QueueId, UserId};

/// An operation the worker can dispatch to a stable agent.
///
/// Commands are produced by translating the decision engine's abstract
/// setup commands (and by external control for `StopProcess`), queued on
/// the agent, and executed one per tick.  Each dispatch moves the agent
/// into the matching transient phase and schedules the completion event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentCommand {
    /// Log in as `user`; completes after the agent's average login time.
    Login(UserId),
    /// Log out; completes after the agent's average logout time.
    Logout,
    /// Open the queue's process; completes after the queue's average
    /// setup time, then the agent starts claiming items.
    StartProcess(QueueId),
    /// Passive stop: disables processing so the next item completion
    /// drops the agent to `Idle` instead of claiming another item.
    StopProcess,
}
