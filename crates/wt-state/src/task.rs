//! Work items: pending tasks and the append-only finished history.

use wt_core::{AgentId, QueueId, SimTime, TaskId};

/// A pending unit of work inside a queue.
///
/// `priority` follows orchestrator convention: lower is more urgent, and
/// 1 is the default.  The decision engine groups candidates by the
/// distinct priorities present in a queue.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub id: TaskId,
    pub queue: QueueId,
    /// When the item entered the queue.
    pub loaded: SimTime,
    /// SLA deadline: the item should finish no later than this.
    pub deadline: SimTime,
    pub priority: u32,
}

impl Task {
    /// A priority-1 task loaded at `loaded` with an SLA of `sla_secs`.
    pub fn new(id: TaskId, queue: QueueId, loaded: SimTime, sla_secs: u64) -> Self {
        Self { id, queue, loaded, deadline: loaded.offset(sla_secs), priority: 1 }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}

/// A completed unit of work, appended to its queue's history.
///
/// The history feeds two derived statistics: the queue's mean item
/// duration (used to schedule successor completions and to estimate
/// capacity) and its SLA-failure fraction (used in the benefit weight).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FinishedTask {
    pub id: TaskId,
    pub queue: QueueId,
    /// The agent that completed the item.
    pub agent: AgentId,
    pub completed: SimTime,
    /// Wall time the item spent being worked, in whole seconds.
    pub duration_secs: u64,
}
