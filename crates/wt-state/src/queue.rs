//! Work queues and their configurable parameters.

use wt_core::{QueueId, UserId};

use crate::task::{FinishedTask, Task};

/// Mean item duration assumed for a queue with no completion history.
pub const FALLBACK_ITEM_SECS: f64 = 180.0;

// ── QueueParams ──────────────────────────────────────────────────────────────

/// Operator-configurable queue parameters.
///
/// `min_resources`/`max_resources` bound how many agents the decision
/// engine will assign to the queue in one call; `must_run` promotes the
/// queue's priority-1 candidates above every finite benefit; `force_max`
/// does the same until `max_resources` agents are assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueParams {
    /// Maximum load-to-finish duration before an item counts as an SLA
    /// failure, whole seconds.
    pub sla_secs: u64,
    /// Business priority of the queue; higher is more important.
    pub criticality: u32,
    pub min_resources: Option<u32>,
    pub max_resources: Option<u32>,
    pub force_max: bool,
    pub must_run: bool,
}

impl QueueParams {
    pub fn new(sla_secs: u64, criticality: u32) -> Self {
        Self {
            sla_secs,
            criticality,
            min_resources: None,
            max_resources: None,
            force_max: false,
            must_run: false,
        }
    }
}

// ── Queue ────────────────────────────────────────────────────────────────────

/// A named bucket of pending work owned by one user credential.
///
/// `pending` holds items in arrival order; an item stays in `pending`
/// while an agent works it (the agent's `current_item` marks the claim)
/// and is removed when its completion event applies.  `finished` is
/// append-only history.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Queue {
    pub id: QueueId,
    pub name: String,
    /// The credential an agent must be logged in as to work this queue.
    pub user: UserId,
    pub pending: Vec<Task>,
    pub finished: Vec<FinishedTask>,
    /// Historical average process-setup duration, whole seconds.
    pub avg_setup_secs: u64,
    pub params: QueueParams,
}

impl Queue {
    pub fn new(
        id: QueueId,
        name: impl Into<String>,
        user: UserId,
        avg_setup_secs: u64,
        params: QueueParams,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            user,
            pending: Vec::new(),
            finished: Vec::new(),
            avg_setup_secs,
            params,
        }
    }

    /// Mean item duration over the finished history, in seconds.
    ///
    /// Falls back to [`FALLBACK_ITEM_SECS`] while the history is empty so
    /// that a cold queue still schedules and estimates sensibly.
    pub fn mean_item_secs(&self) -> f64 {
        if self.finished.is_empty() {
            return FALLBACK_ITEM_SECS;
        }
        let total: u64 = self.finished.iter().map(|f| f.duration_secs).sum();
        total as f64 / self.finished.len() as f64
    }

    /// The distinct task priorities currently present in `pending`, in
    /// ascending order.
    pub fn pending_priorities(&self) -> Vec<u32> {
        let mut priorities: Vec<u32> = self.pending.iter().map(|t| t.priority).collect();
        priorities.sort_unstable();
        priorities.dedup();
        priorities
    }

    /// Number of pending items at exactly `priority`.
    pub fn pending_at_priority(&self, priority: u32) -> usize {
        self.pending.iter().filter(|t| t.priority == priority).count()
    }
}
