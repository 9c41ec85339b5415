//! The engine's private input model.
//!
//! The simulator adapts its live state into these snapshot types before
//! every engine call (and forecasts adapt their clones).  Queues and
//! tasks reference each other by id rather than by pointer, so the
//! queue↔task cycle of the domain never becomes an ownership cycle.

use wt_core::{AgentId, QueueId, SimTime, TaskId, UserId};
use wt_state::{QueueParams, FALLBACK_ITEM_SECS};

use crate::state::{ResourceState, SetupCommand};

// ── EngineAgent ──────────────────────────────────────────────────────────────

/// An agent as the decision engine sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineAgent {
    pub id: AgentId,
    pub name: String,
    pub avg_login_secs: u64,
    pub avg_logout_secs: u64,
    pub state: ResourceState,
}

impl EngineAgent {
    /// Commands that would take this agent to working `target`.
    pub fn commands_to(&self, target: &EngineQueue, queues: &[EngineQueue]) -> Vec<SetupCommand> {
        self.state.commands_to(target, queues)
    }

    /// Transition overhead from the current state to working `target`.
    pub fn setup_overhead_secs(&self, target: &EngineQueue, queues: &[EngineQueue]) -> f64 {
        self.state
            .overhead_secs(self.avg_login_secs, self.avg_logout_secs, target, queues)
    }
}

// ── EngineTask / EngineFinished ──────────────────────────────────────────────

/// A pending item as the engine sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineTask {
    pub id: TaskId,
    pub queue: QueueId,
    pub loaded: SimTime,
    pub deadline: SimTime,
    pub priority: u32,
}

/// One replayed history entry.
///
/// The simulator records only a completion timestamp and a duration; the
/// adapter replays that as `loaded = finished − work`, `attempt = 0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineFinished {
    pub loaded: SimTime,
    pub finished: SimTime,
    pub work_secs: u64,
    pub attempt_secs: u64,
}

// ── EngineQueue ──────────────────────────────────────────────────────────────

/// A queue as the decision engine sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineQueue {
    pub id: QueueId,
    pub name: String,
    pub user: UserId,
    pub tasks: Vec<EngineTask>,
    pub finished: Vec<EngineFinished>,
    pub setup_secs: u64,
    pub params: QueueParams,
}

impl EngineQueue {
    /// Mean item duration (work + attempt) over the replayed history,
    /// falling back to [`FALLBACK_ITEM_SECS`] while empty.
    pub fn mean_item_secs(&self) -> f64 {
        if self.finished.is_empty() {
            return FALLBACK_ITEM_SECS;
        }
        let total: u64 = self
            .finished
            .iter()
            .map(|f| f.work_secs + f.attempt_secs)
            .sum();
        total as f64 / self.finished.len() as f64
    }

    /// Fraction of finished items that blew their SLA
    /// (load-to-finish span above `params.sla_secs`).  Zero without
    /// history.
    pub fn failure_fraction(&self) -> f64 {
        if self.finished.is_empty() {
            return 0.0;
        }
        let failures = self
            .finished
            .iter()
            .filter(|f| f.finished.since(f.loaded) > self.params.sla_secs)
            .count();
        failures as f64 / self.finished.len() as f64
    }

    /// The benefit weight: criticality plus the bias-scaled failure
    /// fraction.
    pub fn weight(&self, bias: f64) -> f64 {
        self.params.criticality as f64 + bias * self.failure_fraction()
    }

    /// Distinct pending priorities, ascending.
    pub fn pending_priorities(&self) -> Vec<u32> {
        let mut priorities: Vec<u32> = self.tasks.iter().map(|t| t.priority).collect();
        priorities.sort_unstable();
        priorities.dedup();
        priorities
    }

    /// Pending items at exactly `priority`.
    pub fn pending_at_priority(&self, priority: u32) -> usize {
        self.tasks.iter().filter(|t| t.priority == priority).count()
    }
}
