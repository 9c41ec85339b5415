//! The per-tick published view of the simulation.

use wt_core::{QueueId, SimTime, UserId};
use wt_state::AgentPhase;

/// Everything an external consumer (push transport, renderer, metrics
/// board) needs about one instant, detached from the live state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwinSnapshot {
    pub now: SimTime,
    /// `now` rendered relative to the window start, e.g. `d0 09:01:30`.
    pub clock_label: String,
    pub agents: Vec<AgentView>,
    pub queues: Vec<QueueView>,
    pub metrics: Metrics,
    /// Most recent event-log lines, oldest first.
    pub event_log: Vec<String>,
    pub is_finished: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentView {
    pub name: String,
    pub phase: AgentPhase,
    pub queue: Option<QueueId>,
    pub user: Option<UserId>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueView {
    pub name: String,
    pub pending: usize,
    pub completed: usize,
}

/// Derived whole-simulation metrics.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    /// Completed items per simulated hour since the window start.
    pub completed_per_hour: f64,
    /// Share of agents currently in the `Working` phase, 0–100.
    pub utilization_pct: f64,
}
