//! Plain data row types written by report backends.

/// Whole-simulation counters for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub time_secs: u64,
    pub pending_total: u64,
    pub completed_total: u64,
    pub working_agents: u64,
}

/// Per-queue counters for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueDepthRow {
    pub time_secs: u64,
    pub queue_id: u32,
    pub pending: u64,
    pub completed: u64,
}
