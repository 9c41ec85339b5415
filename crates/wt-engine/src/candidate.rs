//! Candidate population: agent × queue × pending priority.

use crate::snapshot::{EngineAgent, EngineQueue};

/// One potential assignment, indexed into the engine's input slices.
///
/// `task_count` starts as the number of pending items at the candidate's
/// priority and is mutated by redistribution and sibling decrements; it
/// may go negative, which marks the candidate as saturated.
/// `real_capacity` is cached at population time and never changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub agent_idx: usize,
    pub queue_idx: usize,
    pub priority: u32,
    pub task_count: i64,
    pub real_capacity: i64,
}

impl Candidate {
    /// `min(real_capacity / task_count, 1)`; a candidate with no tasks
    /// left has nothing to be short of.
    pub fn relative_capacity(&self) -> f64 {
        if self.task_count <= 0 {
            return 1.0;
        }
        (self.real_capacity as f64 / self.task_count as f64).min(1.0)
    }
}

/// Items an agent could complete within `horizon_secs`, starting from its
/// current state.
///
/// `floor((horizon − overhead) / mean_item)`, zero when the overhead
/// already eats the horizon.
pub fn real_capacity(
    agent: &EngineAgent,
    queue: &EngineQueue,
    queues: &[EngineQueue],
    horizon_secs: u64,
) -> i64 {
    let overhead = agent.setup_overhead_secs(queue, queues);
    let horizon = horizon_secs as f64;
    if horizon <= overhead {
        return 0;
    }
    ((horizon - overhead) / queue.mean_item_secs().max(1.0)).floor() as i64
}

/// Expand agents against queues and the distinct priorities pending in
/// each queue.  Queues with nothing pending contribute no candidates;
/// every (agent, queue) pair is considered compatible — user-switching
/// cost is already priced into the state overheads.
pub fn populate(
    agents: &[EngineAgent],
    queues: &[EngineQueue],
    horizon_secs: u64,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for (agent_idx, agent) in agents.iter().enumerate() {
        for (queue_idx, queue) in queues.iter().enumerate() {
            let capacity = real_capacity(agent, queue, queues, horizon_secs);
            for priority in queue.pending_priorities() {
                candidates.push(Candidate {
                    agent_idx,
                    queue_idx,
                    priority,
                    task_count: queue.pending_at_priority(priority) as i64,
                    real_capacity: capacity,
                });
            }
        }
    }
    candidates
}
