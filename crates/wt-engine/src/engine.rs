//! The decision engine: greedy arg-max selection over populated,
//! redistributed candidates.

use std::collections::HashMap;

use wt_core::{AgentId, QueueId};

use crate::benefit::{candidate_benefit, tiebreak_key, Benefit};
use crate::candidate::populate;
use crate::redistribute::redistribute;
use crate::snapshot::{EngineAgent, EngineQueue};
use crate::state::SetupCommand;

// ── Assignment ───────────────────────────────────────────────────────────────

/// One selected assignment, in selection order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub agent: AgentId,
    pub queue: QueueId,
    /// The setup steps that take the agent from its snapshotted state to
    /// working the queue.  May be `[Empty]` when no transition is needed.
    pub commands: Vec<SetupCommand>,
}

// ── DecisionEngine ───────────────────────────────────────────────────────────

/// A pure assignment planner.
///
/// `decide` never mutates its inputs and holds no state between calls;
/// two calls on equal snapshots return equal plans.
#[derive(Clone, Debug)]
pub struct DecisionEngine {
    /// Lookahead window for capacity estimates, seconds.
    pub horizon_secs: u64,
    /// Weight of the SLA-failure fraction in queue weights.
    pub bias: f64,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self { horizon_secs: 3_600, bias: 0.5 }
    }
}

impl DecisionEngine {
    pub fn new(horizon_secs: u64, bias: f64) -> Self {
        Self { horizon_secs, bias }
    }

    /// Plan assignments for the given snapshot.
    ///
    /// Populate → loop { redistribute; pick the best selectable
    /// candidate; decrement same-queue same-priority siblings by the
    /// winner's task count; drop the winner's agent }.  A candidate is
    /// selectable while its benefit is `Infinite`, or finite-positive
    /// with tasks left; when nothing selectable remains the plan is
    /// complete.  Each iteration removes at least the winner, so the
    /// loop runs at most once per candidate.
    pub fn decide(&self, agents: &[EngineAgent], queues: &[EngineQueue]) -> Vec<Assignment> {
        let mut candidates = populate(agents, queues, self.horizon_secs);
        let mut assigned: HashMap<QueueId, u32> = HashMap::new();
        let mut plan = Vec::new();

        while !candidates.is_empty() {
            redistribute(&mut candidates);

            let mut best: Option<(usize, Benefit)> = None;
            for (i, candidate) in candidates.iter().enumerate() {
                let benefit = candidate_benefit(candidate, queues, &assigned, self.bias);
                let selectable = match benefit {
                    Benefit::Infinite => true,
                    Benefit::Finite(v) => v > 0.0 && candidate.task_count > 0,
                };
                if !selectable {
                    continue;
                }
                let wins = match &best {
                    None => true,
                    Some((best_idx, best_benefit)) => match benefit.cmp(best_benefit) {
                        std::cmp::Ordering::Greater => true,
                        std::cmp::Ordering::Less => false,
                        std::cmp::Ordering::Equal => {
                            tiebreak_key(&queues[candidate.queue_idx])
                                > tiebreak_key(&queues[candidates[*best_idx].queue_idx])
                        }
                    },
                };
                if wins {
                    best = Some((i, benefit));
                }
            }

            let Some((winner_idx, _)) = best else { break };
            let winner = candidates.remove(winner_idx);
            *assigned.entry(queues[winner.queue_idx].id).or_insert(0) += 1;

            // Siblings on the same queue and priority lose the tasks the
            // winner just took; a negative count marks saturation.
            for candidate in candidates.iter_mut() {
                if candidate.queue_idx == winner.queue_idx && candidate.priority == winner.priority
                {
                    candidate.task_count -= winner.task_count;
                }
            }
            // One assignment per agent per call.
            candidates.retain(|c| c.agent_idx != winner.agent_idx);

            let agent = &agents[winner.agent_idx];
            let queue = &queues[winner.queue_idx];
            plan.push(Assignment {
                agent: agent.id,
                queue: queue.id,
                commands: agent.commands_to(queue, queues),
            });
        }
        plan
    }
}
