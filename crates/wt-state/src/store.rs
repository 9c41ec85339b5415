//! `StateStore` — all mutable simulation state — and its builder.

use wt_core::{AgentId, QueueId, TwinError, TwinResult};

use crate::agent::{Agent, AgentPhase};
use crate::queue::{Queue, QueueParams};
use crate::task::Task;

// ── StateStore ───────────────────────────────────────────────────────────────

/// Every agent and queue in the simulation.
///
/// `AgentId`/`QueueId` are indices into the two vectors; the builder
/// assigns them in insertion order, so lookups are O(1) and cannot alias.
/// All contained data is owned, which makes `Clone` the deep-clone
/// contract the forecast runner relies on: a cloned store shares nothing
/// with the original.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateStore {
    pub agents: Vec<Agent>,
    pub queues: Vec<Queue>,
}

impl StateStore {
    pub fn agent(&self, id: AgentId) -> TwinResult<&Agent> {
        self.agents.get(id.index()).ok_or(TwinError::AgentNotFound(id))
    }

    pub fn agent_mut(&mut self, id: AgentId) -> TwinResult<&mut Agent> {
        self.agents.get_mut(id.index()).ok_or(TwinError::AgentNotFound(id))
    }

    pub fn queue(&self, id: QueueId) -> TwinResult<&Queue> {
        self.queues.get(id.index()).ok_or(TwinError::QueueNotFound(id))
    }

    pub fn queue_mut(&mut self, id: QueueId) -> TwinResult<&mut Queue> {
        self.queues.get_mut(id.index()).ok_or(TwinError::QueueNotFound(id))
    }

    /// `true` when no queue has pending work.
    pub fn queues_drained(&self) -> bool {
        self.queues.iter().all(|q| q.pending.is_empty())
    }

    /// Total completed items across all queues.
    pub fn total_completed(&self) -> usize {
        self.queues.iter().map(|q| q.finished.len()).sum()
    }

    /// Item ids currently claimed by some agent.
    ///
    /// Recomputed on demand; used by the claim protocol to skip items
    /// another agent took earlier in the same event batch.
    pub fn claimed_items(&self) -> Vec<wt_core::TaskId> {
        self.agents.iter().filter_map(|a| a.current_item).collect()
    }
}

// ── StateStoreBuilder ────────────────────────────────────────────────────────

/// Assembles a validated [`StateStore`].
///
/// Ids are assigned in insertion order.  `build` checks referential
/// integrity (every task's queue id must exist and match the queue it
/// sits in) and phase/field consistency (a `Working` agent has a queue,
/// an `Idle` agent has a user, a `LoggedOut` agent has neither), so a
/// simulator never starts from an inconsistent world.
#[derive(Default)]
pub struct StateStoreBuilder {
    agents: Vec<Agent>,
    queues: Vec<Queue>,
}

impl StateStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent; returns its assigned id.
    pub fn agent(&mut self, name: impl Into<String>, avg_login_secs: u64, avg_logout_secs: u64) -> AgentId {
        let id = AgentId(self.agents.len() as u32);
        self.agents.push(Agent::new(id, name, avg_login_secs, avg_logout_secs));
        id
    }

    /// Register a queue; returns its assigned id.
    pub fn queue(
        &mut self,
        name: impl Into<String>,
        user: wt_core::UserId,
        avg_setup_secs: u64,
        params: QueueParams,
    ) -> QueueId {
        let id = QueueId(self.queues.len() as u32);
        self.queues.push(Queue::new(id, name, user, avg_setup_secs, params));
        id
    }

    /// Append a pending task to its queue.
    pub fn task(&mut self, task: Task) -> TwinResult<()> {
        let queue = self
            .queues
            .get_mut(task.queue.index())
            .ok_or(TwinError::QueueNotFound(task.queue))?;
        queue.pending.push(task);
        Ok(())
    }

    /// Direct access to a registered agent, e.g. to preset its phase.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id.index())
    }

    /// Direct access to a registered queue, e.g. to seed history.
    pub fn queue_mut(&mut self, id: QueueId) -> Option<&mut Queue> {
        self.queues.get_mut(id.index())
    }

    pub fn build(self) -> TwinResult<StateStore> {
        let store = StateStore { agents: self.agents, queues: self.queues };
        validate(&store)?;
        Ok(store)
    }
}

fn validate(store: &StateStore) -> TwinResult<()> {
    for queue in &store.queues {
        for task in &queue.pending {
            if task.queue != queue.id {
                return Err(TwinError::Config(format!(
                    "task {} in queue {} references queue {}",
                    task.id, queue.id, task.queue
                )));
            }
        }
    }
    for agent in &store.agents {
        match agent.phase {
            AgentPhase::Working | AgentPhase::SettingUpQueue => {
                if agent.current_queue.is_none() {
                    return Err(TwinError::Config(format!(
                        "agent {} is {:?} without a current queue",
                        agent.id, agent.phase
                    )));
                }
            }
            AgentPhase::Idle | AgentPhase::LoggingOut => {
                if agent.current_user.is_none() {
                    return Err(TwinError::Config(format!(
                        "agent {} is {:?} without a current user",
                        agent.id, agent.phase
                    )));
                }
            }
            AgentPhase::LoggedOut => {
                if agent.current_user.is_some() || agent.current_queue.is_some() {
                    return Err(TwinError::Config(format!(
                        "logged-out agent {} still references a user or queue",
                        agent.id
                    )));
                }
            }
            AgentPhase::LoggingIn => {}
        }
        if let Some(queue) = agent.current_queue {
            if queue.index() >= store.queues.len() {
                return Err(TwinError::QueueNotFound(queue));
            }
        }
    }
    Ok(())
}
