//! Event variants and their state transitions.
//!
//! `Event::apply` is the sole mutator of simulation state.  An event may
//! schedule successors (a completed item schedules the next one), which
//! is how a working agent drains its queue without ever consulting the
//! decision engine.

use wt_core::{AgentId, QueueId, SimTime, TaskId, TwinResult, UserId};
use wt_state::{AgentPhase, FinishedTask, StateStore};

use crate::event_queue::EventQueue;

// ── Event ────────────────────────────────────────────────────────────────────

/// A scheduled state transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub at: SimTime,
    pub kind: EventKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// A login attempt completes; the agent becomes idle as `user`.
    LoginDone { agent: AgentId, user: UserId },
    /// A logout completes; the agent is fully signed off.
    LogoutDone { agent: AgentId },
    /// Process setup completes; the agent starts working `queue` and
    /// claims its first item.
    SetupDone { agent: AgentId, queue: QueueId },
    /// The agent finishes `task`; history is recorded and, while
    /// processing stays enabled, the next item is claimed.
    ItemDone { agent: AgentId, task: TaskId, queue: QueueId },
}

impl Event {
    /// Apply the transition to `state`, scheduling successors on `events`.
    pub fn apply(&self, state: &mut StateStore, events: &mut EventQueue) -> TwinResult<()> {
        match self.kind {
            EventKind::LoginDone { agent, user } => {
                let agent = state.agent_mut(agent)?;
                agent.phase = AgentPhase::Idle;
                agent.current_user = Some(user);
                Ok(())
            }
            EventKind::LogoutDone { agent } => {
                let agent = state.agent_mut(agent)?;
                agent.phase = AgentPhase::LoggedOut;
                agent.current_user = None;
                agent.current_queue = None;
                Ok(())
            }
            EventKind::SetupDone { agent, queue } => {
                {
                    let agent = state.agent_mut(agent)?;
                    agent.phase = AgentPhase::Working;
                    agent.process_enabled = true;
                    agent.current_queue = Some(queue);
                }
                claim_next_item(state, events, agent, queue, self.at)
            }
            EventKind::ItemDone { agent: agent_id, task, queue: queue_id } => {
                let started = state.agent(agent_id)?.last_item_start;
                let duration_secs = started.map_or(0, |t| self.at.since(t));

                let queue = state.queue_mut(queue_id)?;
                if let Some(pos) = queue.pending.iter().position(|t| t.id == task) {
                    queue.pending.remove(pos);
                }
                queue.finished.push(FinishedTask {
                    id: task,
                    queue: queue_id,
                    agent: agent_id,
                    completed: self.at,
                    duration_secs,
                });
                let more_pending = !queue.pending.is_empty();

                let agent = state.agent_mut(agent_id)?;
                agent.current_item = None;
                agent.last_item_start = None;

                if agent.process_enabled && more_pending {
                    claim_next_item(state, events, agent_id, queue_id, self.at)
                } else {
                    drop_to_idle(state, agent_id)
                }
            }
        }
    }

    /// A one-line human-readable description for the event log.
    pub fn describe(&self, state: &StateStore) -> String {
        let agent_name = |id: AgentId| {
            state
                .agent(id)
                .map(|a| a.name.clone())
                .unwrap_or_else(|_| id.to_string())
        };
        let queue_name = |id: QueueId| {
            state
                .queue(id)
                .map(|q| q.name.clone())
                .unwrap_or_else(|_| id.to_string())
        };
        match self.kind {
            EventKind::LoginDone { agent, .. } => format!("{} logged in", agent_name(agent)),
            EventKind::LogoutDone { agent } => format!("{} logged out", agent_name(agent)),
            EventKind::SetupDone { agent, queue } => {
                format!("{} opened {}", agent_name(agent), queue_name(queue))
            }
            EventKind::ItemDone { agent, task, queue } => {
                format!("{} finished {} on {}", agent_name(agent), task, queue_name(queue))
            }
        }
    }
}

// ── Claim protocol ───────────────────────────────────────────────────────────

/// Claim the first unclaimed pending item of `queue` for `agent` and
/// schedule its completion; drop the agent to idle if everything pending
/// is already claimed.
///
/// A claimed item stays in `pending` until its completion event removes
/// it, so the claimed-item set is what keeps two agents finishing setup
/// in the same batch from picking the same item.
pub(crate) fn claim_next_item(
    state: &mut StateStore,
    events: &mut EventQueue,
    agent_id: AgentId,
    queue_id: QueueId,
    now: SimTime,
) -> TwinResult<()> {
    let claimed = state.claimed_items();
    let queue = state.queue(queue_id)?;
    let chosen = queue.pending.iter().find(|t| !claimed.contains(&t.id));

    let Some(task) = chosen else {
        return drop_to_idle(state, agent_id);
    };
    let task_id = task.id;
    // Never schedule a zero-length item: a degenerate mean would pin the
    // completion inside the current batch's timestamp forever.
    let item_secs = (queue.mean_item_secs().round() as u64).max(1);

    let agent = state.agent_mut(agent_id)?;
    agent.current_item = Some(task_id);
    agent.last_item_start = Some(now);
    events.schedule(Event {
        at: now.offset(item_secs),
        kind: EventKind::ItemDone { agent: agent_id, task: task_id, queue: queue_id },
    });
    Ok(())
}

fn drop_to_idle(state: &mut StateStore, agent_id: AgentId) -> TwinResult<()> {
    let agent = state.agent_mut(agent_id)?;
    agent.phase = AgentPhase::Idle;
    agent.process_enabled = false;
    agent.current_queue = None;
    Ok(())
}
