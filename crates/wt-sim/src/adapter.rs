//! Projection of live simulator state into the decision engine's model.
//!
//! The collapse is conservative: an agent mid-login is still `LoggedOut`
//! to the engine (it is not usable yet), while an agent mid-logout or
//! mid-setup is `Idle` (its credential is still active).  Queues are
//! built before agents because `Working` variants refer to them.

use wt_core::SimTime;
use wt_engine::{EngineAgent, EngineFinished, EngineQueue, EngineTask, ResourceState};
use wt_state::{Agent, AgentPhase, StateStore};

/// Build the engine's input snapshot from the live state at `now`.
pub fn adapt(state: &StateStore, now: SimTime) -> (Vec<EngineAgent>, Vec<EngineQueue>) {
    let queues: Vec<EngineQueue> = state
        .queues
        .iter()
        .map(|q| EngineQueue {
            id: q.id,
            name: q.name.clone(),
            user: q.user,
            tasks: q
                .pending
                .iter()
                .map(|t| EngineTask {
                    id: t.id,
                    queue: t.queue,
                    loaded: t.loaded,
                    deadline: t.deadline,
                    priority: t.priority,
                })
                .collect(),
            // The live history records completion time and duration; the
            // engine model wants load/finish/work, so replay each entry
            // as work = duration, attempt = 0, loaded = completed − work.
            finished: q
                .finished
                .iter()
                .map(|f| EngineFinished {
                    loaded: SimTime(f.completed.0.saturating_sub(f.duration_secs)),
                    finished: f.completed,
                    work_secs: f.duration_secs,
                    attempt_secs: 0,
                })
                .collect(),
            setup_secs: q.avg_setup_secs,
            params: q.params.clone(),
        })
        .collect();

    let agents = state
        .agents
        .iter()
        .map(|a| EngineAgent {
            id: a.id,
            name: a.name.clone(),
            avg_login_secs: a.avg_login_secs,
            avg_logout_secs: a.avg_logout_secs,
            state: collapse(a, state, now),
        })
        .collect();

    (agents, queues)
}

/// Map the six simulator phases onto the engine's three variants.
fn collapse(agent: &Agent, state: &StateStore, now: SimTime) -> ResourceState {
    match agent.phase {
        AgentPhase::LoggedOut | AgentPhase::LoggingIn => ResourceState::LoggedOut,
        AgentPhase::Idle | AgentPhase::LoggingOut | AgentPhase::SettingUpQueue => {
            match agent.current_user {
                Some(user) => ResourceState::Idle { user },
                None => ResourceState::LoggedOut,
            }
        }
        AgentPhase::Working => {
            let Some(queue_id) = agent.current_queue else {
                // A working agent always has a queue; degrade gracefully
                // if the invariant was violated upstream.
                return match agent.current_user {
                    Some(user) => ResourceState::Idle { user },
                    None => ResourceState::LoggedOut,
                };
            };
            let mean = state
                .queue(queue_id)
                .map(|q| q.mean_item_secs())
                .unwrap_or(wt_state::FALLBACK_ITEM_SECS);
            let elapsed = agent.last_item_start.map_or(0, |t| now.since(t)) as f64;
            ResourceState::Working {
                queue: queue_id,
                finish_current_secs: (mean - elapsed).max(0.0),
            }
        }
    }
}
