//! Engine-side resource states and abstract setup commands.
//!
//! Each state variant carries the only two behaviors the rest of the
//! engine uses: the command sequence that moves the agent to a target
//! queue, and the simulated overhead of that transition.  Nothing else
//! ever inspects the variant.

use wt_core::{QueueId, UserId};

use crate::snapshot::EngineQueue;

// ── SetupCommand ─────────────────────────────────────────────────────────────

/// An abstract transition step returned by the decision engine.
///
/// The simulator's translator maps these onto concrete agent commands
/// using the target queue's owning user; `Empty` translates to nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SetupCommand {
    Login,
    Logout,
    ExecuteQueue,
    /// No transition required — the agent is already working the target.
    Empty,
}

// ── ResourceState ────────────────────────────────────────────────────────────

/// What an agent is doing, as far as assignment decisions care.
///
/// The simulator's six phases collapse into these three (the adapter
/// maps in-flight phases conservatively).  `Working::finish_current_secs`
/// is the remaining time on the in-flight item, pre-computed by the
/// adapter so the engine needs no clock.
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceState {
    LoggedOut,
    Idle { user: UserId },
    Working { queue: QueueId, finish_current_secs: f64 },
}

impl ResourceState {
    /// The command sequence that takes an agent in this state to actively
    /// working `target`.
    pub fn commands_to(&self, target: &EngineQueue, queues: &[EngineQueue]) -> Vec<SetupCommand> {
        use SetupCommand::*;
        match self {
            ResourceState::LoggedOut => vec![Login, ExecuteQueue],
            ResourceState::Idle { user } => {
                if *user == target.user {
                    vec![ExecuteQueue]
                } else {
                    vec![Logout, Login, ExecuteQueue]
                }
            }
            ResourceState::Working { queue, .. } => {
                if *queue == target.id {
                    vec![Empty]
                } else if working_user(*queue, queues) == Some(target.user) {
                    vec![ExecuteQueue]
                } else {
                    vec![Logout, Login, ExecuteQueue]
                }
            }
        }
    }

    /// Simulated seconds before an agent in this state would complete its
    /// first item of `target`, excluding the item itself.
    pub fn overhead_secs(
        &self,
        avg_login_secs: u64,
        avg_logout_secs: u64,
        target: &EngineQueue,
        queues: &[EngineQueue],
    ) -> f64 {
        let login = avg_login_secs as f64;
        let logout = avg_logout_secs as f64;
        let setup = target.setup_secs as f64;
        match self {
            ResourceState::LoggedOut => login + setup,
            ResourceState::Idle { user } => {
                if *user == target.user {
                    setup
                } else {
                    login + logout + setup
                }
            }
            ResourceState::Working { queue, finish_current_secs } => {
                if *queue == target.id {
                    return *finish_current_secs;
                }
                let relog = if working_user(*queue, queues) == Some(target.user) {
                    0.0
                } else {
                    login + logout
                };
                finish_current_secs + setup + relog
            }
        }
    }
}

/// Owning user of the queue an agent is working, if that queue is known.
///
/// An unknown queue id falls through to the full relog path — the
/// conservative answer.
fn working_user(queue: QueueId, queues: &[EngineQueue]) -> Option<UserId> {
    queues.iter().find(|q| q.id == queue).map(|q| q.user)
}
