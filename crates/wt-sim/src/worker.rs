//! The worker: trigger detection, engine invocation, command translation
//! and dispatch.
//!
//! Runs once per tick, after the event drain.  Two triggers can invoke
//! the decision engine: the decision-interval timer, and any agent
//! sitting in a stable phase with nothing queued.  Whether or not the
//! engine ran, one pending command is then dispatched per stable agent;
//! agents in transient phases are left alone until their in-flight
//! transition completes.

use wt_core::{SimTime, TwinConfig, TwinResult};
use wt_engine::{DecisionEngine, SetupCommand};
use wt_state::{AgentCommand, AgentPhase, Queue, StateStore};

use crate::adapter::adapt;
use crate::event::{Event, EventKind};
use crate::event_queue::EventQueue;

// ── Worker ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Worker {
    pub decision_interval_secs: u64,
    pub decision_horizon_secs: u64,
    pub bias: f64,
    /// When the engine last ran; `None` means never, which always
    /// satisfies the timer trigger.
    last_call: Option<SimTime>,
}

impl Worker {
    pub fn new(config: &TwinConfig) -> Self {
        Self {
            decision_interval_secs: config.decision_interval_secs,
            decision_horizon_secs: config.decision_horizon_secs,
            bias: config.bias,
            last_call: None,
        }
    }

    /// The per-tick observation step: maybe re-plan, then dispatch.
    ///
    /// Returns the number of assignments planned this tick (zero when no
    /// trigger fired or the engine found nothing to do).
    pub fn observe(
        &mut self,
        state: &mut StateStore,
        events: &mut EventQueue,
        now: SimTime,
    ) -> TwinResult<usize> {
        let mut planned = 0;
        if self.triggered(state, now) {
            planned = self.replan(state, now)?;
        }
        self.dispatch(state, events, now)?;
        Ok(planned)
    }

    fn triggered(&self, state: &StateStore, now: SimTime) -> bool {
        let timer = self
            .last_call
            .is_none_or(|last| now.since(last) >= self.decision_interval_secs);
        let idle = state
            .agents
            .iter()
            .any(|a| a.phase.is_stable() && a.pending_commands.is_empty());
        timer || idle
    }

    /// Invoke the engine and replace the pending sequence of every
    /// selected agent with the translated commands.
    fn replan(&mut self, state: &mut StateStore, now: SimTime) -> TwinResult<usize> {
        let (agents, queues) = adapt(state, now);
        let engine = DecisionEngine::new(self.decision_horizon_secs, self.bias);
        let plan = engine.decide(&agents, &queues);
        tracing::debug!(at = now.0, assignments = plan.len(), "decision engine ran");

        let planned = plan.len();
        for assignment in plan {
            let commands = translate(&assignment.commands, state.queue(assignment.queue)?);
            let agent = state.agent_mut(assignment.agent)?;
            agent.pending_commands = commands.into();
        }
        self.last_call = Some(now);
        Ok(planned)
    }

    /// Pop and execute the first pending command of every stable agent.
    fn dispatch(
        &self,
        state: &mut StateStore,
        events: &mut EventQueue,
        now: SimTime,
    ) -> TwinResult<()> {
        for idx in 0..state.agents.len() {
            if !state.agents[idx].phase.is_stable() {
                continue;
            }
            let Some(command) = state.agents[idx].pending_commands.pop_front() else {
                continue;
            };
            let agent_id = state.agents[idx].id;
            match command {
                AgentCommand::Login(user) => {
                    let agent = &mut state.agents[idx];
                    agent.phase = AgentPhase::LoggingIn;
                    events.schedule(Event {
                        at: now.offset(agent.avg_login_secs),
                        kind: EventKind::LoginDone { agent: agent_id, user },
                    });
                }
                AgentCommand::Logout => {
                    let agent = &mut state.agents[idx];
                    agent.phase = AgentPhase::LoggingOut;
                    events.schedule(Event {
                        at: now.offset(agent.avg_logout_secs),
                        kind: EventKind::LogoutDone { agent: agent_id },
                    });
                }
                AgentCommand::StartProcess(queue_id) => {
                    let setup_secs = state.queue(queue_id)?.avg_setup_secs;
                    let agent = &mut state.agents[idx];
                    agent.phase = AgentPhase::SettingUpQueue;
                    agent.current_queue = Some(queue_id);
                    events.schedule(Event {
                        at: now.offset(setup_secs),
                        kind: EventKind::SetupDone { agent: agent_id, queue: queue_id },
                    });
                }
                AgentCommand::StopProcess => {
                    let agent = &mut state.agents[idx];
                    agent.stop_requested_at = Some(now);
                    agent.process_enabled = false;
                }
            }
        }
        Ok(())
    }
}

// ── Command translation ──────────────────────────────────────────────────────

/// Map the engine's abstract setup commands onto simulator commands for
/// `queue`, dropping `Empty`.
pub fn translate(commands: &[SetupCommand], queue: &Queue) -> Vec<AgentCommand> {
    commands
        .iter()
        .filter_map(|command| match command {
            SetupCommand::Login => Some(AgentCommand::Login(queue.user)),
            SetupCommand::Logout => Some(AgentCommand::Logout),
            SetupCommand::ExecuteQueue => Some(AgentCommand::StartProcess(queue.id)),
            SetupCommand::Empty => None,
        })
        .collect()
}
