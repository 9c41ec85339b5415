//! Integration tests for the wt-sim tick loop.

use wt_core::{AgentId, CancelToken, QueueId, SimTime, TaskId, TwinConfig, UserId};
use wt_state::{
    AgentCommand, AgentPhase, FinishedTask, QueueParams, StateStore, StateStoreBuilder, Task,
};

use crate::event::{Event, EventKind};
use crate::event_queue::EventQueue;
use crate::sim::{RunOutcome, TaskWave};
use crate::{NoopObserver, TwinBuilder};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// 09:00:00 as seconds-of-day.
const START: SimTime = SimTime(32_400);

fn test_config() -> TwinConfig {
    TwinConfig {
        speed_multiplier: 0.0, // never sleep in tests
        ..TwinConfig::default()
    }
}

/// Seed `count` one-minute completions so the queue's mean item duration
/// is exactly 60 s (all inside the SLA).
fn seed_history(store: &mut StateStoreBuilder, queue: QueueId, count: u64) {
    let q = store.queue_mut(queue).unwrap();
    for n in 0..count {
        q.finished.push(FinishedTask {
            id: TaskId(900 + n),
            queue,
            agent: AgentId(0),
            completed: SimTime(1_000 + n * 100),
            duration_secs: 60,
        });
    }
}

/// One logged-out agent (login 30 s / logout 20 s) and one queue owned by
/// user 1 (setup 60 s, SLA 2 min, criticality 5) holding `tasks` pending
/// items with a 60 s item history.
fn cold_start_world(tasks: u64) -> StateStore {
    let mut b = StateStoreBuilder::new();
    b.agent("robot-01", 30, 20);
    let q = b.queue("invoices", UserId(1), 60, QueueParams::new(120, 5));
    seed_history(&mut b, q, 4);
    for n in 0..tasks {
        b.task(Task::new(TaskId(n + 1), q, START, 120)).unwrap();
    }
    b.build().unwrap()
}

// ── Event queue ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod event_queue_batches {
    use super::*;

    fn login_done(agent: u32, at: u64) -> Event {
        Event {
            at: SimTime(at),
            kind: EventKind::LoginDone { agent: AgentId(agent), user: UserId(1) },
        }
    }

    #[test]
    fn batch_holds_one_timestamp_and_preserves_insertion_order() {
        let mut queue = EventQueue::new();
        queue.schedule(login_done(0, 5));
        queue.schedule(login_done(1, 5));
        queue.schedule(login_done(2, 7));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.next_time(), Some(SimTime(5)));

        let (at, batch) = queue.pop_batch().unwrap();
        assert_eq!(at, SimTime(5));
        let agents: Vec<_> = batch
            .iter()
            .map(|e| match e.kind {
                EventKind::LoginDone { agent, .. } => agent,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(agents, vec![AgentId(0), AgentId(1)]);

        // The remaining earliest timestamp is strictly greater.
        assert_eq!(queue.next_time(), Some(SimTime(7)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn pop_on_empty_is_an_error() {
        let mut queue = EventQueue::new();
        assert!(queue.pop_batch().is_err());
    }

    #[test]
    fn clear_empties_everything() {
        let mut queue = EventQueue::new();
        queue.schedule(login_done(0, 5));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.next_time(), None);
    }
}

// ── Cold start end to end ────────────────────────────────────────────────────

#[cfg(test)]
mod cold_start {
    use super::*;

    #[test]
    fn single_agent_drains_the_queue_on_schedule() {
        let twin = TwinBuilder::new(test_config(), cold_start_world(8))
            .starting_at(START)
            .until(START.offset(3_600))
            .build();
        let mut twin = twin.unwrap();
        let outcome = twin.run(&mut NoopObserver, &CancelToken::new()).unwrap();
        assert_eq!(outcome, RunOutcome::Completed);

        // login 30 s at 09:00:00, setup 60 s at 09:00:30, so the first
        // item completes at 09:02:30 and the eighth at 09:09:30.
        let finished: Vec<_> = twin.state.queues[0]
            .finished
            .iter()
            .filter(|f| f.id.0 <= 8) // ignore the seeded history
            .collect();
        assert_eq!(finished.len(), 8);
        assert_eq!(finished[0].completed, START.offset(150));
        assert_eq!(finished[7].completed, START.offset(570));
        for pair in finished.windows(2) {
            assert_eq!(pair[1].completed - pair[0].completed, 60);
        }

        let agent = &twin.state.agents[0];
        assert_eq!(agent.phase, AgentPhase::Idle);
        assert_eq!(agent.current_user, Some(UserId(1)));
        assert_eq!(agent.current_item, None);
        assert!(agent.pending_commands.is_empty());
        assert!(!agent.process_enabled);
        assert!(twin.events.is_empty());
        assert!(twin.state.queues_drained());
    }

    #[test]
    fn drained_events_never_exceed_the_clock() {
        let mut twin = TwinBuilder::new(test_config(), cold_start_world(3))
            .starting_at(START)
            .build()
            .unwrap();
        twin.step_instant().unwrap();
        for _ in 0..200 {
            twin.tick().unwrap();
            if let Some(next) = twin.events.next_time() {
                assert!(next > twin.clock.now);
            }
        }
    }

    #[test]
    fn user_switch_pays_logout_login_setup() {
        // Agent idle as user 2; the queue belongs to user 1.  The first
        // item completes after logout 20 + login 30 + setup 60 + item 60.
        let mut b = StateStoreBuilder::new();
        let a = b.agent("robot-01", 30, 20);
        let q = b.queue("invoices", UserId(1), 60, QueueParams::new(120, 5));
        seed_history(&mut b, q, 4);
        b.task(Task::new(TaskId(1), q, START, 120)).unwrap();
        let agent = b.agent_mut(a).unwrap();
        agent.phase = AgentPhase::Idle;
        agent.current_user = Some(UserId(2));
        let store = b.build().unwrap();

        let mut twin = TwinBuilder::new(test_config(), store)
            .starting_at(START)
            .build()
            .unwrap();
        twin.run(&mut NoopObserver, &CancelToken::new()).unwrap();

        let first = twin.state.queues[0]
            .finished
            .iter()
            .find(|f| f.id == TaskId(1))
            .expect("task 1 completed");
        assert_eq!(first.completed, START.offset(20 + 30 + 60 + 60));
    }

    #[test]
    fn quiet_ticks_leave_state_untouched() {
        let mut twin = TwinBuilder::new(test_config(), cold_start_world(3))
            .starting_at(START)
            .build()
            .unwrap();
        twin.step_instant().unwrap();
        // Advance to 09:00:35: login finished at :30, setup runs to :90.
        for _ in 0..35 {
            twin.tick().unwrap();
        }
        assert_eq!(twin.state.agents[0].phase, AgentPhase::SettingUpQueue);

        let before_state = twin.state.clone();
        let before_worker = twin.worker.clone();
        twin.tick().unwrap();
        assert_eq!(twin.state, before_state, "no trigger, no event: a no-op");
        assert_eq!(twin.worker, before_worker);
    }
}

// ── Claim protocol ───────────────────────────────────────────────────────────

#[cfg(test)]
mod claims {
    use super::*;

    /// Two agents finish setup on the same queue in the same batch.
    #[test]
    fn simultaneous_setups_claim_distinct_items() {
        let mut b = StateStoreBuilder::new();
        for name in ["robot-01", "robot-02"] {
            let a = b.agent(name, 30, 20);
            let agent = b.agent_mut(a).unwrap();
            agent.phase = AgentPhase::SettingUpQueue;
            agent.current_user = Some(UserId(1));
        }
        let q = b.queue("invoices", UserId(1), 60, QueueParams::new(120, 5));
        seed_history(&mut b, q, 4);
        for n in 1..=3u64 {
            b.task(Task::new(TaskId(n), q, START, 120)).unwrap();
        }
        b.agent_mut(AgentId(0)).unwrap().current_queue = Some(q);
        b.agent_mut(AgentId(1)).unwrap().current_queue = Some(q);
        let store = b.build().unwrap();

        let mut twin = TwinBuilder::new(test_config(), store)
            .starting_at(START)
            .build()
            .unwrap();
        twin.events.schedule(Event {
            at: START,
            kind: EventKind::SetupDone { agent: AgentId(0), queue: q },
        });
        twin.events.schedule(Event {
            at: START,
            kind: EventKind::SetupDone { agent: AgentId(1), queue: q },
        });
        twin.step_instant().unwrap();

        let first = twin.state.agents[0].current_item;
        let second = twin.state.agents[1].current_item;
        assert_eq!(first, Some(TaskId(1)), "first event in the batch takes t1");
        assert_eq!(second, Some(TaskId(2)), "second sees t1 claimed and takes t2");
        assert_ne!(first, second);
    }

    #[test]
    fn setup_against_a_fully_claimed_queue_idles_the_agent() {
        let mut b = StateStoreBuilder::new();
        let a0 = b.agent("robot-01", 30, 20);
        let a1 = b.agent("robot-02", 30, 20);
        let q = b.queue("invoices", UserId(1), 60, QueueParams::new(120, 5));
        b.task(Task::new(TaskId(1), q, START, 120)).unwrap();
        // Agent 0 already works the only item.
        {
            let agent = b.agent_mut(a0).unwrap();
            agent.phase = AgentPhase::Working;
            agent.current_user = Some(UserId(1));
            agent.current_queue = Some(q);
            agent.current_item = Some(TaskId(1));
            agent.last_item_start = Some(START);
        }
        {
            let agent = b.agent_mut(a1).unwrap();
            agent.phase = AgentPhase::SettingUpQueue;
            agent.current_user = Some(UserId(1));
            agent.current_queue = Some(q);
        }
        let store = b.build().unwrap();

        let mut state = store;
        let mut events = EventQueue::new();
        Event {
            at: START.offset(10),
            kind: EventKind::SetupDone { agent: a1, queue: q },
        }
        .apply(&mut state, &mut events)
        .unwrap();

        let late = &state.agents[1];
        assert_eq!(late.phase, AgentPhase::Idle);
        assert_eq!(late.current_item, None);
        assert!(!late.process_enabled);
        assert!(events.is_empty(), "no completion scheduled for the loser");
    }

    #[test]
    fn disabled_processing_drops_to_idle_at_item_completion() {
        let mut b = StateStoreBuilder::new();
        let a = b.agent("robot-01", 30, 20);
        let q = b.queue("invoices", UserId(1), 60, QueueParams::new(120, 5));
        b.task(Task::new(TaskId(1), q, START, 120)).unwrap();
        b.task(Task::new(TaskId(2), q, START, 120)).unwrap();
        {
            let agent = b.agent_mut(a).unwrap();
            agent.phase = AgentPhase::Working;
            agent.current_user = Some(UserId(1));
            agent.current_queue = Some(q);
            agent.current_item = Some(TaskId(1));
            agent.last_item_start = Some(START);
            agent.process_enabled = false; // stop was requested
        }
        let mut state = b.build().unwrap();
        let mut events = EventQueue::new();

        Event {
            at: START.offset(60),
            kind: EventKind::ItemDone { agent: a, task: TaskId(1), queue: q },
        }
        .apply(&mut state, &mut events)
        .unwrap();

        let agent = &state.agents[0];
        assert_eq!(agent.phase, AgentPhase::Idle, "stop exits via the disabled branch");
        assert_eq!(agent.current_item, None);
        assert_eq!(state.queues[0].pending.len(), 1, "t2 stays pending");
        assert_eq!(state.queues[0].finished.last().unwrap().duration_secs, 60);
        assert!(events.is_empty());
    }
}

// ── Worker dispatch and translation ──────────────────────────────────────────

#[cfg(test)]
mod worker_behavior {
    use super::*;
    use crate::worker::translate;
    use wt_engine::SetupCommand;

    #[test]
    fn translation_binds_the_queue_and_drops_empty() {
        let mut b = StateStoreBuilder::new();
        let q = b.queue("invoices", UserId(7), 60, QueueParams::new(120, 5));
        let store = b.build().unwrap();
        let queue = store.queue(q).unwrap();

        let commands = translate(
            &[
                SetupCommand::Logout,
                SetupCommand::Login,
                SetupCommand::ExecuteQueue,
            ],
            queue,
        );
        assert_eq!(
            commands,
            vec![
                AgentCommand::Logout,
                AgentCommand::Login(UserId(7)),
                AgentCommand::StartProcess(q),
            ]
        );
        assert!(translate(&[SetupCommand::Empty], queue).is_empty());
    }

    #[test]
    fn one_command_dispatched_per_tick() {
        // The agent carries [Login, StartProcess]; the second command must
        // wait for the login to complete, not fire on the next tick.
        let mut twin = TwinBuilder::new(test_config(), cold_start_world(2))
            .starting_at(START)
            .build()
            .unwrap();
        twin.step_instant().unwrap();
        let agent = &twin.state.agents[0];
        assert_eq!(agent.phase, AgentPhase::LoggingIn);
        assert_eq!(agent.pending_commands.len(), 1, "StartProcess still queued");

        twin.tick().unwrap();
        let agent = &twin.state.agents[0];
        assert_eq!(agent.phase, AgentPhase::LoggingIn, "transient agents are skipped");
        assert_eq!(agent.pending_commands.len(), 1);
    }

    #[test]
    fn stop_process_command_disables_processing() {
        let mut b = StateStoreBuilder::new();
        let a = b.agent("robot-01", 30, 20);
        {
            let agent = b.agent_mut(a).unwrap();
            agent.phase = AgentPhase::Idle;
            agent.current_user = Some(UserId(1));
            agent.process_enabled = true;
            agent.pending_commands.push_back(AgentCommand::StopProcess);
        }
        let store = b.build().unwrap();
        let mut twin = TwinBuilder::new(test_config(), store)
            .starting_at(START)
            .build()
            .unwrap();
        twin.step_instant().unwrap();

        let agent = &twin.state.agents[0];
        assert_eq!(agent.stop_requested_at, Some(START));
        assert!(!agent.process_enabled);
    }

    #[test]
    fn logged_out_agent_has_no_residual_references() {
        let mut b = StateStoreBuilder::new();
        let a = b.agent("robot-01", 30, 20);
        {
            let agent = b.agent_mut(a).unwrap();
            agent.phase = AgentPhase::LoggingOut;
            agent.current_user = Some(UserId(1));
        }
        let mut state = b.build().unwrap();
        let mut events = EventQueue::new();
        Event { at: START, kind: EventKind::LogoutDone { agent: a } }
            .apply(&mut state, &mut events)
            .unwrap();

        let agent = &state.agents[0];
        assert_eq!(agent.phase, AgentPhase::LoggedOut);
        assert_eq!(agent.current_user, None);
        assert_eq!(agent.current_queue, None);
    }
}

// ── Adapter collapse ─────────────────────────────────────────────────────────

#[cfg(test)]
mod adapter_collapse {
    use super::*;
    use crate::adapter::adapt;
    use wt_engine::ResourceState;

    fn world_with_phase(phase: AgentPhase) -> StateStore {
        let mut b = StateStoreBuilder::new();
        let a = b.agent("robot-01", 30, 20);
        let q = b.queue("invoices", UserId(1), 60, QueueParams::new(120, 5));
        seed_history(&mut b, q, 4);
        let agent = b.agent_mut(a).unwrap();
        agent.phase = phase;
        match phase {
            AgentPhase::LoggedOut | AgentPhase::LoggingIn => {}
            AgentPhase::Idle | AgentPhase::LoggingOut => {
                agent.current_user = Some(UserId(1));
            }
            AgentPhase::SettingUpQueue | AgentPhase::Working => {
                agent.current_user = Some(UserId(1));
                agent.current_queue = Some(q);
                if phase == AgentPhase::Working {
                    agent.current_item = Some(TaskId(1));
                    agent.last_item_start = Some(START);
                }
            }
        }
        b.build().unwrap()
    }

    #[test]
    fn in_flight_phases_collapse_conservatively() {
        for (phase, expect_logged_out) in [
            (AgentPhase::LoggedOut, true),
            (AgentPhase::LoggingIn, true),
            (AgentPhase::Idle, false),
            (AgentPhase::LoggingOut, false),
            (AgentPhase::SettingUpQueue, false),
        ] {
            let state = world_with_phase(phase);
            let (agents, _) = adapt(&state, START);
            match (&agents[0].state, expect_logged_out) {
                (ResourceState::LoggedOut, true) => {}
                (ResourceState::Idle { user }, false) => assert_eq!(*user, UserId(1)),
                (got, _) => panic!("{phase:?} collapsed to {got:?}"),
            }
        }
    }

    #[test]
    fn working_agent_carries_remaining_item_time() {
        let state = world_with_phase(AgentPhase::Working);
        // 20 s into a 60 s item: 40 s remain.
        let (agents, _) = adapt(&state, START.offset(20));
        match &agents[0].state {
            ResourceState::Working { queue, finish_current_secs } => {
                assert_eq!(*queue, QueueId(0));
                assert_eq!(*finish_current_secs, 40.0);
            }
            got => panic!("expected Working, got {got:?}"),
        }
        // Far past the mean the remainder clamps at zero.
        let (agents, _) = adapt(&state, START.offset(600));
        match &agents[0].state {
            ResourceState::Working { finish_current_secs, .. } => {
                assert_eq!(*finish_current_secs, 0.0);
            }
            got => panic!("expected Working, got {got:?}"),
        }
    }

    #[test]
    fn history_replays_as_load_work_spans() {
        let state = world_with_phase(AgentPhase::Idle);
        let (_, queues) = adapt(&state, START);
        let entry = &queues[0].finished[0];
        assert_eq!(entry.work_secs, 60);
        assert_eq!(entry.attempt_secs, 0);
        assert_eq!(entry.finished - entry.loaded, 60);
    }
}

// ── Waves, control, and failure handling ─────────────────────────────────────

#[cfg(test)]
mod control_and_failure {
    use super::*;

    #[test]
    fn waves_arrive_on_schedule_and_get_worked() {
        let mut b = StateStoreBuilder::new();
        b.agent("robot-01", 30, 20);
        let q = b.queue("invoices", UserId(1), 60, QueueParams::new(120, 5));
        seed_history(&mut b, q, 4);
        let store = b.build().unwrap();

        let wave = TaskWave {
            at: START.offset(100),
            tasks: vec![
                Task::new(TaskId(1), q, START.offset(100), 120),
                Task::new(TaskId(2), q, START.offset(100), 120),
            ],
        };
        let mut twin = TwinBuilder::new(test_config(), store)
            .starting_at(START)
            .waves(vec![wave])
            .build()
            .unwrap();

        twin.step_instant().unwrap();
        for _ in 0..99 {
            twin.tick().unwrap();
        }
        assert!(twin.state.queues[0].pending.is_empty(), "wave not due yet");
        twin.tick().unwrap();
        assert_eq!(twin.state.queues[0].pending.len(), 2, "wave applied at its instant");

        let outcome = twin.run(&mut NoopObserver, &CancelToken::new()).unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(
            twin.state.queues[0].finished.iter().filter(|f| f.id.0 <= 2).count(),
            2
        );
    }

    #[test]
    fn cancelled_token_pauses_and_resume_completes() {
        let mut twin = TwinBuilder::new(test_config(), cold_start_world(2))
            .starting_at(START)
            .build()
            .unwrap();

        let paused = CancelToken::new();
        paused.cancel();
        assert_eq!(
            twin.run(&mut NoopObserver, &paused).unwrap(),
            RunOutcome::Paused
        );

        assert_eq!(
            twin.run(&mut NoopObserver, &CancelToken::new()).unwrap(),
            RunOutcome::Completed
        );
    }

    #[test]
    fn reset_restores_the_initial_world() {
        let mut twin = TwinBuilder::new(test_config(), cold_start_world(2))
            .starting_at(START)
            .build()
            .unwrap();
        let pristine = twin.state.clone();
        twin.run(&mut NoopObserver, &CancelToken::new()).unwrap();
        assert!(twin.state.queues_drained());

        twin.reset();
        assert_eq!(twin.state, pristine);
        assert_eq!(twin.clock.now, START);
        assert!(twin.events.is_empty());
        assert!(!twin.is_finished());
    }

    #[test]
    fn set_speed_rejects_negative_and_nan() {
        let mut twin = TwinBuilder::new(test_config(), cold_start_world(1))
            .starting_at(START)
            .build()
            .unwrap();
        assert!(twin.set_speed(-0.5).is_err());
        assert!(twin.set_speed(f64::NAN).is_err());
        assert!(twin.set_speed(0.0).is_ok());
        assert!(twin.set_speed(4.0).is_ok());
    }

    #[test]
    fn event_from_the_past_halts_the_run() {
        let mut twin = TwinBuilder::new(test_config(), cold_start_world(2))
            .starting_at(START)
            .build()
            .unwrap();
        // Scheduled before the window start: the bootstrap drain sees a
        // batch below the watermark.
        twin.events.schedule(Event {
            at: SimTime(START.0 - 10),
            kind: EventKind::LogoutDone { agent: AgentId(0) },
        });

        let result = twin.run(&mut NoopObserver, &CancelToken::new());
        assert!(result.is_err());
        let snapshot = twin.snapshot();
        assert!(snapshot.is_finished);
        assert!(
            snapshot.event_log.iter().any(|line| line.contains("halted")),
            "log: {:?}",
            snapshot.event_log
        );
    }

    #[test]
    fn event_naming_a_missing_agent_halts_the_run() {
        let mut twin = TwinBuilder::new(test_config(), cold_start_world(2))
            .starting_at(START)
            .build()
            .unwrap();
        twin.events.schedule(Event {
            at: START.offset(5),
            kind: EventKind::LogoutDone { agent: AgentId(99) },
        });
        assert!(twin.run(&mut NoopObserver, &CancelToken::new()).is_err());
        assert!(twin.snapshot().is_finished);
    }

    #[test]
    fn builder_rejects_bad_windows_and_waves() {
        let store = cold_start_world(1);
        assert!(TwinBuilder::new(test_config(), store.clone())
            .starting_at(START)
            .until(START)
            .build()
            .is_err());

        let wave = TaskWave {
            at: START.offset(10),
            tasks: vec![Task::new(TaskId(1), QueueId(9), START, 120)],
        };
        assert!(TwinBuilder::new(test_config(), store)
            .starting_at(START)
            .waves(vec![wave])
            .build()
            .is_err());
    }

    #[test]
    fn snapshot_reports_progress_metrics() {
        let mut twin = TwinBuilder::new(test_config(), cold_start_world(8))
            .starting_at(START)
            .build()
            .unwrap();
        twin.run(&mut NoopObserver, &CancelToken::new()).unwrap();

        let snapshot = twin.snapshot();
        assert!(snapshot.is_finished);
        assert_eq!(snapshot.queues[0].pending, 0);
        assert_eq!(snapshot.queues[0].completed, 12, "8 drained + 4 seeded");
        assert!(snapshot.metrics.completed_per_hour > 0.0);
        assert_eq!(snapshot.metrics.utilization_pct, 0.0, "everyone idle at the end");
        assert!(!snapshot.event_log.is_empty());
    }
}
