//! The `Twin` struct and its tick loop.

use std::collections::VecDeque;

use wt_core::{CancelToken, SimClock, SimTime, TwinConfig, TwinError, TwinResult};
use wt_state::{AgentPhase, StateStore, Task};

use crate::event_queue::EventQueue;
use crate::observer::TwinObserver;
use crate::snapshot::{AgentView, Metrics, QueueView, TwinSnapshot};
use crate::worker::Worker;

/// How many event-log lines the snapshot retains.
const LOG_CAPACITY: usize = 100;

// ── TaskWave ─────────────────────────────────────────────────────────────────

/// A batch of tasks that arrives at a known future instant.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskWave {
    pub at: SimTime,
    pub tasks: Vec<Task>,
}

// ── RunOutcome ───────────────────────────────────────────────────────────────

/// Why [`Twin::run`] returned without error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// All queues drained with nothing scheduled, or the window ended.
    Completed,
    /// The cancellation token fired; call `run` again to resume.
    Paused,
}

// ── Twin ─────────────────────────────────────────────────────────────────────

/// The live digital twin: one self-contained simulation.
///
/// All mutation happens on the thread calling [`tick`][Self::tick] /
/// [`run`][Self::run]; there are no locks because there is no concurrent
/// writer.  Every field is owned data, so `Clone` hands a forecast a
/// fully isolated copy — state, clock, event queue, wave cursor and all.
#[derive(Clone)]
pub struct Twin {
    pub config: TwinConfig,
    pub clock: SimClock,
    pub state: StateStore,
    pub events: EventQueue,
    pub worker: Worker,

    /// Scheduled task arrivals, sorted by timestamp.
    waves: Vec<TaskWave>,
    /// First wave not yet applied.
    wave_cursor: usize,
    /// Hard stop for the simulated window.
    window_end: SimTime,

    /// Timestamp of the last applied batch; batches may never regress
    /// below it.
    watermark: SimTime,
    /// Whether the start instant has been processed.
    started: bool,
    finished: bool,
    failure: Option<String>,
    speed_multiplier: f64,

    log: VecDeque<String>,
    /// Pristine copy for [`reset`][Self::reset].
    initial_state: StateStore,
}

impl Twin {
    pub(crate) fn assemble(
        config: TwinConfig,
        state: StateStore,
        waves: Vec<TaskWave>,
        start: SimTime,
        window_end: SimTime,
    ) -> Self {
        Self {
            clock: SimClock::new(start, config.step_secs),
            worker: Worker::new(&config),
            speed_multiplier: config.speed_multiplier,
            config,
            initial_state: state.clone(),
            state,
            events: EventQueue::new(),
            waves,
            wave_cursor: 0,
            window_end,
            watermark: start,
            started: false,
            finished: false,
            failure: None,
            log: VecDeque::new(),
        }
    }

    // ── Control surface ───────────────────────────────────────────────────

    /// Run until completion, pause, or failure.
    ///
    /// The first call processes the window-start instant (so triggers can
    /// fire at t = start); every further iteration advances the clock by
    /// one step first.  Real-time pacing sleeps `step / speed` between
    /// ticks; a zero speed runs flat out.  Cancelling the token pauses
    /// the loop between ticks — resume by calling `run` again with a
    /// fresh token.
    pub fn run<O: TwinObserver>(
        &mut self,
        observer: &mut O,
        cancel: &CancelToken,
    ) -> TwinResult<RunOutcome> {
        loop {
            if cancel.is_cancelled() {
                return Ok(RunOutcome::Paused);
            }
            if self.finished || (self.started && self.is_complete()) {
                break;
            }
            if let Err(error) = self.advance_once(observer) {
                self.halt(&error);
                observer.on_snapshot(&self.snapshot());
                observer.on_finish(self.clock.now);
                return Err(error);
            }
            self.pace();
        }
        self.finished = true;
        observer.on_finish(self.clock.now);
        Ok(RunOutcome::Completed)
    }

    /// Replace the pacing speed.  Zero means as fast as possible.
    pub fn set_speed(&mut self, multiplier: f64) -> TwinResult<()> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(TwinError::Config(format!(
                "speed multiplier must be finite and >= 0 (got {multiplier})"
            )));
        }
        self.speed_multiplier = multiplier;
        Ok(())
    }

    /// Rewind to the initial state: pristine agents and queues, empty
    /// event queue, wave cursor at the beginning, clock at the window
    /// start.
    pub fn reset(&mut self) {
        self.state = self.initial_state.clone();
        self.events.clear();
        self.clock = SimClock::new(self.clock.start, self.config.step_secs);
        self.worker = Worker::new(&self.config);
        self.wave_cursor = 0;
        self.watermark = self.clock.start;
        self.started = false;
        self.finished = false;
        self.failure = None;
        self.log.clear();
    }

    /// Request a passive stop for one agent: processing is disabled and
    /// the next item completion drops it to idle.
    pub fn request_stop(&mut self, agent: wt_core::AgentId, now: SimTime) -> TwinResult<()> {
        let agent = self.state.agent_mut(agent)?;
        agent.stop_requested_at = Some(now);
        agent.process_enabled = false;
        Ok(())
    }

    // ── Tick machinery ────────────────────────────────────────────────────

    /// Advance the clock one step and process the new instant.
    pub fn tick(&mut self) -> TwinResult<()> {
        self.clock.advance();
        self.started = true;
        self.step_instant()
    }

    /// Process the current instant: apply due waves, drain due event
    /// batches atomically, then let the worker observe.
    pub(crate) fn step_instant(&mut self) -> TwinResult<()> {
        let now = self.clock.now;
        self.apply_due_waves(now);

        while self.events.next_time().is_some_and(|t| t <= now) {
            let (at, batch) = self.events.pop_batch()?;
            if at < self.watermark {
                return Err(TwinError::EventOrder { at, watermark: self.watermark });
            }
            self.watermark = at;
            for event in batch {
                let line = format!("{} {}", self.clock.stamp(at), event.describe(&self.state));
                self.push_log(line);
                event.apply(&mut self.state, &mut self.events)?;
            }
        }

        self.worker.observe(&mut self.state, &mut self.events, now)?;
        Ok(())
    }

    fn advance_once<O: TwinObserver>(&mut self, observer: &mut O) -> TwinResult<()> {
        if self.started {
            self.clock.advance();
        } else {
            self.started = true;
        }
        let now = self.clock.now;
        observer.on_tick_start(now);
        self.step_instant()?;
        observer.on_tick_end(now, &self.state);
        observer.on_snapshot(&self.snapshot());
        Ok(())
    }

    fn apply_due_waves(&mut self, now: SimTime) {
        while let Some(wave) = self.waves.get(self.wave_cursor) {
            if wave.at > now {
                break;
            }
            for task in &wave.tasks {
                // Wave targets were validated at build time.
                if let Ok(queue) = self.state.queue_mut(task.queue) {
                    queue.pending.push(task.clone());
                }
            }
            let line = format!(
                "{} wave of {} tasks arrived",
                self.clock.stamp(wave.at),
                wave.tasks.len()
            );
            self.push_log(line);
            self.wave_cursor += 1;
        }
    }

    /// Live termination: past the window end, or nothing left anywhere —
    /// no events in flight, no waves to come, every queue drained.
    pub fn is_complete(&self) -> bool {
        if self.clock.now >= self.window_end {
            return true;
        }
        self.events.is_empty()
            && self.wave_cursor >= self.waves.len()
            && self.state.queues_drained()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Clamp the window end, e.g. to a forecast horizon.
    pub fn clamp_window(&mut self, end: SimTime) {
        self.window_end = self.window_end.min(end);
    }

    fn pace(&self) {
        if self.speed_multiplier > 0.0 {
            let wall_secs = self.config.step_secs as f64 / self.speed_multiplier;
            std::thread::sleep(std::time::Duration::from_secs_f64(wall_secs));
        }
    }

    fn halt(&mut self, error: &TwinError) {
        tracing::error!(%error, "tick failed; halting the simulation");
        let line = format!("{} halted: {error}", self.clock.stamp(self.clock.now));
        self.push_log(line);
        self.failure = Some(error.to_string());
        self.finished = true;
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }

    // ── Published view ────────────────────────────────────────────────────

    /// Build the externally published view of the current instant.
    pub fn snapshot(&self) -> TwinSnapshot {
        let agents: Vec<AgentView> = self
            .state
            .agents
            .iter()
            .map(|a| AgentView {
                name: a.name.clone(),
                phase: a.phase,
                queue: a.current_queue,
                user: a.current_user,
            })
            .collect();
        let queues: Vec<QueueView> = self
            .state
            .queues
            .iter()
            .map(|q| QueueView {
                name: q.name.clone(),
                pending: q.pending.len(),
                completed: q.finished.len(),
            })
            .collect();

        let elapsed_hours = self.clock.elapsed_secs() as f64 / 3_600.0;
        let completed_per_hour = if elapsed_hours > 0.0 {
            self.state.total_completed() as f64 / elapsed_hours
        } else {
            0.0
        };
        let working = self
            .state
            .agents
            .iter()
            .filter(|a| a.phase == AgentPhase::Working)
            .count();
        let utilization_pct = if self.state.agents.is_empty() {
            0.0
        } else {
            100.0 * working as f64 / self.state.agents.len() as f64
        };

        TwinSnapshot {
            now: self.clock.now,
            clock_label: self.clock.stamp(self.clock.now),
            agents,
            queues,
            metrics: Metrics { completed_per_hour, utilization_pct },
            event_log: self.log.iter().cloned().collect(),
            is_finished: self.finished || self.is_complete(),
        }
    }
}
