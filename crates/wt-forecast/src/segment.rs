//! Forecast timeline segments, derived by diffing agent phases at every
//! tick boundary.

use wt_core::{AgentId, QueueId, SimTime};
use wt_state::{AgentPhase, StateStore};
use wt_sim::TwinObserver;

// ── Segment ──────────────────────────────────────────────────────────────────

/// What a timeline segment shows an agent doing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    Login,
    Logout,
    Setup,
    Working,
}

/// One contiguous stretch of agent activity in a forecast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub agent: AgentId,
    pub start: SimTime,
    pub end: SimTime,
    pub kind: SegmentKind,
    /// The queue being set up or worked; `None` for login/logout.
    pub queue: Option<QueueId>,
}

/// The published outcome of one forecast run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForecastResult {
    /// The live clock instant the forecast was cloned at.
    pub launched_at: SimTime,
    /// `launched_at` plus the configured forecast horizon.
    pub horizon_end: SimTime,
    /// Where the cloned clock actually stopped.
    pub completed_at: SimTime,
    pub segments: Vec<Segment>,
}

// ── SegmentRecorder ──────────────────────────────────────────────────────────

/// A [`TwinObserver`] that turns per-tick agent phases into segments.
///
/// A segment opens the first tick its (kind, queue) pair is observed and
/// closes the first tick it is gone, so boundaries are accurate to one
/// clock step.  Idle and logged-out stretches produce no segments.
pub struct SegmentRecorder {
    open: Vec<Option<(SegmentKind, Option<QueueId>, SimTime)>>,
    segments: Vec<Segment>,
}

impl SegmentRecorder {
    pub fn new(agent_count: usize) -> Self {
        Self {
            open: vec![None; agent_count],
            segments: Vec::new(),
        }
    }

    /// Consume the recorder, closing anything still open at `end`.
    pub fn into_segments(mut self, end: SimTime) -> Vec<Segment> {
        for idx in 0..self.open.len() {
            self.close(idx, end);
        }
        self.segments
    }

    fn close(&mut self, idx: usize, end: SimTime) {
        if let Some((kind, queue, start)) = self.open[idx].take() {
            self.segments.push(Segment {
                agent: AgentId(idx as u32),
                start,
                end,
                kind,
                queue,
            });
        }
    }
}

fn observed(phase: AgentPhase, queue: Option<QueueId>) -> Option<(SegmentKind, Option<QueueId>)> {
    match phase {
        AgentPhase::LoggingIn => Some((SegmentKind::Login, None)),
        AgentPhase::LoggingOut => Some((SegmentKind::Logout, None)),
        AgentPhase::SettingUpQueue => Some((SegmentKind::Setup, queue)),
        AgentPhase::Working => Some((SegmentKind::Working, queue)),
        AgentPhase::LoggedOut | AgentPhase::Idle => None,
    }
}

impl TwinObserver for SegmentRecorder {
    fn on_tick_end(&mut self, now: SimTime, state: &StateStore) {
        for (idx, agent) in state.agents.iter().enumerate() {
            let target = observed(agent.phase, agent.current_queue);
            let current = self.open[idx].map(|(kind, queue, _)| (kind, queue));
            if current == target {
                continue;
            }
            self.close(idx, now);
            if let Some((kind, queue)) = target {
                self.open[idx] = Some((kind, queue, now));
            }
        }
    }

    fn on_finish(&mut self, now: SimTime) {
        for idx in 0..self.open.len() {
            self.close(idx, now);
        }
    }
}
