//! Fluent builder for constructing a [`Twin`].

use wt_core::{SimTime, TwinConfig, TwinError, TwinResult};
use wt_state::StateStore;

use crate::sim::{TaskWave, Twin};

/// Builds a validated [`Twin`].
///
/// # Required inputs
///
/// - [`TwinConfig`] — step, intervals, horizons, pacing, bias
/// - [`StateStore`] — the initial agents and queues
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                          |
/// |---------------------|----------------------------------|
/// | `.starting_at(t)`   | `SimTime(0)`                     |
/// | `.until(t)`         | start + 24 h                     |
/// | `.waves(v)`         | none                             |
///
/// # Example
///
/// ```rust,ignore
/// let mut twin = TwinBuilder::new(config, store)
///     .starting_at(SimTime(32_400)) // 09:00
///     .until(SimTime(61_200))       // 17:00
///     .waves(waves)
///     .build()?;
/// twin.run(&mut NoopObserver, &CancelToken::new())?;
/// ```
pub struct TwinBuilder {
    config: TwinConfig,
    state: StateStore,
    waves: Vec<TaskWave>,
    start: SimTime,
    end: Option<SimTime>,
}

impl TwinBuilder {
    pub fn new(config: TwinConfig, state: StateStore) -> Self {
        Self {
            config,
            state,
            waves: Vec::new(),
            start: SimTime(0),
            end: None,
        }
    }

    /// First instant of the simulated window.
    pub fn starting_at(mut self, start: SimTime) -> Self {
        self.start = start;
        self
    }

    /// Hard end of the simulated window.  Defaults to 24 h after start.
    pub fn until(mut self, end: SimTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Scheduled task arrivals.  Sorted by timestamp during `build`.
    pub fn waves(mut self, waves: Vec<TaskWave>) -> Self {
        self.waves = waves;
        self
    }

    /// Validate configuration, window, and wave references, and return a
    /// ready-to-run [`Twin`].
    pub fn build(self) -> TwinResult<Twin> {
        self.config.validate()?;

        let end = self.end.unwrap_or_else(|| self.start.offset(86_400));
        if end <= self.start {
            return Err(TwinError::Config(format!(
                "window end {end} must be after start {}",
                self.start
            )));
        }

        let mut waves = self.waves;
        for wave in &waves {
            for task in &wave.tasks {
                if task.queue.index() >= self.state.queues.len() {
                    return Err(TwinError::QueueNotFound(task.queue));
                }
            }
        }
        waves.sort_by_key(|w| w.at);

        Ok(Twin::assemble(self.config, self.state, waves, self.start, end))
    }
}
