//! Top-level simulation configuration.

use crate::error::{TwinError, TwinResult};

/// Tunable parameters shared by the live twin and its forecasts.
///
/// All durations are simulated seconds.  Construct with
/// [`TwinConfig::default`] and override fields, then let the simulator
/// builder call [`validate`][Self::validate] — configuration problems are
/// surfaced before a simulation exists, never at runtime.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwinConfig {
    /// Clock advance per tick.  Default: 1 s.
    pub step_secs: u32,

    /// Minimum gap between decision-engine invocations when no agent is
    /// sitting idle.  Default: 10 min.
    pub decision_interval_secs: u64,

    /// Lookahead window the engine uses to estimate real capacity.
    /// Default: 10 min for live use (the engine itself defaults to 1 h
    /// when constructed standalone).
    pub decision_horizon_secs: u64,

    /// Maximum simulated span of a forecast run.  Default: 8 h.
    pub forecast_horizon_secs: u64,

    /// Real-time pacing: one tick takes `step_secs / speed_multiplier`
    /// wall seconds.  `0.0` means run as fast as possible.  Default: 1.0.
    pub speed_multiplier: f64,

    /// Weight of the SLA-failure fraction in the queue weight.
    /// Default: 0.5.
    pub bias: f64,
}

impl Default for TwinConfig {
    fn default() -> Self {
        Self {
            step_secs: 1,
            decision_interval_secs: 600,
            decision_horizon_secs: 600,
            forecast_horizon_secs: 8 * 3_600,
            speed_multiplier: 1.0,
            bias: 0.5,
        }
    }
}

impl TwinConfig {
    /// Fail-fast validation: every duration strictly positive, the speed
    /// multiplier non-negative and finite, the bias finite.
    pub fn validate(&self) -> TwinResult<()> {
        if self.step_secs == 0 {
            return Err(TwinError::Config("step_secs must be > 0".into()));
        }
        if self.decision_interval_secs == 0 {
            return Err(TwinError::Config("decision_interval_secs must be > 0".into()));
        }
        if self.decision_horizon_secs == 0 {
            return Err(TwinError::Config("decision_horizon_secs must be > 0".into()));
        }
        if self.forecast_horizon_secs == 0 {
            return Err(TwinError::Config("forecast_horizon_secs must be > 0".into()));
        }
        if !self.speed_multiplier.is_finite() || self.speed_multiplier < 0.0 {
            return Err(TwinError::Config(format!(
                "speed_multiplier must be finite and >= 0 (got {})",
                self.speed_multiplier
            )));
        }
        if !self.bias.is_finite() {
            return Err(TwinError::Config(format!("bias must be finite (got {})", self.bias)));
        }
        Ok(())
    }
}
