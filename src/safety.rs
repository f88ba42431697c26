use crate::config::GncConfig;
use crate::error::GncResult;
use crate::mode::GncMode;
use crate::state::{unit_vector, GncCommand, GncState};
use heapless::Vec;
use serde::{Deserialize, Serialize};

const MAX_SAFETY_RECORDS: usize = 32;

/// Thrust magnitude of the abort command [N].
pub const DEFAULT_ABORT_THRUST_N: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SafetyViolation {
    /// Inside the minimum safe distance outside a close-approach phase.
    TooClose { distance: f64, limit: f64 },
    /// Speed above the mode-adjusted maximum approach velocity.
    Overspeed { speed: f64, limit: f64 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SafetyVerdict {
    violations: Vec<SafetyViolation, 2>,
}

impl SafetyVerdict {
    pub fn is_safe(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[SafetyViolation] {
        &self.violations
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyRecord {
    pub violation: SafetyViolation,
    pub mode: GncMode,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyStats {
    pub checks_performed: u64,
    pub unsafe_cycles: u64,
    pub aborts_commanded: u64,
}

/// Per-cycle envelope checks and the deterministic abort command.
#[derive(Debug)]
pub struct SafetySupervisor {
    abort_thrust: f64,
    history: Vec<SafetyRecord, MAX_SAFETY_RECORDS>,
    stats: SafetyStats,
}

impl Default for SafetySupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl SafetySupervisor {
    pub fn new() -> Self {
        Self::with_abort_thrust(DEFAULT_ABORT_THRUST_N)
    }

    pub fn with_abort_thrust(abort_thrust: f64) -> Self {
        Self {
            abort_thrust,
            history: Vec::new(),
            stats: SafetyStats::default(),
        }
    }

    pub fn abort_thrust(&self) -> f64 {
        self.abort_thrust
    }

    /// Evaluate both envelope checks without touching supervisor state.
    pub fn evaluate(&self, state: &GncState, mode: GncMode, config: &GncConfig) -> SafetyVerdict {
        let mut verdict = SafetyVerdict::default();

        let distance = state.range();
        if distance < config.min_safe_distance && !mode.allows_close_approach() {
            let _ = verdict.violations.push(SafetyViolation::TooClose {
                distance,
                limit: config.min_safe_distance,
            });
        }

        let speed = state.speed();
        if speed > config.max_approach_velocity {
            let _ = verdict.violations.push(SafetyViolation::Overspeed {
                speed,
                limit: config.max_approach_velocity,
            });
        }

        verdict
    }

    pub fn is_safe(&self, state: &GncState, mode: GncMode, config: &GncConfig) -> bool {
        self.evaluate(state, mode, config).is_safe()
    }

    /// Push directly away from the target at the abort thrust magnitude.
    ///
    /// Fails with a degenerate-vector error when the spacecraft sits on the
    /// target, where no escape direction exists.
    pub fn generate_safe_command(&self, state: &GncState) -> GncResult<GncCommand> {
        let away = unit_vector(&state.position, "abort direction")?;

        Ok(GncCommand {
            thrust: away * self.abort_thrust,
            ..GncCommand::zero(state.timestamp)
        })
    }

    /// Record the outcome of one supervised cycle.
    /// `aborted` is false when no abort command could replace the control
    /// output for an unsafe verdict.
    pub fn record(&mut self, verdict: &SafetyVerdict, aborted: bool, mode: GncMode, timestamp: f64) {
        self.stats.checks_performed = self.stats.checks_performed.saturating_add(1);
        if verdict.is_safe() {
            return;
        }

        self.stats.unsafe_cycles = self.stats.unsafe_cycles.saturating_add(1);
        if aborted {
            self.stats.aborts_commanded = self.stats.aborts_commanded.saturating_add(1);
        }

        for violation in verdict.violations() {
            if self.history.is_full() {
                self.history.remove(0);
            }
            let _ = self.history.push(SafetyRecord {
                violation: *violation,
                mode,
                timestamp,
            });
        }
    }

    pub fn history(&self) -> &[SafetyRecord] {
        &self.history
    }

    pub fn stats(&self) -> &SafetyStats {
        &self.stats
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
