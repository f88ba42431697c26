//! Pluggable collaborator contracts.
//!
//! Stages receive read-only snapshots and return new values; the orchestrator
//! owns all state. Estimator, guidance law and controller algorithms live
//! behind these traits and are supplied by the caller.

use crate::error::GncResult;
use crate::mode::GncMode;
use crate::sensors::Measurements;
use crate::state::{GncCommand, GncState};

pub trait NavigationStage {
    /// Produce the next state estimate. Invalid or missing sensor entries must
    /// be skipped, not treated as failures.
    fn update(&mut self, measurements: &Measurements, previous: &GncState) -> GncResult<GncState>;
}

pub trait GuidanceStage {
    /// Desired trajectory point for this cycle (a state, not an actuator command).
    fn compute_command(
        &mut self,
        current: &GncState,
        target: &GncState,
        mode: GncMode,
    ) -> GncResult<GncState>;
}

pub trait ControlStage {
    fn compute_command(
        &mut self,
        current: &GncState,
        desired: &GncState,
        mode: GncMode,
    ) -> GncResult<GncCommand>;
}

/// Consumer of actuator commands. Saturation limits are the actuator's concern.
pub trait Actuator {
    fn apply(&mut self, command: &GncCommand) -> GncResult<()>;
}
